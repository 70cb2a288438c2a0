use std::sync::{Arc, Mutex};

/// Severity of a transient user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
    Info,
}

/// Fire-and-forget channel for transient messages to the user.
///
/// The presentation layer decides how (or whether) to surface them; the core
/// never waits for acknowledgement.
pub trait Notifier: Send + Sync {
    fn notify(&self, kind: NoticeKind, message: &str);
}

/// Routes notices to the `log` facade when no UI is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        match kind {
            NoticeKind::Success | NoticeKind::Info => log::info!("{message}"),
            NoticeKind::Error => log::warn!("{message}"),
        }
    }
}

/// Discards every notice.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _kind: NoticeKind, _message: &str) {}
}

/// Captures notices for assertions in tests.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    notices: Arc<Mutex<Vec<(NoticeKind, String)>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything notified so far, in order.
    #[must_use]
    pub fn notices(&self) -> Vec<(NoticeKind, String)> {
        self.notices.lock().map(|g| g.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.notices().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, kind: NoticeKind, message: &str) {
        if let Ok(mut guard) = self.notices.lock() {
            guard.push((kind, message.to_string()));
        }
    }
}
