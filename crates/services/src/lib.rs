#![forbid(unsafe_code)]

pub mod catalog;
pub mod content;
pub mod error;
pub mod notifier;
pub mod sessions;

pub use quiz_core::Clock;

pub use content::{FixedQuestionSource, JsonQuestionSource, QuestionSource, fallback_questions};
pub use error::{ContentError, QuizError, SessionError};
pub use notifier::{LogNotifier, NoticeKind, Notifier, NullNotifier, RecordingNotifier};
pub use sessions::{
    AnswerOutcome, AnswerRecord, LifelineEffect, QuizLoopService, QuizPlan, QuizPlanner,
    QuizResult, QuizSession, QuizStep, SessionProgress,
};
