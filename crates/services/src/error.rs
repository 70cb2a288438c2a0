//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, ScoreRecordError};
use storage::repository::StorageError;

/// Errors emitted while loading category question content.
///
/// An empty pool is not an error; the built-in fallback set covers it.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContentError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("malformed question file for {category}: {message}")]
    Parse { category: String, message: String },

    #[error("invalid question in {category}")]
    InvalidQuestion {
        category: String,
        #[source]
        source: QuestionError,
    },
}

/// Errors emitted by the quiz session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("no questions available for session")]
    Empty,
    #[error("session has no active question left")]
    Completed,
    #[error("current question already has a final answer")]
    AlreadyAnswered,
    #[error("lifeline already consumed")]
    LifelineConsumed,
}

/// Errors emitted by the quiz orchestration layer.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available, even from the fallback set")]
    NoQuestions,
    #[error(transparent)]
    Content(#[from] ContentError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Score(#[from] ScoreRecordError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
