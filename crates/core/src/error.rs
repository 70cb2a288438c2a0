use thiserror::Error;

use crate::model::{QuestionError, ScoreRecordError, SettingsError, UserError};

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Question(#[from] QuestionError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Score(#[from] ScoreRecordError),
    #[error(transparent)]
    User(#[from] UserError),
}
