mod ids;
mod lifelines;
mod question;
mod score;
mod settings;
mod user;

pub use ids::{ParseIdError, QuestionId, QuizId, ScoreId, UserId};
pub use lifelines::{EXTRA_TIME_SECS, Lifeline, LifelineSet, ParseLifelineError};
pub use question::{Difficulty, ParseDifficultyError, Question, QuestionDraft, QuestionError};
pub use score::{ScoreRecord, ScoreRecordError, accuracy_percent};
pub use settings::{CategorySelect, DifficultyFilter, QuizSettings, SettingsError};
pub use user::{Preferences, UserError, UserProfile};
