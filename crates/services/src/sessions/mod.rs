mod plan;
mod progress;
mod scoring;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{QuizPlan, QuizPlanner};
pub use progress::SessionProgress;
pub use scoring::score_answer;
pub use service::{
    AnswerOutcome, AnswerRecord, LifelineEffect, QuizResult, QuizSession, QuizStep,
};
pub use workflow::QuizLoopService;
