use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{ScoreId, UserId};
use crate::model::lifelines::Lifeline;
use crate::model::settings::DifficultyFilter;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScoreRecordError {
    #[error("a score record needs at least one question")]
    NoQuestions,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },

    #[error("accuracy {accuracy} does not match {correct}/{total}")]
    InvalidAccuracy { accuracy: u8, correct: u32, total: u32 },
}

/// Accuracy percentage as stored in score records:
/// `round(100 * correct / total)`, or `0` when `total` is zero.
#[must_use]
pub fn accuracy_percent(correct: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (f64::from(correct) / f64::from(total) * 100.0).round();
    // correct <= total keeps this within 0..=100.
    pct as u8
}

/// One completed quiz as it lands in score history. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    id: ScoreId,
    user_id: UserId,
    category: String,
    score: u32,
    correct_answers: u32,
    total_questions: u32,
    accuracy: u8,
    completed_at: DateTime<Utc>,
    difficulty: DifficultyFilter,
    time_taken_secs: u64,
    lifelines_used: Vec<Lifeline>,
}

impl ScoreRecord {
    /// Creates a validated score record.
    ///
    /// # Errors
    ///
    /// Returns `ScoreRecordError` when counts are inconsistent or the
    /// accuracy does not match the counts.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: ScoreId,
        user_id: UserId,
        category: impl Into<String>,
        score: u32,
        correct_answers: u32,
        total_questions: u32,
        accuracy: u8,
        completed_at: DateTime<Utc>,
        difficulty: DifficultyFilter,
        time_taken_secs: u64,
        lifelines_used: Vec<Lifeline>,
    ) -> Result<Self, ScoreRecordError> {
        if total_questions == 0 {
            return Err(ScoreRecordError::NoQuestions);
        }
        if correct_answers > total_questions {
            return Err(ScoreRecordError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }
        if accuracy != accuracy_percent(correct_answers, total_questions) {
            return Err(ScoreRecordError::InvalidAccuracy {
                accuracy,
                correct: correct_answers,
                total: total_questions,
            });
        }

        Ok(Self {
            id,
            user_id,
            category: category.into(),
            score,
            correct_answers,
            total_questions,
            accuracy,
            completed_at,
            difficulty,
            time_taken_secs,
            lifelines_used,
        })
    }

    /// Rehydrate a record from persisted storage, re-running validation.
    ///
    /// # Errors
    ///
    /// Returns `ScoreRecordError` if the stored fields do not align.
    #[allow(clippy::too_many_arguments)]
    pub fn from_persisted(
        id: ScoreId,
        user_id: UserId,
        category: String,
        score: u32,
        correct_answers: u32,
        total_questions: u32,
        accuracy: u8,
        completed_at: DateTime<Utc>,
        difficulty: DifficultyFilter,
        time_taken_secs: u64,
        lifelines_used: Vec<Lifeline>,
    ) -> Result<Self, ScoreRecordError> {
        Self::new(
            id,
            user_id,
            category,
            score,
            correct_answers,
            total_questions,
            accuracy,
            completed_at,
            difficulty,
            time_taken_secs,
            lifelines_used,
        )
    }

    #[must_use]
    pub fn id(&self) -> ScoreId {
        self.id
    }

    #[must_use]
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn accuracy(&self) -> u8 {
        self.accuracy
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyFilter {
        self.difficulty
    }

    #[must_use]
    pub fn time_taken_secs(&self) -> u64 {
        self.time_taken_secs
    }

    #[must_use]
    pub fn lifelines_used(&self) -> &[Lifeline] {
        &self.lifelines_used
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn build(correct: u32, total: u32, accuracy: u8) -> Result<ScoreRecord, ScoreRecordError> {
        ScoreRecord::new(
            ScoreId::new(),
            UserId::anonymous(),
            "science",
            correct * 100,
            correct,
            total,
            accuracy,
            fixed_now(),
            DifficultyFilter::Mixed,
            120,
            vec![Lifeline::Hint],
        )
    }

    #[test]
    fn accuracy_rounds_half_up() {
        assert_eq!(accuracy_percent(1, 3), 33);
        assert_eq!(accuracy_percent(2, 3), 67);
        assert_eq!(accuracy_percent(1, 2), 50);
        assert_eq!(accuracy_percent(0, 5), 0);
        assert_eq!(accuracy_percent(5, 5), 100);
    }

    #[test]
    fn record_validates_counts() {
        assert!(build(2, 2, 100).is_ok());
        assert_eq!(build(0, 0, 0).unwrap_err(), ScoreRecordError::NoQuestions);
        assert!(matches!(
            build(3, 2, 100).unwrap_err(),
            ScoreRecordError::CountMismatch { .. }
        ));
        assert!(matches!(
            build(1, 2, 99).unwrap_err(),
            ScoreRecordError::InvalidAccuracy { .. }
        ));
    }

    #[test]
    fn persisted_round_trip_keeps_fields() {
        let record = build(3, 4, 75).unwrap();
        let again = ScoreRecord::from_persisted(
            record.id(),
            record.user_id().clone(),
            record.category().to_string(),
            record.score(),
            record.correct_answers(),
            record.total_questions(),
            record.accuracy(),
            record.completed_at(),
            record.difficulty(),
            record.time_taken_secs(),
            record.lifelines_used().to_vec(),
        )
        .unwrap();
        assert_eq!(again, record);
    }
}
