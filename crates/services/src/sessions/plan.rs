use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::model::{Question, QuestionError, QuizSettings};

/// Materialized question selection for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizPlan {
    pub questions: Vec<Question>,
    /// Pool size after the difficulty filter, before truncation.
    pub pool_size: usize,
}

impl QuizPlan {
    /// Total number of questions selected for the session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    /// Returns true when no questions were selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Builds a session's question sequence from a loaded pool.
///
/// Applies the difficulty filter, the optional question shuffle, truncation to
/// `min(requested, available)`, and the optional per-question option shuffle.
/// Fully deterministic when both shuffle flags are off.
pub struct QuizPlanner<'a> {
    settings: &'a QuizSettings,
}

impl<'a> QuizPlanner<'a> {
    #[must_use]
    pub fn new(settings: &'a QuizSettings) -> Self {
        Self { settings }
    }

    /// Build a plan from the category pool.
    ///
    /// A difficulty filter that matches nothing falls back to the unfiltered
    /// pool rather than producing an empty session.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if a question cannot be rebuilt with shuffled
    /// options; structurally this cannot happen for a permutation.
    pub fn build(self, pool: Vec<Question>) -> Result<QuizPlan, QuestionError> {
        let filter = self.settings.difficulty();
        let filtered: Vec<Question> = pool
            .iter()
            .filter(|q| filter.matches(q.difficulty()))
            .cloned()
            .collect();
        let mut pool = if filtered.is_empty() { pool } else { filtered };
        let pool_size = pool.len();

        if self.settings.shuffle_questions() {
            let mut rng = rng();
            pool.as_mut_slice().shuffle(&mut rng);
        }

        let take = usize::try_from(self.settings.question_count()).unwrap_or(usize::MAX);
        pool.truncate(take);

        if self.settings.shuffle_options() {
            let mut rng = rng();
            let mut shuffled = Vec::with_capacity(pool.len());
            for question in pool {
                let mut options = question.options().to_vec();
                options.as_mut_slice().shuffle(&mut rng);
                shuffled.push(question.reordered(options)?);
            }
            pool = shuffled;
        }

        Ok(QuizPlan {
            questions: pool,
            pool_size,
        })
    }
}
