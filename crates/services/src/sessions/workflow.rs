use std::sync::Arc;

use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::Clock;
use quiz_core::model::{
    CategorySelect, Lifeline, Question, QuizId, QuizSettings, ScoreId, ScoreRecord, UserId,
    accuracy_percent,
};

use super::plan::QuizPlanner;
use super::service::{AnswerOutcome, LifelineEffect, QuizResult, QuizSession};
use crate::catalog;
use crate::content::{QuestionSource, fallback_questions};
use crate::error::QuizError;
use crate::notifier::{NoticeKind, Notifier};
use storage::repository::Storage;

/// Drives the quiz loop: starts sessions, relays answers and lifelines with
/// user-facing notices, and turns finished sessions into persisted history.
///
/// The service never owns the running session; the caller holds it and hands
/// it back by value to finish or abandon it.
pub struct QuizLoopService {
    clock: Clock,
    source: Arc<dyn QuestionSource>,
    storage: Storage,
    notifier: Arc<dyn Notifier>,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(
        clock: Clock,
        source: Arc<dyn QuestionSource>,
        storage: Storage,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            clock,
            source,
            storage,
            notifier,
        }
    }

    /// Assemble the raw pool for the settings' category selection.
    ///
    /// `All` draws a slice from every catalog category so no single category
    /// dominates a mixed quiz.
    async fn load_pool(&self, settings: &QuizSettings) -> Result<Vec<Question>, QuizError> {
        match settings.category() {
            CategorySelect::Named(name) => Ok(self.source.load_questions(name).await?),
            CategorySelect::All => {
                let names: Vec<&str> = catalog::categories().iter().map(|c| c.name).collect();
                let per_category =
                    (settings.question_count() as usize).div_ceil(names.len().max(1));
                let mut pool = Vec::new();
                for name in names {
                    let mut chunk = self.source.load_questions(name).await?;
                    if settings.shuffle_questions() {
                        let mut rng = rng();
                        chunk.as_mut_slice().shuffle(&mut rng);
                    }
                    chunk.truncate(per_category);
                    pool.extend(chunk);
                }
                Ok(pool)
            }
        }
    }

    /// Start a new session for the given settings.
    ///
    /// An empty pool falls back to the built-in question set; only an empty
    /// fallback is fatal.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` if no content exists at all, or a
    /// `QuizError::Content` when a category file is malformed.
    pub async fn start_quiz(&self, settings: QuizSettings) -> Result<QuizSession, QuizError> {
        let category = settings.category().as_str().to_string();
        let mut pool = self.load_pool(&settings).await?;
        if pool.is_empty() {
            self.notifier.notify(
                NoticeKind::Info,
                "No questions found for this category, using the backup set",
            );
            pool = fallback_questions(&category);
        }
        if pool.is_empty() {
            self.notifier
                .notify(NoticeKind::Error, "No questions available to start a quiz");
            return Err(QuizError::NoQuestions);
        }

        let plan = QuizPlanner::new(&settings).build(pool)?;
        let session = QuizSession::new(
            QuizId::new(),
            category,
            plan.questions,
            settings,
            self.clock.now(),
        )?;

        log::debug!(
            "session {} started with {} questions (pool of {})",
            session.id(),
            session.total_questions(),
            plan.pool_size
        );
        self.notifier.notify(
            NoticeKind::Success,
            &format!(
                "Quiz started! {} questions ready",
                session.total_questions()
            ),
        );
        Ok(session)
    }

    /// Submit an answer on behalf of the caller and emit the matching notice.
    ///
    /// # Errors
    ///
    /// Propagates the session's `SessionError` unchanged.
    pub fn answer(
        &self,
        session: &mut QuizSession,
        answer: &str,
    ) -> Result<AnswerOutcome, QuizError> {
        let outcome = session.submit_answer(answer)?;
        match &outcome {
            AnswerOutcome::Correct { points } => {
                self.notifier
                    .notify(NoticeKind::Success, &format!("Correct! +{points} points"));
            }
            AnswerOutcome::IncorrectRetry => {
                self.notifier
                    .notify(NoticeKind::Info, "Incorrect! Second chance used");
            }
            AnswerOutcome::Incorrect { correct_answer } => {
                self.notifier.notify(
                    NoticeKind::Error,
                    &format!("Incorrect! The answer was: {correct_answer}"),
                );
            }
        }
        Ok(outcome)
    }

    /// Use a lifeline on behalf of the caller and emit the matching notice.
    ///
    /// # Errors
    ///
    /// Propagates the session's `SessionError` unchanged.
    pub fn use_lifeline(
        &self,
        session: &mut QuizSession,
        lifeline: Lifeline,
    ) -> Result<LifelineEffect, QuizError> {
        let effect = session.use_lifeline(lifeline)?;
        let message = match &effect {
            LifelineEffect::FiftyFifty { .. } => "50:50 used! Two wrong answers removed",
            LifelineEffect::SkipQuestion => "Question skipped! Moving to the next one",
            LifelineEffect::DoubleChance => "Double chance activated! One more try available",
            LifelineEffect::ExtraTime { .. } => "Extra time granted! +30 seconds",
            LifelineEffect::Hint { .. } => "Hint revealed! Check the question again",
        };
        self.notifier.notify(NoticeKind::Info, message);
        Ok(effect)
    }

    /// Finish the session: persist a score record and return the result.
    ///
    /// Persistence failures are logged and surfaced as an error notice but
    /// never withhold the result from the player.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Score` only when the session state cannot form a
    /// valid record, which indicates a bug rather than a runtime condition.
    pub async fn finish_quiz(&self, session: QuizSession) -> Result<QuizResult, QuizError> {
        let now = self.clock.now();

        let profile = match self.storage.profiles.load_current().await {
            Ok(profile) => profile,
            Err(e) => {
                log::warn!("could not resolve current user, recording as anonymous: {e}");
                None
            }
        };
        let user_id = profile
            .as_ref()
            .map_or_else(UserId::anonymous, |p| p.id().clone());

        let record = ScoreRecord::new(
            ScoreId::new(),
            user_id,
            session.category().to_string(),
            session.score(),
            session.correct_count(),
            u32::try_from(session.total_questions()).unwrap_or(u32::MAX),
            accuracy_percent(
                session.correct_count(),
                u32::try_from(session.total_questions()).unwrap_or(u32::MAX),
            ),
            now,
            session.settings().difficulty(),
            session.elapsed_secs(now),
            session.lifelines().consumed(),
        )?;

        match self.storage.scores.append_score(&record).await {
            Ok(()) => {
                if let Some(mut profile) = profile {
                    profile.record_quiz();
                    if let Err(e) = self.storage.profiles.upsert_profile(&profile).await {
                        log::warn!("could not update quiz count for {}: {e}", profile.id());
                    }
                }
            }
            Err(e) => {
                log::warn!("score record {} was not persisted: {e}", record.id());
                self.notifier.notify(
                    NoticeKind::Error,
                    "Your score could not be saved, but here is your result",
                );
            }
        }

        let result = session.into_result(now);
        self.notifier.notify(
            NoticeKind::Success,
            &format!(
                "Quiz complete! {} points, {}/{} correct",
                result.final_score, result.correct_answers, result.total_questions
            ),
        );
        Ok(result)
    }

    /// Discard the session without persisting anything.
    pub fn abandon_quiz(&self, session: QuizSession) {
        log::debug!(
            "session {} abandoned after {} answers",
            session.id(),
            session.answered_count()
        );
        drop(session);
        self.notifier
            .notify(NoticeKind::Info, "Quiz abandoned. Progress was not saved");
    }
}
