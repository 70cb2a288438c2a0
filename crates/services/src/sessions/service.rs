use chrono::{DateTime, Utc};
use rand::rng;
use rand::seq::SliceRandom;

use quiz_core::Rank;
use quiz_core::model::{
    EXTRA_TIME_SECS, Lifeline, LifelineSet, Question, QuestionId, QuizId, QuizSettings,
    accuracy_percent,
};
use quiz_core::time::seconds_between;

use super::progress::SessionProgress;
use super::scoring::score_answer;
use crate::error::SessionError;

//
// ─── OUTCOMES ──────────────────────────────────────────────────────────────────
//

/// Result of one `submit_answer` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct { points: u32 },
    /// Wrong, but an armed double chance grants one more attempt.
    IncorrectRetry,
    Incorrect { correct_answer: String },
}

impl AnswerOutcome {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerOutcome::Correct { .. })
    }
}

/// Final answer recorded for one question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub question_index: usize,
    pub submitted: String,
    pub correct: bool,
    pub points: u32,
}

/// Outcome of moving forward through the question sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizStep {
    Advanced,
    /// The last question is behind us; the caller should finish the quiz.
    Completed,
}

/// Caller-visible effect of a successfully used lifeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifelineEffect {
    /// Incorrect options the presentation layer should hide.
    FiftyFifty { eliminate: Vec<String> },
    /// The caller advances to the next question without scoring.
    SkipQuestion,
    /// One retry is armed for the current question.
    DoubleChance,
    /// Seconds already added to the remaining timer.
    ExtraTime { secs: u32 },
    /// The question's explanation, when it has one.
    Hint { explanation: Option<String> },
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state machine for one quiz attempt.
///
/// Owned by whichever layer drives the application loop; terminal states are
/// expressed by consuming the value (`into_result`) or dropping it, so at most
/// one session exists per owner and a replaced session is discarded without
/// being persisted.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: QuizId,
    category: String,
    questions: Vec<Question>,
    settings: QuizSettings,
    started_at: DateTime<Utc>,
    current: usize,
    score: u32,
    correct_count: u32,
    time_left_secs: u32,
    lifelines: LifelineSet,
    double_chance_armed: bool,
    paused: bool,
    answers: Vec<AnswerRecord>,
}

impl QuizSession {
    /// Create a session over an already-planned question sequence.
    ///
    /// `started_at` should come from the services layer clock to keep time
    /// deterministic.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Empty` if no questions are provided.
    pub fn new(
        id: QuizId,
        category: impl Into<String>,
        questions: Vec<Question>,
        settings: QuizSettings,
        started_at: DateTime<Utc>,
    ) -> Result<Self, SessionError> {
        if questions.is_empty() {
            return Err(SessionError::Empty);
        }
        let time_left_secs = settings.time_limit_secs();
        Ok(Self {
            id,
            category: category.into(),
            questions,
            settings,
            started_at,
            current: 0,
            score: 0,
            correct_count: 0,
            time_left_secs,
            lifelines: LifelineSet::all_available(),
            double_chance_armed: false,
            paused: false,
            answers: Vec::new(),
        })
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn id(&self) -> QuizId {
        self.id
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn correct_count(&self) -> u32 {
        self.correct_count
    }

    #[must_use]
    pub fn time_left_secs(&self) -> u32 {
        self.time_left_secs
    }

    #[must_use]
    pub fn lifelines(&self) -> &LifelineSet {
        &self.lifelines
    }

    #[must_use]
    pub fn double_chance_armed(&self) -> bool {
        self.double_chance_armed
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    /// Total number of questions in this session.
    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    /// Number of questions with a final answer.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current)
    }

    /// True once the index has moved past the last question.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.answered_count(),
            remaining: self.questions.len().saturating_sub(self.current),
            is_exhausted: self.is_exhausted(),
        }
    }

    /// Whole seconds since the session started.
    #[must_use]
    pub fn elapsed_secs(&self, now: DateTime<Utc>) -> u64 {
        seconds_between(self.started_at, now)
    }

    //
    // ─── MUTATIONS ─────────────────────────────────────────────────────────
    //

    /// Submit an answer for the current question.
    ///
    /// An empty string stands in for "time ran out". Does not advance the
    /// index; the caller decides when to move on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` past the last question and
    /// `SessionError::AlreadyAnswered` when the current question already has
    /// a final answer.
    pub fn submit_answer(&mut self, answer: &str) -> Result<AnswerOutcome, SessionError> {
        let Some(question) = self.questions.get(self.current) else {
            return Err(SessionError::Completed);
        };
        if self.answers.iter().any(|a| a.question_index == self.current) {
            return Err(SessionError::AlreadyAnswered);
        }

        let question_id = question.id();
        if question.is_correct(answer) {
            let points = score_answer(
                question.difficulty(),
                self.time_left_secs,
                self.settings.time_limit_secs(),
            );
            self.score += points;
            self.correct_count += 1;
            self.double_chance_armed = false;
            self.answers.push(AnswerRecord {
                question_id,
                question_index: self.current,
                submitted: answer.to_string(),
                correct: true,
                points,
            });
            Ok(AnswerOutcome::Correct { points })
        } else if self.double_chance_armed {
            // The retry consumes the armed flag, nothing else.
            self.double_chance_armed = false;
            Ok(AnswerOutcome::IncorrectRetry)
        } else {
            let correct_answer = question.answer().to_string();
            self.answers.push(AnswerRecord {
                question_id,
                question_index: self.current,
                submitted: answer.to_string(),
                correct: false,
                points: 0,
            });
            Ok(AnswerOutcome::Incorrect { correct_answer })
        }
    }

    /// Consume a lifeline and return its effect.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` with no active question and
    /// `SessionError::LifelineConsumed` when the lifeline was already spent;
    /// neither changes any state.
    pub fn use_lifeline(&mut self, lifeline: Lifeline) -> Result<LifelineEffect, SessionError> {
        if self.is_exhausted() {
            return Err(SessionError::Completed);
        }
        if !self.lifelines.consume(lifeline) {
            return Err(SessionError::LifelineConsumed);
        }

        let effect = match lifeline {
            Lifeline::FiftyFifty => {
                let mut eliminate: Vec<String> = self.questions[self.current]
                    .incorrect_options()
                    .into_iter()
                    .map(ToOwned::to_owned)
                    .collect();
                let mut rng = rng();
                eliminate.as_mut_slice().shuffle(&mut rng);
                eliminate.truncate(2);
                LifelineEffect::FiftyFifty { eliminate }
            }
            Lifeline::SkipQuestion => LifelineEffect::SkipQuestion,
            Lifeline::DoubleChance => {
                self.double_chance_armed = true;
                LifelineEffect::DoubleChance
            }
            Lifeline::ExtraTime => {
                self.time_left_secs += EXTRA_TIME_SECS;
                LifelineEffect::ExtraTime {
                    secs: EXTRA_TIME_SECS,
                }
            }
            Lifeline::Hint => LifelineEffect::Hint {
                explanation: self.questions[self.current]
                    .explanation()
                    .map(ToOwned::to_owned),
            },
        };
        Ok(effect)
    }

    /// Move to the next question, resetting the per-question timer.
    ///
    /// Past the last question this returns `QuizStep::Completed`; the caller
    /// is expected to finish the quiz rather than keep operating on it.
    pub fn advance(&mut self) -> QuizStep {
        self.double_chance_armed = false;
        self.time_left_secs = self.settings.time_limit_secs();
        if self.current + 1 >= self.questions.len() {
            self.current = self.questions.len();
            QuizStep::Completed
        } else {
            self.current += 1;
            QuizStep::Advanced
        }
    }

    /// Move back one question, clamped at the first, resetting the timer.
    pub fn go_back(&mut self) {
        self.double_chance_armed = false;
        self.time_left_secs = self.settings.time_limit_secs();
        let last = self.questions.len().saturating_sub(1);
        self.current = self.current.saturating_sub(1).min(last);
    }

    /// One second of countdown. No-op while paused; the session never
    /// enforces expiry itself, the driving layer submits an empty answer.
    pub fn tick(&mut self) -> u32 {
        if !self.paused {
            self.time_left_secs = self.time_left_secs.saturating_sub(1);
        }
        self.time_left_secs
    }

    /// Suspend the countdown without touching any other state.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Close the session and derive its read-only result projection.
    #[must_use]
    pub fn into_result(self, now: DateTime<Utc>) -> QuizResult {
        let total = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let accuracy = accuracy_percent(self.correct_count, total);
        QuizResult {
            quiz_id: self.id,
            category: self.category,
            final_score: self.score,
            correct_answers: self.correct_count,
            total_questions: total,
            accuracy,
            time_taken_secs: seconds_between(self.started_at, now),
            rank: Rank::from_accuracy(accuracy),
            lifelines_used: self.lifelines.consumed(),
            achievements: Vec::new(),
        }
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Read-only projection of a just-terminated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    pub quiz_id: QuizId,
    pub category: String,
    pub final_score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub accuracy: u8,
    pub time_taken_secs: u64,
    pub rank: Rank,
    pub lifelines_used: Vec<Lifeline>,
    /// Reserved; nothing awards achievements yet.
    pub achievements: Vec<String>,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use quiz_core::model::{CategorySelect, Difficulty, DifficultyFilter};
    use quiz_core::time::fixed_now;

    fn build_question(
        id: u64,
        prompt: &str,
        options: &[&str],
        answer: &str,
        difficulty: Difficulty,
    ) -> Question {
        Question::new(
            QuestionId::new(id),
            prompt,
            options.iter().map(|o| (*o).to_string()).collect(),
            answer,
            difficulty,
            "science",
            Some("Because it is.".to_string()),
        )
        .unwrap()
    }

    fn science_questions() -> Vec<Question> {
        vec![
            build_question(1, "2+2?", &["3", "4"], "4", Difficulty::Easy),
            build_question(
                2,
                "Capital of France?",
                &["Paris", "Rome"],
                "Paris",
                Difficulty::Medium,
            ),
        ]
    }

    fn build_session(questions: Vec<Question>) -> QuizSession {
        let settings = QuizSettings::new(
            CategorySelect::Named("science".to_string()),
            questions.len() as u32,
            DifficultyFilter::Medium,
            60,
            false,
            false,
        )
        .unwrap();
        QuizSession::new(QuizId::new(), "science", questions, settings, fixed_now()).unwrap()
    }

    #[test]
    fn empty_session_returns_error() {
        let settings = QuizSettings::new(
            CategorySelect::All,
            5,
            DifficultyFilter::Mixed,
            60,
            false,
            false,
        )
        .unwrap();
        let err =
            QuizSession::new(QuizId::new(), "science", Vec::new(), settings, fixed_now())
                .unwrap_err();
        assert_eq!(err, SessionError::Empty);
    }

    #[test]
    fn new_session_starts_clean() {
        let session = build_session(science_questions());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.time_left_secs(), 60);
        assert!(!session.is_exhausted());
        assert!(session.lifelines().consumed().is_empty());
    }

    #[test]
    fn scoring_scenario_totals_300_with_perfect_accuracy() {
        let mut session = build_session(science_questions());

        // Q1: easy, full clock -> round((100 + 50) * 1.0) = 150.
        let outcome = session.submit_answer("4").unwrap();
        assert_eq!(outcome, AnswerOutcome::Correct { points: 150 });

        assert_eq!(session.advance(), QuizStep::Advanced);
        for _ in 0..30 {
            session.tick();
        }
        assert_eq!(session.time_left_secs(), 30);

        // Q2: medium, half clock -> round((100 + 25) * 1.2) = 150.
        let outcome = session.submit_answer("Paris").unwrap();
        assert_eq!(outcome, AnswerOutcome::Correct { points: 150 });

        assert_eq!(session.advance(), QuizStep::Completed);
        assert!(session.is_exhausted());

        let result = session.into_result(fixed_now() + Duration::seconds(90));
        assert_eq!(result.final_score, 300);
        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.total_questions, 2);
        assert_eq!(result.accuracy, 100);
        assert_eq!(result.rank, Rank::Excellent);
        assert_eq!(result.time_taken_secs, 90);
        assert!(result.achievements.is_empty());
    }

    #[test]
    fn score_never_decreases() {
        let mut session = build_session(science_questions());
        let mut last = session.score();

        let _ = session.submit_answer("3").unwrap();
        assert!(session.score() >= last);
        last = session.score();

        session.advance();
        let _ = session.submit_answer("Paris").unwrap();
        assert!(session.score() >= last);
    }

    #[test]
    fn wrong_answer_scores_zero_and_is_final() {
        let mut session = build_session(science_questions());
        let outcome = session.submit_answer("3").unwrap();
        assert_eq!(
            outcome,
            AnswerOutcome::Incorrect {
                correct_answer: "4".to_string()
            }
        );
        assert_eq!(session.score(), 0);
        assert_eq!(session.correct_count(), 0);

        let err = session.submit_answer("4").unwrap_err();
        assert_eq!(err, SessionError::AlreadyAnswered);
    }

    #[test]
    fn empty_submission_is_a_scoreless_timeout() {
        // Blank options are rejected at validation, so the timeout
        // convention of submitting "" can never hit the correct branch.
        let mut session = build_session(science_questions());
        let outcome = session.submit_answer("").unwrap();
        assert!(matches!(outcome, AnswerOutcome::Incorrect { .. }));
        assert_eq!(session.score(), 0);
        assert_eq!(session.correct_count(), 0);
        assert_eq!(session.answered_count(), 1);
    }

    #[test]
    fn double_chance_grants_exactly_one_retry() {
        let mut session = build_session(science_questions());
        let effect = session.use_lifeline(Lifeline::DoubleChance).unwrap();
        assert_eq!(effect, LifelineEffect::DoubleChance);
        assert!(session.double_chance_armed());

        let outcome = session.submit_answer("3").unwrap();
        assert_eq!(outcome, AnswerOutcome::IncorrectRetry);
        assert!(!session.double_chance_armed());
        assert_eq!(session.answered_count(), 0);

        // Second wrong attempt is final.
        let outcome = session.submit_answer("3").unwrap();
        assert!(matches!(outcome, AnswerOutcome::Incorrect { .. }));
        assert_eq!(session.submit_answer("4").unwrap_err(), SessionError::AlreadyAnswered);
    }

    #[test]
    fn double_chance_retry_can_still_score() {
        let mut session = build_session(science_questions());
        session.use_lifeline(Lifeline::DoubleChance).unwrap();
        assert_eq!(session.submit_answer("3").unwrap(), AnswerOutcome::IncorrectRetry);
        let outcome = session.submit_answer("4").unwrap();
        assert_eq!(outcome, AnswerOutcome::Correct { points: 150 });
        assert_eq!(session.correct_count(), 1);
    }

    #[test]
    fn consumed_lifeline_fails_and_changes_nothing() {
        let mut session = build_session(science_questions());
        session.use_lifeline(Lifeline::Hint).unwrap();

        let before_score = session.score();
        let before_time = session.time_left_secs();
        let before_lifelines = *session.lifelines();

        let err = session.use_lifeline(Lifeline::Hint).unwrap_err();
        assert_eq!(err, SessionError::LifelineConsumed);
        assert_eq!(session.score(), before_score);
        assert_eq!(session.time_left_secs(), before_time);
        assert_eq!(*session.lifelines(), before_lifelines);
    }

    #[test]
    fn fifty_fifty_eliminates_only_incorrect_options() {
        let questions = vec![build_question(
            1,
            "Pick one",
            &["a", "b", "c", "d"],
            "c",
            Difficulty::Easy,
        )];
        let mut session = build_session(questions);

        let LifelineEffect::FiftyFifty { eliminate } =
            session.use_lifeline(Lifeline::FiftyFifty).unwrap()
        else {
            panic!("expected fifty-fifty effect");
        };
        assert_eq!(eliminate.len(), 2);
        assert!(!eliminate.contains(&"c".to_string()));
    }

    #[test]
    fn extra_time_adds_thirty_seconds() {
        let mut session = build_session(science_questions());
        session.tick();
        let before = session.time_left_secs();
        let effect = session.use_lifeline(Lifeline::ExtraTime).unwrap();
        assert_eq!(effect, LifelineEffect::ExtraTime { secs: 30 });
        assert_eq!(session.time_left_secs(), before + 30);
    }

    #[test]
    fn hint_reveals_the_explanation() {
        let mut session = build_session(science_questions());
        let LifelineEffect::Hint { explanation } =
            session.use_lifeline(Lifeline::Hint).unwrap()
        else {
            panic!("expected hint effect");
        };
        assert_eq!(explanation.as_deref(), Some("Because it is."));
    }

    #[test]
    fn navigation_clamps_and_resets_the_timer() {
        let mut session = build_session(science_questions());
        session.go_back();
        assert_eq!(session.current_index(), 0);

        for _ in 0..10 {
            session.tick();
        }
        assert_eq!(session.advance(), QuizStep::Advanced);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.time_left_secs(), 60);

        session.go_back();
        assert_eq!(session.current_index(), 0);

        session.advance();
        assert_eq!(session.advance(), QuizStep::Completed);
        assert!(session.is_exhausted());
        assert_eq!(session.submit_answer("4").unwrap_err(), SessionError::Completed);
        assert_eq!(
            session.use_lifeline(Lifeline::FiftyFifty).unwrap_err(),
            SessionError::Completed
        );

        // Going back from the exhausted position lands on the last question.
        session.go_back();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn advancing_clears_an_armed_double_chance() {
        let mut session = build_session(science_questions());
        session.use_lifeline(Lifeline::DoubleChance).unwrap();
        session.advance();
        assert!(!session.double_chance_armed());
    }

    #[test]
    fn pause_suspends_the_countdown() {
        let mut session = build_session(science_questions());
        session.pause();
        session.tick();
        session.tick();
        assert_eq!(session.time_left_secs(), 60);
        session.resume();
        session.tick();
        assert_eq!(session.time_left_secs(), 59);
    }

    #[test]
    fn timer_saturates_at_zero() {
        let mut session = build_session(science_questions());
        for _ in 0..120 {
            session.tick();
        }
        assert_eq!(session.time_left_secs(), 0);
    }

    #[test]
    fn progress_tracks_answers_and_position() {
        let mut session = build_session(science_questions());
        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 2,
                answered: 0,
                remaining: 2,
                is_exhausted: false
            }
        );

        session.submit_answer("4").unwrap();
        session.advance();
        assert_eq!(
            session.progress(),
            SessionProgress {
                total: 2,
                answered: 1,
                remaining: 1,
                is_exhausted: false
            }
        );
    }

    #[test]
    fn result_accuracy_matches_rounded_ratio() {
        let questions = vec![
            build_question(1, "Q1", &["a", "b"], "a", Difficulty::Easy),
            build_question(2, "Q2", &["a", "b"], "a", Difficulty::Easy),
            build_question(3, "Q3", &["a", "b"], "a", Difficulty::Easy),
        ];
        let mut session = build_session(questions);
        session.submit_answer("a").unwrap();
        session.advance();
        session.submit_answer("b").unwrap();
        session.advance();
        session.submit_answer("a").unwrap();
        session.advance();

        let result = session.into_result(fixed_now());
        assert_eq!(result.correct_answers, 2);
        assert_eq!(result.accuracy, 67);
        assert_eq!(result.rank, Rank::Average);
    }

    #[test]
    fn deterministic_sessions_match_without_shuffling() {
        let a = build_session(science_questions());
        let b = build_session(science_questions());
        assert_eq!(a.current_question(), b.current_question());
        assert_eq!(
            a.questions.iter().map(Question::id).collect::<Vec<_>>(),
            b.questions.iter().map(Question::id).collect::<Vec<_>>()
        );
        assert_eq!(
            a.current_question().unwrap().options(),
            b.current_question().unwrap().options()
        );
    }
}
