use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least two options")]
    TooFewOptions,

    #[error("options cannot be empty")]
    EmptyOption,

    #[error("duplicate option: {0:?}")]
    DuplicateOption(String),

    #[error("answer {0:?} is not one of the options")]
    AnswerNotInOptions(String),
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

/// Difficulty tier of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Score multiplier applied to a correct answer at this tier.
    #[must_use]
    pub fn multiplier(self) -> f64 {
        match self {
            Difficulty::Hard => 1.5,
            Difficulty::Medium => 1.2,
            Difficulty::Easy => 1.0,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDifficultyError(pub String);

impl fmt::Display for ParseDifficultyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown difficulty: {}", self.0)
    }
}

impl std::error::Error for ParseDifficultyError {}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    answer: String,
    difficulty: Difficulty,
    category: String,
    explanation: Option<String>,
}

/// Unvalidated question shape as it appears in category content files.
///
/// Drafts become `Question`s through [`QuestionDraft::validate`], which is the
/// only path that assigns an id and owning category.
#[derive(Debug, Clone, Deserialize)]
pub struct QuestionDraft {
    #[serde(rename = "question")]
    pub prompt: String,
    pub options: Vec<String>,
    pub answer: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub explanation: Option<String>,
}

fn default_difficulty() -> Difficulty {
    Difficulty::Medium
}

impl QuestionDraft {
    /// Validate the draft into a `Question` owned by `category`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when the prompt is empty, fewer than two
    /// options are present, options repeat, or the answer is not an option.
    pub fn validate(
        self,
        id: QuestionId,
        category: impl Into<String>,
    ) -> Result<Question, QuestionError> {
        Question::new(
            id,
            self.prompt,
            self.options,
            self.answer,
            self.difficulty,
            category,
            self.explanation,
        )
    }
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if any structural invariant is violated.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
        difficulty: Difficulty,
        category: impl Into<String>,
        explanation: Option<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let answer = answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions);
        }

        let mut seen = HashSet::new();
        for option in &options {
            // A blank option would collide with the empty-submission
            // convention the session uses for timeouts.
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption);
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }
        if !options.iter().any(|o| o == &answer) {
            return Err(QuestionError::AnswerNotInOptions(answer));
        }

        Ok(Self {
            id,
            prompt,
            options,
            answer,
            difficulty,
            category: category.into(),
            explanation,
        })
    }

    /// Rebuild this question with its options in a different order.
    ///
    /// Re-runs full validation so a reordering cannot drop or invent options.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if `options` is not a permutation of the
    /// original option list.
    pub fn reordered(&self, options: Vec<String>) -> Result<Self, QuestionError> {
        if options.len() != self.options.len()
            || !self.options.iter().all(|o| options.contains(o))
        {
            return Err(QuestionError::AnswerNotInOptions(self.answer.clone()));
        }
        Self::new(
            self.id,
            self.prompt.clone(),
            options,
            self.answer.clone(),
            self.difficulty,
            self.category.clone(),
            self.explanation.clone(),
        )
    }

    /// All options except the correct answer, in display order.
    ///
    /// This is the pool the 50:50 lifeline eliminates from.
    #[must_use]
    pub fn incorrect_options(&self) -> Vec<&str> {
        self.options
            .iter()
            .filter(|o| *o != &self.answer)
            .map(String::as_str)
            .collect()
    }

    /// Whether `answer` exactly matches the correct option.
    #[must_use]
    pub fn is_correct(&self, answer: &str) -> bool {
        self.answer == answer
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    #[must_use]
    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> QuestionDraft {
        QuestionDraft {
            prompt: "What is the capital of France?".to_string(),
            options: vec![
                "London".to_string(),
                "Berlin".to_string(),
                "Paris".to_string(),
                "Madrid".to_string(),
            ],
            answer: "Paris".to_string(),
            difficulty: Difficulty::Easy,
            explanation: None,
        }
    }

    #[test]
    fn draft_validates_into_question() {
        let q = draft().validate(QuestionId::new(1), "general").unwrap();
        assert_eq!(q.category(), "general");
        assert_eq!(q.options().len(), 4);
        assert!(q.is_correct("Paris"));
        assert!(!q.is_correct("paris"));
    }

    #[test]
    fn rejects_empty_prompt() {
        let mut d = draft();
        d.prompt = "  ".to_string();
        let err = d.validate(QuestionId::new(1), "general").unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn rejects_single_option() {
        let mut d = draft();
        d.options = vec!["Paris".to_string()];
        let err = d.validate(QuestionId::new(1), "general").unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions);
    }

    #[test]
    fn rejects_blank_options() {
        let mut d = draft();
        d.options[1] = String::new();
        let err = d.validate(QuestionId::new(1), "general").unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption);

        let mut d = draft();
        d.options[1] = "   ".to_string();
        d.answer = "   ".to_string();
        let err = d.validate(QuestionId::new(1), "general").unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption);
    }

    #[test]
    fn rejects_duplicate_options() {
        let mut d = draft();
        d.options.push("Paris".to_string());
        let err = d.validate(QuestionId::new(1), "general").unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption("Paris".to_string()));
    }

    #[test]
    fn rejects_answer_outside_options() {
        let mut d = draft();
        d.answer = "Rome".to_string();
        let err = d.validate(QuestionId::new(1), "general").unwrap_err();
        assert_eq!(err, QuestionError::AnswerNotInOptions("Rome".to_string()));
    }

    #[test]
    fn reordered_keeps_the_same_option_set() {
        let q = draft().validate(QuestionId::new(1), "general").unwrap();
        let mut options: Vec<String> = q.options().to_vec();
        options.reverse();
        let reordered = q.reordered(options.clone()).unwrap();
        assert_eq!(reordered.options(), options.as_slice());
        assert!(reordered.is_correct("Paris"));
    }

    #[test]
    fn reordered_rejects_dropped_options() {
        let q = draft().validate(QuestionId::new(1), "general").unwrap();
        let err = q
            .reordered(vec!["Paris".to_string(), "Rome".to_string()])
            .unwrap_err();
        assert!(matches!(err, QuestionError::AnswerNotInOptions(_)));
    }

    #[test]
    fn incorrect_options_exclude_answer() {
        let q = draft().validate(QuestionId::new(1), "general").unwrap();
        let wrong = q.incorrect_options();
        assert_eq!(wrong, vec!["London", "Berlin", "Madrid"]);
    }

    #[test]
    fn difficulty_multipliers() {
        assert!((Difficulty::Hard.multiplier() - 1.5).abs() < f64::EPSILON);
        assert!((Difficulty::Medium.multiplier() - 1.2).abs() < f64::EPSILON);
        assert!((Difficulty::Easy.multiplier() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn draft_defaults_difficulty_to_medium() {
        let json = r#"{"question":"2+2?","options":["3","4"],"answer":"4"}"#;
        let d: QuestionDraft = serde_json::from_str(json).unwrap();
        assert_eq!(d.difficulty, Difficulty::Medium);
    }
}
