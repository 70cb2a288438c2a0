use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::question::{Difficulty, ParseDifficultyError};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question count must be > 0")]
    ZeroQuestionCount,

    #[error("time limit must be > 0 seconds")]
    ZeroTimeLimit,

    #[error("category name cannot be empty")]
    EmptyCategory,
}

//
// ─── CATEGORY SELECTION ────────────────────────────────────────────────────────
//

/// Which category pool a quiz draws from.
///
/// `All` is the sentinel meaning "draw across every category".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategorySelect {
    All,
    Named(String),
}

impl CategorySelect {
    /// Parse a category name, mapping the `all`/`random` sentinels to `All`.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::EmptyCategory` on a blank name.
    pub fn from_name(name: &str) -> Result<Self, SettingsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SettingsError::EmptyCategory);
        }
        match name {
            "all" | "random" => Ok(CategorySelect::All),
            other => Ok(CategorySelect::Named(other.to_string())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            CategorySelect::All => "all",
            CategorySelect::Named(name) => name,
        }
    }
}

impl fmt::Display for CategorySelect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── DIFFICULTY FILTER ─────────────────────────────────────────────────────────
//

/// Difficulty requested for a quiz; `Mixed` accepts every tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyFilter {
    Easy,
    Medium,
    Hard,
    Mixed,
}

impl DifficultyFilter {
    /// Whether a question at `difficulty` passes this filter.
    #[must_use]
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            DifficultyFilter::Mixed => true,
            DifficultyFilter::Easy => difficulty == Difficulty::Easy,
            DifficultyFilter::Medium => difficulty == Difficulty::Medium,
            DifficultyFilter::Hard => difficulty == Difficulty::Hard,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            DifficultyFilter::Easy => "easy",
            DifficultyFilter::Medium => "medium",
            DifficultyFilter::Hard => "hard",
            DifficultyFilter::Mixed => "mixed",
        }
    }
}

impl fmt::Display for DifficultyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DifficultyFilter {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(DifficultyFilter::Easy),
            "medium" => Ok(DifficultyFilter::Medium),
            "hard" => Ok(DifficultyFilter::Hard),
            "mixed" => Ok(DifficultyFilter::Mixed),
            other => Err(ParseDifficultyError(other.to_string())),
        }
    }
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Configuration a quiz session is created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    category: CategorySelect,
    question_count: u32,
    difficulty: DifficultyFilter,
    time_limit_secs: u32,
    shuffle_questions: bool,
    shuffle_options: bool,
}

impl QuizSettings {
    /// Creates validated quiz settings.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError` if the question count or time limit is zero.
    pub fn new(
        category: CategorySelect,
        question_count: u32,
        difficulty: DifficultyFilter,
        time_limit_secs: u32,
        shuffle_questions: bool,
        shuffle_options: bool,
    ) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::ZeroQuestionCount);
        }
        if time_limit_secs == 0 {
            return Err(SettingsError::ZeroTimeLimit);
        }
        Ok(Self {
            category,
            question_count,
            difficulty,
            time_limit_secs,
            shuffle_questions,
            shuffle_options,
        })
    }

    /// Default settings: 20 mixed questions, 60 seconds each, both shuffles on.
    #[must_use]
    pub fn default_quiz(category: CategorySelect) -> Self {
        Self {
            category,
            question_count: 20,
            difficulty: DifficultyFilter::Mixed,
            time_limit_secs: 60,
            shuffle_questions: true,
            shuffle_options: true,
        }
    }

    #[must_use]
    pub fn category(&self) -> &CategorySelect {
        &self.category
    }

    #[must_use]
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    #[must_use]
    pub fn difficulty(&self) -> DifficultyFilter {
        self.difficulty
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn shuffle_questions(&self) -> bool {
        self.shuffle_questions
    }

    #[must_use]
    pub fn shuffle_options(&self) -> bool {
        self.shuffle_options
    }
}
