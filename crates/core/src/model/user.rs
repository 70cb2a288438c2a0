use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::UserId;
use crate::model::settings::DifficultyFilter;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum UserError {
    #[error("username cannot be empty")]
    EmptyUsername,
}

/// Per-user defaults applied when building new quiz settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preferences {
    pub default_question_count: u32,
    pub default_difficulty: DifficultyFilter,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            default_question_count: 20,
            default_difficulty: DifficultyFilter::Medium,
        }
    }
}

/// Identity and lifetime stats for a logged-in user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    id: UserId,
    username: String,
    email: String,
    joined_at: DateTime<Utc>,
    total_quizzes: u32,
    preferences: Preferences,
}

impl UserProfile {
    /// Creates a new profile with zero completed quizzes.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyUsername` on a blank username.
    pub fn new(
        id: UserId,
        username: impl Into<String>,
        email: impl Into<String>,
        joined_at: DateTime<Utc>,
    ) -> Result<Self, UserError> {
        let username = username.into();
        if username.trim().is_empty() {
            return Err(UserError::EmptyUsername);
        }
        Ok(Self {
            id,
            username,
            email: email.into(),
            joined_at,
            total_quizzes: 0,
            preferences: Preferences::default(),
        })
    }

    /// Rehydrate a profile from persisted storage.
    ///
    /// # Errors
    ///
    /// Returns `UserError::EmptyUsername` on a blank username.
    pub fn from_persisted(
        id: UserId,
        username: String,
        email: String,
        joined_at: DateTime<Utc>,
        total_quizzes: u32,
        preferences: Preferences,
    ) -> Result<Self, UserError> {
        let mut profile = Self::new(id, username, email, joined_at)?;
        profile.total_quizzes = total_quizzes;
        profile.preferences = preferences;
        Ok(profile)
    }

    #[must_use]
    pub fn with_preferences(mut self, preferences: Preferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Bump the completed-quiz counter after a finished session.
    pub fn record_quiz(&mut self) {
        self.total_quizzes = self.total_quizzes.saturating_add(1);
    }

    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.id
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    #[must_use]
    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    #[must_use]
    pub fn total_quizzes(&self) -> u32 {
        self.total_quizzes
    }

    #[must_use]
    pub fn preferences(&self) -> Preferences {
        self.preferences
    }
}
