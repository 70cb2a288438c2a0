use async_trait::async_trait;
use quiz_core::model::{ScoreRecord, UserId, UserProfile};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Append-only score history.
///
/// Records are never mutated after insertion; in-progress sessions are never
/// stored here.
#[async_trait]
pub trait ScoreRepository: Send + Sync {
    /// Append one completed-quiz record to history.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn append_score(&self, record: &ScoreRecord) -> Result<(), StorageError>;

    /// Global history, newest first, up to `limit` entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_scores(&self, limit: u32) -> Result<Vec<ScoreRecord>, StorageError>;

    /// One user's history, newest first, up to `limit` entries.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn list_scores_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<ScoreRecord>, StorageError>;
}

/// User identity and the single "currently logged in" pointer.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Persist or update a profile.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the profile cannot be stored.
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;

    /// Fetch a profile by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, StorageError>;

    /// The currently logged-in profile, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn load_current(&self) -> Result<Option<UserProfile>, StorageError>;

    /// Mark a profile as the current user.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no such profile exists.
    async fn set_current(&self, id: &UserId) -> Result<(), StorageError>;

    /// Clear the current-user pointer (logout).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on storage failures.
    async fn clear_current(&self) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    scores: Arc<Mutex<Vec<ScoreRecord>>>,
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
    current: Arc<Mutex<Option<UserId>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreRepository for InMemoryRepository {
    async fn append_score(&self, record: &ScoreRecord) -> Result<(), StorageError> {
        let mut guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push(record.clone());
        Ok(())
    }

    async fn list_scores(&self, limit: u32) -> Result<Vec<ScoreRecord>, StorageError> {
        let guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .rev()
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn list_scores_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<ScoreRecord>, StorageError> {
        let guard = self
            .scores
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .iter()
            .rev()
            .filter(|r| r.user_id() == user_id)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ProfileRepository for InMemoryRepository {
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let mut guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(profile.id().clone(), profile.clone());
        Ok(())
    }

    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, StorageError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn load_current(&self) -> Result<Option<UserProfile>, StorageError> {
        let current = self
            .current
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?
            .clone();
        let Some(id) = current else {
            return Ok(None);
        };
        let guard = self
            .profiles
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    async fn set_current(&self, id: &UserId) -> Result<(), StorageError> {
        {
            let guard = self
                .profiles
                .lock()
                .map_err(|e| StorageError::Connection(e.to_string()))?;
            if !guard.contains_key(id) {
                return Err(StorageError::NotFound);
            }
        }
        let mut current = self
            .current
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *current = Some(id.clone());
        Ok(())
    }

    async fn clear_current(&self) -> Result<(), StorageError> {
        let mut current = self
            .current
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *current = None;
        Ok(())
    }
}

/// Aggregates score and profile repositories behind trait objects for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub scores: Arc<dyn ScoreRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let scores: Arc<dyn ScoreRepository> = Arc::new(repo.clone());
        let profiles: Arc<dyn ProfileRepository> = Arc::new(repo);
        Self { scores, profiles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{
        DifficultyFilter, Lifeline, ScoreId, ScoreRecord, UserId, UserProfile, accuracy_percent,
    };
    use quiz_core::time::fixed_now;

    fn build_record(user_id: UserId, correct: u32, total: u32) -> ScoreRecord {
        ScoreRecord::new(
            ScoreId::new(),
            user_id,
            "science",
            correct * 100,
            correct,
            total,
            accuracy_percent(correct, total),
            fixed_now(),
            DifficultyFilter::Mixed,
            90,
            vec![Lifeline::ExtraTime],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn history_is_append_only_and_newest_first() {
        let repo = InMemoryRepository::new();
        let first = build_record(UserId::anonymous(), 1, 2);
        let second = build_record(UserId::anonymous(), 2, 2);
        repo.append_score(&first).await.unwrap();
        repo.append_score(&second).await.unwrap();

        let history = repo.list_scores(10).await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].id(), second.id());
        assert_eq!(history[1].id(), first.id());
    }

    #[tokio::test]
    async fn per_user_history_filters_other_users() {
        let repo = InMemoryRepository::new();
        let alice = UserId::new("alice");
        repo.append_score(&build_record(alice.clone(), 1, 2))
            .await
            .unwrap();
        repo.append_score(&build_record(UserId::anonymous(), 2, 2))
            .await
            .unwrap();

        let history = repo.list_scores_for_user(&alice, 10).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user_id(), &alice);
    }

    #[tokio::test]
    async fn current_user_round_trip() {
        let repo = InMemoryRepository::new();
        assert!(repo.load_current().await.unwrap().is_none());

        let id = UserId::new("u-1");
        let profile = UserProfile::new(id.clone(), "quizzer", "a@b.c", fixed_now()).unwrap();
        repo.upsert_profile(&profile).await.unwrap();
        repo.set_current(&id).await.unwrap();

        let current = repo.load_current().await.unwrap().unwrap();
        assert_eq!(current.username(), "quizzer");

        repo.clear_current().await.unwrap();
        assert!(repo.load_current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn set_current_requires_existing_profile() {
        let repo = InMemoryRepository::new();
        let err = repo.set_current(&UserId::new("ghost")).await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound));
    }
}
