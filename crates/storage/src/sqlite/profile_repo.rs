use quiz_core::model::{UserId, UserProfile};

use super::SqliteRepository;
use super::mapping::map_profile_row;
use crate::repository::{ProfileRepository, StorageError};

#[async_trait::async_trait]
impl ProfileRepository for SqliteRepository {
    async fn upsert_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO profiles (
                    id, username, email, joined_at, total_quizzes,
                    default_question_count, default_difficulty
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(id) DO UPDATE SET
                    username = excluded.username,
                    email = excluded.email,
                    joined_at = excluded.joined_at,
                    total_quizzes = excluded.total_quizzes,
                    default_question_count = excluded.default_question_count,
                    default_difficulty = excluded.default_difficulty
            ",
        )
        .bind(profile.id().as_str())
        .bind(profile.username())
        .bind(profile.email())
        .bind(profile.joined_at())
        .bind(i64::from(profile.total_quizzes()))
        .bind(i64::from(profile.preferences().default_question_count))
        .bind(profile.preferences().default_difficulty.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_profile(&self, id: &UserId) -> Result<UserProfile, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    id, username, email, joined_at, total_quizzes,
                    default_question_count, default_difficulty
                FROM profiles
                WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .ok_or(StorageError::NotFound)?;

        map_profile_row(&row)
    }

    async fn load_current(&self) -> Result<Option<UserProfile>, StorageError> {
        let row = sqlx::query(
            r"
                SELECT
                    p.id, p.username, p.email, p.joined_at, p.total_quizzes,
                    p.default_question_count, p.default_difficulty
                FROM current_user c
                JOIN profiles p ON p.id = c.user_id
                WHERE c.slot = 0
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        row.as_ref().map(map_profile_row).transpose()
    }

    async fn set_current(&self, id: &UserId) -> Result<(), StorageError> {
        // Existence check first so a missing profile maps to NotFound rather
        // than a foreign-key violation.
        self.get_profile(id).await?;

        sqlx::query(
            r"
                INSERT INTO current_user (slot, user_id)
                VALUES (0, ?1)
                ON CONFLICT(slot) DO UPDATE SET user_id = excluded.user_id
            ",
        )
        .bind(id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn clear_current(&self) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM current_user WHERE slot = 0")
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
