use quiz_core::model::{ScoreRecord, UserId};

use super::SqliteRepository;
use super::mapping::{lifelines_to_text, map_score_row};
use crate::repository::{ScoreRepository, StorageError};

#[async_trait::async_trait]
impl ScoreRepository for SqliteRepository {
    async fn append_score(&self, record: &ScoreRecord) -> Result<(), StorageError> {
        sqlx::query(
            r"
                INSERT INTO scores (
                    id, user_id, category, score, correct_answers,
                    total_questions, accuracy, completed_at, difficulty,
                    time_taken_secs, lifelines_used
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(record.id().to_string())
        .bind(record.user_id().as_str())
        .bind(record.category())
        .bind(i64::from(record.score()))
        .bind(i64::from(record.correct_answers()))
        .bind(i64::from(record.total_questions()))
        .bind(i64::from(record.accuracy()))
        .bind(record.completed_at())
        .bind(record.difficulty().as_str())
        .bind(
            i64::try_from(record.time_taken_secs())
                .map_err(|_| StorageError::Serialization("time_taken_secs overflow".into()))?,
        )
        .bind(lifelines_to_text(record.lifelines_used()))
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn list_scores(&self, limit: u32) -> Result<Vec<ScoreRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, user_id, category, score, correct_answers,
                    total_questions, accuracy, completed_at, difficulty,
                    time_taken_secs, lifelines_used
                FROM scores
                ORDER BY completed_at DESC, id DESC
                LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_score_row).collect()
    }

    async fn list_scores_for_user(
        &self,
        user_id: &UserId,
        limit: u32,
    ) -> Result<Vec<ScoreRecord>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    id, user_id, category, score, correct_answers,
                    total_questions, accuracy, completed_at, difficulty,
                    time_taken_secs, lifelines_used
                FROM scores
                WHERE user_id = ?1
                ORDER BY completed_at DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(user_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_score_row).collect()
    }
}
