use quiz_core::model::{
    DifficultyFilter, Lifeline, Preferences, ScoreId, ScoreRecord, UserId, UserProfile,
};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn u8_from_i64(field: &'static str, v: i64) -> Result<u8, StorageError> {
    u8::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

/// Lifelines persist as comma-joined wire names, e.g. `"fiftyFifty,hint"`.
pub(crate) fn lifelines_to_text(lifelines: &[Lifeline]) -> String {
    lifelines
        .iter()
        .map(|l| l.name())
        .collect::<Vec<_>>()
        .join(",")
}

pub(crate) fn lifelines_from_text(text: &str) -> Result<Vec<Lifeline>, StorageError> {
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',').map(|name| name.parse().map_err(ser)).collect()
}

pub(crate) fn map_score_row(row: &sqlx::sqlite::SqliteRow) -> Result<ScoreRecord, StorageError> {
    let id: ScoreId = row
        .try_get::<String, _>("id")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let user_id = UserId::new(row.try_get::<String, _>("user_id").map_err(ser)?);
    let category: String = row.try_get("category").map_err(ser)?;
    let score = u32_from_i64("score", row.try_get::<i64, _>("score").map_err(ser)?)?;
    let correct = u32_from_i64(
        "correct_answers",
        row.try_get::<i64, _>("correct_answers").map_err(ser)?,
    )?;
    let total = u32_from_i64(
        "total_questions",
        row.try_get::<i64, _>("total_questions").map_err(ser)?,
    )?;
    let accuracy = u8_from_i64("accuracy", row.try_get::<i64, _>("accuracy").map_err(ser)?)?;
    let completed_at = row.try_get("completed_at").map_err(ser)?;
    let difficulty: DifficultyFilter = row
        .try_get::<String, _>("difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;
    let time_taken_secs_i64: i64 = row.try_get("time_taken_secs").map_err(ser)?;
    let time_taken_secs = u64::try_from(time_taken_secs_i64).map_err(|_| {
        StorageError::Serialization(format!("invalid time_taken_secs: {time_taken_secs_i64}"))
    })?;
    let lifelines_text: String = row.try_get("lifelines_used").map_err(ser)?;
    let lifelines = lifelines_from_text(&lifelines_text)?;

    ScoreRecord::from_persisted(
        id,
        user_id,
        category,
        score,
        correct,
        total,
        accuracy,
        completed_at,
        difficulty,
        time_taken_secs,
        lifelines,
    )
    .map_err(ser)
}

pub(crate) fn map_profile_row(row: &sqlx::sqlite::SqliteRow) -> Result<UserProfile, StorageError> {
    let id = UserId::new(row.try_get::<String, _>("id").map_err(ser)?);
    let username: String = row.try_get("username").map_err(ser)?;
    let email: String = row.try_get("email").map_err(ser)?;
    let joined_at = row.try_get("joined_at").map_err(ser)?;
    let total_quizzes = u32_from_i64(
        "total_quizzes",
        row.try_get::<i64, _>("total_quizzes").map_err(ser)?,
    )?;
    let default_question_count = u32_from_i64(
        "default_question_count",
        row.try_get::<i64, _>("default_question_count").map_err(ser)?,
    )?;
    let default_difficulty: DifficultyFilter = row
        .try_get::<String, _>("default_difficulty")
        .map_err(ser)?
        .parse()
        .map_err(ser)?;

    UserProfile::from_persisted(
        id,
        username,
        email,
        joined_at,
        total_quizzes,
        Preferences {
            default_question_count,
            default_difficulty,
        },
    )
    .map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifelines_text_round_trip() {
        let lifelines = vec![Lifeline::FiftyFifty, Lifeline::Hint];
        let text = lifelines_to_text(&lifelines);
        assert_eq!(text, "fiftyFifty,hint");
        assert_eq!(lifelines_from_text(&text).unwrap(), lifelines);
        assert!(lifelines_from_text("").unwrap().is_empty());
        assert!(lifelines_from_text("bogus").is_err());
    }
}
