//! Question loading: the `QuestionSource` contract, a JSON-file
//! implementation, and the built-in fallback set used when a category has no
//! content.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use quiz_core::model::{Difficulty, Question, QuestionDraft, QuestionId};

use crate::error::ContentError;

/// Supplies question pools per category.
///
/// Unavailable content is an empty vec, not an error; errors are reserved for
/// malformed data.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load the full question pool for `category`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError` when the category file exists but cannot be
    /// read or parsed.
    async fn load_questions(&self, category: &str) -> Result<Vec<Question>, ContentError>;
}

/// On-disk shape of a category content file: `{"questions": [...]}`.
#[derive(Debug, Deserialize)]
struct QuestionFile {
    questions: Vec<QuestionDraft>,
}

/// Reads static per-category question collections from `<dir>/<category>.json`.
#[derive(Debug, Clone)]
pub struct JsonQuestionSource {
    data_dir: PathBuf,
}

impl JsonQuestionSource {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn category_path(&self, category: &str) -> PathBuf {
        self.data_dir.join(format!("{category}.json"))
    }

    fn load_file(path: &Path, category: &str) -> Result<Vec<Question>, ContentError> {
        let raw = std::fs::read_to_string(path)?;
        let file: QuestionFile =
            serde_json::from_str(&raw).map_err(|e| ContentError::Parse {
                category: category.to_string(),
                message: e.to_string(),
            })?;

        file.questions
            .into_iter()
            .enumerate()
            .map(|(index, draft)| {
                draft
                    .validate(QuestionId::new(index as u64), category)
                    .map_err(|source| ContentError::InvalidQuestion {
                        category: category.to_string(),
                        source,
                    })
            })
            .collect()
    }
}

#[async_trait]
impl QuestionSource for JsonQuestionSource {
    async fn load_questions(&self, category: &str) -> Result<Vec<Question>, ContentError> {
        let path = self.category_path(category);
        if !path.exists() {
            return Ok(Vec::new());
        }
        Self::load_file(&path, category)
    }
}

/// In-memory source with fixed per-category pools, for tests and prototyping.
#[derive(Debug, Clone, Default)]
pub struct FixedQuestionSource {
    pools: HashMap<String, Vec<Question>>,
}

impl FixedQuestionSource {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_pool(mut self, category: impl Into<String>, questions: Vec<Question>) -> Self {
        self.pools.insert(category.into(), questions);
        self
    }
}

#[async_trait]
impl QuestionSource for FixedQuestionSource {
    async fn load_questions(&self, category: &str) -> Result<Vec<Question>, ContentError> {
        Ok(self.pools.get(category).cloned().unwrap_or_default())
    }
}

fn backup_question(
    id: u64,
    category: &str,
    prompt: &str,
    options: &[&str],
    answer: &str,
    difficulty: Difficulty,
) -> Option<Question> {
    Question::new(
        QuestionId::new(id),
        prompt,
        options.iter().map(|o| (*o).to_string()).collect(),
        answer,
        difficulty,
        category,
        None,
    )
    .ok()
}

/// Built-in minimal question set, used when a category's content is
/// unavailable so a session can still start with reduced content.
#[must_use]
pub fn fallback_questions(category: &str) -> Vec<Question> {
    if category == "science" {
        [
            backup_question(
                0,
                "science",
                "What is the chemical symbol for gold?",
                &["Au", "Ag", "Gd", "Go"],
                "Au",
                Difficulty::Medium,
            ),
            backup_question(
                1,
                "science",
                "What is the speed of light in vacuum?",
                &[
                    "300,000 km/s",
                    "150,000 km/s",
                    "450,000 km/s",
                    "600,000 km/s",
                ],
                "300,000 km/s",
                Difficulty::Medium,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    } else {
        [
            backup_question(
                0,
                "general",
                "What is the capital of France?",
                &["London", "Berlin", "Paris", "Madrid"],
                "Paris",
                Difficulty::Easy,
            ),
            backup_question(
                1,
                "general",
                "Which planet is known as the Red Planet?",
                &["Venus", "Mars", "Jupiter", "Saturn"],
                "Mars",
                Difficulty::Easy,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixed_source_serves_per_category_pools() {
        let source =
            FixedQuestionSource::new().with_pool("science", fallback_questions("science"));
        let science = source.load_questions("science").await.unwrap();
        assert_eq!(science.len(), 2);
        let other = source.load_questions("history").await.unwrap();
        assert!(other.is_empty());
    }

    #[test]
    fn fallback_sets_are_valid_and_non_empty() {
        for category in ["science", "general", "history"] {
            let pool = fallback_questions(category);
            assert!(!pool.is_empty());
            for q in &pool {
                assert!(q.options().len() >= 2);
                assert!(q.options().iter().any(|o| q.is_correct(o)));
            }
        }
    }

    #[tokio::test]
    async fn json_source_reads_category_files() {
        let dir = std::env::temp_dir().join(format!("quiz_content_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("science.json"),
            r#"{"questions":[
                {"question":"2+2?","options":["3","4"],"answer":"4","difficulty":"easy"},
                {"question":"H2O is?","options":["Water","Salt"],"answer":"Water"}
            ]}"#,
        )
        .unwrap();

        let source = JsonQuestionSource::new(&dir);
        let questions = source.load_questions("science").await.unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].id(), QuestionId::new(0));
        assert_eq!(questions[0].category(), "science");
        assert_eq!(questions[1].difficulty(), Difficulty::Medium);

        let missing = source.load_questions("sports").await.unwrap();
        assert!(missing.is_empty());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[tokio::test]
    async fn json_source_rejects_malformed_files() {
        let dir = std::env::temp_dir().join(format!("quiz_content_bad_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("history.json"), "not json").unwrap();

        let source = JsonQuestionSource::new(&dir);
        let err = source.load_questions("history").await.unwrap_err();
        assert!(matches!(err, ContentError::Parse { .. }));

        std::fs::remove_dir_all(&dir).ok();
    }
}
