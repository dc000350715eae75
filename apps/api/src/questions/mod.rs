//! Question Source — supplies the bounded question list for a new session,
//! either by random draw from the stored catalog or by AI generation from
//! extracted CV text.

use tracing::{info, warn};

use crate::ai_client::GenAi;
use crate::errors::AppError;
use crate::models::question::{Difficulty, NewQuestion, QuestionRow};
use crate::stores::QuestionStore;

/// Draws up to `count` catalog questions, optionally filtered by category.
///
/// Partial fulfillment is acceptable: a pool smaller than `count` yields the
/// whole pool. Only an empty pool is an error.
pub async fn select_random(
    store: &dyn QuestionStore,
    count: u32,
    category: Option<&str>,
) -> Result<Vec<QuestionRow>, AppError> {
    let questions = store.find_random(count, category).await?;

    if questions.is_empty() {
        return Err(AppError::Validation(match category {
            Some(c) => format!("no questions available in category '{c}'"),
            None => "no questions available in the catalog".to_string(),
        }));
    }
    if (questions.len() as u32) < count {
        warn!(
            "Requested {count} questions, catalog supplied {}",
            questions.len()
        );
    }

    Ok(questions)
}

/// Generates questions from CV text and persists each one into the catalog
/// before returning — question generation has a durable side effect beyond
/// the session that requested it.
///
/// Free-text difficulty labels are mapped through `Difficulty::from_label`;
/// questions with blank text are discarded. Zero usable questions is fatal.
pub async fn generate_from_cv(
    store: &dyn QuestionStore,
    ai: &dyn GenAi,
    cv_text: &str,
    position: &str,
    count: u32,
) -> Result<Vec<QuestionRow>, AppError> {
    let generated = ai.generate_questions(cv_text, position, count).await?;

    let usable: Vec<_> = generated
        .into_iter()
        .filter(|q| !q.question_text.trim().is_empty())
        .collect();
    if usable.is_empty() {
        return Err(AppError::Validation(
            "AI generated no usable questions".to_string(),
        ));
    }

    let mut rows = Vec::with_capacity(usable.len());
    for question in usable {
        let row = store
            .insert(NewQuestion {
                text: question.question_text,
                category: question.category,
                difficulty: Difficulty::from_label(&question.difficulty),
            })
            .await?;
        rows.push(row);
    }

    info!("Persisted {} AI-generated questions to the catalog", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai_client::{AiError, GeneratedQuestion, QaPair, TranscriptAnalysis};
    use crate::stores::memory::MemQuestionStore;
    use async_trait::async_trait;

    struct CannedAi {
        questions: Vec<GeneratedQuestion>,
    }

    #[async_trait]
    impl GenAi for CannedAi {
        async fn generate_questions(
            &self,
            _cv_text: &str,
            _position: &str,
            _count: u32,
        ) -> Result<Vec<GeneratedQuestion>, AiError> {
            Ok(self.questions.clone())
        }

        async fn analyze_transcript(
            &self,
            _position: &str,
            _qa_pairs: &[QaPair],
        ) -> Result<TranscriptAnalysis, AiError> {
            Err(AiError::Empty)
        }
    }

    fn question(text: &str, difficulty: &str) -> GeneratedQuestion {
        GeneratedQuestion {
            question_text: text.to_string(),
            difficulty: difficulty.to_string(),
            category: "Technical".to_string(),
        }
    }

    #[tokio::test]
    async fn test_select_random_partial_fulfillment() {
        let store = MemQuestionStore::new();
        store.seed("Q1", "Backend", Difficulty::Easy);
        store.seed("Q2", "Backend", Difficulty::Hard);

        let selected = select_random(&store, 5, Some("Backend")).await.unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[tokio::test]
    async fn test_select_random_empty_pool_fails() {
        let store = MemQuestionStore::new();
        store.seed("Q1", "Backend", Difficulty::Easy);

        let err = select_random(&store, 3, Some("Frontend")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_generate_from_cv_persists_with_mapped_difficulty() {
        let store = MemQuestionStore::new();
        let ai = CannedAi {
            questions: vec![question("Tell me about borrow checking", "Kolay")],
        };

        let rows = generate_from_cv(&store, &ai, "cv text", "Backend Engineer", 1)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].difficulty, Difficulty::Easy);

        // Round trip: the persisted catalog row carries the mapped level.
        let stored = store.get(rows[0].id).await.unwrap().unwrap();
        assert_eq!(stored.difficulty, Difficulty::Easy);
        assert_eq!(stored.text, "Tell me about borrow checking");
    }

    #[tokio::test]
    async fn test_generate_from_cv_defaults_unrecognized_difficulty() {
        let store = MemQuestionStore::new();
        let ai = CannedAi {
            questions: vec![question("Q", "impossible")],
        };

        let rows = generate_from_cv(&store, &ai, "cv", "Dev", 1).await.unwrap();
        let stored = store.get(rows[0].id).await.unwrap().unwrap();
        assert_eq!(stored.difficulty, Difficulty::Medium);
    }

    #[tokio::test]
    async fn test_generate_from_cv_discards_blank_questions() {
        let store = MemQuestionStore::new();
        let ai = CannedAi {
            questions: vec![question("  ", "Easy"), question("Real question", "Hard")],
        };

        let rows = generate_from_cv(&store, &ai, "cv", "Dev", 2).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_generate_from_cv_zero_usable_is_fatal() {
        let store = MemQuestionStore::new();
        let ai = CannedAi { questions: vec![] };

        let err = generate_from_cv(&store, &ai, "cv", "Dev", 5).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(store.len(), 0);
    }
}
