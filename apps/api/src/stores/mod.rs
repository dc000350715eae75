#![allow(dead_code)]

//! Entity store traits — one explicit interface per entity, injected into the
//! session manager as named dependencies and resolved at compile time.
//!
//! `AppState` carries the Postgres implementations as `Arc<dyn …>`; the
//! manager's state-machine tests swap in the in-memory doubles from
//! `stores::memory`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::interview::{InterviewDetails, InterviewRow, InterviewSummary, NewInterview};
use crate::models::question::{NewQuestion, QuestionRow};
use crate::models::user::CvRow;

pub mod postgres;

#[cfg(test)]
pub mod memory;

/// The question catalog. Read for random draws; written when AI-generated
/// questions are persisted before binding.
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// Draws up to `count` questions, optionally filtered by category, in a
    /// non-repeating order. May return fewer than `count` if the pool is
    /// smaller; returns an empty list for an empty pool.
    async fn find_random(
        &self,
        count: u32,
        category: Option<&str>,
    ) -> Result<Vec<QuestionRow>, AppError>;

    /// Persists a new catalog question, assigning identity and timestamp.
    async fn insert(&self, question: NewQuestion) -> Result<QuestionRow, AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<QuestionRow>, AppError>;
}

/// CV documents. Existence check only — content is never read by this core.
#[async_trait]
pub trait CvStore: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<CvRow>, AppError>;
}

/// Interview sessions and their bound questions.
#[async_trait]
pub trait InterviewStore: Send + Sync {
    /// Creates the session and its bound questions atomically, each bound
    /// question with a null answer, ordinals following the given order.
    async fn insert(&self, interview: NewInterview) -> Result<(), AppError>;

    async fn get(&self, id: Uuid) -> Result<Option<InterviewRow>, AppError>;

    /// Loads the session with nested user/CV summaries and all bound
    /// questions joined with their catalog text, in binding order.
    async fn get_with_details(&self, id: Uuid) -> Result<Option<InterviewDetails>, AppError>;

    /// Overwrites the answer of one bound question. Last write wins; no
    /// history is kept.
    async fn set_answer(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
        answer_text: &str,
    ) -> Result<(), AppError>;

    /// Transitions the session to COMPLETED, setting score, feedback and the
    /// completion timestamp in one write.
    async fn complete(
        &self,
        id: Uuid,
        completed_at: DateTime<Utc>,
        overall_score: f32,
        overall_feedback: &str,
    ) -> Result<(), AppError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<InterviewSummary>, AppError>;
}
