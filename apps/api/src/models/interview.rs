use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::question::Difficulty;
use crate::models::user::{CvSummary, UserSummary};

/// Interview session status. Stored as the `interview_status` Postgres enum.
/// There is no cancelled or expired state: a session left ONGOING stays
/// ONGOING until something completes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum InterviewStatus {
    Ongoing,
    Completed,
}

/// One interview attempt by one user for one position.
///
/// Invariant: `overall_score`, `overall_feedback` and `completed_at` are
/// all-or-nothing — all null while ONGOING, all set at COMPLETED.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub position: String,
    pub status: InterviewStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub overall_score: Option<f32>,
    pub overall_feedback: Option<String>,
    pub cv_id: Option<Uuid>,
}

/// A catalog question bound into one session, carrying that session's answer.
///
/// `score` and `feedback` are reserved for per-question grading; no operation
/// writes them today. `ordinal` records binding order so the details view can
/// replay the draw order.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewQuestionRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub question_id: Uuid,
    pub answer_text: Option<String>,
    pub score: Option<f32>,
    pub feedback: Option<String>,
    pub ordinal: i32,
}

/// Insert payload for a new session. The bound questions are created
/// atomically with the session, in the order given, each with a null answer.
#[derive(Debug, Clone)]
pub struct NewInterview {
    pub id: Uuid,
    pub user_id: Uuid,
    pub position: String,
    pub cv_id: Option<Uuid>,
    pub started_at: DateTime<Utc>,
    pub question_ids: Vec<Uuid>,
}

/// One bound question in the details view, joined with its catalog text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundQuestion {
    pub id: Uuid,
    pub question_id: Uuid,
    pub text: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub answer_text: Option<String>,
    pub score: Option<f32>,
    pub feedback: Option<String>,
}

/// The fully-populated session view returned by session creation and detail
/// reads: the session row plus nested user/CV summaries and every bound
/// question in binding order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewDetails {
    pub id: Uuid,
    pub position: String,
    pub status: InterviewStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub overall_score: Option<f32>,
    pub overall_feedback: Option<String>,
    pub user: UserSummary,
    pub cv: Option<CvSummary>,
    pub questions: Vec<BoundQuestion>,
}

impl InterviewDetails {
    pub fn assemble(
        row: InterviewRow,
        user: UserSummary,
        cv: Option<CvSummary>,
        questions: Vec<BoundQuestion>,
    ) -> Self {
        Self {
            id: row.id,
            position: row.position,
            status: row.status,
            started_at: row.started_at,
            completed_at: row.completed_at,
            overall_score: row.overall_score,
            overall_feedback: row.overall_feedback,
            user,
            cv,
            questions,
        }
    }
}

/// Per-user listing entry, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewSummary {
    pub id: Uuid,
    pub position: String,
    pub status: InterviewStatus,
    pub started_at: DateTime<Utc>,
    pub overall_score: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&InterviewStatus::Ongoing).unwrap(),
            "\"ONGOING\""
        );
        let back: InterviewStatus = serde_json::from_str("\"COMPLETED\"").unwrap();
        assert_eq!(back, InterviewStatus::Completed);
    }
}
