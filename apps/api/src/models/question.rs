use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Catalog question difficulty. Stored as the `question_difficulty` Postgres
/// enum ('EASY' | 'MEDIUM' | 'HARD').
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "question_difficulty", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Maps a free-text difficulty label from the AI into a difficulty level.
    ///
    /// Case-insensitive and tolerant of localized labels (the question corpus
    /// is partly Turkish). Anything unrecognized falls back to `Medium`.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "easy" | "kolay" | "basit" => Difficulty::Easy,
            "medium" | "orta" | "moderate" => Difficulty::Medium,
            "hard" | "zor" | "difficult" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }
}

/// A reusable catalog question, independent of any session.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub text: String,
    pub category: String,
    pub difficulty: Difficulty,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for the question catalog. The store assigns the identity
/// and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub text: String,
    pub category: String,
    pub difficulty: Difficulty,
}
