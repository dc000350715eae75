#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A stored CV document. Only existence and metadata are visible to this
/// service; the file content lives with the upload service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CvRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

/// User fields nested into the interview details view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UserRow> for UserSummary {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

/// CV fields nested into the interview details view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvSummary {
    pub id: Uuid,
    pub file_name: String,
    pub uploaded_at: DateTime<Utc>,
}

impl From<CvRow> for CvSummary {
    fn from(row: CvRow) -> Self {
        Self {
            id: row.id,
            file_name: row.file_name,
            uploaded_at: row.uploaded_at,
        }
    }
}
