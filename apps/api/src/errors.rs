use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The taxonomy mirrors how session operations fail: absent entities, invalid
/// input (including anything the upstream AI returned that we cannot use),
/// writes against a session that is no longer ongoing, and upstream services
/// that are unreachable or answering with errors. Upstream failures get their
/// own status so callers can distinguish "retry later" from "fix the request".
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Session not ongoing: {0}")]
    NotOngoing(String),

    #[error("Upstream service unavailable: {0}")]
    Upstream(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

// Collaborator error translation. Transport-level failures become the
// retry-later condition; anything the caller could fix (bad file, silent
// audio, unusable AI output) stays a validation error with the original
// diagnostic preserved.

impl From<crate::ai_client::AiError> for AppError {
    fn from(e: crate::ai_client::AiError) -> Self {
        use crate::ai_client::AiError;
        match e {
            AiError::Http(_) | AiError::Api { .. } => AppError::Upstream(e.to_string()),
            AiError::Empty | AiError::Malformed(_) => AppError::Validation(e.to_string()),
        }
    }
}

impl From<crate::speech_client::SpeechError> for AppError {
    fn from(e: crate::speech_client::SpeechError) -> Self {
        use crate::speech_client::SpeechError;
        match e {
            SpeechError::Unreachable(_) | SpeechError::Service { .. } => {
                AppError::Upstream(e.to_string())
            }
            SpeechError::NoSpeech => AppError::Validation(e.to_string()),
        }
    }
}

impl From<crate::extraction::ExtractError> for AppError {
    fn from(e: crate::extraction::ExtractError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotOngoing(msg) => {
                (StatusCode::CONFLICT, "SESSION_NOT_ONGOING", msg.clone())
            }
            AppError::Upstream(msg) => {
                tracing::error!("Upstream service error: {msg}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "UPSTREAM_UNAVAILABLE",
                    msg.clone(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
