//! Axum route handlers for the Interview API.

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interview::manager::StartInterview;
use crate::models::interview::{InterviewDetails, InterviewSummary};
use crate::state::AppState;

const DEFAULT_QUESTION_COUNT: u32 = 10;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StartInterviewRequest {
    pub user_id: Uuid,
    pub position: String,
    pub cv_id: Option<Uuid>,
    #[serde(default = "default_question_count")]
    pub question_count: u32,
    pub category: Option<String>,
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

#[derive(Debug, Deserialize)]
pub struct SubmitAnswerRequest {
    pub interview_id: Uuid,
    pub question_id: Uuid,
    pub answer_text: String,
}

#[derive(Debug, Deserialize)]
pub struct CompleteInterviewRequest {
    pub overall_score: f32,
    pub overall_feedback: String,
}

#[derive(Debug, Serialize)]
pub struct CompletionResponse {
    pub overall_score: f32,
    pub overall_feedback: String,
}

#[derive(Debug, Serialize)]
pub struct AudioAnswerResponse {
    pub transcribed_text: String,
}

#[derive(Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/interviews/start
///
/// Starts a session from a random catalog draw, optionally filtered by
/// category. Returns the session with all bound questions attached.
pub async fn handle_start(
    State(state): State<AppState>,
    Json(request): Json<StartInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewDetails>), AppError> {
    if request.position.trim().is_empty() {
        return Err(AppError::Validation("position cannot be empty".to_string()));
    }
    if request.question_count == 0 {
        return Err(AppError::Validation(
            "question_count must be at least 1".to_string(),
        ));
    }

    let details = state
        .manager
        .start_interview(StartInterview {
            user_id: request.user_id,
            position: request.position,
            cv_id: request.cv_id,
            question_count: request.question_count,
            category: request.category,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(details)))
}

/// POST /api/v1/interviews/start-with-cv
///
/// Multipart: `cv_file` (PDF/DOCX), `position`, `user_id`, optional
/// `question_count`. Generates the question set from the CV text.
pub async fn handle_start_with_cv(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<InterviewDetails>), AppError> {
    let mut cv_file: Option<(Bytes, String)> = None;
    let mut position: Option<String> = None;
    let mut user_id: Option<Uuid> = None;
    let mut question_count = DEFAULT_QUESTION_COUNT;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "cv_file" => {
                let file_name = field.file_name().unwrap_or("cv").to_string();
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                cv_file = Some((bytes, file_name));
            }
            "position" => position = Some(field.text().await.map_err(bad_multipart)?),
            "user_id" => {
                user_id = Some(
                    field
                        .text()
                        .await
                        .map_err(bad_multipart)?
                        .parse()
                        .map_err(|_| {
                            AppError::Validation("user_id must be a valid UUID".to_string())
                        })?,
                );
            }
            "question_count" => {
                question_count = field
                    .text()
                    .await
                    .map_err(bad_multipart)?
                    .parse()
                    .map_err(|_| {
                        AppError::Validation("question_count must be a positive number".to_string())
                    })?;
            }
            _ => {}
        }
    }

    let (file_bytes, file_name) =
        cv_file.ok_or_else(|| AppError::Validation("cv_file is required".to_string()))?;
    if file_bytes.is_empty() {
        return Err(AppError::Validation("cv_file is empty".to_string()));
    }
    let position = position
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::Validation("position is required".to_string()))?;
    let user_id =
        user_id.ok_or_else(|| AppError::Validation("user_id is required".to_string()))?;
    if question_count == 0 {
        return Err(AppError::Validation(
            "question_count must be at least 1".to_string(),
        ));
    }

    let details = state
        .manager
        .start_interview_from_cv(user_id, position, &file_bytes, &file_name, question_count)
        .await?;

    Ok((StatusCode::CREATED, Json(details)))
}

/// POST /api/v1/interviews/submit-answer
///
/// Records a text answer against one bound question. 204 on success.
pub async fn handle_submit_answer(
    State(state): State<AppState>,
    Json(request): Json<SubmitAnswerRequest>,
) -> Result<StatusCode, AppError> {
    state
        .manager
        .submit_answer(request.interview_id, request.question_id, &request.answer_text)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/interviews/:interview_id/questions/:question_id/submit-audio
///
/// Multipart: `audio_file`. Transcribes and stores the result as the answer.
pub async fn handle_submit_audio(
    State(state): State<AppState>,
    Path((interview_id, question_id)): Path<(Uuid, Uuid)>,
    mut multipart: Multipart,
) -> Result<Json<AudioAnswerResponse>, AppError> {
    let mut audio: Option<(Bytes, String)> = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        if field.name() == Some("audio_file") {
            let file_name = field.file_name().unwrap_or("answer.wav").to_string();
            let bytes = field.bytes().await.map_err(bad_multipart)?;
            audio = Some((bytes, file_name));
        }
    }

    let (audio_bytes, file_name) =
        audio.ok_or_else(|| AppError::Validation("audio_file is required".to_string()))?;
    if audio_bytes.is_empty() {
        return Err(AppError::Validation("audio_file is empty".to_string()));
    }

    let transcribed_text = state
        .manager
        .submit_audio_answer(interview_id, question_id, audio_bytes, &file_name)
        .await?;

    Ok(Json(AudioAnswerResponse { transcribed_text }))
}

/// POST /api/v1/interviews/:interview_id/complete
///
/// Manual completion with a caller-supplied verdict. The score range is
/// enforced here at the boundary; the manager stores it verbatim.
pub async fn handle_complete(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<CompleteInterviewRequest>,
) -> Result<Json<CompletionResponse>, AppError> {
    if !(0.0..=10.0).contains(&request.overall_score) {
        return Err(AppError::Validation(
            "overall_score must be between 0 and 10".to_string(),
        ));
    }
    if request.overall_feedback.trim().is_empty() {
        return Err(AppError::Validation(
            "overall_feedback cannot be empty".to_string(),
        ));
    }

    state
        .manager
        .complete_interview(interview_id, request.overall_score, &request.overall_feedback)
        .await?;

    Ok(Json(CompletionResponse {
        overall_score: request.overall_score,
        overall_feedback: request.overall_feedback,
    }))
}

/// POST /api/v1/interviews/:interview_id/complete-and-analyze
///
/// AI-assisted completion: scores the full transcript and transitions the
/// session in one step.
pub async fn handle_complete_and_analyze(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<CompletionResponse>, AppError> {
    let analysis = state
        .manager
        .analyze_and_complete_interview(interview_id)
        .await?;

    Ok(Json(CompletionResponse {
        overall_score: analysis.overall_score,
        overall_feedback: analysis.overall_feedback,
    }))
}

/// GET /api/v1/interviews/:interview_id
pub async fn handle_get_details(
    State(state): State<AppState>,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewDetails>, AppError> {
    let details = state.manager.get_interview_with_details(interview_id).await?;
    Ok(Json(details))
}

/// GET /api/v1/interviews?user_id=…
pub async fn handle_list_for_user(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<Vec<InterviewSummary>>, AppError> {
    let summaries = state.manager.list_interviews_for_user(params.user_id).await?;
    Ok(Json(summaries))
}

fn bad_multipart(e: axum::extract::multipart::MultipartError) -> AppError {
    AppError::Validation(format!("invalid multipart body: {e}"))
}
