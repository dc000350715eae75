pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::interview::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/interviews/start", post(handlers::handle_start))
        .route(
            "/api/v1/interviews/start-with-cv",
            post(handlers::handle_start_with_cv),
        )
        .route(
            "/api/v1/interviews/submit-answer",
            post(handlers::handle_submit_answer),
        )
        .route(
            "/api/v1/interviews/:interview_id/questions/:question_id/submit-audio",
            post(handlers::handle_submit_audio),
        )
        .route(
            "/api/v1/interviews/:interview_id/complete",
            post(handlers::handle_complete),
        )
        .route(
            "/api/v1/interviews/:interview_id/complete-and-analyze",
            post(handlers::handle_complete_and_analyze),
        )
        .route(
            "/api/v1/interviews/:interview_id",
            get(handlers::handle_get_details),
        )
        .route("/api/v1/interviews", get(handlers::handle_list_for_user))
        .with_state(state)
}
