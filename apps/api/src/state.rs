use crate::interview::InterviewManager;

/// Shared application state injected into all route handlers via Axum
/// extractors. The manager carries the stores and external collaborators as
/// trait objects, so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub manager: InterviewManager,
}
