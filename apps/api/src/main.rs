mod ai_client;
mod config;
mod db;
mod errors;
mod extraction;
mod interview;
mod models;
mod questions;
mod routes;
mod speech_client;
mod state;
mod stores;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ai_client::GeminiClient;
use crate::config::Config;
use crate::db::create_pool;
use crate::interview::InterviewManager;
use crate::routes::build_router;
use crate::speech_client::SpeechHttpClient;
use crate::state::AppState;
use crate::stores::postgres::{PgCvStore, PgInterviewStore, PgQuestionStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (panics on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;

    // Initialize the generative AI client
    let ai = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    info!("Generative AI client initialized (model: {})", config.gemini_model);

    // Initialize the speech transcription client
    let speech = Arc::new(SpeechHttpClient::new(config.speech_service_url.clone()));
    info!("Speech client initialized ({})", config.speech_service_url);

    // Wire the session manager: entity stores and collaborators are injected
    // as named trait dependencies.
    let manager = InterviewManager::new(
        Arc::new(PgInterviewStore::new(db.clone())),
        Arc::new(PgQuestionStore::new(db.clone())),
        Arc::new(PgCvStore::new(db)),
        ai,
        speech,
        config.recompletion_policy,
    );
    info!(
        "Session manager ready (recompletion policy: {:?})",
        config.recompletion_policy
    );

    // Build app state
    let state = AppState { manager };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
