//! tracklab-ai library - AI content generation proxy
//!
//! Thin pass-through over an OpenAI-compatible chat-completions API:
//! lyrics generation, marketing descriptions, and text analysis for the
//! rest of the platform. No state of its own beyond the upstream client.

use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod error;
pub mod groq;

pub use config::AiConfig;
pub use error::ApiError;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Resolved service configuration, injected at startup
    pub config: Arc<AiConfig>,
    /// Upstream completion client
    pub client: Arc<groq::CompletionClient>,
}

impl AppState {
    /// Fails only when the outbound HTTP client cannot be constructed.
    pub fn new(config: AiConfig) -> Result<Self, groq::CompletionError> {
        let client = groq::CompletionClient::new(
            config.api_key.clone(),
            config.base_url.clone(),
            config.model.clone(),
        )?;
        Ok(Self {
            config: Arc::new(config),
            client: Arc::new(client),
        })
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/generate/lyrics", post(api::generate::generate_lyrics))
        .route(
            "/generate/description",
            post(api::generate::generate_description),
        )
        .route("/analyze/text", post(api::analyze::analyze_text))
        .route("/ai/status", get(api::status::ai_status))
        .merge(api::health::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
