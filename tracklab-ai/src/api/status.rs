//! AI service status endpoint

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::groq::ChatMessage;
use crate::AppState;

/// GET /ai/status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub service: String,
    pub status: String,
    pub ai_provider: String,
    pub model: String,
    pub api_key_configured: bool,
    pub features: Vec<String>,
    pub ai_test: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_error: Option<String>,
}

/// GET /ai/status
///
/// Reports configuration and, when a key is present, probes the upstream
/// with a tiny completion to verify connectivity.
pub async fn ai_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let mut response = StatusResponse {
        service: "tracklab-ai".to_string(),
        status: "running".to_string(),
        ai_provider: "groq".to_string(),
        model: state.client.model().to_string(),
        api_key_configured: state.client.is_configured(),
        features: vec![
            "lyrics_generation".to_string(),
            "description_generation".to_string(),
            "text_analysis".to_string(),
        ],
        ai_test: "skipped - no API key".to_string(),
        ai_response: None,
        ai_error: None,
    };

    if state.client.is_configured() {
        let probe = [ChatMessage::user("Reply 'OK' if you are working.")];
        match state.client.complete(&probe, 0.0, 10).await {
            Ok(text) => {
                response.ai_test = "passed".to_string();
                response.ai_response = Some(text);
            }
            Err(err) => {
                response.ai_test = "failed".to_string();
                response.ai_error = Some(err.to_string());
            }
        }
    }

    Json(response)
}
