//! API error types for the AI service

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::groq::CompletionError;

/// Errors returned by AI HTTP handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("AI generation unavailable: {0}")]
    Unavailable(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Upstream timed out")]
    UpstreamTimeout,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CompletionError> for ApiError {
    fn from(err: CompletionError) -> Self {
        match err {
            CompletionError::NotConfigured => {
                ApiError::Unavailable("no upstream API key configured".to_string())
            }
            CompletionError::Timeout => ApiError::UpstreamTimeout,
            CompletionError::InvalidApiKey => {
                ApiError::Unavailable("upstream rejected the configured API key".to_string())
            }
            CompletionError::NetworkError(msg) => ApiError::Upstream(msg),
            CompletionError::ApiError(status, body) => {
                ApiError::Upstream(format!("upstream returned {}: {}", status, body))
            }
            CompletionError::ParseError(msg) => {
                ApiError::Upstream(format!("unreadable upstream response: {}", msg))
            }
            CompletionError::EmptyResponse => {
                ApiError::Upstream("upstream returned no choices".to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "AI_UNAVAILABLE"),
            ApiError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            ApiError::UpstreamTimeout => (StatusCode::GATEWAY_TIMEOUT, "UPSTREAM_TIMEOUT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        if status.is_server_error() {
            tracing::error!(code = code, "request failed: {}", self);
        }

        let body = Json(json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}
