//! OpenAI-compatible chat completions client
//!
//! Talks to Groq (or any endpoint speaking the same protocol). One shared
//! client per process; a small rate limiter spaces requests out so a burst
//! of generation calls does not trip upstream throttling.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex;

const USER_AGENT: &str = "tracklab-ai/0.1.0";
const RATE_LIMIT_MS: u64 = 500; // 2 requests per second
const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Completion client errors
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("No upstream API key configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Upstream returned no choices")]
    EmptyResponse,
}

/// One message in a chat completion conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ChatMessage,
}

/// Rate limiter spacing upstream requests
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval_ms: u64) -> Self {
        Self {
            last_request: Mutex::new(None),
            min_interval: Duration::from_millis(min_interval_ms),
        }
    }

    async fn wait(&self) {
        let mut last = self.last_request.lock().await;

        if let Some(last_time) = *last {
            let elapsed = last_time.elapsed();
            if elapsed < self.min_interval {
                let wait_time = self.min_interval - elapsed;
                tracing::debug!("rate limiting: waiting {:?}", wait_time);
                tokio::time::sleep(wait_time).await;
            }
        }

        *last = Some(Instant::now());
    }
}

/// Chat completions API client
pub struct CompletionClient {
    http_client: reqwest::Client,
    rate_limiter: Arc<RateLimiter>,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl CompletionClient {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        model: String,
    ) -> Result<Self, CompletionError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| CompletionError::NetworkError(e.to_string()))?;

        Ok(Self {
            http_client,
            rate_limiter: Arc::new(RateLimiter::new(RATE_LIMIT_MS)),
            api_key,
            base_url,
            model,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion request and return the assistant's text.
    pub async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, CompletionError> {
        let api_key = self.api_key.as_ref().ok_or(CompletionError::NotConfigured)?;

        self.rate_limiter.wait().await;

        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));

        tracing::debug!(model = %self.model, messages = messages.len(), "Querying completions API");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout
                } else {
                    CompletionError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();

        if status == 401 {
            return Err(CompletionError::InvalidApiKey);
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(CompletionError::ApiError(status.as_u16(), error_text));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::ParseError(e.to_string()))?;

        let text = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(CompletionError::EmptyResponse)?;

        Ok(text.trim().to_string())
    }
}

/// Extract a JSON object from model output.
///
/// Models frequently wrap JSON in a fenced code block or surround it with
/// prose. Prefer a ```json fence, then any fence, then the outermost brace
/// pair, then the raw text.
pub fn extract_json_block(text: &str) -> &str {
    if let Some(inner) = fenced_block(text, "```json") {
        return inner;
    }
    if let Some(inner) = fenced_block(text, "```") {
        return inner;
    }
    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            return &text[start..=end];
        }
    }
    text.trim()
}

fn fenced_block<'a>(text: &'a str, fence: &str) -> Option<&'a str> {
    let start = text.find(fence)? + fence.len();
    let rest = &text[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limiter_creation() {
        let limiter = RateLimiter::new(500);
        assert_eq!(limiter.min_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_client_creation() {
        let client = CompletionClient::new(
            None,
            "https://api.groq.com/openai/v1".to_string(),
            "llama-3.1-8b-instant".to_string(),
        );
        assert!(client.is_ok());
        assert!(!client.unwrap().is_configured());
    }

    #[tokio::test]
    async fn test_complete_without_key_fails_fast() {
        let client = CompletionClient::new(
            None,
            "https://api.groq.com/openai/v1".to_string(),
            "llama-3.1-8b-instant".to_string(),
        )
        .unwrap();
        let result = client
            .complete(&[ChatMessage::user("hi")], 0.7, 100)
            .await;
        assert!(matches!(result, Err(CompletionError::NotConfigured)));
    }

    #[test]
    fn test_extract_json_from_fence() {
        let text = "Here you go:\n```json\n{\"a\": 1}\n```\nEnjoy!";
        assert_eq!(extract_json_block(text), "{\"a\": 1}");
    }

    #[test]
    fn test_extract_json_from_bare_fence() {
        let text = "```\n{\"b\": 2}\n```";
        assert_eq!(extract_json_block(text), "{\"b\": 2}");
    }

    #[test]
    fn test_extract_json_from_prose() {
        let text = "The result is {\"c\": 3} as requested.";
        assert_eq!(extract_json_block(text), "{\"c\": 3}");
    }

    #[test]
    fn test_extract_json_passthrough() {
        let text = "no json here";
        assert_eq!(extract_json_block(text), "no json here");
    }
}
