//! AI service configuration
//!
//! Resolution order for every setting: environment variable, then the
//! shared TOML file, then the compiled default. The upstream API key has
//! no default; without it the service starts but generation endpoints
//! return 503 until a key is provided.

use tracklab_common::config::TomlConfig;

const DEFAULT_BIND: &str = "127.0.0.1:5741";
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Resolved configuration for the AI service
#[derive(Debug, Clone)]
pub struct AiConfig {
    /// Socket address to listen on
    pub bind_address: String,
    /// Upstream API key; None means generation is unavailable
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible completions API
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
}

impl AiConfig {
    /// Resolve configuration from CLI override, environment, and TOML.
    pub fn resolve(cli_bind: Option<String>, toml: &TomlConfig) -> Self {
        let bind_address = cli_bind
            .or_else(|| std::env::var("TRACKLAB_AI_BIND").ok())
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let api_key = std::env::var("TRACKLAB_AI_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .or_else(|| toml.ai_api_key.clone());

        let base_url = std::env::var("TRACKLAB_AI_BASE_URL")
            .ok()
            .or_else(|| toml.ai_base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let model = std::env::var("TRACKLAB_AI_MODEL")
            .ok()
            .or_else(|| toml.ai_model.clone())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        if api_key.is_none() {
            tracing::warn!(
                "no upstream API key configured; generation endpoints will return 503"
            );
        }

        Self {
            bind_address,
            api_key,
            base_url,
            model,
        }
    }
}
