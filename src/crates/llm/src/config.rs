//! Provider configuration.

use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the Groq API key.
pub const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable overriding the Groq base URL.
pub const GROQ_BASE_URL_ENV: &str = "GROQ_BASE_URL";

/// Environment variable overriding the Groq model.
pub const GROQ_MODEL_ENV: &str = "GROQ_MODEL";

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model used when `GROQ_MODEL` is not set.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Configuration for remote, OpenAI-compatible LLM providers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    /// API key for authentication.
    pub api_key: String,

    /// Base URL for the API, without the `/chat/completions` suffix.
    pub base_url: String,

    /// Model name/identifier.
    pub model: String,

    /// Whole-request timeout. `None` leaves requests unbounded.
    #[serde(default)]
    pub timeout: Option<Duration>,

    /// Organization ID (optional, for providers that support it).
    #[serde(default)]
    pub organization: Option<String>,
}

impl RemoteLlmConfig {
    /// Create a new remote LLM configuration.
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
            timeout: None,
            organization: None,
        }
    }

    /// Create configuration with the API key read from an environment variable.
    pub fn from_env(
        env_var: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = non_empty_env(env_var)
            .ok_or_else(|| LlmError::ApiKeyNotFound(format!("Environment variable: {}", env_var)))?;

        Ok(Self::new(api_key, base_url, model))
    }

    /// Create a Groq configuration from the process environment.
    ///
    /// `GROQ_API_KEY` is required. `GROQ_BASE_URL` and `GROQ_MODEL` override
    /// the defaults when present.
    pub fn groq_from_env() -> Result<Self> {
        let base_url =
            non_empty_env(GROQ_BASE_URL_ENV).unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string());
        let model = non_empty_env(GROQ_MODEL_ENV).unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string());

        Self::from_env(GROQ_API_KEY_ENV, base_url, model)
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the organization ID.
    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }

    /// Full URL of the chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
