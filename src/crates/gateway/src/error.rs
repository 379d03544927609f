//! Error types for the completion gateway.

use hpgpt_llm::LlmError;
use thiserror::Error;

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors surfaced by the `try_*` gateway operations and by construction.
///
/// The user-facing operations never return these; they turn them into a
/// message or a fallback value after logging.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The gateway could not be built (missing credential, bad client setup).
    #[error("Gateway configuration failed: {0}")]
    Config(#[source] LlmError),

    /// The remote model call failed.
    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl GatewayError {
    /// Whether the underlying failure is worth retrying.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Llm(err) => err.is_retryable(),
            GatewayError::Config(_) => false,
        }
    }
}
