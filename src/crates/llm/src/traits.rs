//! Core trait for chat model providers.

use crate::error::Result;
use crate::request::ChatRequest;
use crate::response::{ChatResponse, ChunkStream};
use async_trait::async_trait;

/// Provider-agnostic interface to a chat completion service.
///
/// Implementations convert [`ChatRequest`]s into the provider's wire format,
/// make the call and convert the result back. They must be `Send + Sync`;
/// share them as `Arc<dyn ChatModel>`.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use hpgpt_llm::{ChatModel, ChatRequest, ChatResponse, ChunkStream, Result};
/// use async_trait::async_trait;
///
/// struct EchoModel;
///
/// #[async_trait]
/// impl ChatModel for EchoModel {
///     async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
///         // Convert messages, call the API, convert the response back
///         todo!()
///     }
///
///     async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
///         todo!()
///     }
///
///     fn model_name(&self) -> &str {
///         "echo"
///     }
/// }
/// ```
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate a complete response.
    ///
    /// # Errors
    ///
    /// Network, authentication, rate-limit and decoding failures are returned
    /// as [`LlmError`](crate::LlmError) variants.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Start a streaming response.
    ///
    /// Errors that prevent the stream from starting are returned directly.
    /// Failures after that arrive as `Err` items on the stream; items for
    /// which [`LlmError::is_malformed_chunk`](crate::LlmError::is_malformed_chunk)
    /// holds may be skipped.
    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream>;

    /// Identifier of the model this instance talks to.
    fn model_name(&self) -> &str;
}
