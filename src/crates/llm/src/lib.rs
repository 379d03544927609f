//! Chat model providers for hpgpt.
//!
//! This crate defines the provider-agnostic [`ChatModel`] trait together with
//! its request and response types, and ships a concrete client for Groq's
//! OpenAI-compatible API.
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use hpgpt_llm::remote::GroqClient;
//! use hpgpt_llm::{ChatConfig, ChatMessage, ChatModel, ChatRequest, RemoteLlmConfig};
//! use futures::StreamExt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = GroqClient::new(RemoteLlmConfig::groq_from_env()?)?;
//!
//!     let request = ChatRequest::new(vec![
//!         ChatMessage::user("Explain quantum computing briefly")
//!     ]).with_config(ChatConfig::conversational());
//!
//!     let mut chunks = client.stream(request).await?;
//!     while let Some(chunk) = chunks.next().await {
//!         if let Some(text) = chunk?.content {
//!             print!("{}", text);
//!         }
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod message;
pub mod remote;
pub mod request;
pub mod response;
pub mod sse;
pub mod traits;

// Re-export commonly used types
pub use config::RemoteLlmConfig;
pub use error::{LlmError, Result};
pub use message::{ChatMessage, Role};
pub use request::{ChatConfig, ChatRequest};
pub use response::{ChatResponse, ChunkStream, StreamChunk, UsageMetadata};
pub use traits::ChatModel;
