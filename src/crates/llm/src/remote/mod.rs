//! Remote LLM provider implementations.
//!
//! - **Groq** - OpenAI-compatible hosted inference for open models

pub mod groq;

pub use groq::GroqClient;
