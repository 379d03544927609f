//! Response types returned by chat models.

use crate::error::Result;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Pinned stream of incremental completion fragments.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<StreamChunk>> + Send>>;

/// A complete, non-streaming response. Only the first choice is kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Text of the first choice.
    pub content: String,

    /// Why generation stopped (`stop`, `length`, ...), when reported.
    pub finish_reason: Option<String>,

    /// Model that produced the response.
    pub model: String,

    /// Token accounting, when reported.
    pub usage: Option<UsageMetadata>,
}

/// Token usage reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// One decoded fragment of a streaming response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamChunk {
    /// Incremental content, if the fragment carried any.
    pub content: Option<String>,

    /// Terminal reason; set on the last fragment of a completion.
    pub finish_reason: Option<String>,
}

impl StreamChunk {
    /// A content-only fragment.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            finish_reason: None,
        }
    }

    /// Mark this fragment as the last one.
    pub fn finished(mut self, reason: impl Into<String>) -> Self {
        self.finish_reason = Some(reason.into());
        self
    }
}
