//! Groq client implementation.
//!
//! Groq serves open models (Llama 3.3, Mixtral, ...) behind an
//! OpenAI-compatible chat completions API, both buffered and as
//! server-sent events.
//!
//! # Example
//!
//! ```rust,ignore
//! use hpgpt_llm::remote::GroqClient;
//! use hpgpt_llm::{ChatMessage, ChatModel, ChatRequest, RemoteLlmConfig};
//!
//! let config = RemoteLlmConfig::groq_from_env()?;
//! let client = GroqClient::new(config)?;
//!
//! let request = ChatRequest::new(vec![ChatMessage::user("Hello!")]);
//! let response = client.chat(request).await?;
//! println!("{}", response.content);
//! ```

use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use crate::message::ChatMessage;
use crate::request::ChatRequest;
use crate::response::{ChatResponse, ChunkStream, StreamChunk, UsageMetadata};
use crate::sse::{self, DONE_MARKER};
use crate::traits::ChatModel;
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Groq API client.
#[derive(Clone)]
pub struct GroqClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl GroqClient {
    /// Create a new Groq client with the given configuration.
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| LlmError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        info!("GroqClient initialized with model: {}", config.model);
        Ok(Self { config, client })
    }

    /// Create a client from `GROQ_API_KEY` (and optional overrides).
    pub fn from_env() -> Result<Self> {
        Self::new(RemoteLlmConfig::groq_from_env()?)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &RemoteLlmConfig {
        &self.config
    }

    fn build_request<'a>(&'a self, request: &'a ChatRequest, stream: bool) -> GroqRequest<'a> {
        let config = &request.config;
        GroqRequest {
            model: &self.config.model,
            messages: &request.messages,
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            frequency_penalty: config.frequency_penalty,
            presence_penalty: config.presence_penalty,
            stop: if config.stop_sequences.is_empty() {
                None
            } else {
                Some(&config.stop_sequences)
            },
            stream,
        }
    }

    async fn send(&self, body: &GroqRequest<'_>) -> Result<reqwest::Response> {
        debug!(
            "Sending {} messages to Groq (model: {}, stream: {})",
            body.messages.len(),
            body.model,
            body.stream
        );

        let mut req = self
            .client
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body);

        if let Some(org) = &self.config.organization {
            req = req.header("OpenAI-Organization", org);
        }
        if body.stream {
            req = req.header(header::ACCEPT, "text/event-stream");
        }

        let response = req.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(status_error(status, error_text));
        }

        Ok(response)
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let body = self.build_request(&request, false);
        let response = self.send(&body).await?;

        let groq_resp: GroqResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        let response = convert_response(groq_resp)?;
        info!("Non-streaming response: {} characters", response.content.len());
        Ok(response)
    }

    async fn stream(&self, request: ChatRequest) -> Result<ChunkStream> {
        let body = self.build_request(&request, true);
        let response = self.send(&body).await?;

        Ok(chunk_stream(sse::data_stream(response.bytes_stream())))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

fn status_error(status: StatusCode, error_text: String) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED => LlmError::AuthenticationError(error_text),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimitExceeded(error_text),
        _ => LlmError::ProviderError(format!("Groq API error {}: {}", status, error_text)),
    }
}

fn convert_response(groq_resp: GroqResponse) -> Result<ChatResponse> {
    let choice = groq_resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

    Ok(ChatResponse {
        content: choice.message.content.unwrap_or_default(),
        finish_reason: choice.finish_reason,
        model: groq_resp.model,
        usage: groq_resp
            .usage
            .map(|u| UsageMetadata::new(u.prompt_tokens, u.completion_tokens)),
    })
}

/// Turn SSE payloads into decoded chunks, stopping at `[DONE]`.
fn chunk_stream<S>(payloads: S) -> ChunkStream
where
    S: Stream<Item = Result<String>> + Send + 'static,
{
    Box::pin(async_stream::stream! {
        let mut payloads = Box::pin(payloads);

        while let Some(payload) = payloads.next().await {
            let payload = match payload {
                Ok(payload) => payload,
                Err(err) => {
                    yield Err(err);
                    return;
                }
            };

            if payload == DONE_MARKER {
                break;
            }

            yield decode_stream_payload(&payload);
        }
    })
}

fn decode_stream_payload(payload: &str) -> Result<StreamChunk> {
    let chunk: GroqStreamChunk = serde_json::from_str(payload)?;

    if let Some(error) = chunk.error {
        return Err(LlmError::ProviderError(error.message));
    }

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .map(|choice| StreamChunk {
            content: choice.delta.content,
            finish_reason: choice.finish_reason,
        })
        .unwrap_or_default())
}

// Groq API types
#[derive(Debug, Serialize)]
struct GroqRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<&'a Vec<String>>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GroqResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<GroqChoice>,
    usage: Option<GroqUsage>,
}

#[derive(Debug, Deserialize)]
struct GroqChoice {
    message: GroqResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

#[derive(Debug, Deserialize)]
struct GroqStreamChunk {
    #[serde(default)]
    choices: Vec<GroqStreamChoice>,
    error: Option<GroqApiError>,
}

#[derive(Debug, Deserialize)]
struct GroqStreamChoice {
    #[serde(default)]
    delta: GroqDelta,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GroqDelta {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GroqApiError {
    message: String,
}
