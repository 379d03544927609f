//! The completion gateway.
//!
//! [`CompletionGateway`] sits between an application and a [`ChatModel`]. It
//! normalizes conversations, answers greetings from the canned table, relays
//! streamed completions and classifies prompts into agent categories.
//!
//! The user-facing operations never fail: remote errors are logged and turned
//! into a readable message (or `[general]` for routing). The `try_*`
//! variants expose the underlying [`GatewayError`] for callers that want to
//! alert on failures.
//!
//! # Example
//!
//! ```rust,ignore
//! use hpgpt_gateway::{CompletionGateway, Turn};
//! use futures::StreamExt;
//!
//! let gateway = CompletionGateway::from_env()?;
//! let turns = vec![
//!     Turn::system("You are HPGPT."),
//!     Turn::user("Summarise our refinery capacity."),
//! ];
//!
//! let mut fragments = gateway.complete_stream(&turns);
//! while let Some(fragment) = fragments.next().await {
//!     print!("{}", fragment);
//! }
//! ```

use crate::answer::AnswerMode;
use crate::canned::CannedResponses;
use crate::error::{GatewayError, Result};
use crate::routing::{classifier_messages, parse_categories, AgentCategory};
use crate::stream::{
    canned_stream, relay, stream_error_message, StreamPacing, TokenStream,
    EMPTY_RESPONSE_APOLOGY,
};
use crate::turn::{normalize, HistoryEntry, Turn};
use async_stream::stream;
use futures::StreamExt;
use hpgpt_llm::remote::GroqClient;
use hpgpt_llm::{ChatConfig, ChatMessage, ChatModel, ChatRequest};
use std::fmt;
use std::sync::Arc;
use tokio::time::{timeout, Instant};
use tracing::{debug, error, info, warn};

/// Result of [`CompletionGateway::complete`].
pub enum Completion {
    /// Whole answer (or an error message).
    Text(String),
    /// Incremental fragments.
    Stream(TokenStream),
}

impl Completion {
    /// Collapse into a single string, draining a stream if needed.
    pub async fn into_text(self) -> String {
        match self {
            Completion::Text(text) => text,
            Completion::Stream(fragments) => fragments.collect::<Vec<_>>().await.concat(),
        }
    }

    pub fn is_stream(&self) -> bool {
        matches!(self, Completion::Stream(_))
    }
}

impl fmt::Debug for Completion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Completion::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Completion::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Front door to the hosted model.
#[derive(Clone)]
pub struct CompletionGateway {
    model: Arc<dyn ChatModel>,
    canned: Arc<CannedResponses>,
    pacing: StreamPacing,
}

impl CompletionGateway {
    /// Create a gateway over any chat model, with the default canned table
    /// and pacing.
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self {
            model,
            canned: Arc::new(CannedResponses::default()),
            pacing: StreamPacing::default(),
        }
    }

    /// Create a gateway backed by Groq, configured from the environment.
    ///
    /// Fails when `GROQ_API_KEY` is missing.
    pub fn from_env() -> Result<Self> {
        let client = GroqClient::from_env().map_err(GatewayError::Config)?;
        Ok(Self::new(Arc::new(client)))
    }

    pub fn with_pacing(mut self, pacing: StreamPacing) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn with_canned_responses(mut self, canned: CannedResponses) -> Self {
        self.canned = Arc::new(canned);
        self
    }

    /// Identifier of the backing model.
    pub fn model_name(&self) -> &str {
        self.model.model_name()
    }

    /// Normalize a conversation into provider messages.
    pub fn normalize(&self, turns: &[Turn]) -> Vec<ChatMessage> {
        normalize(turns)
    }

    pub fn is_canned_greeting(&self, text: &str) -> bool {
        self.canned.is_canned_greeting(text)
    }

    pub fn canned_response(&self, text: &str) -> Option<&str> {
        self.canned.canned_response(text)
    }

    /// Canned answer for a conversation, if its last turn is a greeting.
    ///
    /// Only conversations with at least two turns qualify.
    fn canned_reply(&self, messages: &[ChatMessage]) -> Option<&str> {
        if messages.len() < 2 {
            return None;
        }
        let last = &messages[messages.len() - 1].content;
        if !self.canned.is_canned_greeting(last) {
            debug!("Not detected as greeting: {}", last);
            return None;
        }

        let reply = self.canned.canned_response(last);
        match reply {
            Some(_) => info!("Using canned response for: {}", last),
            None => warn!("No canned response found for greeting: {}", last),
        }
        reply
    }

    /// Stream an answer to `turns`.
    ///
    /// The stream never fails: errors become a final message fragment. The
    /// model is only contacted once the stream is first polled.
    pub fn complete_stream(&self, turns: &[Turn]) -> TokenStream {
        let messages = normalize(turns);

        if let Some(answer) = self.canned_reply(&messages) {
            return canned_stream(answer.to_string(), self.pacing.canned_word_delay);
        }

        let model = Arc::clone(&self.model);
        let pacing = self.pacing;

        Box::pin(stream! {
            let started = Instant::now();
            info!("Starting stream for {} messages", messages.len());
            let request = ChatRequest::new(messages).with_config(ChatConfig::conversational());

            let chunks = match timeout(pacing.stall_timeout, model.stream(request)).await {
                Ok(Ok(chunks)) => chunks,
                Ok(Err(err)) => {
                    error!("Streaming completion failed: {}", err);
                    yield stream_error_message(&err);
                    return;
                }
                Err(_) => {
                    warn!("No response within {:?}, giving up", pacing.stall_timeout);
                    yield EMPTY_RESPONSE_APOLOGY.to_string();
                    return;
                }
            };

            let mut fragments = relay(chunks, pacing, started);
            while let Some(fragment) = fragments.next().await {
                yield fragment;
            }
        })
    }

    /// Answer `turns`, streamed or buffered.
    pub async fn complete(&self, turns: &[Turn], stream: bool) -> Completion {
        if stream {
            Completion::Stream(self.complete_stream(turns))
        } else {
            Completion::Text(self.complete_text(turns).await)
        }
    }

    /// Buffered answer to `turns`; failures come back as an error message.
    pub async fn complete_text(&self, turns: &[Turn]) -> String {
        match self.try_complete_text(turns).await {
            Ok(text) => text,
            Err(err) => {
                error!("Completion request failed: {}", err);
                format!("I encountered an error: {}. Please try again.", err)
            }
        }
    }

    /// Buffered answer to `turns`, surfacing failures.
    pub async fn try_complete_text(&self, turns: &[Turn]) -> Result<String> {
        let messages = normalize(turns);
        debug!("Sending {} messages to {}", messages.len(), self.model_name());

        if let Some(answer) = self.canned_reply(&messages) {
            return Ok(answer.to_string());
        }

        let request = ChatRequest::new(messages).with_config(ChatConfig::conversational());
        let response = self.model.chat(request).await?;
        debug!("Buffered response: {} characters", response.content.len());

        Ok(response.content)
    }

    /// Classify `prompt` into agent categories. Falls back to `[general]`.
    pub async fn route_agent_type(
        &self,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Vec<AgentCategory> {
        match self.try_route_agent_type(prompt, history).await {
            Ok(categories) => {
                info!("Routed to: {:?}", categories);
                categories
            }
            Err(err) => {
                error!("Routing classification failed: {}", err);
                vec![AgentCategory::General]
            }
        }
    }

    /// Classify `prompt`, surfacing remote failures. An answer naming no
    /// known category yields `[general]`.
    pub async fn try_route_agent_type(
        &self,
        prompt: &str,
        history: &[HistoryEntry],
    ) -> Result<Vec<AgentCategory>> {
        let messages = classifier_messages(prompt, history);
        info!("Routing classification requested for prompt: {}", prompt);
        debug!("Classification input:\n{}", messages[0].content);

        let request = ChatRequest::new(messages).with_config(ChatConfig::classifier());
        let response = self.model.chat(request).await?;
        debug!("Classifier answered: {}", response.content.trim());

        Ok(parse_categories(&response.content))
    }

    /// Answer `prompt` in the light of `history`, at the requested length.
    pub async fn get_response(
        &self,
        prompt: &str,
        history: &[HistoryEntry],
        answer_mode: AnswerMode,
    ) -> String {
        let mut turns = Vec::with_capacity(history.len() + 2);
        turns.push(Turn::system(answer_mode.system_prompt()));
        turns.extend(history.iter().map(Turn::from));
        turns.push(Turn::user(prompt));

        self.complete_text(&turns).await
    }
}
