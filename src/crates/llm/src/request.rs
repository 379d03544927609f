//! Request types for chat models.
//!
//! A [`ChatRequest`] bundles the conversation with a [`ChatConfig`] of
//! generation parameters. Two presets cover everything the gateway sends:
//! [`ChatConfig::conversational`] for answers and [`ChatConfig::classifier`]
//! for short deterministic labels.

use crate::message::ChatMessage;

/// A request to a chat model containing messages and configuration.
///
/// # Example
///
/// ```rust
/// use hpgpt_llm::{ChatMessage, ChatRequest};
///
/// let request = ChatRequest::new(vec![
///     ChatMessage::system("You are a helpful assistant"),
///     ChatMessage::user("What is the capital of France?"),
/// ])
/// .with_temperature(0.7)
/// .with_max_tokens(1000);
///
/// assert_eq!(request.config.max_tokens, Some(1000));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// The conversation messages to send to the model.
    pub messages: Vec<ChatMessage>,

    /// Generation parameters.
    pub config: ChatConfig,
}

impl ChatRequest {
    /// Create a new chat request with default (provider-chosen) parameters.
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    /// Set top-p (nucleus) sampling.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.config.top_p = Some(top_p);
        self
    }

    /// Set frequency penalty.
    pub fn with_frequency_penalty(mut self, penalty: f32) -> Self {
        self.config.frequency_penalty = Some(penalty);
        self
    }

    /// Set presence penalty.
    pub fn with_presence_penalty(mut self, penalty: f32) -> Self {
        self.config.presence_penalty = Some(penalty);
        self
    }

    /// Add stop sequences that halt generation.
    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.config.stop_sequences = sequences;
        self
    }
}

/// Generation parameters. `None` leaves the provider default in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatConfig {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub top_p: Option<f32>,
    pub frequency_penalty: Option<f32>,
    pub presence_penalty: Option<f32>,
    /// Empty means no explicit stop sequence.
    pub stop_sequences: Vec<String>,
}

impl ChatConfig {
    /// Parameters for answering a conversation.
    pub fn conversational() -> Self {
        Self {
            temperature: Some(0.7),
            max_tokens: Some(8192),
            top_p: Some(0.9),
            frequency_penalty: Some(0.0),
            presence_penalty: Some(0.0),
            stop_sequences: Vec::new(),
        }
    }

    /// Deterministic, short-output parameters for labelling a prompt.
    pub fn classifier() -> Self {
        Self {
            temperature: Some(0.0),
            max_tokens: Some(20),
            top_p: Some(1.0),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_fields() {
        let request = ChatRequest::new(vec![ChatMessage::user("hi")])
            .with_temperature(0.2)
            .with_max_tokens(64)
            .with_top_p(0.5)
            .with_frequency_penalty(0.1)
            .with_presence_penalty(0.3)
            .with_stop_sequences(vec!["END".to_string()]);

        assert_eq!(request.config.temperature, Some(0.2));
        assert_eq!(request.config.max_tokens, Some(64));
        assert_eq!(request.config.top_p, Some(0.5));
        assert_eq!(request.config.frequency_penalty, Some(0.1));
        assert_eq!(request.config.presence_penalty, Some(0.3));
        assert_eq!(request.config.stop_sequences, vec!["END".to_string()]);
    }

    #[test]
    fn test_presets() {
        let chat = ChatConfig::conversational();
        assert_eq!(chat.temperature, Some(0.7));
        assert_eq!(chat.max_tokens, Some(8192));
        assert_eq!(chat.top_p, Some(0.9));
        assert_eq!(chat.frequency_penalty, Some(0.0));
        assert!(chat.stop_sequences.is_empty());

        let classify = ChatConfig::classifier();
        assert_eq!(classify.temperature, Some(0.0));
        assert_eq!(classify.max_tokens, Some(20));
        assert_eq!(classify.top_p, Some(1.0));
        assert_eq!(classify.presence_penalty, None);
    }
}
