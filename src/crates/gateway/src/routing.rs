//! Prompt-to-agent classification.
//!
//! The gateway asks the model itself which downstream agents a prompt needs.
//! This module owns the category set, the classifier prompt and the parsing
//! of the model's comma-separated answer.

use crate::turn::HistoryEntry;
use hpgpt_llm::ChatMessage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// How many trailing history turns the classifier sees.
pub const ROUTING_HISTORY_TURNS: usize = 4;

/// Downstream agent a prompt can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentCategory {
    Coding,
    Analytics,
    Websearch,
    Document,
    General,
}

impl AgentCategory {
    /// Every category, in declaration order.
    pub const ALL: [AgentCategory; 5] = [
        AgentCategory::Coding,
        AgentCategory::Analytics,
        AgentCategory::Websearch,
        AgentCategory::Document,
        AgentCategory::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgentCategory::Coding => "coding",
            AgentCategory::Analytics => "analytics",
            AgentCategory::Websearch => "websearch",
            AgentCategory::Document => "document",
            AgentCategory::General => "general",
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AgentCategory::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown agent category: {}", s))
    }
}

/// Build the classifier conversation for `prompt`.
///
/// The system turn lists the specialised agents, asks for a bare
/// comma-separated answer and embeds the last few history turns as
/// `- ROLE: content` lines.
pub fn classifier_messages(prompt: &str, history: &[HistoryEntry]) -> Vec<ChatMessage> {
    let start = history.len().saturating_sub(ROUTING_HISTORY_TURNS);
    let context = history[start..]
        .iter()
        .map(|entry| format!("- {}: {}", entry.role().to_uppercase(), entry.content().trim()))
        .collect::<Vec<_>>()
        .join("\n");

    let agents = AgentCategory::ALL
        .iter()
        .filter(|category| **category != AgentCategory::General)
        .map(|category| format!("'{}'", category))
        .collect::<Vec<_>>()
        .join(", ");

    let system_prompt = format!(
        "You are an intelligent classifier for a multi-agent AI system.\n\
         Given the user's prompt and recent conversation, your task is to identify **all applicable agents** required to answer the prompt.\n\n\
         Available agents: {agents}.\n\
         If none apply, respond with 'general'.\n\n\
         Return a **comma-separated list** of agents that should be invoked for this task.\n\
         Only return agent types, with no explanation or extra text.\n\n\
         Conversation History:\n{context}"
    );

    vec![ChatMessage::system(system_prompt), ChatMessage::user(prompt)]
}

/// Categories named in the classifier's answer, without any fallback.
///
/// Tokens are lower-cased, split on commas and trimmed; unknown tokens are
/// dropped and duplicates kept.
pub fn recognized_categories(answer: &str) -> Vec<AgentCategory> {
    answer
        .trim()
        .to_lowercase()
        .split(',')
        .filter_map(|token| token.trim().parse().ok())
        .collect()
}

/// Parse the classifier's answer, falling back to `[general]` when nothing
/// is recognised.
pub fn parse_categories(answer: &str) -> Vec<AgentCategory> {
    let categories = recognized_categories(answer);
    if categories.is_empty() {
        warn!("No valid agent in classifier answer, falling back to general");
        vec![AgentCategory::General]
    } else {
        categories
    }
}
