//! Canonical chat messages sent to providers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Parse a role name, falling back to [`Role::User`] for anything unknown.
    ///
    /// Accepts the LangChain aliases `human` and `ai` as well.
    pub fn parse_lossy(role: &str) -> Self {
        match role.trim().to_ascii_lowercase().as_str() {
            "system" => Role::System,
            "assistant" | "ai" => Role::Assistant,
            _ => Role::User,
        }
    }

    /// Wire name of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single role/content pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_lossy() {
        assert_eq!(Role::parse_lossy("system"), Role::System);
        assert_eq!(Role::parse_lossy(" Assistant "), Role::Assistant);
        assert_eq!(Role::parse_lossy("ai"), Role::Assistant);
        assert_eq!(Role::parse_lossy("human"), Role::User);
        assert_eq!(Role::parse_lossy("tool"), Role::User);
        assert_eq!(Role::parse_lossy(""), Role::User);
    }

    #[test]
    fn test_message_serializes_lowercase_role() {
        let json = serde_json::to_value(ChatMessage::assistant("Hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "assistant", "content": "Hi"}));
    }
}
