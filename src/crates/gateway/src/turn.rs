//! Conversation turns and their normalization.
//!
//! Callers hand the gateway conversations in a few shapes: tagged
//! system/human/AI messages, plain role/content records, or arbitrary JSON
//! from a web layer. [`Turn`] closes over those shapes and [`normalize`] maps
//! every one of them onto a provider-ready [`ChatMessage`].

use hpgpt_llm::{ChatMessage, Role};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One conversation turn as supplied by a caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Turn {
    System { content: String },
    User { content: String },
    Assistant { content: String },
    /// A loose role/content pair; unknown roles become `user`.
    RawPair { role: String, content: String },
}

impl Turn {
    pub fn system(content: impl Into<String>) -> Self {
        Turn::System {
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Turn::User {
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::Assistant {
            content: content.into(),
        }
    }

    pub fn raw(role: impl Into<String>, content: impl Into<String>) -> Self {
        Turn::RawPair {
            role: role.into(),
            content: content.into(),
        }
    }

    /// Interpret an arbitrary JSON value as a turn.
    ///
    /// - `{"type": "system" | "human" | "ai", "content": ...}` (LangChain's
    ///   serialized messages) map to the tagged variants;
    /// - `{"role": ..., "content": ...}` maps to [`Turn::RawPair`];
    /// - anything else becomes a user turn holding the value's text.
    pub fn from_value(value: Value) -> Self {
        if let Value::Object(map) = &value {
            let content = map.get("content").map(text_of);

            if let (Some(Value::String(kind)), Some(content)) = (map.get("type"), &content) {
                match kind.as_str() {
                    "system" => return Turn::system(content.clone()),
                    "human" | "user" => return Turn::user(content.clone()),
                    "ai" | "assistant" => return Turn::assistant(content.clone()),
                    _ => {}
                }
            }

            if let (Some(role), Some(content)) = (map.get("role"), content) {
                return Turn::raw(text_of(role), content);
            }
        }

        Turn::user(text_of(&value))
    }

    /// Normalize this turn into a role/content pair.
    pub fn to_message(&self) -> ChatMessage {
        match self {
            Turn::System { content } => ChatMessage::system(content.clone()),
            Turn::User { content } => ChatMessage::user(content.clone()),
            Turn::Assistant { content } => ChatMessage::assistant(content.clone()),
            Turn::RawPair { role, content } => {
                ChatMessage::new(Role::parse_lossy(role), content.clone())
            }
        }
    }
}

impl From<ChatMessage> for Turn {
    fn from(message: ChatMessage) -> Self {
        Turn::raw(message.role.as_str(), message.content)
    }
}

impl From<&str> for Turn {
    fn from(text: &str) -> Self {
        Turn::user(text)
    }
}

impl From<String> for Turn {
    fn from(text: String) -> Self {
        Turn::user(text)
    }
}

impl From<Value> for Turn {
    fn from(value: Value) -> Self {
        Turn::from_value(value)
    }
}

/// Normalize a conversation, preserving order. Never drops a turn.
pub fn normalize(turns: &[Turn]) -> Vec<ChatMessage> {
    turns.iter().map(Turn::to_message).collect()
}

/// A history record as received from a web layer.
///
/// Both fields are optional on the wire; a missing role means `user` and a
/// missing content means the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

impl HistoryEntry {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            content: Some(content.into()),
        }
    }

    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or("user")
    }

    pub fn content(&self) -> &str {
        self.content.as_deref().unwrap_or_default()
    }
}

impl From<&HistoryEntry> for Turn {
    fn from(entry: &HistoryEntry) -> Self {
        Turn::raw(entry.role(), entry.content())
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_tagged_variants() {
        let turns = vec![
            Turn::system("be brief"),
            Turn::user("hi"),
            Turn::assistant("hello"),
        ];

        assert_eq!(
            normalize(&turns),
            vec![
                ChatMessage::system("be brief"),
                ChatMessage::user("hi"),
                ChatMessage::assistant("hello"),
            ]
        );
    }

    #[test]
    fn test_raw_pair_unknown_role_defaults_to_user() {
        let messages = normalize(&[Turn::raw("tool", "output"), Turn::raw("ASSISTANT", "ok")]);
        assert_eq!(messages[0], ChatMessage::user("output"));
        assert_eq!(messages[1], ChatMessage::assistant("ok"));
    }

    #[test]
    fn test_from_value_shapes() {
        assert_eq!(
            Turn::from_value(json!({"type": "human", "content": "hi"})),
            Turn::user("hi")
        );
        assert_eq!(
            Turn::from_value(json!({"type": "ai", "content": "hello"})),
            Turn::assistant("hello")
        );
        assert_eq!(
            Turn::from_value(json!({"type": "system", "content": "rules"})),
            Turn::system("rules")
        );
        assert_eq!(
            Turn::from_value(json!({"role": "assistant", "content": "sure"})),
            Turn::raw("assistant", "sure")
        );
        assert_eq!(Turn::from_value(json!("plain text")), Turn::user("plain text"));
        assert_eq!(Turn::from_value(json!(42)), Turn::user("42"));
        assert_eq!(
            Turn::from_value(json!({"foo": "bar"})),
            Turn::user(r#"{"foo":"bar"}"#)
        );
    }

    #[test]
    fn test_normalize_preserves_order_and_length() {
        let values = vec![
            json!({"role": "system", "content": "s"}),
            json!(null),
            json!({"type": "ai", "content": "a"}),
            json!(["list"]),
        ];
        let turns: Vec<Turn> = values.into_iter().map(Turn::from).collect();
        let messages = normalize(&turns);

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(messages[1], ChatMessage::user("null"));
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[3], ChatMessage::user(r#"["list"]"#));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let turns = vec![
            Turn::system("s"),
            Turn::raw("weird", "w"),
            Turn::from_value(json!({"type": "ai", "content": "a"})),
        ];
        let once = normalize(&turns);
        let again: Vec<Turn> = once.iter().cloned().map(Turn::from).collect();

        assert_eq!(normalize(&again), once);
    }

    #[test]
    fn test_history_entry_defaults() {
        let entry: HistoryEntry = serde_json::from_value(json!({"content": "hey"})).unwrap();
        assert_eq!(entry.role(), "user");
        assert_eq!(entry.content(), "hey");

        let empty = HistoryEntry::default();
        assert_eq!(Turn::from(&empty).to_message(), ChatMessage::user(""));
    }
}
