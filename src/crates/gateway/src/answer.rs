//! Answer length modes for [`CompletionGateway::get_response`](crate::CompletionGateway::get_response).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How elaborate an answer should be.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Brief, 3-4 sentences.
    #[default]
    Specific,
    /// Comprehensive with examples, 10-12 sentences.
    Detailed,
}

impl AnswerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnswerMode::Specific => "specific",
            AnswerMode::Detailed => "detailed",
        }
    }

    /// System instruction for this mode.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a helpful assistant. \
             If 'specific', be brief and to-the-point and answer in 3-4 sentences.\
             If 'detailed', provide comprehensive, elaborate answers with examples in 10-12 sentences.\n\n\
             Respond in a {} manner.",
            self.as_str()
        )
    }
}

impl fmt::Display for AnswerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnswerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "specific" => Ok(AnswerMode::Specific),
            "detailed" => Ok(AnswerMode::Detailed),
            other => Err(format!("unknown answer mode: {} (expected specific or detailed)", other)),
        }
    }
}
