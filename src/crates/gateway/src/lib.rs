//! # HPGPT Gateway
//!
//! Thin layer between the HPGPT application and a hosted chat model.
//!
//! ## Features
//!
//! - **Conversation normalization** - typed, role-tagged and free-form turns
//!   become provider messages
//! - **Canned greetings** - short greetings are answered locally, streamed
//!   word by word, without a remote call
//! - **Streaming relay** - provider fragments are forwarded as they arrive,
//!   with a stall timeout and a closing apology for empty answers
//! - **Agent routing** - prompts are classified into `coding`, `analytics`,
//!   `websearch`, `document` or `general`
//! - **Never-failing surface** - remote failures become readable messages;
//!   `try_*` variants expose [`GatewayError`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hpgpt_gateway::{AnswerMode, CompletionGateway, HistoryEntry};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let gateway = CompletionGateway::from_env()?;
//!
//! let history = vec![HistoryEntry::new("user", "What does HPCL refine?")];
//! let agents = gateway.route_agent_type("Plot last quarter's sales", &history).await;
//! let answer = gateway
//!     .get_response("What is LPG?", &history, AnswerMode::Specific)
//!     .await;
//!
//! println!("{:?}: {}", agents, answer);
//! # Ok(())
//! # }
//! ```

pub mod answer;
pub mod canned;
pub mod error;
pub mod gateway;
pub mod routing;
pub mod stream;
pub mod testing;
pub mod turn;

pub use answer::AnswerMode;
pub use canned::{normalize_greeting, CannedResponses};
pub use error::{GatewayError, Result};
pub use gateway::{Completion, CompletionGateway};
pub use routing::AgentCategory;
pub use stream::{StreamPacing, TokenStream};
pub use turn::{normalize, HistoryEntry, Turn};
