//! # iam-assist-runtime
//!
//! Optional interactive shell around `iam-assist-core`.
//!
//! The core responder is synchronous and pure. This crate adds what a chat
//! front end needs on top of it:
//! - a simulated typing delay ([`DelayedResponder`])
//! - explicit, serializable chat panel state ([`ChatState`]) driven by events
//! - a session driver that ties the two together ([`ChatSession`])
//! - YAML runtime configuration ([`RuntimeConfig`])
//!
//! ## Example
//!
//! ```rust,ignore
//! use iam_assist_core::ResponseGenerator;
//! use iam_assist_runtime::{ChatSession, DelayedResponder, RuntimeConfig};
//!
//! let config = RuntimeConfig::default();
//! let responder = DelayedResponder::new(ResponseGenerator::new(), config.typing_delay);
//! let mut session = ChatSession::new(responder, None, &config);
//!
//! let reply = session.send("What is IAM?").await?;
//! println!("[{}] {}", reply.time_label(), reply.text);
//! ```

pub mod config;
pub mod delay;
pub mod session;

pub use config::{ConfigError, RuntimeConfig, TypingDelay, DEFAULT_GREETING};
pub use delay::{AsyncResponder, DelayedResponder};
pub use session::{ChatEvent, ChatMessage, ChatSession, ChatState, Effect, Sender, SessionError};
