//! Chat UI state.
//!
//! All visual state of the chat panel (open/closed, typing indicator, draft
//! input, transcript) lives in one serializable [`ChatState`] that only
//! changes through [`ChatState::update`]. The transcript is display state:
//! it is never passed to the responder.

use chrono::{DateTime, Utc};
use iam_assist_core::{Context, RuleId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::RuntimeConfig;
use crate::delay::AsyncResponder;

/// Errors from chat state transitions.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Cannot send an empty message")]
    EmptyMessage,

    #[error("A reply is already pending")]
    Busy,

    #[error("No reply was pending")]
    UnexpectedReply,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,

    /// Rule that produced a bot reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<RuleId>,
}

impl ChatMessage {
    pub fn is_bot(&self) -> bool {
        self.sender == Sender::Bot
    }

    /// 24-hour "HH:MM" label.
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }
}

/// Inputs to the chat state machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// Chat button pressed
    Toggle,

    Close,

    /// Input box contents changed
    Edit { draft: String },

    /// Send the current draft
    Submit,

    /// The responder produced a reply
    ReplyReady { text: String, rule: Option<RuleId> },
}

/// Work the shell must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Ask the responder, then feed the result back as `ReplyReady`
    Respond { message: String },
}

/// Complete chat panel state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatState {
    pub open: bool,
    pub typing: bool,
    pub draft: String,
    pub messages: Vec<ChatMessage>,

    /// Badge naming the account in context (e.g. "svc-usr123")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_label: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcript_limit: Option<usize>,

    next_id: u64,
}

impl ChatState {
    /// New closed session opening with the configured greeting.
    pub fn new(config: &RuntimeConfig, now: DateTime<Utc>) -> Self {
        let mut state = Self {
            open: false,
            typing: false,
            draft: String::new(),
            messages: Vec::new(),
            context_label: None,
            transcript_limit: config.transcript_limit,
            next_id: 1,
        };
        state.push(Sender::Bot, config.greeting.clone(), None, now);
        state
    }

    pub fn with_context_label(mut self, label: impl Into<String>) -> Self {
        self.context_label = Some(label.into());
        self
    }

    /// Whether a submit would be accepted right now.
    pub fn can_submit(&self) -> bool {
        !self.typing && !self.draft.trim().is_empty()
    }

    /// Apply one event.
    pub fn update(&mut self, event: ChatEvent, now: DateTime<Utc>) -> Result<Option<Effect>, SessionError> {
        match event {
            ChatEvent::Toggle => {
                self.open = !self.open;
                Ok(None)
            }
            ChatEvent::Close => {
                self.open = false;
                Ok(None)
            }
            ChatEvent::Edit { draft } => {
                self.draft = draft;
                Ok(None)
            }
            ChatEvent::Submit => {
                if self.typing {
                    return Err(SessionError::Busy);
                }
                let message = self.draft.trim().to_string();
                if message.is_empty() {
                    return Err(SessionError::EmptyMessage);
                }

                self.draft.clear();
                self.typing = true;
                self.push(Sender::User, message.clone(), None, now);
                Ok(Some(Effect::Respond { message }))
            }
            ChatEvent::ReplyReady { text, rule } => {
                if !self.typing {
                    return Err(SessionError::UnexpectedReply);
                }
                self.typing = false;
                self.push(Sender::Bot, text, rule, now);
                Ok(None)
            }
        }
    }

    fn push(&mut self, sender: Sender, text: String, rule: Option<RuleId>, now: DateTime<Utc>) {
        self.messages.push(ChatMessage {
            id: self.next_id,
            text,
            sender,
            timestamp: now,
            rule,
        });
        self.next_id += 1;

        // The newest message always survives trimming.
        if let Some(limit) = self.transcript_limit {
            let excess = self.messages.len().saturating_sub(limit.max(1));
            if excess > 0 {
                self.messages.drain(..excess);
            }
        }
    }
}

/// Drives a [`ChatState`] against a responder and a fixed context.
pub struct ChatSession<R> {
    state: ChatState,
    responder: R,
    context: Option<Context>,
}

impl<R: AsyncResponder> ChatSession<R> {
    pub fn new(responder: R, context: Option<Context>, config: &RuntimeConfig) -> Self {
        let mut state = ChatState::new(config, Utc::now());
        if let Some(id) = context.as_ref().and_then(|c| c.account_id.clone()) {
            state = state.with_context_label(id);
        }

        Self {
            state,
            responder,
            context,
        }
    }

    pub fn state(&self) -> &ChatState {
        &self.state
    }

    pub fn context(&self) -> Option<&Context> {
        self.context.as_ref()
    }

    /// Send one message and wait for the reply.
    pub async fn send(&mut self, text: &str) -> Result<&ChatMessage, SessionError> {
        if text.trim().is_empty() {
            return Err(SessionError::EmptyMessage);
        }
        self.state.update(ChatEvent::Edit { draft: text.to_string() }, Utc::now())?;

        let effect = self.state.update(ChatEvent::Submit, Utc::now())?;
        if let Some(Effect::Respond { message }) = effect {
            let reply = self.responder.reply(&message, self.context.as_ref()).await;
            tracing::info!(rule = %reply.rule, "Assistant replied");
            self.state.update(
                ChatEvent::ReplyReady {
                    text: reply.text,
                    rule: Some(reply.rule),
                },
                Utc::now(),
            )?;
        }

        self.state.messages.last().ok_or(SessionError::UnexpectedReply)
    }
}
