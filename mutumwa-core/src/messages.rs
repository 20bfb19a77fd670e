//! Chat messages and the in-memory conversation transcript.
//!
//! A [`Conversation`] is the ordered list of bubbles shown for one session.
//! The streaming turn driver pushes the user message, then creates and
//! updates the assistant bubble in place as updates arrive.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{CoreError, Result};
use crate::identifier::{now_utc, MessageId, SessionId};

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The person chatting.
    User,
    /// The webhook-backed assistant.
    Assistant,
}

impl Sender {
    /// Wire name of the sender.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// A single chat bubble.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message ID.
    pub id: MessageId,
    /// Rendered text.
    pub text: String,
    /// Author.
    pub sender: Sender,
    /// When the bubble was created.
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a message with a fresh ID.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self::with_id(MessageId::new(), sender, text)
    }

    /// Create a message with a known ID.
    pub fn with_id(id: MessageId, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            sender,
            timestamp: now_utc(),
        }
    }

    /// Create a user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text)
    }

    /// Create an assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Sender::Assistant, text)
    }

    /// Check if the message was written by the user.
    #[must_use]
    pub fn is_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// Ordered transcript of one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    session_id: SessionId,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Create an empty conversation for a session.
    pub fn new(session_id: SessionId) -> Self {
        Self {
            session_id,
            messages: Vec::new(),
        }
    }

    /// Rebuild a conversation from previously loaded messages.
    pub fn from_messages(session_id: SessionId, messages: Vec<ChatMessage>) -> Self {
        Self {
            session_id,
            messages,
        }
    }

    /// The session this transcript belongs to.
    #[must_use]
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// All messages in display order.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if no message has been sent yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Look up a message by ID.
    #[must_use]
    pub fn get(&self, id: &MessageId) -> Option<&ChatMessage> {
        self.messages.iter().find(|m| &m.id == id)
    }

    /// Replace the text of an existing message.
    pub fn set_text(&mut self, id: &MessageId, text: impl Into<String>) -> Result<()> {
        let message = self
            .messages
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| CoreError::MessageNotFound(id.to_string()))?;
        message.text = text.into();
        Ok(())
    }

    /// The most recent message, if any.
    #[must_use]
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
