//! Message-state reducer.
//!
//! Folds the content payloads of one stream into a single assistant message.
//! A payload either extends the text or, when it is a JSON object with a
//! non-empty `output`, replaces it wholesale. Operations apply strictly in
//! arrival order: a replacement discards everything before it, and later
//! appends extend the replaced text.

use mutumwa_core::MessageId;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::update::MessageUpdate;

/// How a content payload changes the message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadAction<'a> {
    /// Append the raw payload.
    Append(&'a str),
    /// Replace the whole text.
    Replace(String),
}

/// Text of a truthy `output` value.
///
/// Non-empty strings, non-zero numbers, `true`, arrays and objects count;
/// `null`, `false`, `0` and `""` do not. Strings are used as-is, anything
/// else as its JSON text.
fn output_text(output: &JsonValue) -> Option<String> {
    match output {
        JsonValue::Null | JsonValue::Bool(false) => None,
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Decide how a payload applies.
///
/// A payload whose trimmed form is `{...}` is tried as JSON; a truthy
/// `output` field makes it a replacement. Anything else, including a
/// payload that merely looks like JSON, is appended verbatim.
#[must_use]
pub fn interpret_payload(payload: &str) -> PayloadAction<'_> {
    let trimmed = payload.trim();
    if !(trimmed.starts_with('{') && trimmed.ends_with('}')) {
        return PayloadAction::Append(payload);
    }

    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(value) => match value.get("output").and_then(output_text) {
            Some(output) => PayloadAction::Replace(output),
            None => {
                tracing::debug!("object payload without output, appending verbatim");
                PayloadAction::Append(payload)
            }
        },
        Err(e) => {
            tracing::debug!(error = %e, "object-shaped payload is not JSON, appending verbatim");
            PayloadAction::Append(payload)
        }
    }
}

/// The assistant message built from one stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledMessage {
    /// Message ID.
    pub id: MessageId,
    /// Current text.
    pub text: String,
    /// Whether the stream has ended.
    pub is_final: bool,
}

impl AssembledMessage {
    fn new(id: MessageId) -> Self {
        Self {
            id,
            text: String::new(),
            is_final: false,
        }
    }
}

/// Lifecycle of a [`MessageReducer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReducerState {
    /// No content accepted yet; no message exists.
    Uninitialized,
    /// The message exists and is growing.
    Accumulating,
    /// The stream ended.
    Terminal,
}

/// Builds at most one [`AssembledMessage`] per stream.
#[derive(Debug, Clone)]
pub struct MessageReducer {
    state: ReducerState,
    message: Option<AssembledMessage>,
    preset_id: Option<MessageId>,
}

impl Default for MessageReducer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageReducer {
    /// Create a reducer that generates the message ID on creation.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: ReducerState::Uninitialized,
            message: None,
            preset_id: None,
        }
    }

    /// Create a reducer whose message will use the given ID.
    #[must_use]
    pub fn with_message_id(id: MessageId) -> Self {
        Self {
            preset_id: Some(id),
            ..Self::new()
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ReducerState {
        self.state
    }

    /// The message, once created.
    #[must_use]
    pub fn message(&self) -> Option<&AssembledMessage> {
        self.message.as_ref()
    }

    /// The current text, once created.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message.as_ref().map(|m| m.text.as_str())
    }

    /// Apply one accepted content payload.
    ///
    /// The first payload yields `Created` followed by `Updated`; later ones
    /// yield a single `Updated`. After [`finish`](Self::finish) payloads are
    /// ignored.
    pub fn apply(&mut self, content: &str) -> Vec<MessageUpdate> {
        let mut updates = Vec::with_capacity(2);

        match self.state {
            ReducerState::Terminal => {
                tracing::debug!("payload after stream end ignored");
                return updates;
            }
            ReducerState::Uninitialized => {
                let id = self.preset_id.take().unwrap_or_default();
                tracing::debug!(message_id = %id, "assistant message created");
                updates.push(MessageUpdate::Created { id: id.clone() });
                self.message = Some(AssembledMessage::new(id));
                self.state = ReducerState::Accumulating;
            }
            ReducerState::Accumulating => {}
        }

        let Some(message) = self.message.as_mut() else {
            return updates;
        };

        match interpret_payload(content) {
            PayloadAction::Append(text) => message.text.push_str(text),
            PayloadAction::Replace(text) => {
                tracing::debug!(message_id = %message.id, "text replaced by consolidated output");
                message.text = text;
            }
        }

        updates.push(MessageUpdate::Updated {
            id: message.id.clone(),
            text: message.text.clone(),
        });
        updates
    }

    /// End the stream. Emits `Finalized` if a message was created.
    pub fn finish(&mut self) -> Option<MessageUpdate> {
        if self.state == ReducerState::Terminal {
            return None;
        }
        self.state = ReducerState::Terminal;

        let message = self.message.as_mut()?;
        message.is_final = true;
        Some(MessageUpdate::Finalized {
            id: message.id.clone(),
        })
    }

    /// Consume the reducer, returning the message if one was created.
    #[must_use]
    pub fn into_message(self) -> Option<AssembledMessage> {
        self.message
    }
}
