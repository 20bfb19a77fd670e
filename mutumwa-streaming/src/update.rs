//! Message-state updates emitted to the renderer.

use mutumwa_core::MessageId;
use serde::{Deserialize, Serialize};

/// A change to the assistant message being assembled.
///
/// Per stream the renderer sees at most one `Created`, then one `Updated`
/// per accepted payload carrying the full current text, then `Finalized`
/// when the stream ends cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageUpdate {
    /// The assistant bubble now exists (empty). Callers clear their
    /// "awaiting response" indicator here.
    Created {
        /// Message ID.
        id: MessageId,
    },
    /// The bubble's text changed.
    Updated {
        /// Message ID.
        id: MessageId,
        /// The full text after the change.
        text: String,
    },
    /// The stream ended; the text is final.
    Finalized {
        /// Message ID.
        id: MessageId,
    },
}

impl MessageUpdate {
    /// The message this update applies to.
    #[must_use]
    pub fn id(&self) -> &MessageId {
        match self {
            Self::Created { id } | Self::Updated { id, .. } | Self::Finalized { id } => id,
        }
    }

    /// The full text, for `Updated`.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Updated { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Check if this is the last update of a stream.
    #[must_use]
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Finalized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let id = MessageId::from("m-1");
        let update = MessageUpdate::Updated {
            id: id.clone(),
            text: "hi".into(),
        };
        assert_eq!(update.id(), &id);
        assert_eq!(update.text(), Some("hi"));
        assert!(!update.is_final());
        assert!(MessageUpdate::Finalized { id }.is_final());
    }

    #[test]
    fn test_serialization() {
        let update = MessageUpdate::Created {
            id: MessageId::from("m-1"),
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"type":"created","id":"m-1"}"#);

        let back: MessageUpdate =
            serde_json::from_str(r#"{"type":"updated","id":"m-1","text":"x"}"#).unwrap();
        assert_eq!(back.text(), Some("x"));
    }
}
