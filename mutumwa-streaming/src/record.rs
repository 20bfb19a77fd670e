//! Event record classification.
//!
//! Each line of the reply stream is expected to be a JSON object. Only
//! `{"type": "item", "content": "<non-empty string>"}` carries reply text;
//! everything else (heartbeats, lifecycle events, unknown types) is noise
//! the upstream is free to add.

use serde_json::Value as JsonValue;

/// Record type that carries reply content.
pub const ITEM_TYPE: &str = "item";

/// A parsed line of the reply stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventRecord {
    /// An actionable content record.
    Item {
        /// The content payload, never empty.
        content: String,
    },
    /// Valid JSON of any other shape.
    Other {
        /// The `type` field, if it was a string.
        kind: Option<String>,
    },
}

impl EventRecord {
    /// Classify a parsed JSON value.
    #[must_use]
    pub fn from_value(value: &JsonValue) -> Self {
        let kind = value.get("type").and_then(JsonValue::as_str);
        let content = value.get("content").and_then(JsonValue::as_str);

        match (kind, content) {
            (Some(ITEM_TYPE), Some(content)) if !content.is_empty() => Self::Item {
                content: content.to_string(),
            },
            _ => Self::Other {
                kind: kind.map(str::to_string),
            },
        }
    }

    /// The content payload of an item record.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        match self {
            Self::Item { content } => Some(content),
            Self::Other { .. } => None,
        }
    }

    /// Consume the record, keeping the payload of an item record.
    #[must_use]
    pub fn into_content(self) -> Option<String> {
        match self {
            Self::Item { content } => Some(content),
            Self::Other { .. } => None,
        }
    }

    /// Check if this record carries reply content.
    #[must_use]
    pub fn is_item(&self) -> bool {
        matches!(self, Self::Item { .. })
    }
}

/// Outcome of classifying one framed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineClass {
    /// Empty or whitespace-only line.
    Blank,
    /// Not valid JSON.
    Malformed,
    /// A parsed record.
    Record(EventRecord),
}

/// Classify a framed line. Never fails: bad input maps to
/// [`LineClass::Blank`] or [`LineClass::Malformed`].
#[must_use]
pub fn classify_line(line: &str) -> LineClass {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineClass::Blank;
    }

    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(value) => LineClass::Record(EventRecord::from_value(&value)),
        Err(e) => {
            tracing::warn!(error = %e, line = trimmed, "Failed to parse streaming line");
            LineClass::Malformed
        }
    }
}
