//! ID generation utilities.
//!
//! Sessions, users and messages are all identified by UUID v4 strings. The
//! wrappers here keep them from being mixed up at call sites.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;

/// Generate a raw UUID v4 string (hyphenated, no prefix).
///
/// # Example
///
/// ```rust
/// use mutumwa_core::identifier::generate_uuid;
///
/// let id = generate_uuid();
/// assert_eq!(id.len(), 36);
/// ```
#[must_use]
pub fn generate_uuid() -> String {
    Uuid::new_v4().to_string()
}

/// Get the current UTC timestamp.
#[must_use]
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

macro_rules! uuid_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh random ID.
            #[must_use]
            pub fn new() -> Self {
                Self(generate_uuid())
            }

            /// Wrap an existing string without validation.
            #[must_use]
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Parse and validate a UUID string.
            pub fn parse(s: &str) -> Result<Self, CoreError> {
                Uuid::parse_str(s.trim())
                    .map(|uuid| Self(uuid.to_string()))
                    .map_err(|_| CoreError::InvalidIdentifier {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

uuid_id!(
    /// Identifier of a persisted conversation thread.
    SessionId,
    "session"
);

uuid_id!(
    /// Identifier of the person chatting; sent to the webhook with every turn.
    UserId,
    "user"
);

uuid_id!(
    /// Identifier of a single chat bubble.
    MessageId,
    "message"
);
