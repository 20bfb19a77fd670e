//! Error types for mutumwa-core.

use thiserror::Error;

/// Errors raised by core model operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A domain value that is not in the registry.
    #[error("Unknown domain: {0}")]
    UnknownDomain(String),

    /// A string that is not a valid identifier of the given kind.
    #[error("Invalid {kind} identifier: {value}")]
    InvalidIdentifier {
        /// What the identifier was supposed to name.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// No message with the given ID exists in the conversation.
    #[error("Message not found: {0}")]
    MessageNotFound(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
