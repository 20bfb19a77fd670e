//! Streaming errors.
//!
//! Only transport-level failures surface here. Malformed lines and payloads
//! are absorbed by the assembler and never become errors.

use thiserror::Error;

/// Boxed error from the underlying byte transport.
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while draining a reply stream.
#[derive(Debug, Error)]
pub enum StreamError {
    /// The byte transport failed (network error, reset, premature close).
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The caller abandoned the stream.
    #[error("Stream interrupted")]
    Interrupted,

    /// Invalid state.
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl StreamError {
    /// Wrap any transport error.
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Transport(Box::new(err))
    }

    /// Check if the failure came from the byte transport.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Io(_))
    }
}

/// Result type for streaming operations.
pub type StreamResult<T> = Result<T, StreamError>;
