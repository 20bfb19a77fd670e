//! Webhook error types.

use mutumwa_core::CoreError;
use mutumwa_streaming::StreamError;
use std::time::Duration;
use thiserror::Error;

/// Errors from talking to a chat webhook.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The webhook answered with a non-success status.
    #[error("HTTP error! status: {status}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body.
        body: String,
    },

    /// The request (including reading the body) took too long.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Could not connect.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Network error while sending or receiving.
    #[error("Network error: {0}")]
    Network(String),

    /// The reply stream failed part-way.
    #[error(transparent)]
    Stream(#[from] StreamError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error from the core model (unknown domain, bad identifier).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Other error.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl WebhookError {
    /// Create an HTTP status error.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        Self::Http {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Map a `reqwest` error, reporting `timeout` if it was a timeout.
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            Self::http(status.as_u16(), err.to_string())
        } else if err.is_builder() {
            Self::Configuration(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    /// Check if this is a transport-level failure.
    ///
    /// Transport failures end the turn with the fallback reply; nothing is
    /// retried.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Http { .. } | Self::Timeout(_) | Self::Connection(_) | Self::Network(_) => true,
            Self::Stream(e) => e.is_transport(),
            _ => false,
        }
    }
}

/// Result type for webhook operations.
pub type WebhookResult<T> = Result<T, WebhookError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_display_matches_client_message() {
        let err = WebhookError::http(502, "Bad gateway");
        assert_eq!(err.to_string(), "HTTP error! status: 502");
        assert!(err.is_transport());
    }

    #[test]
    fn test_transport_classification() {
        assert!(WebhookError::Timeout(Duration::from_secs(5)).is_transport());
        assert!(WebhookError::Connection("refused".into()).is_transport());
        assert!(WebhookError::from(StreamError::transport(std::io::Error::other("eof"))).is_transport());

        assert!(!WebhookError::configuration("bad").is_transport());
        assert!(!WebhookError::from(StreamError::Interrupted).is_transport());
        assert!(!WebhookError::from(CoreError::UnknownDomain("x".into())).is_transport());
    }
}
