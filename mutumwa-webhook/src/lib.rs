//! # mutumwa-webhook
//!
//! Webhook client and chat turn driver for mutumwa.
//!
//! Each chat domain is served by its own webhook. A turn is posted as a
//! multipart form and answered with a streamed, newline-delimited JSON body
//! that `mutumwa-streaming` assembles into the assistant's reply.
//!
//! ## Core Concepts
//!
//! - **[`WebhookConfig`]**: timeout, user agent, default language and domains
//! - **[`TurnRequest`]**: the form fields of one turn
//! - **[`ReplySource`]**: opens the reply stream for a turn
//! - **[`WebhookClient`]**: the HTTP [`ReplySource`]
//! - **[`ChatTurn`]**: drives a turn into a conversation and the thread list
//! - **[`MockReplySource`]**: scripted replies for tests
//!
//! ## Example
//!
//! ```rust,ignore
//! use mutumwa_core::{Conversation, SessionId, ThreadList, UserId};
//! use mutumwa_webhook::{ChatTurn, WebhookClient, WebhookConfig};
//!
//! let config = WebhookConfig::from_env()?;
//! let client = WebhookClient::new(config.clone())?;
//! let domain = config.domains.resolve(Some("zesa"))?.clone();
//! let turn = ChatTurn::new(client, domain, UserId::new());
//!
//! let mut conversation = Conversation::new(SessionId::new());
//! let mut threads = ThreadList::new();
//! let outcome = turn
//!     .send(&mut conversation, &mut threads, "How do I buy tokens?", |update, _| {
//!         if let Some(text) = update.text() {
//!             println!("{text}");
//!         }
//!     })
//!     .await;
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod config;
pub mod error;
pub mod mock;
pub mod request;
pub mod turn;

// Re-exports
pub use client::{ReplyBody, ReplySource, WebhookClient, WebhookReplyStream};
pub use config::{WebhookConfig, ENV_LANGUAGE, ENV_TIMEOUT_SECS, ENV_WEBHOOK_BASE};
pub use error::{WebhookError, WebhookResult};
pub use mock::{MockReplySource, RecordedTurn};
pub use request::TurnRequest;
pub use turn::{apply_reply, apply_update, ChatTurn, TurnOutcome, TurnStatus, FALLBACK_REPLY};

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        ChatTurn, ReplySource, TurnOutcome, TurnRequest, TurnStatus, WebhookClient, WebhookConfig,
        WebhookError, WebhookResult,
    };
}
