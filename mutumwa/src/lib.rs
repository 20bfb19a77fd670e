//! # Mutumwa - Multilingual Domain Chat Client
//!
//! Mutumwa talks to domain-specific chat webhooks (general questions, ZESA
//! electricity, PRAZ procurement) and renders their streamed replies as they
//! arrive, in the language the user picks.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mutumwa::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = WebhookConfig::from_env()?;
//!     let domain = config.domains.resolve(Some("general"))?.clone();
//!     let turn = ChatTurn::new(WebhookClient::new(config)?, domain, UserId::new())
//!         .with_language(Language::new("shona"));
//!
//!     let mut conversation = Conversation::new(SessionId::new());
//!     let mut threads = ThreadList::new();
//!     let mut printer = ReplyPrinter::new();
//!     turn.send(&mut conversation, &mut threads, "Mhoro!", |update, _| {
//!         let _ = printer.write(update, &mut std::io::stdout());
//!     })
//!     .await;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! - [`mutumwa_core`] - Identifiers, messages, threads, domains, working memory
//! - [`mutumwa_streaming`] - Assembly of streamed NDJSON replies
//! - [`mutumwa_webhook`] - Webhook client and turn driver
//!
//! ## Feature Flags
//!
//! | Feature | Description | Default |
//! |---------|-------------|--------|
//! | `cli` | The `mutumwa` command-line client | ✅ |

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod render;

// ============================================================================
// Crate Re-exports
// ============================================================================

/// Identifiers, messages, threads, domains and working memory.
pub use mutumwa_core as core;

/// Streamed reply assembly.
pub use mutumwa_streaming as streaming;

/// Webhook client and turn driver.
pub use mutumwa_webhook as webhook;

// ============================================================================
// Flat Re-exports
// ============================================================================

pub use mutumwa_core::{
    ChatMessage, Conversation, CoreError, Domain, DomainRegistry, Language, MessageId, Sender,
    SessionId, ThreadList, ThreadSummary, UserId, WorkingMemory,
};
pub use mutumwa_streaming::{AssembledMessage, MessageUpdate, ReplyAssembler, ReplyStream, StreamError};
pub use mutumwa_webhook::{
    ChatTurn, ReplySource, TurnOutcome, TurnStatus, WebhookClient, WebhookConfig, WebhookError,
    FALLBACK_REPLY,
};
pub use render::{Render, ReplyPrinter};

// ============================================================================
// Prelude
// ============================================================================

/// Prelude for common imports.
pub mod prelude {
    pub use crate::core::{
        ChatMessage, Conversation, Domain, DomainRegistry, Language, MessageId, Sender, SessionId,
        ThreadList, ThreadSummary, UserId,
    };
    pub use crate::render::ReplyPrinter;
    pub use crate::streaming::{assemble, AssembledMessage, MessageUpdate, ReplyStreamExt};
    pub use crate::webhook::{
        ChatTurn, ReplySource, TurnOutcome, TurnStatus, WebhookClient, WebhookConfig,
        WebhookError, FALLBACK_REPLY,
    };
}

/// Returns the current version of mutumwa.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(version(), "0.1.0");
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let registry = DomainRegistry::default();
        assert_eq!(registry.default_domain().unwrap().value, "general");
        assert!(ReplyPrinter::new().shown().is_empty());
        assert!(FALLBACK_REPLY.starts_with("Sorry"));
    }

    #[tokio::test]
    async fn test_turn_against_webhook_end_to_end() {
        use crate::prelude::*;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        let body = [
            "{\"type\":\"begin\",\"metadata\":{\"nodeName\":\"Agent\"}}\n",
            "\n",
            "{\"type\":\"item\",\"content\":\"Tiri kutarisa \"}\n",
            "not json\n",
            "{\"type\":\"item\",\"content\":\"{\\\"output\\\":\\\"Mari yeZESA yakwira ✅\\\"}\"}\n",
            "{\"type\":\"end\"}",
        ]
        .concat();
        Mock::given(method("POST"))
            .and(path("/webhook/zesa"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .expect(1)
            .mount(&server)
            .await;

        let config = WebhookConfig::default()
            .with_webhook_base(&format!("{}/webhook", server.uri()))
            .unwrap();
        let domain = config.domains.get("zesa").unwrap().clone();
        let turn = ChatTurn::new(WebhookClient::new(config).unwrap(), domain, UserId::from("u"));

        let mut conversation = Conversation::new(SessionId::from("s"));
        let mut threads = ThreadList::new();
        let mut printer = ReplyPrinter::new();
        let mut screen = Vec::new();

        let outcome = turn
            .send(&mut conversation, &mut threads, "Mitengo yemagetsi?", |update, _| {
                printer.write(update, &mut screen).unwrap();
            })
            .await;

        assert!(outcome.is_completed());
        assert_eq!(outcome.reply_text(), Some("Mari yeZESA yakwira ✅"));
        assert_eq!(conversation.len(), 2);
        assert_eq!(
            String::from_utf8(screen).unwrap(),
            "Tiri kutarisa \nMari yeZESA yakwira ✅"
        );

        let thread = &threads.threads()[0];
        assert_eq!(thread.title, "Mitengo yemagetsi?");
        assert_eq!(thread.last_message, "Mari yeZESA yakwira ✅");
    }
}
