//! # mutumwa-core
//!
//! Core types shared by the mutumwa crates.
//!
//! - **Identifiers**: type-safe session, user and message IDs
//! - **Messages**: chat bubbles and the in-memory [`Conversation`]
//! - **Threads**: sidebar summaries and title derivation
//! - **Domains**: tenants and their webhooks, target languages
//! - **Memory**: the opaque per-user working memory blob
//! - **Errors**: [`CoreError`]
//!
//! ## Example
//!
//! ```rust
//! use mutumwa_core::{ChatMessage, Conversation, DomainRegistry, SessionId};
//!
//! let registry = DomainRegistry::default();
//! let domain = registry.get("zesa").unwrap();
//! assert_eq!(domain.label, "ZESA");
//!
//! let mut conversation = Conversation::new(SessionId::new());
//! conversation.push(ChatMessage::user("How do I buy tokens?"));
//! assert_eq!(conversation.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod domain;
pub mod errors;
pub mod identifier;
pub mod memory;
pub mod messages;
pub mod thread;

pub use domain::{Domain, DomainRegistry, Language, DEFAULT_WEBHOOK_BASE};
pub use errors::{CoreError, Result};
pub use identifier::{now_utc, MessageId, SessionId, UserId};
pub use memory::{UserMemory, WorkingMemory};
pub use messages::{ChatMessage, Conversation, Sender};
pub use thread::{thread_title, ThreadList, ThreadSummary};
