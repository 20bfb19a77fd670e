//! Scripted reply source for testing.
//!
//! [`MockReplySource`] answers turns from a queue of scripted replies instead
//! of the network, and records every request it was given.
//!
//! ```rust
//! use mutumwa_webhook::MockReplySource;
//!
//! let source = MockReplySource::new()
//!     .with_items(&["Mhoro", ", makadii?"])
//!     .with_status(502, "bad gateway");
//! ```

use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use mutumwa_core::Domain;
use mutumwa_streaming::ReplyStream;
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::client::{ReplyBody, ReplySource, WebhookReplyStream};
use crate::error::{WebhookError, WebhookResult};
use crate::request::TurnRequest;

#[derive(Debug, Clone)]
enum Chunk {
    Data(Bytes),
    Fail(String),
}

#[derive(Debug, Clone)]
enum Scripted {
    Body(Vec<Chunk>),
    Status(u16, String),
}

/// A turn the mock was asked to answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedTurn {
    /// Value of the domain the turn was sent to.
    pub domain: String,
    /// The request.
    pub request: TurnRequest,
}

/// Reply source backed by a queue of scripted replies.
#[derive(Debug, Clone, Default)]
pub struct MockReplySource {
    replies: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<RecordedTurn>>>,
}

fn item_line(content: &str) -> Bytes {
    let line = serde_json::json!({ "type": "item", "content": content });
    Bytes::from(format!("{line}\n"))
}

fn guard<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockReplySource {
    /// Create a mock with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply made of one `item` record per content string, each
    /// delivered as its own chunk.
    #[must_use]
    pub fn with_items(self, contents: &[&str]) -> Self {
        let chunks = contents.iter().map(|c| Chunk::Data(item_line(c))).collect();
        self.push(Scripted::Body(chunks))
    }

    /// Queue a reply with the given raw chunks.
    #[must_use]
    pub fn with_chunks<I, B>(self, chunks: I) -> Self
    where
        I: IntoIterator<Item = B>,
        B: Into<Bytes>,
    {
        let chunks = chunks.into_iter().map(|b| Chunk::Data(b.into())).collect();
        self.push(Scripted::Body(chunks))
    }

    /// Queue a reply whose transport fails after the given items.
    #[must_use]
    pub fn with_failure_after(self, contents: &[&str], message: impl Into<String>) -> Self {
        let mut chunks: Vec<Chunk> = contents.iter().map(|c| Chunk::Data(item_line(c))).collect();
        chunks.push(Chunk::Fail(message.into()));
        self.push(Scripted::Body(chunks))
    }

    /// Queue a rejected request.
    #[must_use]
    pub fn with_status(self, status: u16, body: impl Into<String>) -> Self {
        self.push(Scripted::Status(status, body.into()))
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<RecordedTurn> {
        guard(&self.requests).clone()
    }

    /// Scripted replies not yet used.
    pub fn remaining(&self) -> usize {
        guard(&self.replies).len()
    }

    fn push(self, scripted: Scripted) -> Self {
        guard(&self.replies).push_back(scripted);
        self
    }
}

#[async_trait]
impl ReplySource for MockReplySource {
    async fn open(&self, domain: &Domain, request: &TurnRequest) -> WebhookResult<WebhookReplyStream> {
        guard(&self.requests).push(RecordedTurn {
            domain: domain.value.clone(),
            request: request.clone(),
        });

        let scripted = guard(&self.replies).pop_front();
        match scripted {
            Some(Scripted::Body(chunks)) => {
                let body: ReplyBody = futures::stream::iter(chunks.into_iter().map(|chunk| match chunk {
                    Chunk::Data(bytes) => Ok(bytes),
                    Chunk::Fail(message) => Err(io::Error::new(io::ErrorKind::ConnectionReset, message)),
                }))
                .boxed();
                Ok(ReplyStream::new(body))
            }
            Some(Scripted::Status(status, body)) => Err(WebhookError::http(status, body)),
            None => Err(WebhookError::configuration("mock has no scripted reply left")),
        }
    }
}
