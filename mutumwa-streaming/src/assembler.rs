//! Streaming reply assembly.
//!
//! [`ReplyAssembler`] is the synchronous core: bytes in, message updates out.
//! [`ReplyStream`] drives it from an async byte stream such as an HTTP
//! response body, and [`assemble`] drains a stream into a render callback.

use crate::decoder::Utf8ChunkDecoder;
use crate::error::{StreamError, StreamResult};
use crate::framer::LineFramer;
use crate::record::{classify_line, LineClass};
use crate::reducer::{AssembledMessage, MessageReducer};
use crate::update::MessageUpdate;
use bytes::Bytes;
use futures::{Stream, StreamExt};
use mutumwa_core::MessageId;
use pin_project_lite::pin_project;
use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Line counters for one stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssemblerStats {
    /// Lines produced by the framer.
    pub lines: usize,
    /// Lines whose content was applied to the message.
    pub items: usize,
    /// Empty or whitespace-only lines.
    pub blank: usize,
    /// Lines that were not valid JSON.
    pub malformed: usize,
    /// Valid JSON lines without actionable content.
    pub ignored: usize,
}

/// Turns the raw bytes of one reply stream into message updates.
#[derive(Debug, Default)]
pub struct ReplyAssembler {
    decoder: Utf8ChunkDecoder,
    framer: LineFramer,
    reducer: MessageReducer,
    stats: AssemblerStats,
    finished: bool,
}

impl ReplyAssembler {
    /// Create a new assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an assembler whose message will use the given ID.
    #[must_use]
    pub fn with_message_id(id: MessageId) -> Self {
        Self {
            reducer: MessageReducer::with_message_id(id),
            ..Self::default()
        }
    }

    /// Feed one transport chunk.
    pub fn push_bytes(&mut self, chunk: &[u8]) -> Vec<MessageUpdate> {
        if self.finished {
            tracing::debug!(len = chunk.len(), "chunk after stream end ignored");
            return Vec::new();
        }
        let fragment = self.decoder.decode(chunk);
        self.push_fragment(&fragment)
    }

    /// End the stream: flush the decoder and framer, then finalize.
    pub fn finish(&mut self) -> Vec<MessageUpdate> {
        if self.finished {
            return Vec::new();
        }

        let dropped = self.decoder.finish();
        if dropped > 0 {
            tracing::debug!(dropped, "incomplete character at stream end dropped");
        }
        let mut updates = Vec::new();
        if let Some(line) = self.framer.flush() {
            updates.extend(self.process_line(&line));
        }
        updates.extend(self.reducer.finish());
        self.finished = true;

        tracing::debug!(
            lines = self.stats.lines,
            items = self.stats.items,
            blank = self.stats.blank,
            malformed = self.stats.malformed,
            ignored = self.stats.ignored,
            "reply stream finished"
        );
        updates
    }

    /// The message, once created.
    #[must_use]
    pub fn message(&self) -> Option<&AssembledMessage> {
        self.reducer.message()
    }

    /// Line counters so far.
    #[must_use]
    pub fn stats(&self) -> AssemblerStats {
        self.stats
    }

    /// Check if [`finish`](Self::finish) has run.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consume the assembler, returning the message if one was created.
    #[must_use]
    pub fn into_message(self) -> Option<AssembledMessage> {
        self.reducer.into_message()
    }

    fn push_fragment(&mut self, fragment: &str) -> Vec<MessageUpdate> {
        let mut updates = Vec::new();
        for line in self.framer.feed(fragment) {
            updates.extend(self.process_line(&line));
        }
        updates
    }

    fn process_line(&mut self, line: &str) -> Vec<MessageUpdate> {
        self.stats.lines += 1;
        match classify_line(line) {
            LineClass::Blank => {
                self.stats.blank += 1;
                Vec::new()
            }
            LineClass::Malformed => {
                self.stats.malformed += 1;
                Vec::new()
            }
            LineClass::Record(record) => match record.content() {
                Some(content) => {
                    self.stats.items += 1;
                    self.reducer.apply(content)
                }
                None => {
                    self.stats.ignored += 1;
                    tracing::trace!(?record, "ignoring record");
                    Vec::new()
                }
            },
        }
    }
}

pin_project! {
    /// Stream adapter that assembles a reply from a byte stream.
    ///
    /// Chunks are pulled one at a time and fully processed before the next
    /// is requested. Dropping the adapter drops the underlying transport.
    pub struct ReplyStream<S> {
        #[pin]
        inner: S,
        assembler: ReplyAssembler,
        pending: VecDeque<MessageUpdate>,
        done: bool,
    }
}

impl<S, E> ReplyStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    /// Wrap a byte stream.
    pub fn new(inner: S) -> Self {
        Self::with_assembler(inner, ReplyAssembler::new())
    }

    /// Wrap a byte stream with a preconfigured assembler.
    pub fn with_assembler(inner: S, assembler: ReplyAssembler) -> Self {
        Self {
            inner,
            assembler,
            pending: VecDeque::new(),
            done: false,
        }
    }
}

impl<S> std::fmt::Debug for ReplyStream<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplyStream")
            .field("assembler", &self.assembler)
            .field("pending", &self.pending)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl<S> ReplyStream<S> {
    /// The message assembled so far.
    pub fn message(&self) -> Option<&AssembledMessage> {
        self.assembler.message()
    }

    /// Line counters so far.
    pub fn stats(&self) -> AssemblerStats {
        self.assembler.stats()
    }
}

impl<S, E> Stream for ReplyStream<S>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Item = StreamResult<MessageUpdate>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let mut this = self.project();

        loop {
            if let Some(update) = this.pending.pop_front() {
                return Poll::Ready(Some(Ok(update)));
            }

            if *this.done {
                return Poll::Ready(None);
            }

            match this.inner.as_mut().poll_next(cx) {
                Poll::Ready(Some(Ok(bytes))) => {
                    this.pending.extend(this.assembler.push_bytes(&bytes));
                }
                Poll::Ready(Some(Err(e))) => {
                    *this.done = true;
                    tracing::error!(error = %e, "reply stream transport failed");
                    return Poll::Ready(Some(Err(StreamError::transport(e))));
                }
                Poll::Ready(None) => {
                    *this.done = true;
                    this.pending.extend(this.assembler.finish());
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Extension trait for turning byte streams into reply streams.
pub trait ReplyStreamExt: Sized {
    /// Assemble a reply from this byte stream.
    fn into_replies(self) -> ReplyStream<Self>;
}

impl<S, E> ReplyStreamExt for S
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_replies(self) -> ReplyStream<Self> {
        ReplyStream::new(self)
    }
}

/// Drain a reply stream, calling `render` for every update in order.
///
/// Returns the assembled message (if any content arrived) once the stream
/// ends. A transport failure is returned as an error after every update
/// produced before it has been rendered.
pub async fn assemble<S, F>(stream: ReplyStream<S>, mut render: F) -> StreamResult<Option<AssembledMessage>>
where
    ReplyStream<S>: Stream<Item = StreamResult<MessageUpdate>>,
    F: FnMut(&MessageUpdate),
{
    let mut stream = std::pin::pin!(stream);
    while let Some(update) = stream.next().await {
        render(&update?);
    }
    Ok(stream.message().cloned())
}
