//! # mutumwa-streaming
//!
//! Incremental assembly of webhook replies.
//!
//! The chat webhook answers a turn with a stream of newline-delimited JSON
//! records. This crate turns that byte stream into updates of a single
//! assistant message that a UI can render as it grows.
//!
//! ## Core Concepts
//!
//! - **[`Utf8ChunkDecoder`]**: decode chunks that may split a character
//! - **[`LineFramer`]**: split decoded text into complete lines
//! - **[`EventRecord`]**: classify a line; only `item` records carry text
//! - **[`MessageReducer`]**: append or replace the message text per payload
//! - **[`ReplyAssembler`]**: all of the above, bytes in, [`MessageUpdate`]s out
//! - **[`ReplyStream`]**: the assembler as an async stream adapter
//!
//! ## Example
//!
//! ```ignore
//! use futures::StreamExt;
//! use mutumwa_streaming::{MessageUpdate, ReplyStreamExt};
//!
//! let mut replies = Box::pin(response.bytes_stream().into_replies());
//! while let Some(update) = replies.next().await {
//!     match update? {
//!         MessageUpdate::Created { id } => println!("bubble {id}"),
//!         MessageUpdate::Updated { text, .. } => println!("{text}"),
//!         MessageUpdate::Finalized { .. } => break,
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod assembler;
pub mod decoder;
pub mod error;
pub mod framer;
pub mod record;
pub mod reducer;
pub mod update;

// Re-exports
pub use assembler::{assemble, AssemblerStats, ReplyAssembler, ReplyStream, ReplyStreamExt};
pub use decoder::Utf8ChunkDecoder;
pub use error::{StreamError, StreamResult, TransportError};
pub use framer::LineFramer;
pub use record::{classify_line, EventRecord, LineClass};
pub use reducer::{
    interpret_payload, AssembledMessage, MessageReducer, PayloadAction, ReducerState,
};
pub use update::MessageUpdate;

/// Prelude for common imports.
pub mod prelude {
    pub use crate::{
        assemble, AssembledMessage, MessageUpdate, ReplyAssembler, ReplyStream, ReplyStreamExt,
        StreamError, StreamResult,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;

        let assembler = ReplyAssembler::new();
        assert!(assembler.message().is_none());
        assert!(!StreamError::Interrupted.is_transport());
    }
}
