//! Stateful UTF-8 decoding of transport chunks.
//!
//! A chunk boundary may fall inside a multi-byte character. The decoder
//! holds the incomplete tail back until the next chunk completes it. A
//! byte order mark at the very start of the stream is dropped, even when it
//! arrives split across chunks.

/// UTF-8 encoding of U+FEFF.
const BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Incremental UTF-8 decoder.
///
/// Invalid sequences decode to U+FFFD instead of failing, so a corrupt byte
/// never aborts a stream.
#[derive(Debug, Default, Clone)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
    started: bool,
}

impl Utf8ChunkDecoder {
    /// Create a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a chunk, carrying any incomplete trailing sequence forward.
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut rest = bytes.as_slice();
        if !self.started {
            if rest.len() < BOM.len() && BOM.starts_with(rest) {
                self.pending = bytes;
                return String::new();
            }
            self.started = true;
            if let Some(after) = rest.strip_prefix(&BOM[..]) {
                rest = after;
            }
        }

        let mut out = String::with_capacity(rest.len());

        loop {
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    // `valid_up_to` is a verified UTF-8 boundary.
                    out.push_str(std::str::from_utf8(valid).unwrap_or_default());

                    match err.error_len() {
                        Some(bad) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            rest = &after[bad..];
                        }
                        None => {
                            self.pending.extend_from_slice(after);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// End the stream, discarding any incomplete trailing sequence.
    ///
    /// Returns the number of bytes dropped. Nothing is emitted for them, so
    /// a final unterminated line is not corrupted by a stray U+FFFD.
    pub fn finish(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        self.started = true;
        dropped
    }

    /// Check if bytes are held back waiting for the rest of a character.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}
