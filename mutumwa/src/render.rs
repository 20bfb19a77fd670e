//! Plain-text rendering of a live reply.
//!
//! A terminal cannot update a bubble in place, so [`ReplyPrinter`] writes
//! only what each update adds. When a replacement payload rewrites the
//! reply, the full new text is written on a fresh line.

use mutumwa_streaming::MessageUpdate;
use std::io::{self, Write};

/// What to write for one update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Render<'a> {
    /// Nothing visible changed.
    Nothing,
    /// The reply grew by this suffix.
    Append(&'a str),
    /// The reply was replaced by this text.
    Rewrite(&'a str),
}

/// Tracks the text already written for the current reply.
#[derive(Debug, Clone, Default)]
pub struct ReplyPrinter {
    shown: String,
}

impl ReplyPrinter {
    /// Create a printer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Text written so far for the current reply.
    #[must_use]
    pub fn shown(&self) -> &str {
        &self.shown
    }

    /// Work out what `update` adds to the screen.
    pub fn render<'a>(&mut self, update: &'a MessageUpdate) -> Render<'a> {
        match update {
            MessageUpdate::Created { .. } => {
                self.shown.clear();
                Render::Nothing
            }
            MessageUpdate::Updated { text, .. } => {
                let rendered = match text.strip_prefix(self.shown.as_str()) {
                    Some("") => Render::Nothing,
                    Some(delta) => Render::Append(delta),
                    None => Render::Rewrite(text),
                };
                self.shown.clone_from(text);
                rendered
            }
            MessageUpdate::Finalized { .. } => Render::Nothing,
        }
    }

    /// Render `update` to `out` and flush it.
    pub fn write<W: Write>(&mut self, update: &MessageUpdate, out: &mut W) -> io::Result<()> {
        match self.render(update) {
            Render::Nothing => return Ok(()),
            Render::Append(delta) => write!(out, "{delta}")?,
            Render::Rewrite(text) => write!(out, "\n{text}")?,
        }
        out.flush()
    }
}
