//! Sidebar thread summaries.
//!
//! The sidebar is updated optimistically after each turn instead of being
//! reloaded from storage: the first user message names the thread and every
//! turn refreshes its preview.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identifier::{now_utc, SessionId};

/// Maximum number of characters kept in a derived title.
pub const TITLE_MAX_CHARS: usize = 50;

/// Derive a thread title from a message.
///
/// The trimmed text is cut to [`TITLE_MAX_CHARS`] characters and `...` is
/// appended when the original text is longer than that.
///
/// ```rust
/// use mutumwa_core::thread::thread_title;
///
/// assert_eq!(thread_title("  Mhoro  "), "Mhoro");
/// assert!(thread_title(&"a".repeat(60)).ends_with("..."));
/// ```
#[must_use]
pub fn thread_title(text: &str) -> String {
    let mut title: String = text.trim().chars().take(TITLE_MAX_CHARS).collect();
    if text.chars().count() > TITLE_MAX_CHARS {
        title.push_str("...");
    }
    title
}

/// One entry of the conversation sidebar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadSummary {
    /// Session ID.
    pub id: SessionId,
    /// Display title.
    pub title: String,
    /// Preview of the most recent message.
    pub last_message: String,
    /// Last activity.
    pub updated_at: DateTime<Utc>,
    /// Number of messages recorded for the thread.
    pub message_count: u32,
}

/// The sidebar list, most recently created first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadList {
    threads: Vec<ThreadSummary>,
}

impl ThreadList {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from summaries loaded elsewhere.
    pub fn from_threads(threads: Vec<ThreadSummary>) -> Self {
        Self { threads }
    }

    /// All threads in display order.
    #[must_use]
    pub fn threads(&self) -> &[ThreadSummary] {
        &self.threads
    }

    /// Find a thread by session.
    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<&ThreadSummary> {
        self.threads.iter().find(|t| &t.id == id)
    }

    /// Record activity on a thread.
    ///
    /// An existing thread keeps its title unless a non-empty one is given,
    /// and its message count grows by one. An unknown thread is inserted at
    /// the top, titled from `title` or else from `last_message`.
    pub fn touch(&mut self, id: &SessionId, title: Option<&str>, last_message: &str) {
        let title = title.filter(|t| !t.is_empty());

        if let Some(existing) = self.threads.iter_mut().find(|t| &t.id == id) {
            if let Some(title) = title {
                existing.title = title.to_string();
            }
            existing.last_message = last_message.to_string();
            existing.updated_at = now_utc();
            existing.message_count += 1;
            return;
        }

        tracing::debug!(session_id = %id, "adding thread to sidebar");
        let summary = ThreadSummary {
            id: id.clone(),
            title: title.map_or_else(|| thread_title(last_message), str::to_string),
            last_message: last_message.to_string(),
            updated_at: now_utc(),
            message_count: 1,
        };
        self.threads.insert(0, summary);
    }

    /// Remove a thread, returning it if present.
    pub fn remove(&mut self, id: &SessionId) -> Option<ThreadSummary> {
        let pos = self.threads.iter().position(|t| &t.id == id)?;
        Some(self.threads.remove(pos))
    }

    /// Number of threads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threads.len()
    }

    /// Check if the sidebar is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.threads.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("Hello", "Hello")]
    #[case("   padded   ", "padded")]
    #[case("", "")]
    fn test_thread_title(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(thread_title(input), expected);
    }

    #[test]
    fn test_thread_title_truncation_boundary() {
        let exact = "x".repeat(50);
        assert_eq!(thread_title(&exact), exact);

        let long = "y".repeat(51);
        assert_eq!(thread_title(&long), format!("{}...", "y".repeat(50)));
    }

    #[test]
    fn test_thread_title_counts_chars_not_bytes() {
        let text = "ñ".repeat(50);
        assert_eq!(thread_title(&text), text);
    }

    #[test]
    fn test_touch_inserts_new_thread_at_top() {
        let mut list = ThreadList::new();
        let first = SessionId::new();
        let second = SessionId::new();

        list.touch(&first, Some("First chat"), "hi");
        list.touch(&second, None, "What is the tariff for prepaid power?");

        assert_eq!(list.len(), 2);
        assert_eq!(list.threads()[0].id, second);
        assert_eq!(
            list.threads()[0].title,
            "What is the tariff for prepaid power?"
        );
        assert_eq!(list.threads()[1].title, "First chat");
    }

    #[test]
    fn test_touch_existing_keeps_title_and_counts() {
        let mut list = ThreadList::new();
        let id = SessionId::new();

        list.touch(&id, Some("Electricity"), "question");
        list.touch(&id, Some(""), "answer");

        let thread = list.get(&id).unwrap();
        assert_eq!(thread.title, "Electricity");
        assert_eq!(thread.last_message, "answer");
        assert_eq!(thread.message_count, 2);
    }

    #[test]
    fn test_remove() {
        let mut list = ThreadList::new();
        let id = SessionId::new();
        list.touch(&id, Some("t"), "m");
        assert!(list.remove(&id).is_some());
        assert!(list.remove(&id).is_none());
        assert!(list.is_empty());
    }
}
