//! Line framing across chunk boundaries.
//!
//! The webhook writes one JSON record per `\n`-terminated line, but the
//! transport delivers arbitrary slices of that text. [`LineFramer`] keeps
//! the unterminated tail buffered until the rest of the line arrives.

/// Splits decoded text fragments into complete lines.
///
/// Only `\n` is a delimiter. The delimiter is not part of the returned line;
/// a preceding `\r` is kept and left to the caller's trimming.
#[derive(Debug, Default, Clone)]
pub struct LineFramer {
    buffer: String,
}

impl LineFramer {
    /// Create an empty framer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment and return every line it completes, in order.
    pub fn feed(&mut self, fragment: &str) -> Vec<String> {
        self.buffer.push_str(fragment);

        let Some(last_newline) = self.buffer.rfind('\n') else {
            return Vec::new();
        };

        let complete: String = self.buffer.drain(..=last_newline).collect();
        complete[..complete.len() - 1]
            .split('\n')
            .map(str::to_string)
            .collect()
    }

    /// Return the buffered partial line at end of stream, if non-empty.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.buffer))
        }
    }

    /// Text waiting for a newline.
    #[must_use]
    pub fn pending(&self) -> &str {
        &self.buffer
    }

    /// Drop any buffered text.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Lines a single pass over `s` should yield: every `\n`-terminated
    /// segment, plus the trailing segment when non-empty.
    fn expected_lines(s: &str) -> Vec<String> {
        let mut lines: Vec<String> = s.split('\n').map(str::to_string).collect();
        if lines.last().is_some_and(String::is_empty) {
            lines.pop();
        }
        lines
    }

    fn frame_all(fragments: &[&str]) -> Vec<String> {
        let mut framer = LineFramer::new();
        let mut lines = Vec::new();
        for fragment in fragments {
            lines.extend(framer.feed(fragment));
        }
        lines.extend(framer.flush());
        lines
    }

    #[test]
    fn test_single_complete_line() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.feed("{\"type\":\"item\"}\n"), vec!["{\"type\":\"item\"}"]);
        assert_eq!(framer.flush(), None);
    }

    #[test]
    fn test_partial_line_is_buffered() {
        let mut framer = LineFramer::new();
        assert!(framer.feed("{\"type\":").is_empty());
        assert_eq!(framer.pending(), "{\"type\":");
        assert_eq!(framer.feed("\"item\"}\nnext"), vec!["{\"type\":\"item\"}"]);
        assert_eq!(framer.pending(), "next");
        assert_eq!(framer.flush(), Some("next".to_string()));
        assert_eq!(framer.flush(), None);
    }

    #[test]
    fn test_empty_input_and_blank_lines() {
        let mut framer = LineFramer::new();
        assert!(framer.feed("").is_empty());
        assert_eq!(framer.feed("\n\na\n"), vec!["", "", "a"]);
    }

    #[test]
    fn test_carriage_return_is_kept() {
        let mut framer = LineFramer::new();
        assert_eq!(framer.feed("a\r\nb\r\n"), vec!["a\r", "b\r"]);
    }

    #[test]
    fn test_any_split_matches_direct_split() {
        let inputs = [
            "{\"type\":\"item\",\"content\":\"Hi\"}\n{\"type\":\"end\"}\n",
            "one\ntwo\n\nthree",
            "\n\n",
            "no newline at all",
            "",
        ];

        for s in inputs {
            let expected = expected_lines(s);
            let boundaries: Vec<usize> = s.char_indices().map(|(i, _)| i).chain([s.len()]).collect();

            for &a in &boundaries {
                for &b in boundaries.iter().filter(|&&b| b >= a) {
                    let got = frame_all(&[&s[..a], &s[a..b], &s[b..]]);
                    assert_eq!(got, expected, "input {s:?} split at {a}/{b}");
                }
            }
        }
    }

    #[test]
    fn test_byte_at_a_time() {
        let s = "alpha\nbeta\ngamma";
        let fragments: Vec<String> = s.chars().map(String::from).collect();
        let refs: Vec<&str> = fragments.iter().map(String::as_str).collect();
        assert_eq!(frame_all(&refs), vec!["alpha", "beta", "gamma"]);
    }
}
