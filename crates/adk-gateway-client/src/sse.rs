//! SSE line decoding shared by both delivery modes.
//!
//! Only `data: ` lines are considered. Their payload is parsed as JSON and,
//! when it has the shape `content.parts[0].text`, the text is applied to the
//! running result according to the [`Delivery`] policy. Anything else
//! (keep-alives, comments, invalid JSON, other event shapes) is skipped.

use serde_json::Value;

/// Exact SSE data prefix; its full length is stripped.
pub const DATA_PREFIX: &str = "data: ";

/// How event texts combine into the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Last matching event wins (buffered mode).
    Overwrite,
    /// Every matching event is appended.
    Append,
}

/// Incremental SSE line decoder.
///
/// Bytes after the last newline of a chunk are held until the next chunk or
/// [`finish`](Self::finish), so events split across chunk boundaries (even
/// inside a multi-byte character) are decoded intact.
#[derive(Debug)]
pub struct SseDecoder {
    delivery: Delivery,
    pending: Vec<u8>,
    text: Option<String>,
}

impl SseDecoder {
    #[must_use]
    pub const fn new(delivery: Delivery) -> Self {
        Self {
            delivery,
            pending: Vec::new(),
            text: None,
        }
    }

    /// Feed a chunk, returning the texts of events completed by it.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        self.pending.extend_from_slice(chunk);

        let mut texts = Vec::new();
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            if let Some(text) = decode_line(&String::from_utf8_lossy(&line)) {
                self.apply(&text);
                texts.push(text);
            }
        }
        texts
    }

    /// Flush a final unterminated line.
    pub fn finish(&mut self) -> Vec<String> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let line = std::mem::take(&mut self.pending);
        match decode_line(&String::from_utf8_lossy(&line)) {
            Some(text) => {
                self.apply(&text);
                vec![text]
            }
            None => Vec::new(),
        }
    }

    /// Result so far, `None` if no event matched.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    #[must_use]
    pub fn into_text(self) -> Option<String> {
        self.text
    }

    fn apply(&mut self, text: &str) {
        match (self.delivery, self.text.as_mut()) {
            (Delivery::Append, Some(acc)) => acc.push_str(text),
            _ => self.text = Some(text.to_string()),
        }
    }
}

/// Decode one SSE line into its event text, if it carries one.
#[must_use]
pub fn decode_line(line: &str) -> Option<String> {
    let line = line.trim_end_matches(['\n', '\r']);
    let payload = line.strip_prefix(DATA_PREFIX)?;
    let event: Value = serde_json::from_str(payload).ok()?;
    event_text(&event).map(str::to_string)
}

/// `content.parts[0].text` of an event, when present and non-empty.
#[must_use]
pub fn event_text(event: &Value) -> Option<&str> {
    event
        .pointer("/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "data: {\"content\":{\"parts\":[{\"text\":\"A\"}]}}\n";
    const B: &str = "data: {\"content\":{\"parts\":[{\"text\":\"B\"}]}}\n";

    #[test]
    fn test_overwrite_last_event_wins() {
        let mut decoder = SseDecoder::new(Delivery::Overwrite);
        decoder.feed(format!("{A}{B}").as_bytes());
        decoder.finish();
        assert_eq!(decoder.text(), Some("B"));
    }

    #[test]
    fn test_append_across_chunks() {
        let mut decoder = SseDecoder::new(Delivery::Append);
        assert_eq!(decoder.feed(A.as_bytes()), vec!["A".to_string()]);
        assert_eq!(decoder.feed(B.as_bytes()), vec!["B".to_string()]);
        assert_eq!(decoder.into_text().as_deref(), Some("AB"));
    }

    #[test]
    fn test_line_split_across_chunk_boundary() {
        let input = format!("{A}{B}");
        let (first, second) = input.split_at(A.len() + 20);

        let mut decoder = SseDecoder::new(Delivery::Append);
        assert_eq!(decoder.feed(first.as_bytes()), vec!["A".to_string()]);
        assert_eq!(decoder.feed(second.as_bytes()), vec!["B".to_string()]);
        assert_eq!(decoder.text(), Some("AB"));
    }

    #[test]
    fn test_split_inside_multibyte_character() {
        let line = "data: {\"content\":{\"parts\":[{\"text\":\"caf\u{e9}\"}]}}\n";
        let bytes = line.as_bytes();
        let split = line.find('\u{e9}').unwrap() + 1;

        let mut decoder = SseDecoder::new(Delivery::Append);
        assert!(decoder.feed(&bytes[..split]).is_empty());
        decoder.feed(&bytes[split..]);
        assert_eq!(decoder.text(), Some("caf\u{e9}"));
    }

    #[test]
    fn test_invalid_json_is_ignored() {
        let input = format!("{A}data: {{not json\n{B}");
        let mut decoder = SseDecoder::new(Delivery::Append);
        decoder.feed(input.as_bytes());
        assert_eq!(decoder.text(), Some("AB"));

        let mut decoder = SseDecoder::new(Delivery::Overwrite);
        decoder.feed(format!("{A}data: {{not json\n").as_bytes());
        assert_eq!(decoder.text(), Some("A"));
    }

    #[test]
    fn test_other_lines_and_shapes_are_ignored() {
        let input = concat!(
            ": keep-alive\n",
            "event: message\n",
            "data:{\"content\":{\"parts\":[{\"text\":\"no space\"}]}}\n",
            "data: {\"content\":{\"parts\":[{\"functionCall\":{\"name\":\"f\"}}]}}\n",
            "data: {\"content\":{\"parts\":[]}}\n",
            "data: {\"content\":{\"parts\":[{\"text\":\"\"}]}}\n",
        );
        let mut decoder = SseDecoder::new(Delivery::Overwrite);
        assert!(decoder.feed(input.as_bytes()).is_empty());
        assert_eq!(decoder.text(), None);
    }

    #[test]
    fn test_crlf_and_unterminated_final_line() {
        let input = "data: {\"content\":{\"parts\":[{\"text\":\"A\"}]}}\r\n\
                     data: {\"content\":{\"parts\":[{\"text\":\"B\"}]}}";
        let mut decoder = SseDecoder::new(Delivery::Append);
        assert_eq!(decoder.feed(input.as_bytes()), vec!["A".to_string()]);
        assert_eq!(decoder.finish(), vec!["B".to_string()]);
        assert_eq!(decoder.text(), Some("AB"));
        assert!(decoder.finish().is_empty());
    }

    #[test]
    fn test_prefix_strips_exactly_six_characters() {
        assert_eq!(DATA_PREFIX.len(), 6);
        assert_eq!(
            decode_line("data: {\"content\":{\"parts\":[{\"text\":\"x\"}]}}").as_deref(),
            Some("x")
        );
    }
}
