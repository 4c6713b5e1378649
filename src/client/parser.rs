//! Incremental parser for server-sent-event frames.
//!
//! Buffer-accumulating parser for the `text/event-stream` wire format.
//! Handles frames that arrive split across chunk boundaries: partial field
//! state is held inside the parser until the blank line that terminates a
//! frame is seen.
//!
//! # Wire Format
//!
//! A frame is a run of `field: value` lines terminated by a blank line:
//!
//! ```text
//! event: message
//! id: [{"topic":"eqiad.mediawiki.recentchange","partition":0,"offset":-1}]
//! data: {"type":"edit","namespace":0,...}
//! <blank line>
//! ```
//!
//! Recognized fields are `event`, `data` (multiple lines concatenate with
//! `\n`) and `id`. Lines beginning with `:` are comments (the server uses
//! them as keepalives) and `retry` hints are ignored; the reconnect
//! schedule is owned by the session, not the server.
//!
//! # Examples
//!
//! ```
//! use eventstreams::SseParser;
//!
//! let mut parser = SseParser::new();
//!
//! // Frames may arrive in fragments.
//! assert!(parser.feed(b"event: message\ndata: {\"namesp").is_empty());
//! let frames = parser.feed(b"ace\":0}\n\n");
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].data, b"{\"namespace\":0}");
//! ```

use bytes::BytesMut;

/// One parsed SSE frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseMessage {
    /// Event name from the `event:` field; `"message"` when the frame
    /// carries none, per the SSE default.
    pub event: String,
    /// Last-event id from the `id:` field, when present.
    pub id: Option<String>,
    /// Raw payload assembled from the frame's `data:` lines.
    ///
    /// May be empty: the service emits an empty frame immediately after
    /// the connection opens, and that frame is delivered as-is.
    pub data: Vec<u8>,
}

/// Incremental SSE frame parser.
///
/// Feed raw chunks as they arrive; each call returns the frames completed
/// by that chunk. Field state for a frame still in flight is carried over
/// to the next call.
#[derive(Debug, Default)]
pub struct SseParser {
    /// Input buffer accumulating bytes not yet consumed as full lines.
    buffer: BytesMut,
    /// `event:` field of the frame being assembled.
    event: Option<String>,
    /// `id:` field of the frame being assembled.
    id: Option<String>,
    /// Payload bytes of the frame being assembled.
    data: Vec<u8>,
    /// Whether a `data:` field was seen, even an empty one.
    have_data: bool,
}

impl SseParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed bytes to the parser, returning any frames they complete.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseMessage> {
        self.buffer.extend_from_slice(chunk);
        let mut messages = Vec::new();

        while let Some(line) = self.take_line() {
            if line.is_empty() {
                if let Some(message) = self.dispatch() {
                    messages.push(message);
                }
            } else {
                self.parse_field(&line);
            }
        }

        messages
    }

    /// Split the next complete line off the buffer, stripping the line
    /// terminator (`\n` or `\r\n`).
    fn take_line(&mut self) -> Option<BytesMut> {
        let pos = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line = self.buffer.split_to(pos + 1);
        line.truncate(pos);
        if line.last() == Some(&b'\r') {
            line.truncate(line.len() - 1);
        }
        Some(line)
    }

    /// Apply one non-blank line to the frame being assembled.
    fn parse_field(&mut self, line: &[u8]) {
        // Comment lines double as keepalives.
        if line.starts_with(b":") {
            return;
        }

        let (name, value) = match line.iter().position(|&b| b == b':') {
            Some(pos) => {
                let mut value = &line[pos + 1..];
                // A single space after the colon is part of the framing.
                if value.first() == Some(&b' ') {
                    value = &value[1..];
                }
                (&line[..pos], value)
            }
            None => (line, &[][..]),
        };

        match name {
            b"event" => self.event = Some(String::from_utf8_lossy(value).into_owned()),
            b"data" => {
                if self.have_data {
                    self.data.push(b'\n');
                }
                self.data.extend_from_slice(value);
                self.have_data = true;
            }
            b"id" => self.id = Some(String::from_utf8_lossy(value).into_owned()),
            // retry and unknown fields are ignored.
            _ => {}
        }
    }

    /// Finish the frame being assembled, if it carried any field at all.
    ///
    /// Blank lines following comment-only keepalives dispatch nothing.
    fn dispatch(&mut self) -> Option<SseMessage> {
        if self.event.is_none() && self.id.is_none() && !self.have_data {
            return None;
        }

        let message = SseMessage {
            event: self.event.take().unwrap_or_else(|| "message".to_owned()),
            id: self.id.take(),
            data: std::mem::take(&mut self.data),
        };
        self.have_data = false;
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_frame() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"event: message\ndata: {\"a\":1}\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].event, "message");
        assert_eq!(frames[0].data, b"{\"a\":1}");
        assert_eq!(frames[0].id, None);
    }

    #[test]
    fn test_frame_split_across_chunks() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b"data: {\"titl").is_empty());
        assert!(parser.feed(b"e\":\"Foo\"}").is_empty());
        let frames = parser.feed(b"\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, b"{\"title\":\"Foo\"}");
    }

    #[test]
    fn test_multiple_frames_in_one_chunk() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"data: one\n\ndata: two\n\n");
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].data, b"one");
        assert_eq!(frames[1].data, b"two");
    }

    #[test]
    fn test_multiline_data_joined_with_newline() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"data: first\ndata: second\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, b"first\nsecond");
    }

    #[test]
    fn test_default_event_name() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"data: x\n\n");
        assert_eq!(frames[0].event, "message");
    }

    #[test]
    fn test_custom_event_name() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"event: error\ndata: x\n\n");
        assert_eq!(frames[0].event, "error");
    }

    #[test]
    fn test_id_field() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"id: [{\"offset\":-1}]\ndata: x\n\n");
        assert_eq!(frames[0].id.as_deref(), Some("[{\"offset\":-1}]"));
    }

    #[test]
    fn test_comment_only_keepalive_dispatches_nothing() {
        let mut parser = SseParser::new();
        assert!(parser.feed(b": ok\n\n").is_empty());
        assert!(parser.feed(b":\n\n").is_empty());
    }

    #[test]
    fn test_empty_data_frame_is_dispatched() {
        // The first frame after connecting carries fields but no payload.
        let mut parser = SseParser::new();
        let frames = parser.feed(b"event: message\ndata: \n\n");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].data.is_empty());
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"event: message\r\ndata: {\"a\":1}\r\n\r\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, b"{\"a\":1}");
    }

    #[test]
    fn test_retry_field_ignored() {
        let mut parser = SseParser::new();
        let frames = parser.feed(b"retry: 3000\ndata: x\n\n");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].data, b"x");
    }

    #[test]
    fn test_field_without_colon_treated_as_name() {
        // "data" alone is a data field with an empty value.
        let mut parser = SseParser::new();
        let frames = parser.feed(b"data\n\n");
        assert_eq!(frames.len(), 1);
        assert!(frames[0].data.is_empty());
    }
}
