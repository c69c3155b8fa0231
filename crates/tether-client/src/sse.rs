//! Incremental parser for server-sent event streams.
//!
//! Frames arrive as arbitrary byte chunks; events are delimited by a blank
//! line. Only `data:` fields carry payloads here, while `event:`, `id:`,
//! `retry:` and comment lines are skipped. A trailing partial event stays
//! buffered until more bytes arrive.

/// Stateful SSE framer. Feed it decoded text chunks, get back the data
/// payloads of every event completed so far, in arrival order.
#[derive(Debug, Default)]
pub struct SseParser {
    buffer: String,
}

impl SseParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one transport chunk and return the completed event payloads.
    pub fn push(&mut self, chunk: &str) -> Vec<String> {
        self.buffer.push_str(chunk);

        let mut payloads = Vec::new();
        while let Some(pos) = self.buffer.find("\n\n") {
            let event_text = self.buffer[..pos].to_string();
            self.buffer.drain(..pos + 2);

            if let Some(data) = parse_event(&event_text) {
                payloads.push(data);
            }
        }
        payloads
    }

    /// True if a partial event is still sitting in the buffer.
    pub fn has_partial(&self) -> bool {
        !self.buffer.trim().is_empty()
    }
}

/// Extract the joined `data:` payload of one event block, if any.
fn parse_event(event_text: &str) -> Option<String> {
    let mut data_lines = Vec::new();
    for line in event_text.lines() {
        let line = line.trim_end_matches('\r');
        if line.starts_with(':') {
            continue; // comment / keep-alive
        }
        if let Some(rest) = line.strip_prefix("data:") {
            data_lines.push(rest.strip_prefix(' ').unwrap_or(rest));
        }
    }
    if data_lines.is_empty() {
        None
    } else {
        Some(data_lines.join("\n"))
    }
}
