use std::fmt::{Debug, Formatter};
use std::io::Write;

use crate::consts::DEFAULT_SCROLLBACK_LINES;
use crate::utils::RingBuffer;

use crate::prelude::*;

/// Destination for message descriptions.
///
/// Descriptions arrive in the order frames were received, each terminated by a line break.
pub trait DescriptionSink {
    /// Appends a description.
    fn append(&mut self, description: &str) -> Result<()>;

    /// Removes everything appended so far, if the sink supports it.
    fn clear(&mut self) -> Result<()>;
}

/// Writes descriptions to any [`Write`] (stdout, files, sockets).
///
/// Output is flushed after each description. [`DescriptionSink::clear`] does nothing since
/// written data can't be taken back.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

/// Bounded in-memory scrollback.
///
/// Keeps the last [`ScrollbackSink::capacity`] lines, older lines are dropped.
pub struct ScrollbackSink {
    lines: RingBuffer<String>,
    open_line: bool,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DescriptionSink for WriterSink<W> {
    fn append(&mut self, description: &str) -> Result<()> {
        self.writer.write_all(description.as_bytes())?;
        self.writer.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        Ok(())
    }
}

impl ScrollbackSink {
    /// Creates a scrollback with [`DEFAULT_SCROLLBACK_LINES`] capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SCROLLBACK_LINES)
    }

    /// Creates a scrollback that keeps up to `lines` lines.
    pub fn with_capacity(lines: usize) -> Self {
        Self {
            lines: RingBuffer::new(lines),
            open_line: false,
        }
    }

    /// Maximum number of lines.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.lines.capacity()
    }

    /// Number of lines kept.
    #[inline]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Returns `true` if nothing is kept.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Kept lines from the oldest to the newest, without line breaks.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Kept text with line breaks.
    pub fn text(&self) -> String {
        let mut text = self.lines().collect::<Vec<_>>().join("\n");
        if !self.open_line && !self.lines.is_empty() {
            text.push('\n');
        }
        text
    }

    fn push_str(&mut self, text: &str) {
        for chunk in text.split_inclusive('\n') {
            let line = chunk.strip_suffix('\n').unwrap_or(chunk);

            if self.open_line {
                if let Some(last) = self.lines.last_mut() {
                    last.push_str(line);
                }
            } else {
                self.lines.push(line.to_string());
            }
            self.open_line = !chunk.ends_with('\n');
        }
    }
}

impl Default for ScrollbackSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for ScrollbackSink {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollbackSink")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("open_line", &self.open_line)
            .finish()
    }
}

impl DescriptionSink for ScrollbackSink {
    fn append(&mut self, description: &str) -> Result<()> {
        self.push_str(description);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.lines.clear();
        self.open_line = false;
        Ok(())
    }
}

impl DescriptionSink for Vec<String> {
    fn append(&mut self, description: &str) -> Result<()> {
        self.push(description.to_string());
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        Vec::clear(self);
        Ok(())
    }
}

#[cfg(test)]
mod sink_tests {
    use super::*;

    #[test]
    fn writer_sink_writes_descriptions() {
        let mut sink = WriterSink::new(Vec::new());

        sink.append("HEARTBEAT mavlink_version: 3\n").unwrap();
        sink.append("OTHER Message id 42 received\n").unwrap();
        sink.clear().unwrap();

        assert_eq!(
            String::from_utf8(sink.into_inner()).unwrap(),
            "HEARTBEAT mavlink_version: 3\nOTHER Message id 42 received\n"
        );
    }

    #[test]
    fn scrollback_splits_lines() {
        let mut sink = ScrollbackSink::with_capacity(10);

        sink.append("first\n").unwrap();
        sink.append("sec").unwrap();
        sink.append("ond\nthird\n").unwrap();

        assert_eq!(sink.lines().collect::<Vec<_>>(), vec!["first", "second", "third"]);
        assert_eq!(sink.text(), "first\nsecond\nthird\n");
    }

    #[test]
    fn scrollback_drops_oldest_lines() {
        let mut sink = ScrollbackSink::with_capacity(2);

        for n in 0..5 {
            sink.append(&format!("line {n}\n")).unwrap();
        }

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.lines().collect::<Vec<_>>(), vec!["line 3", "line 4"]);
    }

    #[test]
    fn scrollback_clear() {
        let mut sink = ScrollbackSink::new();
        assert_eq!(sink.capacity(), DEFAULT_SCROLLBACK_LINES);

        sink.append("partial").unwrap();
        sink.clear().unwrap();
        sink.append("fresh\n").unwrap();

        assert!(!sink.is_empty());
        assert_eq!(sink.text(), "fresh\n");
    }

    #[test]
    fn vec_sink() {
        let mut sink: Vec<String> = Vec::new();
        DescriptionSink::append(&mut sink, "a\n").unwrap();
        assert_eq!(sink, vec!["a\n"]);
        DescriptionSink::clear(&mut sink).unwrap();
        assert!(sink.is_empty());
    }
}
