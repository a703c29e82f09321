use std::borrow::Borrow;
use std::sync::Arc;

use crate::protocol::{Frame, FrameDecoder, FrameResult, MessageRegistry};

/// Terminator appended to each description.
pub const LINE_TERMINATOR: &str = "\n";

/// Turns a byte stream of a single channel into message descriptions.
///
/// Dispatcher owns a [`FrameDecoder`], so its output depends on all bytes processed so far:
/// processing the same bytes twice does not yield the same descriptions. Create a new dispatcher
/// to start over.
///
/// Dropped frames (bad checksum, oversized payload) produce no output. Use
/// [`FrameDecoder::stats`] through [`MessageDispatcher::decoder`] to observe them.
///
/// # Usage
///
/// ```rust
/// use mavterm::io::MessageDispatcher;
///
/// let bytes = [
///     0xFE, 0x09, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
///     0x00, 0x02, 0x03, 0x51, 0x04, 0x03, 0x7D, 0xDD,
/// ];
///
/// let mut dispatcher = MessageDispatcher::new();
/// let (head, tail) = bytes.split_at(5);
///
/// assert_eq!(dispatcher.process(head).count(), 0);
/// assert_eq!(
///     dispatcher.process(tail).collect::<Vec<_>>(),
///     vec!["HEARTBEAT mavlink_version: 3\n"]
/// );
/// ```
#[derive(Clone, Debug)]
pub struct MessageDispatcher {
    decoder: FrameDecoder,
}

/// Lazy iterator over descriptions returned by [`MessageDispatcher::process`].
///
/// Bytes are pulled from the source only as far as needed to produce the next description.
pub struct Descriptions<'a, I> {
    dispatcher: &'a mut MessageDispatcher,
    bytes: I,
}

impl MessageDispatcher {
    /// Creates a dispatcher backed by the [standard](MessageRegistry::standard) registry.
    pub fn new() -> Self {
        Self::with_decoder(FrameDecoder::new())
    }

    /// Creates a dispatcher that decodes and describes messages using `registry`.
    pub fn with_registry(registry: Arc<MessageRegistry>) -> Self {
        Self::with_decoder(FrameDecoder::with_registry(registry))
    }

    /// Creates a dispatcher from an existing decoder, descriptions come from the decoder's
    /// registry.
    pub fn with_decoder(decoder: FrameDecoder) -> Self {
        Self { decoder }
    }

    /// Channel decoder.
    #[inline]
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Registry used for descriptions.
    #[inline]
    pub fn registry(&self) -> &Arc<MessageRegistry> {
        self.decoder.registry()
    }

    /// Feeds a single byte, returns a description if it completed a valid frame.
    pub fn dispatch(&mut self, byte: u8) -> Option<String> {
        match self.decoder.feed(byte) {
            FrameResult::Complete(frame) => Some(description_line(self.registry(), &frame)),
            FrameResult::Invalid(_) | FrameResult::Incomplete => None,
        }
    }

    /// Processes a chunk of bytes.
    ///
    /// Chunks may split frames at any position.
    pub fn process<I>(&mut self, bytes: I) -> Descriptions<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: Borrow<u8>,
    {
        Descriptions {
            dispatcher: self,
            bytes: bytes.into_iter(),
        }
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl<I> Iterator for Descriptions<'_, I>
where
    I: Iterator,
    I::Item: Borrow<u8>,
{
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let byte = *self.bytes.next()?.borrow();
            if let Some(description) = self.dispatcher.dispatch(byte) {
                return Some(description);
            }
        }
    }
}

/// Describes a frame as a terminated line.
pub(crate) fn description_line(registry: &MessageRegistry, frame: &Frame) -> String {
    let mut line = registry.describe_frame(frame);
    line.push_str(LINE_TERMINATOR);
    line
}
