use std::sync::Arc;

use bytes::{Buf, BytesMut};
use tokio_util::codec::Decoder;

use crate::protocol::{Frame, FrameDecoder, FrameResult, MessageRegistry};

use crate::prelude::*;

/// [`Decoder`] that splits a byte stream into validated `MAVLink 1` frames.
///
/// All buffered bytes are consumed on every call, incomplete frames are kept by the inner
/// [`FrameDecoder`]. Invalid frames are skipped.
#[derive(Clone, Debug, Default)]
pub struct MavlinkCodec {
    decoder: FrameDecoder,
}

impl MavlinkCodec {
    /// Creates a codec backed by the [standard](MessageRegistry::standard) registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec that validates frames with `registry`.
    pub fn with_registry(registry: Arc<MessageRegistry>) -> Self {
        Self::with_decoder(FrameDecoder::with_registry(registry))
    }

    /// Wraps an existing decoder.
    pub fn with_decoder(decoder: FrameDecoder) -> Self {
        Self { decoder }
    }

    /// Inner decoder.
    #[inline]
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }
}

impl Decoder for MavlinkCodec {
    type Item = Frame;
    type Error = Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>> {
        let mut consumed = 0;
        let mut found = None;

        for &byte in src.iter() {
            consumed += 1;
            if let FrameResult::Complete(frame) = self.decoder.feed(byte) {
                found = Some(frame);
                break;
            }
        }

        src.advance(consumed);
        Ok(found)
    }
}

#[cfg(test)]
mod codec_tests {
    use super::*;
    use crate::utils::test::{heartbeat_frame, HEARTBEAT_V3_BYTES};

    #[test]
    fn frames_are_split() {
        let mut bytes = heartbeat_frame(0, 3);
        bytes.extend(heartbeat_frame(1, 4));

        let mut codec = MavlinkCodec::new();
        let mut src = BytesMut::from(&bytes[..]);

        let first = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(first.sequence(), 0);
        assert_eq!(src.len(), 17);

        let second = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(second.sequence(), 1);
        assert!(src.is_empty());
        assert!(codec.decode(&mut src).unwrap().is_none());
    }

    #[test]
    fn partial_frames_are_kept() {
        let mut codec = MavlinkCodec::new();

        let mut src = BytesMut::from(&HEARTBEAT_V3_BYTES[..10]);
        assert!(codec.decode(&mut src).unwrap().is_none());
        assert!(src.is_empty());

        src.extend_from_slice(&HEARTBEAT_V3_BYTES[10..]);
        let frame = codec.decode(&mut src).unwrap().unwrap();
        assert_eq!(frame.payload(), &HEARTBEAT_V3_BYTES[6..15]);
    }
}
