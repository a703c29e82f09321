//! Per-channel `MAVLink 1` frame decoder.

use std::fmt::{Debug, Formatter};
use std::mem;
use std::sync::Arc;

use crate::consts::{PAYLOAD_MAX_SIZE, STX_V1};
use crate::errors::FrameError;
use crate::protocol::{
    ComponentId, CrcExtra, Frame, MessageId, MessageRegistry, RunningChecksum, Sequence, SystemId,
};

/// Position of a [`FrameDecoder`] within a frame.
///
/// The state is exposed to make partially received frames observable.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DecoderState {
    /// Scanning for the start-of-frame marker.
    #[default]
    Idle,
    /// Start marker received.
    SawStart,
    /// Payload length received.
    HaveLength,
    /// Sequence number received.
    HaveSequence,
    /// System `ID` received.
    HaveSystemId,
    /// Component `ID` received.
    HaveComponentId,
    /// Message `ID` received, no payload bytes yet.
    HaveMessageId,
    /// Collecting payload bytes.
    AccumulatingPayload,
    /// Low byte of the checksum received.
    HaveChecksumByte1,
}

/// Result of feeding a byte to a [`FrameDecoder`].
#[derive(Clone, Debug, PartialEq)]
pub enum FrameResult {
    /// No complete frame yet.
    Incomplete,
    /// A frame with a valid checksum.
    Complete(Frame),
    /// A candidate frame was dropped.
    Invalid(FrameError),
}

/// Configuration for a [`FrameDecoder`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecoderConf {
    max_payload_len: usize,
}

/// Builder for [`DecoderConf`].
#[derive(Clone, Debug, Default)]
pub struct DecoderConfBuilder {
    inner: DecoderConf,
}

/// Counters of a [`FrameDecoder`].
///
/// Dropped frames are never reported to consumers of descriptions, these counters are the only
/// place where they can be observed.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DecoderStats {
    /// Total number of bytes fed.
    pub bytes: u64,
    /// Bytes skipped while scanning for a start marker.
    pub discarded_bytes: u64,
    /// Frames with a valid checksum.
    pub frames: u64,
    /// Frames dropped because of a checksum mismatch.
    pub checksum_mismatches: u64,
    /// Frames dropped because their payload exceeded [`DecoderConf::max_payload_len`].
    pub overflows: u64,
}

/// Byte-at-a-time `MAVLink 1` frame decoder.
///
/// Each channel (usually a single serial connection) needs its own decoder. A decoder scans for
/// the start marker, collects header and payload, and validates the checksum seeded with the
/// [`CrcExtra`] provided by its [`MessageRegistry`]. Frames of unknown messages are validated
/// with a zero seed.
///
/// A start marker inside a frame is treated as ordinary data. After a frame is either emitted or
/// dropped, the decoder returns to [`DecoderState::Idle`] and continues with the next byte.
///
/// # Usage
///
/// ```rust
/// use mavterm::protocol::{FrameDecoder, FrameResult};
///
/// let bytes = [
///     0xFE, 0x09, 0x00, 0x01, 0x01, 0x00,             // header
///     0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0x51, 0x04, // payload
///     0x03,
///     0x7D, 0xDD,                                     // checksum
/// ];
///
/// let mut decoder = FrameDecoder::new();
/// let frames: Vec<_> = bytes
///     .iter()
///     .filter_map(|&byte| match decoder.feed(byte) {
///         FrameResult::Complete(frame) => Some(frame),
///         _ => None,
///     })
///     .collect();
///
/// assert_eq!(frames.len(), 1);
/// assert_eq!(frames[0].payload()[8], 3);
/// ```
#[derive(Clone)]
pub struct FrameDecoder {
    registry: Arc<MessageRegistry>,
    conf: DecoderConf,
    state: DecoderState,
    length: u8,
    sequence: Sequence,
    system_id: SystemId,
    component_id: ComponentId,
    message_id: MessageId,
    crc_extra: CrcExtra,
    payload: Vec<u8>,
    checksum: RunningChecksum,
    checksum_low: u8,
    stats: DecoderStats,
}

impl Default for DecoderConf {
    fn default() -> Self {
        Self {
            max_payload_len: PAYLOAD_MAX_SIZE,
        }
    }
}

impl DecoderConf {
    /// Creates a builder with default settings.
    pub fn builder() -> DecoderConfBuilder {
        DecoderConfBuilder::default()
    }

    /// Largest payload the decoder accepts. Defaults to [`PAYLOAD_MAX_SIZE`].
    #[inline]
    pub fn max_payload_len(&self) -> usize {
        self.max_payload_len
    }
}

impl DecoderConfBuilder {
    /// Builds [`DecoderConf`].
    pub fn build(self) -> DecoderConf {
        self.inner
    }

    /// Sets maximum accepted payload length. Values above [`PAYLOAD_MAX_SIZE`] are clamped.
    pub fn max_payload_len(mut self, max_payload_len: usize) -> Self {
        self.inner.max_payload_len = max_payload_len.min(PAYLOAD_MAX_SIZE);
        self
    }
}

impl FrameDecoder {
    /// Creates a decoder backed by the [standard](MessageRegistry::standard) registry.
    pub fn new() -> Self {
        Self::with_registry(MessageRegistry::standard())
    }

    /// Creates a decoder that takes [`CrcExtra`] values from `registry`.
    pub fn with_registry(registry: Arc<MessageRegistry>) -> Self {
        Self::with_conf(registry, DecoderConf::default())
    }

    /// Creates a decoder with custom configuration.
    pub fn with_conf(registry: Arc<MessageRegistry>, conf: DecoderConf) -> Self {
        let payload = Vec::with_capacity(conf.max_payload_len);
        Self {
            registry,
            conf,
            state: DecoderState::Idle,
            length: 0,
            sequence: 0,
            system_id: 0,
            component_id: 0,
            message_id: 0,
            crc_extra: 0,
            payload,
            checksum: RunningChecksum::seed(),
            checksum_low: 0,
            stats: DecoderStats::default(),
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> DecoderState {
        self.state
    }

    /// Decoder counters.
    #[inline]
    pub fn stats(&self) -> DecoderStats {
        self.stats
    }

    /// Decoder configuration.
    #[inline]
    pub fn conf(&self) -> &DecoderConf {
        &self.conf
    }

    /// Registry used to look up [`CrcExtra`].
    #[inline]
    pub fn registry(&self) -> &Arc<MessageRegistry> {
        &self.registry
    }

    /// Payload bytes of the frame being received.
    #[inline]
    pub fn buffered_payload(&self) -> &[u8] {
        self.payload.as_slice()
    }

    /// Drops the frame being received and returns to [`DecoderState::Idle`].
    ///
    /// Counters are kept.
    pub fn reset(&mut self) {
        self.state = DecoderState::Idle;
        self.payload.clear();
        self.checksum = RunningChecksum::seed();
    }

    /// Feeds a single byte.
    pub fn feed(&mut self, byte: u8) -> FrameResult {
        self.stats.bytes += 1;

        match self.state {
            DecoderState::Idle => {
                if byte == STX_V1 {
                    self.reset();
                    self.state = DecoderState::SawStart;
                } else {
                    self.stats.discarded_bytes += 1;
                }
            }
            DecoderState::SawStart => {
                if byte as usize > self.conf.max_payload_len {
                    return self.overflow(byte);
                }
                self.length = byte;
                self.accumulate(byte);
                self.state = DecoderState::HaveLength;
            }
            DecoderState::HaveLength => {
                self.sequence = byte;
                self.accumulate(byte);
                self.state = DecoderState::HaveSequence;
            }
            DecoderState::HaveSequence => {
                self.system_id = byte;
                self.accumulate(byte);
                self.state = DecoderState::HaveSystemId;
            }
            DecoderState::HaveSystemId => {
                self.component_id = byte;
                self.accumulate(byte);
                self.state = DecoderState::HaveComponentId;
            }
            DecoderState::HaveComponentId => {
                self.message_id = byte as MessageId;
                self.crc_extra = self.registry.crc_extra(self.message_id).unwrap_or(0);
                self.accumulate(byte);
                self.state = DecoderState::HaveMessageId;
            }
            DecoderState::HaveMessageId | DecoderState::AccumulatingPayload => {
                if self.payload.len() < self.length as usize {
                    self.payload.push(byte);
                    self.accumulate(byte);
                    self.state = DecoderState::AccumulatingPayload;
                } else {
                    self.checksum_low = byte;
                    self.state = DecoderState::HaveChecksumByte1;
                }
            }
            DecoderState::HaveChecksumByte1 => return self.complete(byte),
        }

        FrameResult::Incomplete
    }

    /// Feeds `bytes` and returns an iterator over valid frames.
    ///
    /// Bytes are consumed lazily, dropped frames are skipped.
    pub fn frames<'a, I>(&'a mut self, bytes: I) -> impl Iterator<Item = Frame> + 'a
    where
        I: IntoIterator<Item = u8>,
        I::IntoIter: 'a,
    {
        bytes
            .into_iter()
            .filter_map(move |byte| match self.feed(byte) {
                FrameResult::Complete(frame) => Some(frame),
                _ => None,
            })
    }

    #[inline]
    fn accumulate(&mut self, byte: u8) {
        self.checksum = mem::take(&mut self.checksum).update(byte);
    }

    fn overflow(&mut self, length: u8) -> FrameResult {
        let err = FrameError::PayloadOverflow {
            length: length as usize,
            max: self.conf.max_payload_len,
        };
        log::debug!("[decoder] dropping frame: {err}");

        self.stats.overflows += 1;
        self.reset();
        FrameResult::Invalid(err)
    }

    fn complete(&mut self, checksum_high: u8) -> FrameResult {
        let expected = u16::from_le_bytes([self.checksum_low, checksum_high]);
        let calculated = mem::take(&mut self.checksum)
            .extra(self.crc_extra)
            .finalize();
        let payload = mem::replace(
            &mut self.payload,
            Vec::with_capacity(self.conf.max_payload_len),
        );
        self.reset();

        if expected != calculated {
            let err = FrameError::ChecksumMismatch {
                expected,
                calculated,
            };
            log::debug!(
                "[decoder] dropping frame #{} (message #{}) from {}:{}: {err}",
                self.sequence,
                self.message_id,
                self.system_id,
                self.component_id,
            );
            self.stats.checksum_mismatches += 1;
            return FrameResult::Invalid(err);
        }

        self.stats.frames += 1;
        log::trace!(
            "[decoder] frame #{} (message #{}) from {}:{}",
            self.sequence,
            self.message_id,
            self.system_id,
            self.component_id,
        );

        FrameResult::Complete(Frame::new(
            self.sequence,
            self.system_id,
            self.component_id,
            self.message_id,
            payload,
            expected,
        ))
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for FrameDecoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameDecoder")
            .field("state", &self.state)
            .field("buffered", &self.payload.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl FrameResult {
    /// Returns `true` if a valid frame was produced.
    #[inline]
    pub fn is_complete(&self) -> bool {
        matches!(self, FrameResult::Complete(_))
    }

    /// Returns `true` if a candidate frame was dropped.
    #[inline]
    pub fn is_invalid(&self) -> bool {
        matches!(self, FrameResult::Invalid(_))
    }

    /// Converts result into an optional frame.
    pub fn into_frame(self) -> Option<Frame> {
        match self {
            FrameResult::Complete(frame) => Some(frame),
            _ => None,
        }
    }
}

#[cfg(test)]
mod decoder_tests {
    use super::*;
    use crate::protocol::messages::{ATTITUDE_ID, HEARTBEAT_ID};
    use crate::utils::test::{encode_frame, heartbeat_frame, HEARTBEAT_V3_BYTES};

    fn feed_all(decoder: &mut FrameDecoder, bytes: &[u8]) -> Vec<FrameResult> {
        bytes
            .iter()
            .map(|&byte| decoder.feed(byte))
            .filter(|result| *result != FrameResult::Incomplete)
            .collect()
    }

    #[test]
    fn decodes_known_heartbeat_bytes() {
        let mut decoder = FrameDecoder::new();
        let results = feed_all(&mut decoder, &HEARTBEAT_V3_BYTES);

        assert_eq!(results.len(), 1);
        let frame = results[0].clone().into_frame().unwrap();
        assert_eq!(frame.message_id(), HEARTBEAT_ID);
        assert_eq!(frame.sequence(), 0);
        assert_eq!(frame.system_id(), 1);
        assert_eq!(frame.component_id(), 1);
        assert_eq!(frame.checksum(), 0xDD7D);
        assert_eq!(decoder.state(), DecoderState::Idle);
    }

    #[test]
    fn round_trip_fields() {
        let payload = [1u8, 2, 3, 4, 5];
        let bytes = encode_frame(42, 7, 200, 77, &payload, 0);
        let mut decoder = FrameDecoder::new();

        let frame = feed_all(&mut decoder, &bytes)
            .pop()
            .and_then(FrameResult::into_frame)
            .unwrap();

        assert_eq!(frame.sequence(), 42);
        assert_eq!(frame.system_id(), 7);
        assert_eq!(frame.component_id(), 200);
        assert_eq!(frame.message_id(), 77);
        assert_eq!(frame.payload(), &payload);
        assert_eq!(frame.payload_length(), 5);
    }

    #[test]
    fn states_are_observable() {
        let bytes = heartbeat_frame(3, 3);
        let mut decoder = FrameDecoder::new();
        let expected = [
            DecoderState::SawStart,
            DecoderState::HaveLength,
            DecoderState::HaveSequence,
            DecoderState::HaveSystemId,
            DecoderState::HaveComponentId,
            DecoderState::HaveMessageId,
            DecoderState::AccumulatingPayload,
        ];

        for (byte, state) in bytes.iter().zip(expected.iter()) {
            assert_eq!(decoder.feed(*byte), FrameResult::Incomplete);
            assert_eq!(decoder.state(), *state);
        }
        assert_eq!(decoder.buffered_payload().len(), 1);

        let checksum_low = bytes.len() - 2;
        for &byte in &bytes[7..checksum_low] {
            decoder.feed(byte);
        }
        assert_eq!(decoder.state(), DecoderState::AccumulatingPayload);
        decoder.feed(bytes[checksum_low]);
        assert_eq!(decoder.state(), DecoderState::HaveChecksumByte1);
        assert!(decoder.feed(bytes[checksum_low + 1]).is_complete());
        assert_eq!(decoder.state(), DecoderState::Idle);
    }

    #[test]
    fn empty_payload() {
        let bytes = encode_frame(1, 1, 1, 99, &[], 0);
        let mut decoder = FrameDecoder::new();

        for &byte in &bytes[..6] {
            decoder.feed(byte);
        }
        assert_eq!(decoder.state(), DecoderState::HaveMessageId);
        decoder.feed(bytes[6]);
        assert_eq!(decoder.state(), DecoderState::HaveChecksumByte1);

        let frame = decoder.feed(bytes[7]).into_frame().unwrap();
        assert!(frame.payload().is_empty());
    }

    #[test]
    fn start_marker_inside_payload() {
        let payload = [STX_V1, STX_V1, 0x00, STX_V1];
        let bytes = encode_frame(5, 1, 1, 120, &payload, 0);
        let mut decoder = FrameDecoder::new();

        let frame = feed_all(&mut decoder, &bytes)
            .pop()
            .and_then(FrameResult::into_frame)
            .unwrap();
        assert_eq!(frame.payload(), &payload);
    }

    #[test]
    fn checksum_mismatch_is_dropped() {
        let mut bytes = heartbeat_frame(0, 3);
        bytes[8] ^= 0x01;
        bytes.extend(heartbeat_frame(1, 3));

        let mut decoder = FrameDecoder::new();
        let results = feed_all(&mut decoder, &bytes);

        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[0],
            FrameResult::Invalid(FrameError::ChecksumMismatch { .. })
        ));
        assert_eq!(results[1].clone().into_frame().unwrap().sequence(), 1);
        assert_eq!(decoder.stats().checksum_mismatches, 1);
        assert_eq!(decoder.stats().frames, 1);
    }

    #[test]
    fn wrong_crc_extra_is_rejected() {
        // ATTITUDE payload sealed with HEARTBEAT's extra byte
        let bytes = encode_frame(0, 1, 1, ATTITUDE_ID as u8, &[0u8; 28], 50);
        let mut decoder = FrameDecoder::new();

        assert!(feed_all(&mut decoder, &bytes)[0].is_invalid());
    }

    #[test]
    fn noise_is_skipped() {
        let mut bytes = vec![0x00, 0x13, 0x37, 0xFF, 0xFD];
        bytes.extend(heartbeat_frame(9, 3));

        let mut decoder = FrameDecoder::new();
        let results = feed_all(&mut decoder, &bytes);

        assert_eq!(results.len(), 1);
        assert!(results[0].is_complete());
        assert_eq!(decoder.stats().discarded_bytes, 5);
    }

    #[test]
    fn payload_overflow_resets() {
        let conf = DecoderConf::builder().max_payload_len(8).build();
        let mut decoder = FrameDecoder::with_conf(MessageRegistry::standard(), conf);

        let mut bytes = heartbeat_frame(0, 3);
        bytes.extend(encode_frame(1, 1, 1, 99, &[1, 2], 0));
        let results = feed_all(&mut decoder, &bytes);

        assert!(matches!(
            results[0],
            FrameResult::Invalid(FrameError::PayloadOverflow { length: 9, max: 8 })
        ));
        assert_eq!(results.last().unwrap().clone().into_frame().unwrap().message_id(), 99);
        assert_eq!(decoder.stats().overflows, 1);
    }

    #[test]
    fn max_payload_is_clamped() {
        let conf = DecoderConf::builder().max_payload_len(1000).build();
        assert_eq!(conf.max_payload_len(), PAYLOAD_MAX_SIZE);
    }

    #[test]
    fn idle_forever_without_frames() {
        let mut decoder = FrameDecoder::new();
        for byte in 0..=0xFDu8 {
            assert_eq!(decoder.feed(byte), FrameResult::Incomplete);
        }
        assert_eq!(decoder.state(), DecoderState::Idle);
        assert_eq!(decoder.stats().bytes, 0xFE);
    }

    #[test]
    fn frames_iterator() {
        let mut bytes = heartbeat_frame(0, 3);
        bytes.extend(heartbeat_frame(1, 3));

        let mut decoder = FrameDecoder::new();
        let sequences: Vec<_> = decoder.frames(bytes).map(|frame| frame.sequence()).collect();

        assert_eq!(sequences, vec![0, 1]);
    }
}
