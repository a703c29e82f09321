//! # MAVLink protocol entities
//!
//! This module contains the `MAVLink 1` wire-level machinery: [`RunningChecksum`], validated
//! [`Frame`]s produced by a per-channel [`FrameDecoder`], and the [`MessageRegistry`] that turns
//! frame payloads into typed values and human-readable descriptions.

mod checksum;
mod decoder;
mod frame;
mod layout;
pub mod messages;
mod registry;

pub use checksum::{frame_checksum, RunningChecksum};
pub use decoder::{
    DecoderConf, DecoderConfBuilder, DecoderState, DecoderStats, FrameDecoder, FrameResult,
};
pub use frame::Frame;
pub use layout::{DecodedMessage, Field, FieldType, FieldValue, FormatFn, MessageSpec};
pub use registry::{DescribeMessage, MessageRegistry, MessageRegistryBuilder};

/// Packet sequence number.
pub type Sequence = u8;
/// MAVLink system `ID`.
pub type SystemId = u8;
/// MAVLink component `ID`.
pub type ComponentId = u8;
/// MAVLink message `ID`.
///
/// `MAVLink 1` transmits an 8-bit identifier, wider values are reserved for newer protocol
/// versions and custom registries.
pub type MessageId = u16;
/// Frame checksum.
pub type Checksum = u16;
/// Message-specific byte folded into the checksum to detect incompatible message definitions.
pub type CrcExtra = u8;
