//! # Errors
//!
//! The main error type is [`Error`]. Frame-level problems are described by [`FrameError`]. None
//! of the frame errors are fatal: the decoder reports them, drops the candidate frame and carries
//! on scanning the stream.

use crate::protocol::{Checksum, MessageId};

/// Common result type returned by `mavterm` functions.
pub type Result<T> = std::result::Result<T, Error>;

/// `mavterm` top-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error of the underlying byte source or sink.
    #[error("I/O error: {0:?}")]
    Io(#[from] std::io::Error),

    /// Serial port error.
    #[cfg(feature = "sync")]
    #[error("serial port error: {0:?}")]
    Serial(#[from] serialport::Error),

    /// Frame error.
    #[error("frame error: {0:?}")]
    Frame(#[from] FrameError),
}

/// Errors related to `MAVLink 1` frames and their payloads.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum FrameError {
    /// Checksum received with a frame does not match the calculated one.
    #[error("checksum mismatch: received {expected:#06x}, calculated {calculated:#06x}")]
    ChecksumMismatch {
        /// Checksum received with the frame.
        expected: Checksum,
        /// Checksum calculated over the received bytes.
        calculated: Checksum,
    },

    /// Header declares a payload that does not fit into the decoder buffer.
    #[error("payload of {length} bytes exceeds decoder limit of {max} bytes")]
    PayloadOverflow {
        /// Declared payload length.
        length: usize,
        /// Maximum payload length accepted by the decoder.
        max: usize,
    },

    /// Payload length does not match the layout of a known message.
    #[error("message #{id} expects {expected} payload bytes, got {actual}")]
    PayloadLength {
        /// Message `ID`.
        id: MessageId,
        /// Declared payload length of the message.
        expected: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// Field is not part of a decoded message.
    #[error("message #{id} has no field `{field}`")]
    UnknownField {
        /// Message `ID`.
        id: MessageId,
        /// Field name.
        field: &'static str,
    },
}
