//! MAVLink frame.

use std::fmt::{Debug, Formatter};

use crate::protocol::{Checksum, ComponentId, MessageId, Sequence, SystemId};

/// Validated `MAVLink 1` frame.
///
/// Frames are produced by [`FrameDecoder`](crate::protocol::FrameDecoder) only after the checksum
/// has been verified, so the payload length always equals the length declared by the header.
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    sequence: Sequence,
    system_id: SystemId,
    component_id: ComponentId,
    message_id: MessageId,
    payload: Vec<u8>,
    checksum: Checksum,
}

impl Frame {
    pub(crate) fn new(
        sequence: Sequence,
        system_id: SystemId,
        component_id: ComponentId,
        message_id: MessageId,
        payload: Vec<u8>,
        checksum: Checksum,
    ) -> Self {
        Self {
            sequence,
            system_id,
            component_id,
            message_id,
            payload,
            checksum,
        }
    }

    /// Packet sequence number.
    #[inline]
    pub fn sequence(&self) -> Sequence {
        self.sequence
    }

    /// System `ID`.
    #[inline]
    pub fn system_id(&self) -> SystemId {
        self.system_id
    }

    /// Component `ID`.
    #[inline]
    pub fn component_id(&self) -> ComponentId {
        self.component_id
    }

    /// Message `ID`.
    #[inline]
    pub fn message_id(&self) -> MessageId {
        self.message_id
    }

    /// Payload length.
    #[inline]
    pub fn payload_length(&self) -> u8 {
        self.payload.len() as u8
    }

    /// Payload data.
    #[inline]
    pub fn payload(&self) -> &[u8] {
        self.payload.as_slice()
    }

    /// Frame checksum as received (and verified).
    #[inline]
    pub fn checksum(&self) -> Checksum {
        self.checksum
    }

    /// Consumes the frame and returns its payload.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl Debug for Frame {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("sequence", &self.sequence)
            .field("system_id", &self.system_id)
            .field("component_id", &self.component_id)
            .field("message_id", &self.message_id)
            .field("payload_length", &self.payload.len())
            .field("checksum", &format_args!("{:#06x}", self.checksum))
            .finish()
    }
}
