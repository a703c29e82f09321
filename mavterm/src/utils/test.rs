//! Test helpers.
//!
//! Encoding frames is not part of the public API, these helpers exist only to feed decoders.

use crate::consts::STX_V1;
use crate::protocol::{frame_checksum, CrcExtra};

/// `HEARTBEAT` frame from `1:1`, sequence `0`, `mavlink_version = 3`, checksum computed
/// independently of this crate.
pub const HEARTBEAT_V3_BYTES: [u8; 17] = [
    0xFE, 0x09, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x03, 0x51, 0x04, 0x03, 0x7D,
    0xDD,
];

/// Encodes a `MAVLink 1` frame.
pub fn encode_frame(
    sequence: u8,
    system_id: u8,
    component_id: u8,
    message_id: u8,
    payload: &[u8],
    crc_extra: CrcExtra,
) -> Vec<u8> {
    let header = [
        payload.len() as u8,
        sequence,
        system_id,
        component_id,
        message_id,
    ];
    let checksum = frame_checksum(&header, payload, crc_extra);

    let mut bytes = Vec::with_capacity(header.len() + payload.len() + 3);
    bytes.push(STX_V1);
    bytes.extend_from_slice(&header);
    bytes.extend_from_slice(payload);
    bytes.extend_from_slice(&checksum.to_le_bytes());
    bytes
}

/// Encodes a `HEARTBEAT` frame from `1:1`.
pub fn heartbeat_frame(sequence: u8, mavlink_version: u8) -> Vec<u8> {
    let payload = [0, 0, 0, 0, 0x02, 0x03, 0x51, 0x04, mavlink_version];
    encode_frame(sequence, 1, 1, 0, &payload, 50)
}

/// Encodes an `ATTITUDE` frame from `1:1`.
pub fn attitude_frame(sequence: u8, roll: f32, pitch: f32, yaw: f32) -> Vec<u8> {
    let mut payload = [0u8; 28];
    payload[4..8].copy_from_slice(&roll.to_le_bytes());
    payload[8..12].copy_from_slice(&pitch.to_le_bytes());
    payload[12..16].copy_from_slice(&yaw.to_le_bytes());
    encode_frame(sequence, 1, 1, 30, &payload, 39)
}
