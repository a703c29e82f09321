use mavterm::consts::STX_V1;
use mavterm::protocol::frame_checksum;
use mavterm::protocol::messages::{ATTITUDE, HEARTBEAT, VFR_HUD};

fn encode(sequence: u8, message_id: u8, payload: &[u8], crc_extra: u8) -> Vec<u8> {
    let header = [payload.len() as u8, sequence, 1, 1, message_id];
    let checksum = frame_checksum(&header, payload, crc_extra);

    let mut frame = vec![STX_V1];
    frame.extend_from_slice(&header);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&checksum.to_le_bytes());
    frame
}

/// Generates a telemetry capture of `n_frames` frames with a few bytes of line noise between them.
///
/// Every tenth frame has a broken checksum.
pub fn make_capture(n_frames: usize) -> Vec<u8> {
    let mut capture = Vec::new();

    for i in 0..n_frames {
        let sequence = (i % 256) as u8;
        let mut frame = match i % 3 {
            0 => encode(sequence, 0, &[0, 0, 0, 0, 2, 3, 81, 4, 3], HEARTBEAT.crc_extra()),
            1 => {
                let mut payload = [0u8; 28];
                payload[4..8].copy_from_slice(&(i as f32 / 1000.0).to_le_bytes());
                encode(sequence, 30, &payload, ATTITUDE.crc_extra())
            }
            _ => {
                let mut payload = [0u8; 20];
                payload[16..18].copy_from_slice(&((i % 360) as i16).to_le_bytes());
                encode(sequence, 74, &payload, VFR_HUD.crc_extra())
            }
        };

        if i % 10 == 9 {
            let last = frame.len() - 1;
            frame[last] ^= 0xFF;
        }

        capture.extend(frame);
        capture.extend([0x00, 0x55, 0xAA]);
    }

    capture
}
