use std::fs::{remove_file, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use mavterm::consts::STX_V1;
use mavterm::io::{Monitor, ScrollbackSink};
use mavterm::protocol::frame_checksum;
use mavterm::protocol::messages::{ATTITUDE, HEARTBEAT};
use mavterm::prelude::*;

const N_ITER: u8 = 100;

fn encode(sequence: u8, message_id: u8, payload: &[u8], crc_extra: u8) -> Vec<u8> {
    let header = [payload.len() as u8, sequence, 1, 1, message_id];
    let checksum = frame_checksum(&header, payload, crc_extra);

    let mut frame = vec![STX_V1];
    frame.extend_from_slice(&header);
    frame.extend_from_slice(payload);
    frame.extend_from_slice(&checksum.to_le_bytes());
    frame
}

fn write_capture(path: &Path) -> Result<()> {
    let mut file = File::create(path)?;

    for sequence in 0..N_ITER {
        let frame = if sequence % 2 == 0 {
            encode(sequence, 0, &[0, 0, 0, 0, 2, 3, 81, 4, 3], HEARTBEAT.crc_extra())
        } else {
            let mut payload = [0u8; 28];
            payload[4..8].copy_from_slice(&(sequence as f32 / 100.0).to_le_bytes());
            encode(sequence, 30, &payload, ATTITUDE.crc_extra())
        };
        file.write_all(&frame)?;
        // line noise between frames
        file.write_all(&[0x00, 0x55, sequence])?;
    }

    Ok(())
}

fn run(path: PathBuf) -> Result<ScrollbackSink> {
    write_capture(path.as_path())?;
    log::warn!("[writer] capture written to {path:?}");

    let file = File::open(path.as_path())?;
    let mut monitor = Monitor::new(path.display().to_string(), file, ScrollbackSink::new());
    monitor.run()?;

    for line in monitor.sink().lines().take(4) {
        log::info!("[reader] {line}");
    }
    log::warn!("[reader] {} descriptions", monitor.sink().len());

    Ok(monitor.into_sink())
}

fn main() {
    // Setup logger
    env_logger::builder()
        .filter_level(log::LevelFilter::Info) // Suppress everything below `info` for third-party modules.
        .filter_module(env!("CARGO_PKG_NAME"), log::LevelFilter::Info) // Log level for current package
        .init();

    let path = PathBuf::from("/tmp/mavterm.bin");
    if path.exists() {
        remove_file(path.as_path()).unwrap();
    }
    run(path).unwrap();
}

#[cfg(test)]
#[test]
fn file_monitor() {
    let path = std::env::temp_dir().join("mavterm_file_monitor.bin");
    if path.exists() {
        remove_file(path.as_path()).unwrap();
    }

    let sink = run(path).unwrap();
    let lines: Vec<_> = sink.lines().collect();

    assert_eq!(lines.len(), N_ITER as usize);
    assert_eq!(lines[0], "HEARTBEAT mavlink_version: 3");
    assert_eq!(lines[1], "ATTITUDE roll: 0.01 pitch: 0 yaw: 0");
}
