//! # Common constants

use std::time::Duration;

/// `MAVLink 1` start-of-frame marker.
pub const STX_V1: u8 = 0xFE;
/// Length of a `MAVLink 1` header including the start marker.
pub const HEADER_V1_SIZE: usize = 6;
/// Length of a frame checksum.
pub const CHECKSUM_SIZE: usize = 2;
/// Maximum payload length that can be declared by a `MAVLink 1` header.
pub const PAYLOAD_MAX_SIZE: usize = 255;

/// Default serial port baud rate used by flight controllers on the telemetry link.
pub const DEFAULT_BAUD_RATE: u32 = 57_600;
/// Default read timeout for serial ports.
pub const SERIAL_CONN_TIMEOUT: Duration = Duration::from_millis(100);
/// Command that asks the PX4 shell on the remote end to start streaming MAVLink frames.
pub const DEFAULT_START_COMMAND: &str = "mavlink start -d /dev/ttyACM0\n";
/// Size of a single read from a byte source.
pub const READ_CHUNK_SIZE: usize = 1024;

/// Time after which a delivered notification is removed.
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(3);
/// Default number of lines kept by a scrollback sink.
pub const DEFAULT_SCROLLBACK_LINES: usize = 10_000;
