//! # Mavterm
//!
//! A [MAVLink](https://mavlink.io/en/) monitor library. Mavterm reads `MAVLink 1` frames from a
//! byte stream (usually a serial link to a flight controller), validates them and renders every
//! received message as a single human-readable line such as `ATTITUDE roll: 0.1 pitch: 0.2 yaw: 0.3`.
//!
//! The stack is small:
//!
//! * [`protocol::FrameDecoder`] is a byte-at-a-time state machine that recovers frames from a noisy
//!   stream and validates their checksums.
//! * [`protocol::MessageRegistry`] maps message `ID`s to payload layouts and formatting rules.
//! * [`io::MessageDispatcher`] connects the two and produces description lines.
//!
//! Everything else in [`io`] is plumbing around byte sources: serial ports, capture files,
//! scrollback buffers, hot-plug notifications and [Tokio](https://tokio.rs) adapters.
//!
//! # Usage
//!
//! ```rust
//! use mavterm::prelude::*;
//!
//! let bytes = [
//!     0xFE, 0x09, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
//!     0x00, 0x02, 0x03, 0x51, 0x04, 0x03, 0x7D, 0xDD,
//! ];
//!
//! let mut dispatcher = MessageDispatcher::new();
//! for line in dispatcher.process(bytes) {
//!     print!("{line}");
//! }
//! ```
//!
//! # Features
#![doc = document_features::document_features!()]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod consts;
pub mod errors;
pub mod io;
pub mod prelude;
pub mod protocol;
mod utils;
