//! # Monitor I/O
//!
//! Turns byte sources into message descriptions. [`MessageDispatcher`] is the core, the rest are
//! collaborators: serial ports ([`SerialConf`]), a blocking read loop ([`Monitor`]), description
//! sinks and hot-plug notifications.

#[cfg(feature = "async")]
pub mod asnc;
mod dispatcher;
mod events;
mod hotplug;
mod monitor;
mod serial;
mod sink;

pub use dispatcher::{Descriptions, MessageDispatcher, LINE_TERMINATOR};
pub use events::{ConnectionEvent, EventHandler, LogEvents};
pub use hotplug::{
    notify, schedule_removal, LogNotifier, Notification, Notifier, PortChange, PortWatcher,
};
pub use monitor::Monitor;
#[cfg(feature = "sync")]
pub use serial::available_ports;
pub use serial::{Parity, SerialConf, SerialConfBuilder, StopBits};
pub use sink::{DescriptionSink, ScrollbackSink, WriterSink};
