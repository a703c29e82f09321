//! Connection lifecycle events.

/// Lifecycle event of a byte source.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectionEvent {
    /// Source was opened and reading started.
    Opened {
        /// Source name.
        name: String,
    },
    /// Source reached its end.
    Closed {
        /// Source name.
        name: String,
    },
    /// Device behind the source disappeared.
    Removed {
        /// Source name.
        name: String,
    },
    /// Reading failed.
    Error {
        /// Source name.
        name: String,
        /// Error message.
        error: String,
    },
}

/// Receives [`ConnectionEvent`]s.
///
/// Implemented for closures accepting a [`ConnectionEvent`].
pub trait EventHandler {
    /// Handles an event.
    fn handle(&mut self, event: ConnectionEvent);
}

/// Handler that writes events to the log.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogEvents;

impl ConnectionEvent {
    /// Name of the source that emitted the event.
    pub fn name(&self) -> &str {
        match self {
            ConnectionEvent::Opened { name }
            | ConnectionEvent::Closed { name }
            | ConnectionEvent::Removed { name }
            | ConnectionEvent::Error { name, .. } => name,
        }
    }
}

impl<F: FnMut(ConnectionEvent)> EventHandler for F {
    fn handle(&mut self, event: ConnectionEvent) {
        self(event)
    }
}

impl EventHandler for LogEvents {
    fn handle(&mut self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Opened { name } => log::info!("[{name}] opened"),
            ConnectionEvent::Closed { name } => log::info!("[{name}] closed"),
            ConnectionEvent::Removed { name } => log::warn!("[{name}] device removed"),
            ConnectionEvent::Error { name, error } => log::error!("[{name}] {error}"),
        }
    }
}

#[cfg(test)]
mod events_tests {
    use super::*;

    #[test]
    fn closures_handle_events() {
        let mut received = Vec::new();
        {
            let mut handler = |event: ConnectionEvent| received.push(event);
            handler.handle(ConnectionEvent::Opened {
                name: "ttyACM0".to_string(),
            });
            LogEvents.handle(ConnectionEvent::Removed {
                name: "ttyACM0".to_string(),
            });
        }

        assert_eq!(received.len(), 1);
        assert_eq!(received[0].name(), "ttyACM0");
    }
}
