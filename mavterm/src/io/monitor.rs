use std::io::{ErrorKind, Read};

use crate::consts::READ_CHUNK_SIZE;
use crate::io::{ConnectionEvent, DescriptionSink, EventHandler, LogEvents, MessageDispatcher};

use crate::prelude::*;

/// Reads bytes from a blocking source and writes message descriptions to a sink.
///
/// Read time-outs are treated as idle periods. The decoder keeps its state across reads and read
/// errors, so a frame split between two reads is still recognized.
///
/// # Usage
///
/// ```rust
/// use std::io::Cursor;
/// use mavterm::io::{Monitor, ScrollbackSink};
///
/// let capture = vec![
///     0xFE, 0x09, 0x00, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00,
///     0x00, 0x02, 0x03, 0x51, 0x04, 0x03, 0x7D, 0xDD,
/// ];
///
/// let mut monitor = Monitor::new("capture", Cursor::new(capture), ScrollbackSink::new());
/// monitor.run().unwrap();
///
/// assert_eq!(monitor.sink().text(), "HEARTBEAT mavlink_version: 3\n");
/// ```
pub struct Monitor<R: Read, S: DescriptionSink, H: EventHandler = LogEvents> {
    name: String,
    reader: R,
    dispatcher: MessageDispatcher,
    sink: S,
    events: H,
    buffer: Vec<u8>,
}

impl<R: Read, S: DescriptionSink> Monitor<R, S> {
    /// Creates a monitor with a standard dispatcher that logs connection events.
    pub fn new(name: impl Into<String>, reader: R, sink: S) -> Self {
        Self {
            name: name.into(),
            reader,
            dispatcher: MessageDispatcher::new(),
            sink,
            events: LogEvents,
            buffer: vec![0; READ_CHUNK_SIZE],
        }
    }
}

impl<R: Read, S: DescriptionSink, H: EventHandler> Monitor<R, S, H> {
    /// Replaces the event handler.
    pub fn with_events<E: EventHandler>(self, events: E) -> Monitor<R, S, E> {
        Monitor {
            name: self.name,
            reader: self.reader,
            dispatcher: self.dispatcher,
            sink: self.sink,
            events,
            buffer: self.buffer,
        }
    }

    /// Replaces the dispatcher.
    pub fn with_dispatcher(mut self, dispatcher: MessageDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Source name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Channel dispatcher.
    #[inline]
    pub fn dispatcher(&self) -> &MessageDispatcher {
        &self.dispatcher
    }

    /// Description sink.
    #[inline]
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the monitor and returns its sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Performs a single read and dispatches received bytes.
    ///
    /// Returns the number of bytes read, `Some(0)` at the end of the source and [`None`] if the
    /// read timed out.
    pub fn poll(&mut self) -> Result<Option<usize>> {
        let read = match self.reader.read(&mut self.buffer) {
            Ok(read) => read,
            Err(err) if is_idle(err.kind()) => return Ok(None),
            Err(err) => return Err(err.into()),
        };

        for description in self.dispatcher.process(&self.buffer[..read]) {
            self.sink.append(&description)?;
        }

        Ok(Some(read))
    }

    /// Reads the source until it ends or fails.
    ///
    /// Emits [`ConnectionEvent::Opened`] first. A source that reaches its end emits
    /// [`ConnectionEvent::Closed`], a vanished device emits [`ConnectionEvent::Removed`]. Other
    /// failures are reported as [`ConnectionEvent::Error`] and returned.
    pub fn run(&mut self) -> Result<()> {
        self.events.handle(ConnectionEvent::Opened {
            name: self.name.clone(),
        });

        loop {
            match self.poll() {
                Ok(Some(0)) => {
                    self.events.handle(ConnectionEvent::Closed {
                        name: self.name.clone(),
                    });
                    return Ok(());
                }
                Ok(_) => continue,
                Err(Error::Io(err)) if is_removed(err.kind()) => {
                    log::debug!("[{}] source removed: {err:?}", self.name);
                    self.events.handle(ConnectionEvent::Removed {
                        name: self.name.clone(),
                    });
                    return Ok(());
                }
                Err(err) => {
                    log::error!("[{}] read failed: {err:?}", self.name);
                    self.events.handle(ConnectionEvent::Error {
                        name: self.name.clone(),
                        error: err.to_string(),
                    });
                    return Err(err);
                }
            }
        }
    }
}

impl<R: Read, S: DescriptionSink + std::fmt::Debug, H: EventHandler> std::fmt::Debug
    for Monitor<R, S, H>
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Monitor")
            .field("name", &self.name)
            .field("dispatcher", &self.dispatcher)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

fn is_idle(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
    )
}

fn is_removed(kind: ErrorKind) -> bool {
    matches!(kind, ErrorKind::BrokenPipe | ErrorKind::NotConnected)
}

#[cfg(test)]
mod monitor_tests {
    use std::collections::VecDeque;
    use std::io;
    use std::io::Cursor;

    use super::*;
    use crate::io::ScrollbackSink;
    use crate::utils::test::{attitude_frame, heartbeat_frame};

    /// Replays scripted reads.
    struct ScriptedReader {
        reads: VecDeque<io::Result<Vec<u8>>>,
    }

    impl Read for ScriptedReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.reads.pop_front() {
                Some(Ok(bytes)) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Some(Err(err)) => Err(err),
                None => Ok(0),
            }
        }
    }

    fn names(events: &[ConnectionEvent]) -> Vec<&'static str> {
        events
            .iter()
            .map(|event| match event {
                ConnectionEvent::Opened { .. } => "opened",
                ConnectionEvent::Closed { .. } => "closed",
                ConnectionEvent::Removed { .. } => "removed",
                ConnectionEvent::Error { .. } => "error",
            })
            .collect()
    }

    #[test]
    fn capture_is_described() {
        let mut capture = heartbeat_frame(0, 3);
        capture.extend(attitude_frame(1, 0.1, 0.2, 0.3));

        let mut events = Vec::new();
        let mut monitor = Monitor::new("capture", Cursor::new(capture), Vec::<String>::new())
            .with_events(|event: ConnectionEvent| events.push(event));
        monitor.run().unwrap();

        assert_eq!(
            monitor.into_sink(),
            vec![
                "HEARTBEAT mavlink_version: 3\n",
                "ATTITUDE roll: 0.1 pitch: 0.2 yaw: 0.3\n"
            ]
        );
        assert_eq!(names(&events), vec!["opened", "closed"]);
    }

    #[test]
    fn time_outs_keep_decoder_state() {
        let frame = heartbeat_frame(0, 3);
        let (head, tail) = frame.split_at(8);

        let reader = ScriptedReader {
            reads: VecDeque::from([
                Ok(head.to_vec()),
                Err(io::Error::from(ErrorKind::TimedOut)),
                Ok(tail.to_vec()),
            ]),
        };
        let mut monitor = Monitor::new("ttyACM0", reader, ScrollbackSink::new());

        assert_eq!(monitor.poll().unwrap(), Some(8));
        assert_eq!(monitor.poll().unwrap(), None);
        assert_eq!(monitor.poll().unwrap(), Some(9));
        assert_eq!(monitor.sink().text(), "HEARTBEAT mavlink_version: 3\n");
    }

    #[test]
    fn removed_device_ends_run() {
        let reader = ScriptedReader {
            reads: VecDeque::from([
                Ok(heartbeat_frame(0, 3)),
                Err(io::Error::from(ErrorKind::BrokenPipe)),
            ]),
        };

        let mut events = Vec::new();
        let mut monitor = Monitor::new("ttyACM0", reader, Vec::<String>::new())
            .with_events(|event: ConnectionEvent| events.push(event));
        monitor.run().unwrap();

        assert_eq!(monitor.into_sink().len(), 1);
        assert_eq!(names(&events), vec!["opened", "removed"]);
    }

    #[test]
    fn read_errors_are_reported() {
        let reader = ScriptedReader {
            reads: VecDeque::from([Err(io::Error::new(ErrorKind::Other, "boom"))]),
        };

        let mut events = Vec::new();
        let mut monitor = Monitor::new("ttyACM0", reader, Vec::<String>::new())
            .with_events(|event: ConnectionEvent| events.push(event));

        assert!(matches!(monitor.run(), Err(Error::Io(_))));
        drop(monitor);
        assert_eq!(names(&events), vec!["opened", "error"]);
    }
}
