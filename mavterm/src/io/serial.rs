use std::time::Duration;

use crate::consts::{DEFAULT_BAUD_RATE, DEFAULT_START_COMMAND, SERIAL_CONN_TIMEOUT};

#[cfg(any(feature = "sync", feature = "async"))]
use crate::prelude::*;

/// Number of stop bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StopBits {
    /// One stop bit.
    #[default]
    One,
    /// Two stop bits.
    Two,
}

/// Parity checking mode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parity {
    /// No parity bit.
    #[default]
    None,
    /// Odd parity.
    Odd,
    /// Even parity.
    Even,
}

/// Serial port configuration.
///
/// Defaults match a PX4 telemetry link: [`DEFAULT_BAUD_RATE`], one stop bit, no parity. Once the
/// port is open, the [start command](SerialConf::start_command) is written to ask the remote shell
/// to stream MAVLink frames.
///
/// # Usage
///
/// ```rust
/// use mavterm::io::{Parity, SerialConf};
///
/// let conf = SerialConf::builder("/dev/ttyACM0")
///     .baud_rate(115_200)
///     .parity(Parity::Even)
///     .no_start_command()
///     .build();
///
/// assert_eq!(conf.baud_rate(), 115_200);
/// assert!(conf.start_command().is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SerialConf {
    path: String,
    baud_rate: u32,
    stop_bits: StopBits,
    parity: Parity,
    timeout: Duration,
    start_command: Option<String>,
}

/// Builder for [`SerialConf`].
#[derive(Clone, Debug)]
pub struct SerialConfBuilder {
    inner: SerialConf,
}

impl SerialConf {
    /// Default configuration for a port at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            stop_bits: StopBits::default(),
            parity: Parity::default(),
            timeout: SERIAL_CONN_TIMEOUT,
            start_command: Some(DEFAULT_START_COMMAND.to_string()),
        }
    }

    /// Instantiates a builder for a port at `path`.
    pub fn builder(path: impl Into<String>) -> SerialConfBuilder {
        SerialConfBuilder {
            inner: Self::new(path),
        }
    }

    /// Port path.
    #[inline]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Baud rate.
    #[inline]
    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Stop bits.
    #[inline]
    pub fn stop_bits(&self) -> StopBits {
        self.stop_bits
    }

    /// Parity.
    #[inline]
    pub fn parity(&self) -> Parity {
        self.parity
    }

    /// Read timeout.
    #[inline]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Command written right after the port is open.
    #[inline]
    pub fn start_command(&self) -> Option<&str> {
        self.start_command.as_deref()
    }

    /// Opens and configures the port, then writes the start command.
    #[cfg(feature = "sync")]
    pub fn open(&self) -> Result<Box<dyn serialport::SerialPort>> {
        use std::io::Write;

        let mut port = serialport::new(&self.path, self.baud_rate)
            .stop_bits(self.stop_bits.into())
            .parity(self.parity.into())
            .timeout(self.timeout)
            .open()?;
        log::debug!("[{}] opened at {} baud", self.path, self.baud_rate);

        if let Some(command) = &self.start_command {
            port.write_all(command.as_bytes())?;
            port.flush()?;
            log::debug!("[{}] start command sent: {:?}", self.path, command.trim_end());
        }

        Ok(port)
    }

    /// Asynchronously opens and configures the port, then writes the start command.
    #[cfg(feature = "async")]
    pub async fn open_async(&self) -> Result<tokio_serial::SerialStream> {
        use tokio::io::AsyncWriteExt;
        use tokio_serial::SerialPortBuilderExt;

        let mut port = tokio_serial::new(&self.path, self.baud_rate)
            .stop_bits(self.stop_bits.into())
            .parity(self.parity.into())
            .timeout(self.timeout)
            .open_native_async()
            .map_err(std::io::Error::from)?;
        log::debug!("[{}] opened at {} baud", self.path, self.baud_rate);

        if let Some(command) = &self.start_command {
            port.write_all(command.as_bytes()).await?;
            port.flush().await?;
            log::debug!("[{}] start command sent: {:?}", self.path, command.trim_end());
        }

        Ok(port)
    }
}

impl SerialConfBuilder {
    /// Builds [`SerialConf`].
    pub fn build(self) -> SerialConf {
        self.inner
    }

    /// Sets baud rate.
    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.inner.baud_rate = baud_rate;
        self
    }

    /// Sets stop bits.
    pub fn stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.inner.stop_bits = stop_bits;
        self
    }

    /// Sets parity.
    pub fn parity(mut self, parity: Parity) -> Self {
        self.inner.parity = parity;
        self
    }

    /// Sets read timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner.timeout = timeout;
        self
    }

    /// Sets the command written after the port is open.
    pub fn start_command(mut self, command: impl Into<String>) -> Self {
        self.inner.start_command = Some(command.into());
        self
    }

    /// Opens the port without writing anything.
    pub fn no_start_command(mut self) -> Self {
        self.inner.start_command = None;
        self
    }
}

/// Lists names of available serial ports.
#[cfg(feature = "sync")]
pub fn available_ports() -> Result<Vec<String>> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|port| port.port_name)
        .collect())
}

#[cfg(any(feature = "sync", feature = "async"))]
mod conversions {
    #[cfg(feature = "sync")]
    use serialport as backend;
    #[cfg(not(feature = "sync"))]
    use tokio_serial as backend;

    impl From<super::StopBits> for backend::StopBits {
        fn from(value: super::StopBits) -> Self {
            match value {
                super::StopBits::One => backend::StopBits::One,
                super::StopBits::Two => backend::StopBits::Two,
            }
        }
    }

    impl From<super::Parity> for backend::Parity {
        fn from(value: super::Parity) -> Self {
            match value {
                super::Parity::None => backend::Parity::None,
                super::Parity::Odd => backend::Parity::Odd,
                super::Parity::Even => backend::Parity::Even,
            }
        }
    }
}
