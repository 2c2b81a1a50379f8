//! Byte-stream transport between the host and the board.

use crate::config::ConnectionConfig;
use crate::consts;
use crate::error::{Error, Result};
use log::{debug, trace, warn};
use serialport::{ClearBuffer, DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::fmt;
use std::io::{self, Read, Write};
use std::time::{Duration, Instant};

/// A blocking byte stream the driver writes frames to and reads responses from.
///
/// Opening is left to the implementation's constructor; the driver only needs
/// an already opened stream. Reads return whatever arrived before the timeout,
/// which may be less than requested; the driver decides whether that is an error.
pub trait Transport {
    /// Writes `data` in a single call and returns how many bytes were accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Reads up to `max_bytes`, returning early when `timeout` expires.
    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>>;

    /// Reads until (and including) a `\n`, or until `timeout` expires.
    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>>;

    /// Releases the underlying handle. Calling it again is a no-op.
    fn close(&mut self) -> Result<()>;

    /// Whether the handle is still usable.
    fn is_open(&self) -> bool;
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }
    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>> {
        (**self).read(max_bytes, timeout)
    }
    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        (**self).read_line(timeout)
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
    fn is_open(&self) -> bool {
        (**self).is_open()
    }
}

/// [`Transport`] over a serial port (the board's ST-LINK virtual COM port).
pub struct SerialTransport {
    name: String,
    port: Option<Box<dyn SerialPort>>,
}

impl fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerialTransport")
            .field("name", &self.name)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl SerialTransport {
    /// Opens `endpoint` (e.g. `/dev/ttyACM0` or `COM9`) with 8N1 framing.
    pub fn open(endpoint: &str, config: &ConnectionConfig) -> Result<Self> {
        let port = serialport::new(endpoint, config.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(config.read_timeout)
            .open()
            .map_err(|e| Error::ConnectionFailed {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            })?;
        debug!(
            "Opened serial port {} at {} baud",
            endpoint, config.baud_rate
        );

        // Discard anything the OS buffered before we attached
        port.clear(ClearBuffer::All)?;

        Ok(Self {
            name: endpoint.to_string(),
            port: Some(port),
        })
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>> {
        self.port.as_mut().ok_or(Error::NotConnected)
    }
}

impl Transport for SerialTransport {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let port = self.port_mut()?;
        let written = Write::write(&mut **port, data)?;
        Write::flush(&mut **port)?;
        if written != data.len() {
            warn!("Partial serial write: sent {} of {} bytes", written, data.len());
        }
        Ok(written)
    }

    fn read(&mut self, max_bytes: usize, timeout: Duration) -> Result<Vec<u8>> {
        let port = self.port_mut()?;
        let mut buf = vec![0u8; max_bytes];
        let mut filled = 0;
        let deadline = Instant::now() + timeout;
        while filled < max_bytes {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            port.set_timeout(remaining)?;
            match Read::read(&mut **port, &mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        buf.truncate(filled);
        trace!("Serial read {} of {} bytes: {:02X?}", filled, max_bytes, &buf);
        Ok(buf)
    }

    fn read_line(&mut self, timeout: Duration) -> Result<Vec<u8>> {
        let port = self.port_mut()?;
        let mut line = Vec::new();
        let mut byte = [0u8; 1];
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            port.set_timeout(remaining)?;
            match Read::read(&mut **port, &mut byte) {
                Ok(0) => break,
                Ok(_) => {
                    line.push(byte[0]);
                    if byte[0] == consts::LINE_TERMINATOR {
                        break;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::TimedOut => break,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
        trace!("Serial read line ({} bytes): {:02X?}", line.len(), &line);
        Ok(line)
    }

    fn close(&mut self) -> Result<()> {
        if self.port.take().is_some() {
            debug!("Closed serial port {}", self.name);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }
}
