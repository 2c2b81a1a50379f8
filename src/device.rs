//! Connection lifecycle: open, drain, version handshake and close.

use crate::adc::ChannelSequence;
use crate::config::{ConnectionConfig, RevisionQuery};
use crate::consts;
use crate::error::{Error, Result};
use crate::frame::{self, Frame};
use crate::transport::{SerialTransport, Transport};
use log::{debug, trace, warn};
use std::fmt;

/// Firmware identification reported by the board during the handshake.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirmwareVersion {
    /// Package identifier string (e.g. the target board name).
    pub package: String,
    /// Firmware revision.
    pub revision: u8,
    /// Firmware sub-revision.
    pub subrevision: u8,
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}) r.{}.{}", self.package, self.revision, self.subrevision)
    }
}

/// A handle to an opened stDAQ board.
///
/// The handle owns its transport exclusively. All methods take `&mut self`,
/// so commands on one board are strictly sequential; share a handle between
/// threads by wrapping it in a `Mutex`. The transport is closed on
/// [`Stdaq::close`] or when the handle is dropped.
#[derive(Debug)]
pub struct Stdaq<T: Transport = SerialTransport> {
    transport: Option<T>,
    config: ConnectionConfig,
    version: FirmwareVersion,
    pub(crate) configured_sequence: Option<ChannelSequence>,
}

impl Stdaq<SerialTransport> {
    /// Opens the board on a serial port with default settings (9600 baud, 8N1).
    pub fn open(endpoint: &str) -> Result<Self> {
        Self::open_with_config(endpoint, ConnectionConfig::default())
    }

    /// Opens the board on a serial port with explicit settings.
    pub fn open_with_config(endpoint: &str, config: ConnectionConfig) -> Result<Self> {
        let transport = SerialTransport::open(endpoint, &config)?;
        Self::from_transport(transport, config)
    }
}

impl<T: Transport> Stdaq<T> {
    // --- Constructors and Info ---

    /// Wraps an already opened transport: discards stale input, then performs
    /// the version handshake. Any failure closes the transport and is reported
    /// as a connection error; nothing else is written.
    pub fn from_transport(transport: T, config: ConnectionConfig) -> Result<Self> {
        if !transport.is_open() {
            return Err(Error::NotConnected);
        }

        let mut handle = Self {
            transport: Some(transport),
            config,
            version: FirmwareVersion::default(),
            configured_sequence: None,
        };

        match handle.handshake() {
            Ok(()) => {
                debug!("Connected to stDAQ {}", handle.version);
                Ok(handle)
            }
            Err(e) => {
                warn!("stDAQ handshake failed: {}", e);
                if let Err(close_err) = handle.close() {
                    warn!("Error closing transport after failed handshake: {}", close_err);
                }
                Err(Error::Handshake(Box::new(e)))
            }
        }
    }

    fn handshake(&mut self) -> Result<()> {
        let drained = self.drain_input()?;
        if drained > 0 {
            debug!("Discarded {} stale line(s) before handshake", drained);
        }
        self.get_version()?;
        Ok(())
    }

    /// Reads lines until one comes back empty, bounded by `max_drain_lines`.
    /// A cap of 0 skips draining.
    fn drain_input(&mut self) -> Result<usize> {
        let timeout = self.config.drain_timeout;
        let max_lines = self.config.max_drain_lines;
        if max_lines == 0 {
            return Ok(0);
        }
        let transport = self.transport_mut()?;
        for drained in 0..max_lines {
            let line = transport.read_line(timeout)?;
            if line.is_empty() {
                return Ok(drained);
            }
            trace!("Discarding stale input: {:02X?}", line);
        }
        warn!(
            "Input still arriving after discarding {} lines; continuing with handshake",
            max_lines
        );
        Ok(max_lines)
    }

    /// Releases the transport. Closing an already closed handle does nothing.
    pub fn close(&mut self) -> Result<()> {
        match self.transport.take() {
            Some(mut transport) => {
                transport.close()?;
                debug!("stDAQ connection closed");
            }
            None => trace!("close() on an already closed stDAQ connection"),
        }
        Ok(())
    }

    /// Whether the handle still owns an open transport.
    pub fn is_open(&self) -> bool {
        self.transport.as_ref().is_some_and(|t| t.is_open())
    }

    /// Firmware version negotiated at open (refreshed by [`Stdaq::get_version`]).
    pub fn version(&self) -> &FirmwareVersion {
        &self.version
    }

    /// Settings this connection was opened with.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// The channel sequence last sent with [`Stdaq::configure_adc`], if any.
    pub fn configured_sequence(&self) -> Option<&ChannelSequence> {
        self.configured_sequence.as_ref()
    }

    /// The underlying transport, or `None` once closed.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    // --- Version ---

    /// Queries the package identifier, revision and sub-revision.
    pub fn get_version(&mut self) -> Result<FirmwareVersion> {
        self.send(&Frame::version_package())?;
        let package = self.read_line()?;

        let (revision, subrevision) = match self.config.revision_query {
            RevisionQuery::PerField => {
                self.send(&Frame::version_revision())?;
                let revision = frame::decode_u8(&self.read_exact(1)?)?;
                self.send(&Frame::version_revision())?;
                let subrevision = frame::decode_u8(&self.read_exact(1)?)?;
                (revision, subrevision)
            }
            RevisionQuery::Combined => {
                self.send(&Frame::version_revision())?;
                let raw = self.read_exact(2)?;
                (raw[0], raw[1])
            }
        };

        let version = FirmwareVersion {
            package,
            revision,
            subrevision,
        };
        trace!("Firmware version: {}", version);
        self.version = version.clone();
        Ok(version)
    }

    // --- Frame I/O ---

    pub(crate) fn transport_mut(&mut self) -> Result<&mut T> {
        self.transport.as_mut().ok_or(Error::NotConnected)
    }

    /// Writes a frame and checks the transport accepted every byte of it.
    pub(crate) fn send(&mut self, frame: &Frame) -> Result<()> {
        let transport = self.transport_mut()?;
        trace!("Writing frame {}", frame);
        let written = transport.write(frame.as_bytes())?;
        if written != frame.size() {
            warn!(
                "Frame {} not acknowledged: {} of {} bytes written",
                frame,
                written,
                frame.size()
            );
            return Err(Error::WriteNotAcknowledged {
                command: frame.tag() as char,
                expected: frame.size(),
                actual: written,
            });
        }
        Ok(())
    }

    /// Reads exactly `len` response bytes within the configured timeout.
    /// A short response invalidates the connection.
    pub(crate) fn read_exact(&mut self, len: usize) -> Result<Vec<u8>> {
        let timeout = self.config.read_timeout;
        let raw = self.transport_mut()?.read(len, timeout)?;
        trace!("Received {} of {} bytes: {:02X?}", raw.len(), len, &raw);
        if let Err(e) = frame::expect_len(&raw, len) {
            self.invalidate();
            return Err(e);
        }
        Ok(raw)
    }

    /// Reads one text line. A line cut off by the timeout invalidates the
    /// connection.
    pub(crate) fn read_line(&mut self) -> Result<String> {
        let timeout = self.config.read_timeout;
        let raw = self.transport_mut()?.read_line(timeout)?;
        trace!("Received line ({} bytes): {:02X?}", raw.len(), &raw);
        if raw.last() != Some(&consts::LINE_TERMINATOR) {
            self.invalidate();
        }
        frame::decode_line(&raw)
    }

    /// Closes the transport after an incomplete response. The board may still
    /// be sending, so later bytes cannot be matched to a command; every
    /// further operation fails with [`Error::NotConnected`].
    pub(crate) fn invalidate(&mut self) {
        warn!("Incomplete response from stDAQ; closing connection");
        if let Err(e) = self.close() {
            warn!("Error closing stDAQ connection: {}", e);
        }
    }

    pub(crate) fn read_timeout(&self) -> std::time::Duration {
        self.config.read_timeout
    }
}

impl<T: Transport> Drop for Stdaq<T> {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!("Error closing stDAQ connection on drop: {}", e);
        }
    }
}
