use thiserror::Error;

/// Errors that can occur when talking to an stDAQ board.
///
/// Every variant belongs to one of three broad categories, see [`Error::kind`].
/// Validation errors are always raised before a single byte is written.
#[derive(Error, Debug)]
pub enum Error {
    // --- Validation ---
    /// Function argument is outside the range accepted by the device.
    #[error("Argument out of range: {0}")]
    ArgumentOutOfRange(String),
    /// GPIO pin number is outside the valid range for its direction.
    #[error("GPIO pin {pin} argument out of range: {message}")]
    PinArgumentOutOfRange {
        /// The invalid pin number that was specified.
        pin: u8,
        /// Detailed error message explaining the constraint.
        message: String,
    },
    /// GPIO value other than 0 or 1.
    #[error("GPIO level must be 0 or 1 (got {0})")]
    InvalidGpioLevel(u8),
    /// ADC channel that does not exist or is not routed on the board.
    #[error("ADC channel {channel} is not supported: {message}")]
    UnsupportedChannel {
        /// The rejected channel identifier.
        channel: u8,
        /// Why the channel was rejected.
        message: String,
    },
    /// Requested operation exceeds device or protocol limits.
    #[error("Requested operation size is too large (max {max}, got {actual})")]
    OperationTooLarge {
        /// Maximum allowed size for this operation.
        max: usize,
        /// Actual size requested.
        actual: usize,
    },
    /// LED color tag other than `r`, `g` or `b`.
    #[error("LED color '{0}' not recognized; must be one of r, g, b")]
    UnknownLedColor(char),

    // --- Protocol ---
    /// The transport accepted fewer bytes than the frame holds.
    #[error("Command '{command}' not acknowledged: wrote {actual} of {expected} bytes")]
    WriteNotAcknowledged {
        /// Command tag of the frame.
        command: char,
        /// Frame length.
        expected: usize,
        /// Bytes reported written by the transport.
        actual: usize,
    },
    /// The device answered with fewer bytes than the response frame needs.
    #[error("Short read from device (expected {expected} bytes, got {actual})")]
    ShortRead {
        /// Expected response size.
        expected: usize,
        /// Bytes actually received before the timeout.
        actual: usize,
    },
    /// Response received but its content makes no sense.
    #[error("Malformed response from device: {0}")]
    MalformedResponse(String),
    /// `acquire_adc` called before any channel sequence was configured.
    #[error("ADC acquisition requested before a channel sequence was configured")]
    AdcNotConfigured,
    /// General I/O error during device communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // --- Connection ---
    /// Error from the serial port layer while opening or configuring the port.
    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),
    /// The endpoint could not be opened or was not open afterwards.
    #[error("Connection to '{endpoint}' failed: {message}")]
    ConnectionFailed {
        /// The endpoint (port name) that was opened.
        endpoint: String,
        /// Additional error details.
        message: String,
    },
    /// The device did not complete the version handshake.
    #[error("Handshake with device failed: {0}")]
    Handshake(#[source] Box<Error>),
    /// Operation attempted on a closed connection.
    #[error("Connection is closed")]
    NotConnected,
}

/// Broad category of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A parameter was rejected locally; nothing was sent.
    Validation,
    /// Write confirmation mismatch, short or timed-out read, malformed response.
    Protocol,
    /// Open or handshake failure, or use of a closed connection.
    Connection,
}

impl Error {
    /// Returns the category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ArgumentOutOfRange(_)
            | Error::PinArgumentOutOfRange { .. }
            | Error::InvalidGpioLevel(_)
            | Error::UnsupportedChannel { .. }
            | Error::OperationTooLarge { .. }
            | Error::UnknownLedColor(_) => ErrorKind::Validation,
            Error::WriteNotAcknowledged { .. }
            | Error::ShortRead { .. }
            | Error::MalformedResponse(_)
            | Error::AdcNotConfigured
            | Error::Io(_) => ErrorKind::Protocol,
            Error::Serial(_)
            | Error::ConnectionFailed { .. }
            | Error::Handshake(_)
            | Error::NotConnected => ErrorKind::Connection,
        }
    }

    /// Shorthand for `self.kind() == ErrorKind::Validation`.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Shorthand for `self.kind() == ErrorKind::Protocol`.
    pub fn is_protocol(&self) -> bool {
        self.kind() == ErrorKind::Protocol
    }

    /// Shorthand for `self.kind() == ErrorKind::Connection`.
    pub fn is_connection(&self) -> bool {
        self.kind() == ErrorKind::Connection
    }
}

/// Result type alias for stDAQ operations.
pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn argument_out_of_range(what: &str, value: impl std::fmt::Display, range: &str) -> Error {
    Error::ArgumentOutOfRange(format!("{} {} out of range ({})", what, value, range))
}
