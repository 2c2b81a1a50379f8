//! Wire framing: building command frames and decoding fixed-shape responses.
//!
//! A command frame is a single ASCII tag byte followed by binary parameters,
//! e.g. `d` + `hi` + `lo` to set the DAC. Sixteen-bit parameters are sent as
//! `value / 256` then `value % 256`; sixteen-bit ADC results come back
//! little-endian.

use crate::adc::{ChannelSequence, ClockDivision};
use crate::consts::{self, cmd};
use crate::error::{Error, Result};
use crate::gpio::{GpioLevel, InputPin, OutputPin};
use crate::i2c::I2cAddress;
use crate::led::LedColor;
use std::fmt;

/// A complete outgoing command as written to the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    bytes: Vec<u8>,
}

impl Frame {
    /// Starts a frame with the given command tag.
    pub fn builder(tag: u8) -> FrameBuilder {
        FrameBuilder::new(tag)
    }

    /// The leading command tag.
    pub fn tag(&self) -> u8 {
        self.bytes[0]
    }

    /// Number of bytes the transport must accept for this frame.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    // --- Encoders ---

    pub(crate) fn version_package() -> Self {
        Self::builder(cmd::VERSION).byte(cmd::version::PACKAGE).build()
    }

    pub(crate) fn version_revision() -> Self {
        Self::builder(cmd::VERSION).byte(cmd::version::REVISION).build()
    }

    /// `value` must already be checked against the 12-bit range.
    pub(crate) fn dac_value(value: u16) -> Self {
        Self::builder(cmd::DAC).split_u16(value).build()
    }

    pub(crate) fn dac_enable() -> Self {
        Self::builder(cmd::DAC).byte(cmd::dac::ENABLE).build()
    }

    pub(crate) fn dac_disable() -> Self {
        Self::builder(cmd::DAC).byte(cmd::dac::DISABLE).build()
    }

    pub(crate) fn adc_sequence(sequence: &ChannelSequence, clock: ClockDivision) -> Self {
        Self::builder(cmd::ADC_SEQUENCE)
            .byte(clock.value())
            .byte(sequence.len() as u8)
            .bytes(&sequence.to_bytes())
            .build()
    }

    pub(crate) fn adc_acquire(samples_per_channel: u16) -> Self {
        Self::builder(cmd::ADC_ACQUIRE)
            .split_u16(samples_per_channel)
            .build()
    }

    pub(crate) fn gpio_get(pin: InputPin) -> Self {
        Self::builder(cmd::GPIO)
            .byte(cmd::gpio::GET)
            .byte(pin.number())
            .byte(0)
            .build()
    }

    pub(crate) fn gpio_set(pin: OutputPin, level: GpioLevel) -> Self {
        Self::builder(cmd::GPIO)
            .byte(cmd::gpio::SET)
            .byte(pin.number())
            .byte(level.as_u8())
            .build()
    }

    pub(crate) fn gpio_toggle(pin: OutputPin) -> Self {
        Self::builder(cmd::GPIO)
            .byte(cmd::gpio::TOGGLE)
            .byte(pin.number())
            .byte(0)
            .build()
    }

    pub(crate) fn led_toggle(color: LedColor) -> Self {
        Self::builder(cmd::LED).byte(color.tag() as u8).build()
    }

    /// `count` must already be checked against the payload cap.
    pub(crate) fn i2c_read(address: I2cAddress, register: u8, count: u8) -> Self {
        Self::builder(cmd::I2C)
            .byte(cmd::i2c::READ)
            .byte(address.value())
            .byte(register)
            .byte(count)
            .build()
    }

    /// `data` must already be checked against the payload cap.
    pub(crate) fn i2c_write(address: I2cAddress, register: u8, data: &[u8]) -> Self {
        Self::builder(cmd::I2C)
            .byte(cmd::i2c::WRITE)
            .byte(address.value())
            .byte(register)
            .byte(data.len() as u8)
            .bytes(data)
            .build()
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {:02X?}", self.tag() as char, &self.bytes[1..])
    }
}

/// Byte-buffer builder for [`Frame`]s. Text tags and binary parameters go
/// through the same `u8` path, so nothing is ever string-formatted.
#[derive(Debug, Clone)]
pub struct FrameBuilder {
    bytes: Vec<u8>,
}

impl FrameBuilder {
    pub fn new(tag: u8) -> Self {
        Self { bytes: vec![tag] }
    }

    pub fn byte(mut self, byte: u8) -> Self {
        self.bytes.push(byte);
        self
    }

    pub fn bytes(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Appends `value / 256` then `value % 256`.
    pub fn split_u16(self, value: u16) -> Self {
        let (hi, lo) = split_u16(value);
        self.byte(hi).byte(lo)
    }

    pub fn build(self) -> Frame {
        Frame { bytes: self.bytes }
    }
}

/// Splits a 16-bit parameter into the `(high, low)` byte pair sent on the wire.
#[inline]
pub fn split_u16(value: u16) -> (u8, u8) {
    ((value / 256) as u8, (value % 256) as u8)
}

// --- Decoders ---

/// Fails with [`Error::ShortRead`] unless `raw` holds at least `expected` bytes.
pub fn expect_len(raw: &[u8], expected: usize) -> Result<()> {
    if raw.len() < expected {
        Err(Error::ShortRead {
            expected,
            actual: raw.len(),
        })
    } else {
        Ok(())
    }
}

/// Decodes a one-byte unsigned response.
pub fn decode_u8(raw: &[u8]) -> Result<u8> {
    expect_len(raw, 1)?;
    Ok(raw[0])
}

/// Decodes a `\n` (or `\r\n`) terminated ASCII line, terminator removed.
pub fn decode_line(raw: &[u8]) -> Result<String> {
    let body = match raw.split_last() {
        None => {
            return Err(Error::ShortRead {
                expected: 1,
                actual: 0,
            })
        }
        Some((&consts::LINE_TERMINATOR, body)) => body,
        Some(_) => {
            return Err(Error::MalformedResponse(format!(
                "line not terminated within timeout ({} bytes received)",
                raw.len()
            )))
        }
    };
    let body = body.strip_suffix(b"\r").unwrap_or(body);
    String::from_utf8(body.to_vec())
        .map_err(|e| Error::MalformedResponse(format!("response is not valid text: {}", e)))
}

/// Decodes consecutive little-endian 16-bit words. A trailing odd byte is ignored.
pub fn decode_le_words(raw: &[u8]) -> Vec<u16> {
    raw.chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .collect()
}
