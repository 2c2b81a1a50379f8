//! I2C pass-through (standard mode 100 kHz, 8-bit register addresses).

use crate::consts::i2c::{MAX_7BIT_ADDRESS, MAX_PAYLOAD};
use crate::device::Stdaq;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::transport::Transport;
use log::{debug, trace};
use std::fmt;

/// A 7-bit I2C slave address (0x00 - 0x7F).
/// Use `I2cAddress::new_7bit(addr)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct I2cAddress(u8);

impl I2cAddress {
    /// Creates a 7-bit address, checking validity (0-127).
    pub fn new_7bit(addr: u8) -> Result<Self> {
        if addr <= MAX_7BIT_ADDRESS {
            Ok(I2cAddress(addr))
        } else {
            Err(Error::ArgumentOutOfRange(format!(
                "I2C address 0x{:02X} is not a 7-bit address (0-127)",
                addr
            )))
        }
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl fmt::Display for I2cAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X}", self.0)
    }
}

fn check_payload_len(len: usize) -> Result<()> {
    if len > MAX_PAYLOAD {
        Err(Error::OperationTooLarge {
            max: MAX_PAYLOAD,
            actual: len,
        })
    } else {
        Ok(())
    }
}

impl<T: Transport> Stdaq<T> {
    // --- I2C Methods ---

    /// Reads `count` bytes (1-32) starting at `register` of the slave at `address`.
    pub fn read_i2c(&mut self, address: u8, register: u8, count: usize) -> Result<Vec<u8>> {
        let address = I2cAddress::new_7bit(address)?;
        if count == 0 {
            return Err(Error::ArgumentOutOfRange(
                "I2C read count must be at least 1".to_string(),
            ));
        }
        check_payload_len(count)?;

        debug!(
            "I2C read from {}: register 0x{:02X}, {} bytes",
            address, register, count
        );
        self.send(&Frame::i2c_read(address, register, count as u8))?;
        let data = self.read_exact(count)?;
        trace!("I2C read data: {:02X?}", &data);
        Ok(data)
    }

    /// Writes `data` (0-32 bytes) starting at `register` of the slave at `address`.
    pub fn write_i2c(&mut self, address: u8, register: u8, data: &[u8]) -> Result<()> {
        let address = I2cAddress::new_7bit(address)?;
        check_payload_len(data.len())?;

        debug!(
            "I2C write to {}: register 0x{:02X}, {} bytes",
            address,
            register,
            data.len()
        );
        trace!("I2C write data: {:02X?}", data);
        self.send(&Frame::i2c_write(address, register, data))
    }
}
