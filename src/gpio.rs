//! GPIO inputs (PE0-PE3) and outputs (PD0-PD7).

use crate::consts::gpio::{INPUT_PIN_COUNT, OUTPUT_PIN_COUNT};
use crate::device::Stdaq;
use crate::error::{Error, Result};
use crate::frame::{self, Frame};
use crate::transport::Transport;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioLevel {
    Low,
    High,
}

impl GpioLevel {
    /// Wire value: 0 or 1.
    #[inline]
    pub fn as_u8(self) -> u8 {
        match self {
            GpioLevel::Low => 0,
            GpioLevel::High => 1,
        }
    }
}

impl TryFrom<u8> for GpioLevel {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(GpioLevel::Low),
            1 => Ok(GpioLevel::High),
            other => Err(Error::InvalidGpioLevel(other)),
        }
    }
}

impl From<bool> for GpioLevel {
    fn from(high: bool) -> Self {
        if high {
            GpioLevel::High
        } else {
            GpioLevel::Low
        }
    }
}

/// A GPIO input pin (0-3, mapped to PE0-PE3).
/// Use `InputPin::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputPin(u8);

impl InputPin {
    /// Creates a new InputPin, returning an error if the number is out of range (0-3).
    pub fn new(pin_num: u8) -> Result<Self> {
        if pin_num < INPUT_PIN_COUNT {
            Ok(InputPin(pin_num))
        } else {
            Err(Error::PinArgumentOutOfRange {
                pin: pin_num,
                message: "Input pin must be PE[0-3]".to_string(),
            })
        }
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }
}

/// A GPIO output pin (0-7, mapped to PD0-PD7).
/// Use `OutputPin::new(num)` to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OutputPin(u8);

impl OutputPin {
    /// Creates a new OutputPin, returning an error if the number is out of range (0-7).
    pub fn new(pin_num: u8) -> Result<Self> {
        if pin_num < OUTPUT_PIN_COUNT {
            Ok(OutputPin(pin_num))
        } else {
            Err(Error::PinArgumentOutOfRange {
                pin: pin_num,
                message: "Output pin must be PD[0-7]".to_string(),
            })
        }
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }
}

impl<T: Transport> Stdaq<T> {
    // --- GPIO ---

    /// Reads the level of an input pin.
    pub fn get_gpio_input(&mut self, pin: InputPin) -> Result<GpioLevel> {
        self.send(&Frame::gpio_get(pin))?;
        let value = frame::decode_u8(&self.read_exact(1)?)?;
        let level = GpioLevel::try_from(value).map_err(|_| {
            Error::MalformedResponse(format!(
                "GPIO input PE{} returned {} (expected 0 or 1)",
                pin.number(),
                value
            ))
        })?;
        debug!("GPIO input PE{} = {:?}", pin.number(), level);
        Ok(level)
    }

    /// Drives an output pin low or high.
    pub fn set_gpio_output(&mut self, pin: OutputPin, level: GpioLevel) -> Result<()> {
        debug!("Setting GPIO output PD{} to {:?}", pin.number(), level);
        self.send(&Frame::gpio_set(pin, level))
    }

    /// Inverts the current level of an output pin.
    pub fn toggle_gpio_output(&mut self, pin: OutputPin) -> Result<()> {
        debug!("Toggling GPIO output PD{}", pin.number());
        self.send(&Frame::gpio_toggle(pin))
    }
}
