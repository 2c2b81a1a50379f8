//! On-board user LEDs.

use crate::device::Stdaq;
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::transport::Transport;
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedColor {
    Red,
    Green,
    Blue,
}

impl LedColor {
    /// Parses a color tag (`r`, `g` or `b`).
    pub fn from_tag(tag: char) -> Result<Self> {
        match tag {
            'r' => Ok(LedColor::Red),
            'g' => Ok(LedColor::Green),
            'b' => Ok(LedColor::Blue),
            other => Err(Error::UnknownLedColor(other)),
        }
    }

    /// The tag sent after the `l` command.
    pub fn tag(self) -> char {
        match self {
            LedColor::Red => 'r',
            LedColor::Green => 'g',
            LedColor::Blue => 'b',
        }
    }
}

impl TryFrom<char> for LedColor {
    type Error = Error;

    fn try_from(tag: char) -> Result<Self> {
        LedColor::from_tag(tag)
    }
}

impl<T: Transport> Stdaq<T> {
    /// Toggles one of the user LEDs.
    pub fn toggle_led(&mut self, color: LedColor) -> Result<()> {
        debug!("Toggling {:?} LED", color);
        self.send(&Frame::led_toggle(color))
    }
}
