//! DAC1 output (pin PA4, 12-bit, 0-3.3 V).

use crate::consts::{adc::FULL_SCALE, adc::REFERENCE_VOLTS, dac::MAX_CODE};
use crate::device::Stdaq;
use crate::error::{argument_out_of_range, Result};
use crate::frame::Frame;
use crate::transport::Transport;
use log::debug;

/// Output voltage produced by a DAC code.
pub fn dac_code_to_volts(code: u16) -> f64 {
    code as f64 * (REFERENCE_VOLTS / FULL_SCALE)
}

/// Nearest DAC code for a target voltage in 0-3.3 V.
pub fn volts_to_dac_code(volts: f64) -> Result<u16> {
    if !(0.0..=REFERENCE_VOLTS).contains(&volts) {
        return Err(argument_out_of_range("DAC voltage", volts, "0-3.3 V"));
    }
    let code = (volts * FULL_SCALE / REFERENCE_VOLTS).round() as u16;
    Ok(code.min(MAX_CODE))
}

impl<T: Transport> Stdaq<T> {
    // --- DAC ---

    /// Sets the DAC output code (0-4095).
    pub fn set_dac(&mut self, value: u16) -> Result<()> {
        if value > MAX_CODE {
            return Err(argument_out_of_range("DAC value", value, "0-4095"));
        }
        debug!("Setting DAC to {} (~{:.3} V)", value, dac_code_to_volts(value));
        self.send(&Frame::dac_value(value))
    }

    /// Connects the DAC output to PA4.
    pub fn enable_dac(&mut self) -> Result<()> {
        debug!("Enabling DAC");
        self.send(&Frame::dac_enable())
    }

    /// Disconnects the DAC output from PA4.
    pub fn disable_dac(&mut self) -> Result<()> {
        debug!("Disabling DAC");
        self.send(&Frame::dac_disable())
    }
}
