//! Triangle wave on the DAC output (PA4), 0 to ~3.3 V in steps of ~10 mV.

use std::{thread, time::Duration};
use stdaq::{dac::dac_code_to_volts, Result, Stdaq};

const STEP: u16 = 12;
const TAPS: u16 = 341;
const PERIODS: u32 = 10;

fn main() -> Result<()> {
    env_logger::init();
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyACM0".to_string());

    let mut daq = Stdaq::open(&port)?;
    println!("Connected to stDAQ {}", daq.version());

    daq.set_dac(4095)?;
    daq.enable_dac()?;

    println!(
        "Sweeping 0 V to {:.3} V, {} periods...",
        dac_code_to_volts(STEP * TAPS),
        PERIODS
    );
    let period = 2 * TAPS as u32;
    for i in 0..period * PERIODS {
        let phase = (i % period) as i32 - TAPS as i32;
        let value = STEP * phase.unsigned_abs() as u16;
        daq.set_dac(value)?;
        thread::sleep(Duration::from_millis(1));
    }

    daq.disable_dac()?;
    println!("Done.");
    Ok(())
}
