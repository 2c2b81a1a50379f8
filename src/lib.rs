//! # stdaq
//!
//! A Rust crate for controlling the stDAQ, a data-acquisition firmware for the
//! ST NUCLEO-F413ZH board, over its serial (ST-LINK virtual COM) port.
//!
//! This crate uses the `serialport` crate for cross-platform serial communication.
//!
//! ## Features
//!
//! *   Connection handling (`Stdaq::open`, `Stdaq::open_with_config`, `Stdaq::from_transport`):
//!     stale input is discarded and the firmware version is negotiated on open.
//! *   Firmware version query (`get_version`).
//! *   DAC1 output on PA4 (`set_dac`, `enable_dac`, `disable_dac`), 12-bit.
//! *   ADC scanning:
//!     *   Strongly-typed `AdcChannel`, `ChannelSequence` and `ClockDivision`.
//!     *   Sequence configuration (`configure_adc`).
//!     *   Acquisition with conversion to volts, and to °C for the internal
//!         temperature sensor (`acquire_adc`, `acquire_configured`).
//! *   GPIO: strongly-typed `InputPin` (PE0-PE3) and `OutputPin` (PD0-PD7),
//!     `get_gpio_input`, `set_gpio_output`, `toggle_gpio_output`.
//! *   User LEDs (`toggle_led`).
//! *   I²C pass-through with 8-bit register addressing (`read_i2c`, `write_i2c`),
//!     up to 32 bytes per transfer.
//!
//! Every parameter is validated before anything is sent, and every failure is
//! returned as an [`Error`]; see [`Error::kind`] to tell validation, protocol
//! and connection failures apart.
//!
//! ## Basic Usage
//!
//! ```no_run
//! use stdaq::{
//!     adc::{ChannelSequence, ClockDivision},
//!     gpio::{GpioLevel, OutputPin},
//!     Result, Stdaq,
//! };
//!
//! fn main() -> Result<()> {
//!     // Optional: Initialize logging
//!     // env_logger::init();
//!
//!     let mut daq = Stdaq::open("/dev/ttyACM0")?;
//!     println!("Connected to stDAQ {}", daq.version());
//!
//!     // DAC to mid-scale
//!     daq.set_dac(2048)?;
//!     daq.enable_dac()?;
//!
//!     // Scan channels 0, 1 and the temperature sensor at 125 kHz
//!     let sequence = ChannelSequence::new(&[0, 1, 16])?;
//!     daq.configure_adc(&sequence, ClockDivision::new(3)?)?;
//!     let samples = daq.acquire_adc(&sequence, 10)?;
//!     for (channel, readings) in samples.iter() {
//!         println!("channel {}: {:?}", channel.number(), readings);
//!     }
//!
//!     daq.set_gpio_output(OutputPin::new(0)?, GpioLevel::High)?;
//!
//!     daq.close()
//! }
//! ```
//!
//! ## Serial Settings
//!
//! The firmware talks at 9600 baud, 8 data bits, no parity, one stop bit.
//! Use [`ConnectionConfig`] to change the baud rate or timeouts.
//!
//! ## Pin Mapping
//!
//! *   ADC channels 0-15 map to the STM32 ADC1 inputs; 4 and 8 are not routed
//!     on the NUCLEO-F413ZH. Channel 16 is the internal temperature sensor.
//! *   `InputPin(0)`-`InputPin(3)` map to PE0-PE3.
//! *   `OutputPin(0)`-`OutputPin(7)` map to PD0-PD7.
//!
//! ## License
//!
//! This project is licensed under the WTFPL.

mod config;
mod consts;
mod device;
mod error;
pub mod adc;
pub mod dac;
pub mod frame;
pub mod gpio;
pub mod i2c;
pub mod led;
pub mod transport;

pub use adc::{AdcChannel, ChannelSequence, ClockDivision, SampleBuffer, Unit};
pub use config::{ConnectionConfig, RevisionQuery};
pub use device::{FirmwareVersion, Stdaq};
pub use error::{Error, ErrorKind, Result};
pub use gpio::{GpioLevel, InputPin, OutputPin};
pub use i2c::I2cAddress;
pub use led::LedColor;
pub use transport::{SerialTransport, Transport};
