//! ADC scan configuration, acquisition and unit conversion.

use crate::consts::adc as limits;
use crate::device::Stdaq;
use crate::error::{argument_out_of_range, Error, Result};
use crate::frame::{self, Frame};
use crate::transport::Transport;
use log::{debug, trace, warn};
use std::fmt;

/// An ADC input available on the board (0-16, except 4 and 8).
/// Channel 16 is the internal temperature sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdcChannel(u8);

impl AdcChannel {
    /// The internal temperature sensor.
    pub const TEMPERATURE: AdcChannel = AdcChannel(limits::TEMPERATURE_CHANNEL);

    /// Creates a channel, rejecting identifiers above 16 and the unrouted 4 and 8.
    pub fn new(channel: u8) -> Result<Self> {
        if channel > limits::MAX_CHANNEL {
            Err(Error::UnsupportedChannel {
                channel,
                message: "channel must be 0-16".to_string(),
            })
        } else if limits::UNSUPPORTED_CHANNELS.contains(&channel) {
            Err(Error::UnsupportedChannel {
                channel,
                message: "channels 4 and 8 are not available on the NUCLEO-F413ZH".to_string(),
            })
        } else {
            Ok(AdcChannel(channel))
        }
    }

    #[inline]
    pub fn number(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn is_temperature(&self) -> bool {
        self.0 == limits::TEMPERATURE_CHANNEL
    }
}

/// Ordered ADC scan list: 1 to 16 channels, repetition allowed.
///
/// The same sequence must be passed to [`Stdaq::configure_adc`] and
/// [`Stdaq::acquire_adc`]; the board streams one word per entry per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSequence(Vec<AdcChannel>);

impl ChannelSequence {
    /// Builds a sequence from raw channel numbers, validating each entry.
    ///
    /// ```
    /// use stdaq::adc::ChannelSequence;
    ///
    /// assert!(ChannelSequence::new(&[0, 0, 1, 5, 6, 15, 16]).is_ok());
    /// assert!(ChannelSequence::new(&[0, 4]).is_err());
    /// ```
    pub fn new(channels: &[u8]) -> Result<Self> {
        Self::check_len(channels.len())?;
        channels
            .iter()
            .map(|&ch| AdcChannel::new(ch))
            .collect::<Result<Vec<_>>>()
            .map(ChannelSequence)
    }

    /// Builds a sequence from already validated channels.
    pub fn from_channels(channels: Vec<AdcChannel>) -> Result<Self> {
        Self::check_len(channels.len())?;
        Ok(ChannelSequence(channels))
    }

    fn check_len(len: usize) -> Result<()> {
        if len == 0 {
            return Err(Error::ArgumentOutOfRange(
                "channel sequence must contain at least one channel".to_string(),
            ));
        }
        if len > limits::MAX_SEQUENCE_LEN {
            return Err(Error::OperationTooLarge {
                max: limits::MAX_SEQUENCE_LEN,
                actual: len,
            });
        }
        Ok(())
    }

    /// Number of entries (never 0).
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn channels(&self) -> &[AdcChannel] {
        &self.0
    }

    pub fn contains_temperature(&self) -> bool {
        self.0.iter().any(AdcChannel::is_temperature)
    }

    pub(crate) fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().map(AdcChannel::number).collect()
    }
}

/// Division of the 1 MHz ADC reference clock, 0-9.
/// 0 = 1 MHz, 1 = 500 kHz, 2 = 250 kHz, ... each step halves the clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockDivision(u8);

impl ClockDivision {
    pub fn new(division: u8) -> Result<Self> {
        if division <= limits::MAX_CLOCK_DIVISION {
            Ok(ClockDivision(division))
        } else {
            Err(argument_out_of_range("ADC clock division", division, "0-9"))
        }
    }

    #[inline]
    pub fn value(&self) -> u8 {
        self.0
    }

    /// Resulting ADC clock in Hz.
    pub fn frequency_hz(&self) -> u32 {
        limits::REFERENCE_CLOCK_HZ >> self.0
    }
}

/// Physical unit of a converted reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Volts,
    Celsius,
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unit::Volts => write!(f, "V"),
            Unit::Celsius => write!(f, "°C"),
        }
    }
}

/// Converts a raw 12-bit ADC code to volts (3.3 V reference).
#[inline]
pub fn code_to_volts(code: u16) -> f64 {
    code as f64 * (limits::REFERENCE_VOLTS / limits::FULL_SCALE)
}

/// Converts a temperature-sensor voltage to degrees Celsius
/// (V25 = 0.76 V, average slope 2.5 mV/°C).
#[inline]
pub fn volts_to_celsius(volts: f64) -> f64 {
    (volts - limits::TEMP_V25) / limits::TEMP_AVG_SLOPE + limits::TEMP_OFFSET_C
}

/// Calibrated readings from one acquisition, organized per sequence position.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    channels: Vec<AdcChannel>,
    samples_per_channel: usize,
    data: Vec<Vec<f64>>,
}

impl SampleBuffer {
    /// Decodes the raw acquisition stream. Words arrive sample-major: word
    /// `sample * nch + position` holds `position`'s reading for `sample`.
    pub fn from_raw(
        sequence: &ChannelSequence,
        samples_per_channel: usize,
        raw: &[u8],
    ) -> Result<Self> {
        let nch = sequence.len();
        frame::expect_len(raw, 2 * nch * samples_per_channel)?;
        let words = frame::decode_le_words(raw);

        let mut data = vec![Vec::with_capacity(samples_per_channel); nch];
        for sample in 0..samples_per_channel {
            for (position, readings) in data.iter_mut().enumerate() {
                let code = words[sample * nch + position];
                if f64::from(code) >= limits::FULL_SCALE {
                    return Err(Error::MalformedResponse(format!(
                        "ADC code {} at sample {} position {} exceeds 12 bits",
                        code, sample, position
                    )));
                }
                readings.push(code_to_volts(code));
            }
        }

        for (position, channel) in sequence.channels().iter().enumerate() {
            if channel.is_temperature() {
                for reading in data[position].iter_mut() {
                    *reading = volts_to_celsius(*reading);
                }
            }
        }

        Ok(Self {
            channels: sequence.channels().to_vec(),
            samples_per_channel,
            data,
        })
    }

    /// Readings for one sequence position, oldest first.
    pub fn channel(&self, position: usize) -> Option<&[f64]> {
        self.data.get(position).map(Vec::as_slice)
    }

    /// Unit of the readings at a sequence position.
    pub fn unit(&self, position: usize) -> Option<Unit> {
        self.channels.get(position).map(|ch| {
            if ch.is_temperature() {
                Unit::Celsius
            } else {
                Unit::Volts
            }
        })
    }

    pub fn channels(&self) -> &[AdcChannel] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    pub fn samples_per_channel(&self) -> usize {
        self.samples_per_channel
    }

    /// Iterates `(channel, readings)` in sequence order.
    pub fn iter(&self) -> impl Iterator<Item = (AdcChannel, &[f64])> + '_ {
        self.channels
            .iter()
            .copied()
            .zip(self.data.iter().map(Vec::as_slice))
    }

    /// Consumes the buffer, returning one reading vector per sequence position.
    pub fn into_inner(self) -> Vec<Vec<f64>> {
        self.data
    }
}

impl<T: Transport> Stdaq<T> {
    // --- ADC ---

    /// Sends the scan sequence and clock division to the board.
    pub fn configure_adc(&mut self, sequence: &ChannelSequence, clock: ClockDivision) -> Result<()> {
        debug!(
            "Configuring ADC: channels={:?}, clock division {} ({} Hz)",
            sequence.to_bytes(),
            clock.value(),
            clock.frequency_hz()
        );
        self.send(&Frame::adc_sequence(sequence, clock))?;
        self.configured_sequence = Some(sequence.clone());
        Ok(())
    }

    /// Triggers an acquisition of `samples_per_channel` samples on every
    /// position of `sequence` and returns the calibrated readings.
    ///
    /// Fails with [`Error::AdcNotConfigured`] if [`Stdaq::configure_adc`] was
    /// never called on this handle. A short stream is an error; partial data is
    /// discarded and the connection is closed.
    pub fn acquire_adc(
        &mut self,
        sequence: &ChannelSequence,
        samples_per_channel: u16,
    ) -> Result<SampleBuffer> {
        if samples_per_channel == 0 {
            return Err(argument_out_of_range(
                "Samples per channel",
                samples_per_channel,
                "1-65535",
            ));
        }
        match &self.configured_sequence {
            None => return Err(Error::AdcNotConfigured),
            Some(configured) if configured != sequence => warn!(
                "Acquiring with channels {:?} but board was configured with {:?}",
                sequence.to_bytes(),
                configured.to_bytes()
            ),
            Some(_) => {}
        }

        self.send(&Frame::adc_acquire(samples_per_channel))?;

        // The board streams one block of 2 * nch bytes per sample
        let block = 2 * sequence.len();
        let total = block * samples_per_channel as usize;
        let timeout = self.read_timeout();
        let mut raw = Vec::with_capacity(total);
        while raw.len() < total {
            let chunk = self.transport_mut()?.read(block, timeout)?;
            let complete = chunk.len() == block;
            raw.extend_from_slice(&chunk);
            if !complete {
                warn!("ADC stream stopped after {} of {} bytes", raw.len(), total);
                self.invalidate();
                return Err(Error::ShortRead {
                    expected: total,
                    actual: raw.len(),
                });
            }
        }
        trace!("Received {} ADC bytes", raw.len());

        SampleBuffer::from_raw(sequence, samples_per_channel as usize, &raw)
    }

    /// [`Stdaq::acquire_adc`] using the sequence last configured on this handle.
    pub fn acquire_configured(&mut self, samples_per_channel: u16) -> Result<SampleBuffer> {
        let sequence = self
            .configured_sequence
            .clone()
            .ok_or(Error::AdcNotConfigured)?;
        self.acquire_adc(&sequence, samples_per_channel)
    }
}
