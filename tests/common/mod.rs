//! A scripted stand-in for the stDAQ board used by the integration tests.
//!
//! `FakeDevice` implements `Transport` and answers frames the way the firmware
//! does. Clones share state, so a test keeps one clone for inspection while the
//! `Stdaq` handle owns the other.
#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use stdaq::{ConnectionConfig, Error, Result, Stdaq, Transport};

pub const PACKAGE: &str = "NUCLEO-F413ZH";
pub const REVISION: u8 = 1;
pub const SUBREVISION: u8 = 4;

#[derive(Debug)]
pub struct DeviceState {
    pub open: bool,
    pub close_calls: usize,
    /// Every frame as accepted by the transport (truncated on short writes).
    pub writes: Vec<Vec<u8>>,
    /// Number of `read`/`read_line` calls.
    pub read_calls: usize,
    /// Bytes waiting to be read by the host.
    pub rx: VecDeque<u8>,

    pub package: String,
    pub revision: u8,
    pub subrevision: u8,
    /// Answer a single `vr` with both revision bytes.
    pub combined_revision: bool,
    revision_requests: usize,

    pub dac_value: u16,
    pub dac_enabled: bool,
    pub adc_clock: Option<u8>,
    pub adc_channels: Vec<u8>,
    /// Bytes streamed back on every `a` command.
    pub adc_stream: Vec<u8>,
    pub gpio_inputs: [u8; 4],
    pub gpio_outputs: [u8; 8],
    pub led_toggles: Vec<char>,
    pub i2c_memory: HashMap<(u8, u8), u8>,

    /// Accept at most this many bytes per write; the frame is then ignored.
    pub write_limit: Option<usize>,
    /// Frames starting with any of these prefixes get no answer.
    pub muted: Vec<Vec<u8>>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            open: true,
            close_calls: 0,
            writes: Vec::new(),
            read_calls: 0,
            rx: VecDeque::new(),
            package: PACKAGE.to_string(),
            revision: REVISION,
            subrevision: SUBREVISION,
            combined_revision: false,
            revision_requests: 0,
            dac_value: 0,
            dac_enabled: false,
            adc_clock: None,
            adc_channels: Vec::new(),
            adc_stream: Vec::new(),
            gpio_inputs: [0; 4],
            gpio_outputs: [0; 8],
            led_toggles: Vec::new(),
            i2c_memory: HashMap::new(),
            write_limit: None,
            muted: Vec::new(),
        }
    }
}

impl DeviceState {
    fn process(&mut self, frame: &[u8]) {
        if self.muted.iter().any(|prefix| frame.starts_with(prefix)) {
            return;
        }
        match (frame[0], frame.get(1).copied()) {
            (b'v', Some(b'n')) => {
                self.rx.extend(self.package.bytes());
                self.rx.push_back(b'\n');
            }
            (b'v', Some(b'r')) => {
                if self.combined_revision {
                    self.rx.extend([self.revision, self.subrevision]);
                } else if self.revision_requests % 2 == 0 {
                    self.rx.push_back(self.revision);
                } else {
                    self.rx.push_back(self.subrevision);
                }
                self.revision_requests += 1;
            }
            (b'd', _) if frame.len() == 3 => {
                self.dac_value = frame[1] as u16 * 256 + frame[2] as u16;
            }
            (b'd', Some(b'e')) => self.dac_enabled = true,
            (b'd', Some(b'd')) => self.dac_enabled = false,
            (b's', _) => {
                self.adc_clock = Some(frame[1]);
                let nch = frame[2] as usize;
                self.adc_channels = frame[3..3 + nch].to_vec();
            }
            (b'a', _) => self.rx.extend(self.adc_stream.iter().copied()),
            (b'g', Some(b'g')) => self.rx.push_back(self.gpio_inputs[frame[2] as usize]),
            (b'g', Some(b's')) => self.gpio_outputs[frame[2] as usize] = frame[3],
            (b'g', Some(b't')) => self.gpio_outputs[frame[2] as usize] ^= 1,
            (b'l', Some(tag)) => self.led_toggles.push(tag as char),
            (b'i', Some(b'r')) => {
                let (addr, reg, count) = (frame[2], frame[3], frame[4]);
                for k in 0..count {
                    let byte = self
                        .i2c_memory
                        .get(&(addr, reg.wrapping_add(k)))
                        .copied()
                        .unwrap_or(0);
                    self.rx.push_back(byte);
                }
            }
            (b'i', Some(b'w')) => {
                let (addr, reg, count) = (frame[2], frame[3], frame[4]);
                for (k, byte) in frame[5..5 + count as usize].iter().enumerate() {
                    self.i2c_memory.insert((addr, reg.wrapping_add(k as u8)), *byte);
                }
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeDevice {
    state: Arc<Mutex<DeviceState>>,
}

impl FakeDevice {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, DeviceState> {
        self.state.lock().expect("fake device state poisoned")
    }

    /// Frames written so far, oldest first.
    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.state().writes.clone()
    }

    /// Forgets recorded frames and read counts.
    pub fn clear_log(&self) {
        let mut state = self.state();
        state.writes.clear();
        state.read_calls = 0;
    }
}

impl Transport for FakeDevice {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        let mut state = self.state();
        if !state.open {
            return Err(Error::NotConnected);
        }
        let accepted = state.write_limit.map_or(data.len(), |l| l.min(data.len()));
        state.writes.push(data[..accepted].to_vec());
        if accepted == data.len() {
            state.process(data);
        }
        Ok(accepted)
    }

    fn read(&mut self, max_bytes: usize, _timeout: Duration) -> Result<Vec<u8>> {
        let mut state = self.state();
        state.read_calls += 1;
        let n = max_bytes.min(state.rx.len());
        Ok(state.rx.drain(..n).collect())
    }

    fn read_line(&mut self, _timeout: Duration) -> Result<Vec<u8>> {
        let mut state = self.state();
        state.read_calls += 1;
        let mut line = Vec::new();
        while let Some(byte) = state.rx.pop_front() {
            line.push(byte);
            if byte == b'\n' {
                break;
            }
        }
        Ok(line)
    }

    fn close(&mut self) -> Result<()> {
        let mut state = self.state();
        if state.open {
            state.open = false;
            state.close_calls += 1;
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.state().open
    }
}

pub fn test_config() -> ConnectionConfig {
    ConnectionConfig::default()
        .with_read_timeout(Duration::from_millis(10))
        .with_drain_timeout(Duration::from_millis(1))
}

/// Opens a handle on a fresh fake board, with the handshake frames cleared
/// from the log.
pub fn connect() -> (Stdaq<FakeDevice>, FakeDevice) {
    let device = FakeDevice::new();
    let daq = Stdaq::from_transport(device.clone(), test_config())
        .expect("handshake with fake device failed");
    device.clear_log();
    (daq, device)
}
