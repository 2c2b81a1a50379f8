//! Internal constants: command tags, device limits and calibration values.

// --- Serial link defaults (NUCLEO-F413ZH virtual COM port) ---
pub const DEFAULT_BAUD_RATE: u32 = 9600;
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 100;
pub const DEFAULT_DRAIN_TIMEOUT_MS: u64 = 100;
/// Upper bound on stale lines discarded while draining on open.
pub const DEFAULT_MAX_DRAIN_LINES: usize = 64;

pub const LINE_TERMINATOR: u8 = b'\n';

// --- Command tags and sub-commands ---
pub mod cmd {
    pub const VERSION: u8 = b'v';
    pub mod version {
        pub const PACKAGE: u8 = b'n';
        pub const REVISION: u8 = b'r';
    }

    pub const DAC: u8 = b'd';
    pub mod dac {
        pub const ENABLE: u8 = b'e';
        pub const DISABLE: u8 = b'd';
    }

    pub const ADC_SEQUENCE: u8 = b's';
    pub const ADC_ACQUIRE: u8 = b'a';

    pub const GPIO: u8 = b'g';
    pub mod gpio {
        pub const GET: u8 = b'g';
        pub const SET: u8 = b's';
        pub const TOGGLE: u8 = b't';
    }

    pub const LED: u8 = b'l';

    pub const I2C: u8 = b'i';
    pub mod i2c {
        pub const READ: u8 = b'r';
        pub const WRITE: u8 = b'w';
    }
}

// --- DAC (12-bit, DAC1 on PA4) ---
pub mod dac {
    pub const MAX_CODE: u16 = 4095;
}

// --- ADC ---
pub mod adc {
    pub const MAX_SEQUENCE_LEN: usize = 16;
    pub const MAX_CHANNEL: u8 = 16;
    /// Not routed on the NUCLEO-F413ZH.
    pub const UNSUPPORTED_CHANNELS: [u8; 2] = [4, 8];
    pub const TEMPERATURE_CHANNEL: u8 = 16;

    pub const MAX_CLOCK_DIVISION: u8 = 9;
    pub const REFERENCE_CLOCK_HZ: u32 = 1_000_000;

    pub const REFERENCE_VOLTS: f64 = 3.3;
    pub const FULL_SCALE: f64 = 4096.0;

    // Temp = (Vsense - V25) / avg_slope + 25
    pub const TEMP_V25: f64 = 0.76;
    pub const TEMP_AVG_SLOPE: f64 = 0.0025; // 2.5 mV/C
    pub const TEMP_OFFSET_C: f64 = 25.0;
}

// --- GPIO ---
pub mod gpio {
    /// Input pins PE0-PE3.
    pub const INPUT_PIN_COUNT: u8 = 4;
    /// Output pins PD0-PD7.
    pub const OUTPUT_PIN_COUNT: u8 = 8;
}

// --- I2C (standard mode, 100 kHz) ---
pub mod i2c {
    pub const MAX_7BIT_ADDRESS: u8 = 0x7F;
    pub const MAX_PAYLOAD: usize = 32;
}
