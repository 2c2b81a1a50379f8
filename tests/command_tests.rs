//! DAC, GPIO, LED and I2C commands against the fake board.

mod common;

use common::connect;
use stdaq::{Error, ErrorKind, GpioLevel, InputPin, LedColor, OutputPin};

// --- DAC ---

#[test]
fn test_set_dac_frames() {
    let (mut daq, device) = connect();

    for value in [0u16, 1, 255, 256, 2048, 4095] {
        daq.set_dac(value).unwrap();
        assert_eq!(device.state().dac_value, value);
    }
    assert_eq!(device.writes()[5], vec![b'd', 0x0F, 0xFF]);
    assert_eq!(device.writes()[3], vec![b'd', 0x01, 0x00]);
}

#[test]
fn test_set_dac_rejects_out_of_range_without_sending() {
    let (mut daq, device) = connect();

    for value in [4096u16, 5000, u16::MAX] {
        let err = daq.set_dac(value).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert!(device.writes().is_empty());
}

#[test]
fn test_enable_disable_dac() {
    let (mut daq, device) = connect();

    daq.enable_dac().unwrap();
    assert!(device.state().dac_enabled);
    daq.disable_dac().unwrap();
    assert!(!device.state().dac_enabled);
    assert_eq!(device.writes(), vec![b"de".to_vec(), b"dd".to_vec()]);
}

#[test]
fn test_short_write_is_not_acknowledged() {
    let (mut daq, device) = connect();
    device.state().write_limit = Some(2);

    let err = daq.set_dac(1000).unwrap_err();
    assert!(matches!(
        err,
        Error::WriteNotAcknowledged {
            command: 'd',
            expected: 3,
            actual: 2
        }
    ));
    assert!(err.is_protocol());

    // Two-byte commands still go through
    daq.enable_dac().unwrap();
}

// --- GPIO ---

#[test]
fn test_get_gpio_input() {
    let (mut daq, device) = connect();
    device.state().gpio_inputs = [0, 1, 0, 1];

    let pin = InputPin::new(3).unwrap();
    assert_eq!(daq.get_gpio_input(pin).unwrap(), GpioLevel::High);
    assert_eq!(
        daq.get_gpio_input(InputPin::new(0).unwrap()).unwrap(),
        GpioLevel::Low
    );
    assert_eq!(device.writes()[0], vec![b'g', b'g', 3, 0]);
}

#[test]
fn test_get_gpio_input_short_write_skips_read() {
    let (mut daq, device) = connect();
    device.state().write_limit = Some(3);

    let err = daq.get_gpio_input(InputPin::new(1).unwrap()).unwrap_err();

    assert!(matches!(err, Error::WriteNotAcknowledged { expected: 4, .. }));
    assert_eq!(device.state().read_calls, 0);
}

#[test]
fn test_get_gpio_input_timeout_closes_connection() {
    let (mut daq, device) = connect();
    device.state().muted.push(b"gg".to_vec());
    let pin = InputPin::new(2).unwrap();

    assert!(matches!(
        daq.get_gpio_input(pin),
        Err(Error::ShortRead {
            expected: 1,
            actual: 0
        })
    ));
    assert!(!daq.is_open());
    assert_eq!(device.state().close_calls, 1);

    // A late answer must not be taken for the next response
    device.state().muted.clear();
    device.state().rx.push_back(1);
    assert!(matches!(daq.get_gpio_input(pin), Err(Error::NotConnected)));
    assert_eq!(device.writes().len(), 1);
}

#[test]
fn test_get_gpio_input_garbage_level() {
    let (mut daq, device) = connect();
    device.state().gpio_inputs[2] = 0x7F;

    let err = daq.get_gpio_input(InputPin::new(2).unwrap()).unwrap_err();

    assert!(matches!(err, Error::MalformedResponse(_)));
    // The full answer arrived, so the link stays usable
    assert!(daq.is_open());
}

#[test]
fn test_input_pin_guard_rejects_every_out_of_range_pin() {
    for pin in 4..=u8::MAX {
        assert!(InputPin::new(pin).unwrap_err().is_validation());
    }
    for pin in 8..=u8::MAX {
        assert!(OutputPin::new(pin).unwrap_err().is_validation());
    }
}

#[test]
fn test_set_and_toggle_gpio_output() {
    let (mut daq, device) = connect();
    let pin = OutputPin::new(7).unwrap();

    daq.set_gpio_output(pin, GpioLevel::High).unwrap();
    assert_eq!(device.state().gpio_outputs[7], 1);
    daq.toggle_gpio_output(pin).unwrap();
    assert_eq!(device.state().gpio_outputs[7], 0);
    daq.set_gpio_output(pin, GpioLevel::try_from(1).unwrap())
        .unwrap();
    assert_eq!(device.state().gpio_outputs[7], 1);

    assert_eq!(
        device.writes(),
        vec![
            vec![b'g', b's', 7, 1],
            vec![b'g', b't', 7, 0],
            vec![b'g', b's', 7, 1],
        ]
    );
    assert!(GpioLevel::try_from(2).unwrap_err().is_validation());
}

// --- LED ---

#[test]
fn test_toggle_led() {
    let (mut daq, device) = connect();

    for tag in ['r', 'g', 'b'] {
        daq.toggle_led(LedColor::from_tag(tag).unwrap()).unwrap();
    }
    assert_eq!(device.state().led_toggles, vec!['r', 'g', 'b']);
    assert_eq!(device.writes()[1], b"lg".to_vec());
}

#[test]
fn test_unknown_led_color_sends_nothing() {
    let (mut daq, device) = connect();

    let result = LedColor::try_from('y').and_then(|color| daq.toggle_led(color));

    let err = result.unwrap_err();
    assert!(matches!(err, Error::UnknownLedColor('y')));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(device.writes().is_empty());
}

// --- I2C ---

#[test]
fn test_read_i2c() {
    let (mut daq, device) = connect();
    device.state().i2c_memory.insert((0x68, 0x75), 0x71);
    device.state().i2c_memory.insert((0x68, 0x76), 0x02);

    let data = daq.read_i2c(0x68, 0x75, 2).unwrap();

    assert_eq!(data, vec![0x71, 0x02]);
    assert_eq!(device.writes(), vec![vec![b'i', b'r', 0x68, 0x75, 2]]);
}

#[test]
fn test_read_i2c_boundaries() {
    let (mut daq, device) = connect();

    assert_eq!(daq.read_i2c(127, 255, 32).unwrap().len(), 32);
    assert_eq!(daq.read_i2c(0, 0, 1).unwrap().len(), 1);
    device.clear_log();

    assert!(daq.read_i2c(128, 0, 1).unwrap_err().is_validation());
    assert!(matches!(
        daq.read_i2c(0x50, 0, 33),
        Err(Error::OperationTooLarge { max: 32, actual: 33 })
    ));
    assert!(daq.read_i2c(0x50, 0, 0).unwrap_err().is_validation());
    assert!(device.writes().is_empty());
}

#[test]
fn test_read_i2c_short_response_is_an_error() {
    let (mut daq, device) = connect();
    device.state().muted.push(b"ir".to_vec());
    device.state().rx.extend([0xAA, 0xBB]);

    let err = daq.read_i2c(0x50, 0x10, 4).unwrap_err();

    assert!(matches!(
        err,
        Error::ShortRead {
            expected: 4,
            actual: 2
        }
    ));
    assert!(!daq.is_open());
    assert!(matches!(daq.read_i2c(0x50, 0x10, 4), Err(Error::NotConnected)));
}

#[test]
fn test_read_i2c_short_write_skips_read() {
    let (mut daq, device) = connect();
    device.state().write_limit = Some(4);

    let err = daq.read_i2c(0x50, 0x10, 4).unwrap_err();

    assert!(matches!(err, Error::WriteNotAcknowledged { command: 'i', .. }));
    assert_eq!(device.state().read_calls, 0);
}

#[test]
fn test_write_i2c() {
    let (mut daq, device) = connect();

    daq.write_i2c(0x68, 0x6B, &[0x00, 0x80]).unwrap();

    assert_eq!(
        device.writes(),
        vec![vec![b'i', b'w', 0x68, 0x6B, 2, 0x00, 0x80]]
    );
    assert_eq!(device.state().i2c_memory.get(&(0x68, 0x6C)), Some(&0x80));
}

#[test]
fn test_write_i2c_boundaries() {
    let (mut daq, device) = connect();
    let full = [0x5A; 32];

    daq.write_i2c(127, 255, &full).unwrap();
    assert_eq!(device.writes()[0].len(), 5 + 32);
    device.clear_log();

    assert!(daq.write_i2c(128, 0, &[1]).unwrap_err().is_validation());
    assert!(matches!(
        daq.write_i2c(0x50, 0, &[0; 33]),
        Err(Error::OperationTooLarge { max: 32, actual: 33 })
    ));
    assert!(device.writes().is_empty());
}

#[test]
fn test_write_i2c_partial_frame() {
    let (mut daq, device) = connect();
    device.state().write_limit = Some(6);

    let err = daq.write_i2c(0x50, 0, &[1, 2, 3]).unwrap_err();

    assert!(matches!(
        err,
        Error::WriteNotAcknowledged {
            expected: 8,
            actual: 6,
            ..
        }
    ));
    assert!(device.state().i2c_memory.is_empty());
}
