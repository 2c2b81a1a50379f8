use stdaq::{ChannelSequence, ClockDivision, Result, Stdaq};

const SAMPLES: u16 = 8;

fn main() -> Result<()> {
    env_logger::init();
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyACM0".to_string());

    let mut daq = Stdaq::open(&port)?;
    println!("Connected to stDAQ {}", daq.version());

    // PA0, PA1 and the internal temperature sensor
    let sequence = ChannelSequence::new(&[0, 1, 16])?;
    let clock = ClockDivision::new(3)?;
    daq.configure_adc(&sequence, clock)?;
    println!(
        "Scanning {} channel(s) at {} Hz ADC clock, {} samples each",
        sequence.len(),
        clock.frequency_hz(),
        SAMPLES
    );

    let samples = daq.acquire_adc(&sequence, SAMPLES)?;
    for (position, (channel, readings)) in samples.iter().enumerate() {
        let unit = samples.unit(position).map(|u| u.to_string()).unwrap_or_default();
        let mean = readings.iter().sum::<f64>() / readings.len() as f64;
        println!(
            "  [{}] channel {:>2}: mean {:8.3} {}  {:.3?}",
            position,
            channel.number(),
            mean,
            unit,
            readings
        );
    }

    Ok(())
}
