use stdaq::{Result, Stdaq};

fn main() -> Result<()> {
    env_logger::init();
    let port = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/dev/ttyACM0".to_string());

    println!("Opening stDAQ on {}...", port);
    let mut daq = Stdaq::open(&port)?;

    println!("\n stDAQ version: {}\n", daq.version());

    daq.close()
}
