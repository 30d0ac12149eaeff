//! Example: Poll a TwisTorr 74 FS controller over TCP.
//!
//! Usage: cargo run --example pump_monitor -- <host> [device_addr]

use std::env;
use std::sync::Arc;
use std::time::Duration;

use agilent_client::{Channel, Session, TcpConfig, WindowClient};
use agilent_drivers::TwisTorrDriver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <host> [device_addr]", args[0]);
        eprintln!("Example: {} 192.168.1.100 0", args[0]);
        std::process::exit(1);
    }
    let host = args[1].clone();
    let addr: u8 = args.get(2).map(|a| a.parse()).transpose()?.unwrap_or(0);

    let config = TcpConfig::new(host);
    println!("Connecting to {}:{}...", config.host, config.port);
    let channel = Channel::connect_tcp(&config).await?;
    let session = Arc::new(Session::new(channel, config.timeout));
    let mut pump = TwisTorrDriver::new(WindowClient::new(session, addr));

    pump.connect().await?;
    println!("Connected; polling every 5 seconds (Ctrl-C to stop)");

    loop {
        let status = pump.status().await?;
        let pressure = pump.pressure().await?;
        let unit = pump.pressure_unit().await?;
        println!("status {:?}  pressure {:.2e} {}", status, pressure, unit);
        tokio::time::sleep(Duration::from_secs(5)).await;
    }
}
