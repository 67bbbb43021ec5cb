//! Probe a sensor module: handshake, firmware query, LED blink

use std::time::Duration;

use fpmrust::{LedConfig, Sensor};
use tokio::time::sleep;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> fpmrust::Result<()> {
    // Initialize logging (override with RUST_LOG=fpmrust=trace)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Change to your module's port
    let port = std::env::var("FPM_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    println!("Opening {}...", port);
    let mut sensor = Sensor::open_serial(&port, 57_600)?;

    // Give the module time to boot
    sleep(Duration::from_millis(500)).await;

    match sensor.verify_password().await {
        Ok(()) => println!("✓ Password verified"),
        Err(e) => println!("✗ Password check failed: {}", e),
    }

    sleep(Duration::from_millis(500)).await;

    match sensor.firmware_version().await {
        Ok(version) => println!("✓ Firmware version: {}", version),
        Err(e) => println!("✗ Firmware check failed: {}", e),
    }

    sleep(Duration::from_millis(500)).await;

    match sensor.configure_led(LedConfig::default()).await {
        Ok(()) => println!("✓ Blue LED blinking"),
        Err(e) => println!("✗ LED config failed: {}", e),
    }

    Ok(())
}
