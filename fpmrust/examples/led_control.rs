//! Cycle the LED ring through its effects

use std::time::Duration;

use anyhow::Context;
use fpmrust::{LedColor, LedConfig, LedControl, Sensor};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let port = std::env::var("FPM_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string());

    let mut sensor = Sensor::open_serial(&port, 57_600)
        .with_context(|| format!("opening {}", port))?;
    sensor.verify_password().await.context("handshake")?;

    let patterns = [
        LedConfig::new(LedControl::Breathing, 0x80, LedColor::Blue, 3),
        LedConfig::new(LedControl::Flashing, 0x20, LedColor::Red, 5),
        LedConfig::on(LedColor::Purple),
        LedConfig::new(LedControl::GraduallyOff, 0xC8, LedColor::Purple, 0),
        LedConfig::off(),
    ];

    for led in patterns {
        println!("{}", led);
        sensor
            .configure_led(led)
            .await
            .with_context(|| format!("setting {}", led))?;
        sleep(Duration::from_secs(3)).await;
    }

    println!("Done!");
    Ok(())
}
