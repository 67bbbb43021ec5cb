//! # fpmrust
//!
//! Rust implementation of the serial protocol spoken by 0xEF01-framed
//! fingerprint sensor modules.
//!
//! ## Features
//!
//! - Type-safe frame codec with checksum verification on receive
//! - Async/await API using Tokio
//! - Deadline-bounded receive that never overruns its timeout
//! - Device rejections kept distinct from timeouts and malformed frames
//!
//! ## Quick Start
//!
//! ```no_run
//! use fpmrust::{LedConfig, Sensor};
//!
//! #[tokio::main]
//! async fn main() -> fpmrust::Result<()> {
//!     // Open the module UART
//!     let mut sensor = Sensor::open_serial("/dev/ttyUSB0", 57_600)?;
//!
//!     // Handshake
//!     sensor.verify_password().await?;
//!
//!     // Blink the LED ring
//!     sensor.configure_led(LedConfig::default()).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod exchange;
pub mod sensor;

// Re-exports
pub use config::SensorConfig;
pub use error::{Error, Result};
pub use exchange::Exchange;
pub use sensor::Sensor;

// Re-export types
pub use fpmrust_core::{ConfirmationCode, Opcode, Packet, Request};
pub use fpmrust_transport::{ByteChannel, SerialChannel, SerialConfig};
pub use fpmrust_types::{FirmwareVersion, LedColor, LedConfig, LedControl};
