//! Type definitions for fpmrust

pub mod error;
pub mod firmware;
pub mod led;

pub use error::{Error, Result};
pub use firmware::FirmwareVersion;
pub use led::{LedColor, LedConfig, LedControl};
