//! Transport layer for fingerprint sensor modules
//!
//! Provides the byte channel the exchange driver talks through, a serial port
//! implementation and a scripted mock for tests.

pub mod error;
pub mod mock;
pub mod serial;

pub use error::{Error, Result};
pub use mock::MockChannel;
pub use serial::{FlowControl, SerialChannel, SerialConfig};

use async_trait::async_trait;

/// Half-duplex byte channel to a sensor module
///
/// The exchange driver writes a whole command frame, then polls for reply
/// bytes one at a time until it has the full reply or its deadline passes.
#[async_trait]
pub trait ByteChannel: Send {
    /// Write a single byte
    async fn write_byte(&mut self, byte: u8) -> Result<()>;

    /// Write a complete frame, in order
    ///
    /// The default writes one byte at a time.
    async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        for &byte in frame {
            self.write_byte(byte).await?;
        }
        Ok(())
    }

    /// Read one byte if one is already available, without waiting
    async fn try_read_byte(&mut self) -> Result<Option<u8>>;

    /// Discard everything currently pending on the receive side
    ///
    /// Returns the number of bytes dropped.
    async fn clear_input(&mut self) -> Result<usize> {
        let mut dropped = 0;
        while self.try_read_byte().await?.is_some() {
            dropped += 1;
        }
        Ok(dropped)
    }

    /// Human-readable channel name (port path, "mock", ...)
    fn description(&self) -> String;
}
