//! Serial port channel
//!
//! Sensor modules hang off a UART (or a USB-serial bridge) running 8N1 with
//! no flow control. The factory baud rate is 57600.

use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{DataBits, Parity, SerialPortBuilderExt, SerialStream, StopBits};
use tracing::{debug, error, info, trace};

use fpmrust_core::constants::DEFAULT_BAUD_RATE;

use crate::{error::*, ByteChannel};

pub use tokio_serial::FlowControl;

/// Line settings for a module UART
///
/// Modules only speak 8N1, so the framing is fixed and only the rate and
/// flow control vary between boards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub flow_control: FlowControl,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            flow_control: FlowControl::None,
        }
    }
}

/// Serial port channel to a sensor module
pub struct SerialChannel {
    port: Option<SerialStream>,
    port_name: String,
}

impl SerialChannel {
    /// Open a serial port at the given baud rate, 8N1
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open(port: &str, baud_rate: u32) -> Result<Self> {
        let config = SerialConfig {
            baud_rate,
            ..Default::default()
        };
        Self::open_with_config(port, config)
    }

    /// Open a serial port with full configuration control
    pub fn open_with_config(port: &str, config: SerialConfig) -> Result<Self> {
        debug!(
            port = %port,
            baud_rate = config.baud_rate,
            flow_control = ?config.flow_control,
            "Opening serial port"
        );

        let stream = tokio_serial::new(port, config.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(config.flow_control)
            .open_native_async()
            .map_err(|e| {
                error!(port = %port, error = %e, "Failed to open serial port");
                Error::InvalidPort(format!("{}: {}", port, e))
            })?;

        info!(port = %port, baud_rate = config.baud_rate, "Serial port opened");

        Ok(Self {
            port: Some(stream),
            port_name: port.to_string(),
        })
    }

    /// Get the name of the serial port
    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// Check if the port is open
    pub fn is_open(&self) -> bool {
        self.port.is_some()
    }

    /// Close the port
    pub async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            debug!(port = %self.port_name, "Closing serial port");
            port.flush().await?;
        }
        Ok(())
    }
}

#[async_trait]
impl ByteChannel for SerialChannel {
    async fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.send_frame(&[byte]).await
    }

    async fn send_frame(&mut self, frame: &[u8]) -> Result<()> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        trace!(
            port = %self.port_name,
            bytes = frame.len(),
            data = %hex::encode_upper(frame),
            "Sending frame"
        );

        port.write_all(frame).await?;
        port.flush().await?;

        Ok(())
    }

    async fn try_read_byte(&mut self) -> Result<Option<u8>> {
        let port = self.port.as_mut().ok_or(Error::NotConnected)?;

        // A zero timeout polls the read exactly once
        match timeout(Duration::ZERO, port.read_u8()).await {
            Ok(Ok(byte)) => Ok(Some(byte)),
            Ok(Err(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                Err(Error::ConnectionClosed)
            }
            Ok(Err(e)) => Err(Error::Io(e)),
            Err(_) => Ok(None),
        }
    }

    fn description(&self) -> String {
        self.port_name.clone()
    }
}

impl Drop for SerialChannel {
    fn drop(&mut self) {
        if self.port.is_some() {
            debug!(port = %self.port_name, "SerialChannel dropped, closing port");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serial_config_default() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 57_600);
        assert_eq!(config.flow_control, FlowControl::None);
    }

    #[tokio::test]
    async fn test_open_missing_port() {
        let result = SerialChannel::open("/dev/fpmrust-does-not-exist", 57_600);
        assert!(matches!(result, Err(Error::InvalidPort(_))));
    }
}
