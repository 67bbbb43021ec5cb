//! High-level sensor interface

use std::time::Duration;

use bytes::Bytes;
use tracing::{debug, info, warn};

use fpmrust_core::Request;
use fpmrust_transport::{ByteChannel, SerialChannel};
use fpmrust_types::{FirmwareVersion, LedConfig};

use crate::{config::SensorConfig, error::Result, exchange::Exchange};

/// Fingerprint sensor module
///
/// High-level interface for talking to a sensor module over a byte channel.
/// Each call is one request/response exchange; the sensor keeps no state
/// between exchanges besides its configuration.
///
/// # Examples
///
/// ```no_run
/// use fpmrust::Sensor;
///
/// #[tokio::main]
/// async fn main() -> fpmrust::Result<()> {
///     let mut sensor = Sensor::open_serial("/dev/ttyUSB0", 57_600)?;
///
///     sensor.verify_password().await?;
///
///     let version = sensor.firmware_version().await?;
///     println!("Firmware: {}", version);
///
///     Ok(())
/// }
/// ```
pub struct Sensor {
    channel: Box<dyn ByteChannel>,
    config: SensorConfig,
}

impl Sensor {
    /// Create a sensor on an existing channel with default settings
    pub fn new(channel: impl ByteChannel + 'static) -> Self {
        Self::with_config(channel, SensorConfig::default())
    }

    /// Create a sensor on an existing channel
    pub fn with_config(channel: impl ByteChannel + 'static, config: SensorConfig) -> Self {
        Self {
            channel: Box::new(channel),
            config,
        }
    }

    /// Open a serial port and attach a sensor to it
    ///
    /// Must be called from within a Tokio runtime.
    pub fn open_serial(port: &str, baud_rate: u32) -> Result<Self> {
        let channel = SerialChannel::open(port, baud_rate)?;
        Ok(Self::new(channel))
    }

    /// Set reply timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set module address (default: broadcast)
    pub fn with_address(mut self, address: u32) -> Self {
        self.config.address = address;
        self
    }

    /// Set handshake password (default: 0)
    pub fn with_password(mut self, password: u32) -> Self {
        self.config.password = password;
        self
    }

    /// Set receive poll interval
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.config.poll_interval = poll_interval;
        self
    }

    /// Get current settings
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Run one request/response exchange and return the reply payload
    pub async fn execute(&mut self, request: &Request) -> Result<Bytes> {
        Exchange::new(&self.config)
            .execute(self.channel.as_mut(), request)
            .await
    }

    /// Verify the handshake password
    ///
    /// A wrong password comes back as a device rejection, not a link error.
    pub async fn verify_password(&mut self) -> Result<()> {
        debug!("Verifying password...");

        let request = Request::verify_password(self.config.password);
        self.execute(&request).await?;

        info!("Password verified");
        Ok(())
    }

    /// Read the firmware version block
    pub async fn firmware_version(&mut self) -> Result<FirmwareVersion> {
        debug!("Reading firmware version...");

        let payload = self.execute(&Request::firmware_version()).await?;
        let version = FirmwareVersion::from_payload(&payload)?;

        debug!("Firmware version: {}", version);
        Ok(version)
    }

    /// Set the Aura LED pattern
    pub async fn configure_led(&mut self, led: LedConfig) -> Result<()> {
        debug!("Configuring {}", led);

        let [control, speed, color, cycles] = led.to_bytes();
        self.execute(&Request::aura_led(control, speed, color, cycles))
            .await?;

        Ok(())
    }

    /// Ask the module to self-check its sensor
    pub async fn check_sensor(&mut self) -> Result<()> {
        debug!("Checking sensor...");

        self.execute(&Request::check_sensor()).await?;
        Ok(())
    }

    /// Drop any bytes left on the line, e.g. after a malformed reply
    ///
    /// Returns the number of bytes discarded.
    pub async fn resync(&mut self) -> Result<usize> {
        let dropped = self.channel.clear_input().await?;

        if dropped > 0 {
            warn!(
                dropped = dropped,
                channel = %self.channel.description(),
                "Discarded stale input"
            );
        }

        Ok(dropped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fpmrust_core::{
        constants::BROADCAST_ADDRESS, ConfirmationCode, Packet, PacketType,
    };
    use fpmrust_transport::MockChannel;
    use fpmrust_types::{LedColor, LedControl};
    use pretty_assertions::assert_eq;

    fn ack(code: u8, payload: &[u8]) -> Vec<u8> {
        Packet::new(
            PacketType::Ack,
            BROADCAST_ADDRESS,
            code,
            Bytes::copy_from_slice(payload),
        )
        .encode()
        .to_vec()
    }

    fn sensor() -> (Sensor, MockChannel) {
        let mock = MockChannel::new();
        (Sensor::new(mock.clone()), mock)
    }

    #[test]
    fn test_sensor_builder() {
        let (sensor, _) = sensor();
        let sensor = sensor
            .with_timeout(Duration::from_millis(250))
            .with_address(0x0000_0001)
            .with_password(0xDEAD_BEEF)
            .with_poll_interval(Duration::from_millis(5));

        assert_eq!(sensor.config().timeout, Duration::from_millis(250));
        assert_eq!(sensor.config().address, 1);
        assert_eq!(sensor.config().password, 0xDEAD_BEEF);
        assert_eq!(sensor.config().poll_interval, Duration::from_millis(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_password() {
        let (mut sensor, mock) = sensor();
        mock.push_reply(ack(0x00, &[]));

        sensor.verify_password().await.unwrap();

        assert_eq!(
            mock.sent(),
            vec![
                0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x01, 0x00, 0x07, 0x13, 0x00, 0x00, 0x00,
                0x00, 0x00, 0x1B
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_verify_password_uses_configured_password() {
        let (sensor, mock) = sensor();
        let mut sensor = sensor.with_password(0x0102_0304);
        mock.push_reply(ack(0x00, &[]));

        sensor.verify_password().await.unwrap();

        assert_eq!(&mock.sent()[10..14], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wrong_password_is_rejection() {
        let (mut sensor, mock) = sensor();
        mock.push_reply(ack(0x13, &[]));

        let err = sensor.verify_password().await.unwrap_err();

        assert_eq!(err.rejection_code(), Some(ConfirmationCode::WrongPassword));
        assert!(!err.is_timeout());
        assert!(!err.is_malformed_frame());
    }

    #[tokio::test(start_paused = true)]
    async fn test_firmware_version() {
        let (mut sensor, mock) = sensor();
        let mut block = [0u8; 32];
        block[..4].copy_from_slice(&[1, 2, 3, 4]);
        mock.push_reply(ack(0x00, &block));

        let version = sensor.firmware_version().await.unwrap();

        assert_eq!(version.as_bytes(), &block);
        assert_eq!(&mock.sent()[9..10], &[0x3A]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_configure_led() {
        let (mut sensor, mock) = sensor();
        mock.push_reply(ack(0x00, &[]));

        let led = LedConfig::new(LedControl::Breathing, 0x20, LedColor::Purple, 0);
        sensor.configure_led(led).await.unwrap();

        assert_eq!(&mock.sent()[9..14], &[0x35, 0x01, 0x20, 0x03, 0x00]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_check_sensor_abnormal() {
        let (mut sensor, mock) = sensor();
        mock.push_reply(ack(0x29, &[]));

        let err = sensor.check_sensor().await.unwrap_err();
        assert_eq!(err.rejection_code(), Some(ConfirmationCode::SensorAbnormal));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unplugged_sensor_times_out() {
        let (sensor, _mock) = sensor();
        let mut sensor = sensor.with_timeout(Duration::from_millis(200));

        let err = sensor.check_sensor().await.unwrap_err();

        assert!(err.is_timeout());
        assert!(err.is_recoverable());
        assert_eq!(err.rejection_code(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resync_after_malformed_reply() {
        let (mut sensor, mock) = sensor();

        // Garbage ahead of the real reply shifts the frame
        mock.inject_stale(&[0x00, 0x00]);
        mock.push_reply(ack(0x00, &[]));

        let err = sensor.check_sensor().await.unwrap_err();
        assert!(err.is_malformed_frame());

        assert_eq!(sensor.resync().await.unwrap(), 2);

        mock.push_reply(ack(0x00, &[]));
        sensor.check_sensor().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_sequence_of_exchanges() {
        let (mut sensor, mock) = sensor();
        mock.push_reply(ack(0x00, &[]));
        mock.push_reply(ack(0x00, &[0x30; 32]));
        mock.push_reply(ack(0x00, &[]));

        sensor.verify_password().await.unwrap();
        sensor.firmware_version().await.unwrap();
        sensor.configure_led(LedConfig::default()).await.unwrap();

        assert_eq!(mock.pending_replies(), 0);
        assert_eq!(mock.sent().len(), 16 + 12 + 16);
    }
}
