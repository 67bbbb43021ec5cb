//! Sensor configuration

use std::time::Duration;

use fpmrust_core::constants::{
    BROADCAST_ADDRESS, DEFAULT_PASSWORD, DEFAULT_POLL_INTERVAL_MS, DEFAULT_TIMEOUT_MS,
};

/// Per-sensor protocol settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorConfig {
    /// Module address written into every command frame
    pub address: u32,

    /// Handshake password sent by `verify_password`
    pub password: u32,

    /// Time allowed for the full reply, measured from the end of the request
    pub timeout: Duration,

    /// Sleep between receive polls when no byte is pending
    pub poll_interval: Duration,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            address: BROADCAST_ADDRESS,
            password: DEFAULT_PASSWORD,
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SensorConfig::default();

        assert_eq!(config.address, 0xFFFF_FFFF);
        assert_eq!(config.password, 0);
        assert_eq!(config.timeout, Duration::from_millis(1000));
        assert_eq!(config.poll_interval, Duration::from_millis(1));
    }
}
