//! Aura LED ring settings

use std::fmt;

use crate::error::{Error, Result};

/// LED effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LedControl {
    Breathing = 0x01,
    Flashing = 0x02,
    AlwaysOn = 0x03,
    AlwaysOff = 0x04,
    GraduallyOn = 0x05,
    GraduallyOff = 0x06,
}

impl TryFrom<u8> for LedControl {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Breathing),
            0x02 => Ok(Self::Flashing),
            0x03 => Ok(Self::AlwaysOn),
            0x04 => Ok(Self::AlwaysOff),
            0x05 => Ok(Self::GraduallyOn),
            0x06 => Ok(Self::GraduallyOff),
            _ => Err(Error::Validation(format!("unknown LED control code 0x{:02X}", value))),
        }
    }
}

/// LED color index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum LedColor {
    Red = 0x01,
    Blue = 0x02,
    Purple = 0x03,
}

impl TryFrom<u8> for LedColor {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Red),
            0x02 => Ok(Self::Blue),
            0x03 => Ok(Self::Purple),
            _ => Err(Error::Validation(format!("unknown LED color index 0x{:02X}", value))),
        }
    }
}

/// LED pattern sent with the Aura LED command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedConfig {
    pub control: LedControl,

    /// 0x00 (fastest) to 0xFF (slowest); only used by animated effects
    pub speed: u8,

    pub color: LedColor,

    /// Number of cycles, 0 for infinite; only used by breathing and flashing
    pub cycles: u8,
}

impl LedConfig {
    pub fn new(control: LedControl, speed: u8, color: LedColor, cycles: u8) -> Self {
        Self {
            control,
            speed,
            color,
            cycles,
        }
    }

    /// Steady light in the given color
    pub fn on(color: LedColor) -> Self {
        Self::new(LedControl::AlwaysOn, 0x00, color, 0)
    }

    /// Turn the ring off
    pub fn off() -> Self {
        Self::new(LedControl::AlwaysOff, 0x00, LedColor::Blue, 0)
    }

    /// Parameter bytes in wire order
    pub fn to_bytes(self) -> [u8; 4] {
        [self.control as u8, self.speed, self.color as u8, self.cycles]
    }
}

impl Default for LedConfig {
    /// Two blue flashes at medium speed
    fn default() -> Self {
        Self::new(LedControl::Flashing, 0x60, LedColor::Blue, 2)
    }
}

impl fmt::Display for LedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "LED[{:?} {:?}, speed=0x{:02X}, cycles={}]",
            self.control, self.color, self.speed, self.cycles
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_is_blue_flash() {
        assert_eq!(LedConfig::default().to_bytes(), [0x02, 0x60, 0x02, 0x02]);
    }

    #[test]
    fn test_on_off() {
        assert_eq!(LedConfig::on(LedColor::Red).to_bytes(), [0x03, 0x00, 0x01, 0x00]);
        assert_eq!(LedConfig::off().to_bytes()[0], 0x04);
    }

    #[test]
    fn test_control_conversion() {
        assert_eq!(LedControl::try_from(0x01).unwrap(), LedControl::Breathing);
        assert!(matches!(LedControl::try_from(0x07), Err(Error::Validation(_))));
    }

    #[test]
    fn test_color_conversion() {
        assert_eq!(LedColor::try_from(0x03).unwrap(), LedColor::Purple);
        assert!(LedColor::try_from(0x00).is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            LedConfig::default().to_string(),
            "LED[Flashing Blue, speed=0x60, cycles=2]"
        );
    }
}
