//! Firmware version information

use std::fmt;

use crate::error::{Error, Result};

/// Firmware version block returned by the module
///
/// The layout of the 32 bytes is vendor specific; they are kept as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareVersion {
    raw: Vec<u8>,
}

impl FirmwareVersion {
    /// Size of the version block
    pub const LEN: usize = 32;

    /// Parse the payload of a firmware version reply
    pub fn from_payload(payload: &[u8]) -> Result<Self> {
        if payload.len() != Self::LEN {
            return Err(Error::Parse(format!(
                "firmware version block must be {} bytes, got {}",
                Self::LEN,
                payload.len()
            )));
        }

        Ok(Self {
            raw: payload.to_vec(),
        })
    }

    /// Raw version bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

/// Every byte in decimal, back to back
impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.raw {
            write!(f, "{}", byte)?;
        }
        Ok(())
    }
}
