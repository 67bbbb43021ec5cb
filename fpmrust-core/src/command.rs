//! Command catalog
//!
//! Every supported instruction, the number of parameter bytes it takes and the
//! fixed size of the acknowledgement frame the module sends back. The reply
//! size is a property of the instruction; the transport never guesses it.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

use crate::{
    error::{Error, Result},
    packet::Packet,
};

/// Instruction codes
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Verify the module handshake password
    VerifyPassword = 0x13,

    /// Configure the Aura LED ring
    AuraLedConfig = 0x35,

    /// Check that the sensor is working
    CheckSensor = 0x36,

    /// Read firmware version
    GetFirmwareVersion = 0x3A,
}

impl Opcode {
    /// All catalog entries
    pub const ALL: [Opcode; 4] = [
        Self::VerifyPassword,
        Self::AuraLedConfig,
        Self::CheckSensor,
        Self::GetFirmwareVersion,
    ];

    /// Number of parameter bytes following the instruction code
    pub fn parameter_len(self) -> usize {
        match self {
            Self::VerifyPassword => 4,
            Self::AuraLedConfig => 4,
            Self::CheckSensor => 0,
            Self::GetFirmwareVersion => 0,
        }
    }

    /// Total size of the acknowledgement frame, start code to checksum
    pub fn reply_len(self) -> usize {
        match self {
            Self::VerifyPassword => 12,
            Self::AuraLedConfig => 12,
            Self::CheckSensor => 12,
            // 32 bytes of version data after the confirmation code
            Self::GetFirmwareVersion => 44,
        }
    }

    /// Get instruction name (as printed in the module manual)
    pub fn name(self) -> &'static str {
        match self {
            Self::VerifyPassword => "VfyPwd",
            Self::AuraLedConfig => "AuraLedConfig",
            Self::CheckSensor => "CheckSensor",
            Self::GetFirmwareVersion => "GetFwVer",
        }
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        opcode as u8
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x13 => Ok(Self::VerifyPassword),
            0x35 => Ok(Self::AuraLedConfig),
            0x36 => Ok(Self::CheckSensor),
            0x3A => Ok(Self::GetFirmwareVersion),
            _ => Err(Error::UnknownOpcode(value)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// A single command ready to be framed
///
/// # Examples
///
/// ```
/// use fpmrust_core::{Opcode, Request};
///
/// let request = Request::verify_password(0);
/// assert_eq!(request.opcode(), Opcode::VerifyPassword);
/// assert_eq!(request.expected_reply_len(), 12);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    opcode: Opcode,
    parameters: Bytes,
}

impl Request {
    /// Create a request, checking the parameter count against the catalog
    pub fn new(opcode: Opcode, parameters: impl Into<Bytes>) -> Result<Self> {
        let parameters = parameters.into();

        if parameters.len() != opcode.parameter_len() {
            return Err(Error::InvalidParameters {
                opcode,
                expected: opcode.parameter_len(),
                actual: parameters.len(),
            });
        }

        Ok(Self { opcode, parameters })
    }

    /// `VfyPwd` with a 32-bit password, sent big-endian
    pub fn verify_password(password: u32) -> Self {
        let mut parameters = BytesMut::with_capacity(4);
        parameters.put_u32(password);

        Self {
            opcode: Opcode::VerifyPassword,
            parameters: parameters.freeze(),
        }
    }

    /// `GetFwVer`
    pub fn firmware_version() -> Self {
        Self {
            opcode: Opcode::GetFirmwareVersion,
            parameters: Bytes::new(),
        }
    }

    /// `AuraLedConfig` with raw control code, speed, color index and cycle count
    pub fn aura_led(control: u8, speed: u8, color: u8, cycles: u8) -> Self {
        Self {
            opcode: Opcode::AuraLedConfig,
            parameters: Bytes::copy_from_slice(&[control, speed, color, cycles]),
        }
    }

    /// `CheckSensor`
    pub fn check_sensor() -> Self {
        Self {
            opcode: Opcode::CheckSensor,
            parameters: Bytes::new(),
        }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn parameters(&self) -> &Bytes {
        &self.parameters
    }

    /// Size of the acknowledgement frame this request produces
    pub fn expected_reply_len(&self) -> usize {
        self.opcode.reply_len()
    }

    /// Wrap the request in a command packet for the given module address
    pub fn to_packet(&self, address: u32) -> Packet {
        Packet::command(address, self.opcode, self.parameters.clone())
    }

    /// Encode the request to wire bytes
    pub fn encode(&self, address: u32) -> BytesMut {
        self.to_packet(address).encode()
    }
}
