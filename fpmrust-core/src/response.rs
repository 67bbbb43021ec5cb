//! Acknowledgement interpretation
//!
//! A reply that survived frame validation still carries the module's verdict
//! in its confirmation code. Success yields the payload; anything else is a
//! [`Error::DeviceRejected`], which callers can tell apart from link failures.

use bytes::Bytes;
use std::fmt;
use tracing::{debug, warn};

use crate::{
    command::Opcode,
    error::{Error, Result},
    packet::{Packet, PacketType},
};

/// Confirmation codes reported in byte 9 of an acknowledgement
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ConfirmationCode {
    Ok,
    PacketReceiveError,
    NoFinger,
    EnrollFailed,
    ImageDisordered,
    ImageTooSmall,
    NoMatch,
    NotFound,
    MergeFailed,
    PageIdOutOfRange,
    TemplateReadError,
    TemplateUploadError,
    DataReceiveError,
    ImageUploadError,
    DeleteFailed,
    ClearLibraryFailed,
    WrongPassword,
    MissingPrimaryImage,
    FlashWriteError,
    UndefinedError,
    InvalidRegister,
    IncorrectRegisterConfig,
    WrongNotepadPage,
    PortOperationFailed,
    SensorAbnormal,
    /// Code not listed in the module manual
    Other(u8),
}

impl ConfirmationCode {
    /// Check if this is the success code
    pub fn is_ok(self) -> bool {
        self == Self::Ok
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            Self::Ok => "command executed",
            Self::PacketReceiveError => "error receiving packet",
            Self::NoFinger => "no finger on the sensor",
            Self::EnrollFailed => "failed to enroll the finger",
            Self::ImageDisordered => "image too disordered to generate features",
            Self::ImageTooSmall => "image too small to generate features",
            Self::NoMatch => "fingers do not match",
            Self::NotFound => "no matching finger in the library",
            Self::MergeFailed => "failed to combine character files",
            Self::PageIdOutOfRange => "page id beyond the finger library",
            Self::TemplateReadError => "error reading template from library",
            Self::TemplateUploadError => "error uploading template",
            Self::DataReceiveError => "module cannot receive the following data",
            Self::ImageUploadError => "error uploading image",
            Self::DeleteFailed => "failed to delete the template",
            Self::ClearLibraryFailed => "failed to clear the finger library",
            Self::WrongPassword => "wrong password",
            Self::MissingPrimaryImage => "no valid primary image",
            Self::FlashWriteError => "error writing flash",
            Self::UndefinedError => "no definition error",
            Self::InvalidRegister => "invalid register number",
            Self::IncorrectRegisterConfig => "incorrect register configuration",
            Self::WrongNotepadPage => "wrong notepad page number",
            Self::PortOperationFailed => "failed to operate the communication port",
            Self::SensorAbnormal => "sensor abnormal",
            Self::Other(_) => "unknown confirmation code",
        }
    }
}

impl From<u8> for ConfirmationCode {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::Ok,
            0x01 => Self::PacketReceiveError,
            0x02 => Self::NoFinger,
            0x03 => Self::EnrollFailed,
            0x06 => Self::ImageDisordered,
            0x07 => Self::ImageTooSmall,
            0x08 => Self::NoMatch,
            0x09 => Self::NotFound,
            0x0A => Self::MergeFailed,
            0x0B => Self::PageIdOutOfRange,
            0x0C => Self::TemplateReadError,
            0x0D => Self::TemplateUploadError,
            0x0E => Self::DataReceiveError,
            0x0F => Self::ImageUploadError,
            0x10 => Self::DeleteFailed,
            0x11 => Self::ClearLibraryFailed,
            0x13 => Self::WrongPassword,
            0x15 => Self::MissingPrimaryImage,
            0x18 => Self::FlashWriteError,
            0x19 => Self::UndefinedError,
            0x1A => Self::InvalidRegister,
            0x1B => Self::IncorrectRegisterConfig,
            0x1C => Self::WrongNotepadPage,
            0x1D => Self::PortOperationFailed,
            0x29 => Self::SensorAbnormal,
            other => Self::Other(other),
        }
    }
}

impl From<ConfirmationCode> for u8 {
    fn from(code: ConfirmationCode) -> u8 {
        match code {
            ConfirmationCode::Ok => 0x00,
            ConfirmationCode::PacketReceiveError => 0x01,
            ConfirmationCode::NoFinger => 0x02,
            ConfirmationCode::EnrollFailed => 0x03,
            ConfirmationCode::ImageDisordered => 0x06,
            ConfirmationCode::ImageTooSmall => 0x07,
            ConfirmationCode::NoMatch => 0x08,
            ConfirmationCode::NotFound => 0x09,
            ConfirmationCode::MergeFailed => 0x0A,
            ConfirmationCode::PageIdOutOfRange => 0x0B,
            ConfirmationCode::TemplateReadError => 0x0C,
            ConfirmationCode::TemplateUploadError => 0x0D,
            ConfirmationCode::DataReceiveError => 0x0E,
            ConfirmationCode::ImageUploadError => 0x0F,
            ConfirmationCode::DeleteFailed => 0x10,
            ConfirmationCode::ClearLibraryFailed => 0x11,
            ConfirmationCode::WrongPassword => 0x13,
            ConfirmationCode::MissingPrimaryImage => 0x15,
            ConfirmationCode::FlashWriteError => 0x18,
            ConfirmationCode::UndefinedError => 0x19,
            ConfirmationCode::InvalidRegister => 0x1A,
            ConfirmationCode::IncorrectRegisterConfig => 0x1B,
            ConfirmationCode::WrongNotepadPage => 0x1C,
            ConfirmationCode::PortOperationFailed => 0x1D,
            ConfirmationCode::SensorAbnormal => 0x29,
            ConfirmationCode::Other(value) => value,
        }
    }
}

impl fmt::Display for ConfirmationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X} ({})", u8::from(*self), self.description())
    }
}

/// Decoded acknowledgement frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Address of the answering module
    pub address: u32,

    /// Module verdict
    pub confirmation: ConfirmationCode,

    /// Bytes after the confirmation code, checksum excluded
    pub payload: Bytes,

    /// Checksum carried by the frame (already verified)
    pub checksum: u16,
}

impl Reply {
    /// Build a reply from a validated acknowledgement packet
    pub fn from_packet(packet: Packet) -> Self {
        debug_assert_eq!(packet.packet_type, PacketType::Ack);

        let checksum = packet.checksum();
        Self {
            address: packet.address,
            confirmation: ConfirmationCode::from(packet.code),
            payload: packet.parameters,
            checksum,
        }
    }
}

/// Map a reply to the final outcome of an exchange
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use fpmrust_core::{response, ConfirmationCode, Opcode, Reply};
///
/// let reply = Reply {
///     address: 0xFFFF_FFFF,
///     confirmation: ConfirmationCode::WrongPassword,
///     payload: Bytes::new(),
///     checksum: 0x001D,
/// };
///
/// let err = response::interpret(Opcode::VerifyPassword, reply).unwrap_err();
/// assert!(err.is_device_rejection());
/// ```
pub fn interpret(opcode: Opcode, reply: Reply) -> Result<Bytes> {
    if reply.confirmation.is_ok() {
        debug!(
            opcode = %opcode,
            payload_len = reply.payload.len(),
            "Command accepted"
        );
        return Ok(reply.payload);
    }

    warn!(
        opcode = %opcode,
        code = %reply.confirmation,
        "Command rejected by device"
    );

    Err(Error::DeviceRejected {
        opcode,
        code: reply.confirmation,
    })
}
