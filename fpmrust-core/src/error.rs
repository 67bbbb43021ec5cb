//! Error types for fpmrust-core

use crate::{command::Opcode, response::ConfirmationCode};

/// Result type alias for fpmrust operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Reply failed structural validation (link corruption or desync)
    #[error("Malformed frame: {0}")]
    MalformedFrame(#[from] FrameError),

    /// Well-formed reply reporting a non-success confirmation code
    #[error("Device rejected {opcode}: {code}")]
    DeviceRejected {
        opcode: Opcode,
        code: ConfirmationCode,
    },

    /// Deadline elapsed before the full reply arrived
    #[error("Timeout waiting for reply after {timeout_ms}ms ({received}/{expected} bytes received)")]
    Timeout {
        timeout_ms: u64,
        received: usize,
        expected: usize,
    },

    /// Unknown instruction code
    #[error("Unknown opcode: 0x{0:02X}")]
    UnknownOpcode(u8),

    /// Parameter count does not match the command catalog
    #[error("Invalid parameters for {opcode}: expected {expected} bytes, got {actual} bytes")]
    InvalidParameters {
        opcode: Opcode,
        expected: usize,
        actual: usize,
    },

    /// Invalid exchange state transition
    #[error("Invalid session state: {0}")]
    InvalidSessionState(String),
}

/// Reasons a received frame is rejected before its payload is trusted
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// Buffer size differs from the length the command expects
    #[error("length mismatch: expected {expected} bytes, got {actual} bytes")]
    LengthMismatch {
        expected: usize,
        actual: usize,
    },

    /// Buffer shorter than the smallest possible frame
    #[error("frame too short: expected at least {expected} bytes, got {actual} bytes")]
    TooShort {
        expected: usize,
        actual: usize,
    },

    /// First two bytes are not the start code
    #[error("bad start code 0x{0:04X}")]
    BadStartCode(u16),

    /// Packet type byte is not the one expected here
    #[error("unexpected packet type 0x{0:02X}")]
    UnexpectedPacketType(u8),

    /// Declared length field disagrees with the buffer size
    #[error("length field declares {declared} bytes but frame carries {actual}")]
    LengthFieldMismatch {
        declared: u16,
        actual: usize,
    },

    /// Checksum verification failed
    #[error("checksum mismatch: expected 0x{expected:04X}, received 0x{received:04X}")]
    ChecksumMismatch {
        expected: u16,
        received: u16,
    },
}

impl Error {
    /// Check if error is recoverable (retrying the whole exchange might succeed)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::MalformedFrame(_))
    }

    /// Check if the link should be resynchronized before the next exchange
    pub fn requires_resync(&self) -> bool {
        matches!(self, Self::MalformedFrame(_))
    }

    /// Check if the device answered with a non-success confirmation code
    pub fn is_device_rejection(&self) -> bool {
        matches!(self, Self::DeviceRejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        let timeout = Error::Timeout {
            timeout_ms: 1000,
            received: 3,
            expected: 12,
        };
        assert!(timeout.is_recoverable());
        assert!(!timeout.requires_resync());
        assert!(!timeout.is_device_rejection());

        let malformed = Error::from(FrameError::UnexpectedPacketType(0x01));
        assert!(malformed.is_recoverable());
        assert!(malformed.requires_resync());

        let rejected = Error::DeviceRejected {
            opcode: Opcode::VerifyPassword,
            code: ConfirmationCode::WrongPassword,
        };
        assert!(rejected.is_device_rejection());
        assert!(!rejected.is_recoverable());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::from(FrameError::ChecksumMismatch {
            expected: 0x000A,
            received: 0x00FF,
        });
        assert_eq!(
            err.to_string(),
            "Malformed frame: checksum mismatch: expected 0x000A, received 0x00FF"
        );

        let err = Error::from(FrameError::UnexpectedPacketType(0x01));
        assert_eq!(err.to_string(), "Malformed frame: unexpected packet type 0x01");
    }
}
