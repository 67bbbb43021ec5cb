//! High-level error types

use fpmrust_core::ConfirmationCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] fpmrust_core::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] fpmrust_transport::Error),

    #[error("Type error: {0}")]
    Types(#[from] fpmrust_types::Error),
}

impl Error {
    /// Deadline passed before the full reply arrived
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Core(fpmrust_core::Error::Timeout { .. }))
    }

    /// Reply failed frame validation
    pub fn is_malformed_frame(&self) -> bool {
        matches!(self, Self::Core(fpmrust_core::Error::MalformedFrame(_)))
    }

    /// Confirmation code of a device rejection, if this is one
    pub fn rejection_code(&self) -> Option<ConfirmationCode> {
        match self {
            Self::Core(fpmrust_core::Error::DeviceRejected { code, .. }) => Some(*code),
            _ => None,
        }
    }

    /// Check if retrying the exchange might succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Core(e) => e.is_recoverable(),
            Self::Transport(fpmrust_transport::Error::Io(_)) => true,
            _ => false,
        }
    }
}
