//! # fpmrust-core
//!
//! Core protocol implementation for 0xEF01-framed fingerprint sensor modules.
//!
//! This crate provides the low-level protocol primitives:
//! - Frame structure and encoding/decoding
//! - Checksum calculation
//! - Command catalog
//! - Reply interpretation
//! - Exchange state tracking
//! - Protocol constants

pub mod checksum;
pub mod command;
pub mod constants;
pub mod error;
pub mod packet;
pub mod response;
pub mod session;

pub use command::{Opcode, Request};
pub use error::{Error, FrameError, Result};
pub use packet::{Packet, PacketType};
pub use response::{interpret, ConfirmationCode, Reply};
pub use session::{Session, SessionState};

/// Protocol version information
pub const PROTOCOL_VERSION: &str = "1.0";
