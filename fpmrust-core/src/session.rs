//! Exchange state for one request/response round trip
//!
//! A session tracks:
//! - The command being executed
//! - The exchange state (`Idle → Sending → AwaitingReply → terminal`)
//! - The receive buffer, sized from the command catalog

use bytes::BytesMut;
use tracing::trace;

use crate::{
    command::Opcode,
    error::{Error, Result},
};

/// Exchange state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing sent yet
    Idle,

    /// Command frame being written
    Sending,

    /// Collecting reply bytes
    AwaitingReply,

    /// Full reply received and accepted by the codec
    Complete,

    /// Deadline passed before the reply was complete
    TimedOut,

    /// Reply rejected by the codec
    Malformed,
}

impl SessionState {
    /// Check if the exchange is over
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::TimedOut | Self::Malformed)
    }
}

/// State of a single exchange
///
/// Owns the receive buffer for the duration of the exchange; nothing is
/// shared between exchanges.
#[derive(Debug)]
pub struct Session {
    opcode: Opcode,
    state: SessionState,
    buffer: BytesMut,
}

impl Session {
    /// Create an idle session for a command
    pub fn new(opcode: Opcode) -> Self {
        Self {
            opcode,
            state: SessionState::Idle,
            buffer: BytesMut::with_capacity(opcode.reply_len()),
        }
    }

    /// Get the command being executed
    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Number of reply bytes collected so far
    pub fn received(&self) -> usize {
        self.buffer.len()
    }

    /// Number of reply bytes the command produces
    pub fn expected(&self) -> usize {
        self.opcode.reply_len()
    }

    /// Check if the reply buffer is full
    pub fn is_reply_complete(&self) -> bool {
        self.buffer.len() >= self.expected()
    }

    /// `Idle → Sending`
    pub fn begin_send(&mut self) -> Result<()> {
        self.transition(SessionState::Idle, SessionState::Sending)
    }

    /// `Sending → AwaitingReply`
    pub fn begin_receive(&mut self) -> Result<()> {
        self.transition(SessionState::Sending, SessionState::AwaitingReply)
    }

    /// Append one reply byte
    ///
    /// Returns `true` once the buffer holds the full reply.
    pub fn push_byte(&mut self, byte: u8) -> Result<bool> {
        if self.state != SessionState::AwaitingReply {
            return Err(Error::InvalidSessionState(format!(
                "Cannot accept reply bytes in state: {:?}",
                self.state
            )));
        }

        if self.is_reply_complete() {
            return Err(Error::InvalidSessionState(format!(
                "Reply buffer already holds {} bytes",
                self.buffer.len()
            )));
        }

        self.buffer.extend_from_slice(&[byte]);
        Ok(self.is_reply_complete())
    }

    /// Hand the collected reply to the codec
    pub fn take_reply(&mut self) -> Result<BytesMut> {
        if self.state != SessionState::AwaitingReply || !self.is_reply_complete() {
            return Err(Error::InvalidSessionState(format!(
                "Reply not complete: {}/{} bytes in state {:?}",
                self.buffer.len(),
                self.expected(),
                self.state
            )));
        }

        Ok(self.buffer.split())
    }

    /// `AwaitingReply → Complete`
    pub fn complete(&mut self) -> Result<()> {
        self.transition(SessionState::AwaitingReply, SessionState::Complete)
    }

    /// `AwaitingReply → TimedOut`
    pub fn time_out(&mut self) -> Result<()> {
        self.transition(SessionState::AwaitingReply, SessionState::TimedOut)
    }

    /// `AwaitingReply → Malformed`
    pub fn mark_malformed(&mut self) -> Result<()> {
        self.transition(SessionState::AwaitingReply, SessionState::Malformed)
    }

    fn transition(&mut self, from: SessionState, to: SessionState) -> Result<()> {
        if self.state != from {
            return Err(Error::InvalidSessionState(format!(
                "Cannot move to {:?} from state: {:?}",
                to, self.state
            )));
        }

        trace!(opcode = %self.opcode, from = ?from, to = ?to, "Session transition");
        self.state = to;
        Ok(())
    }
}
