//! Scripted channel for deterministic testing of exchanges
//!
//! [`MockChannel`] plays back pre-loaded reply frames. A reply is armed when
//! the next request starts being written and its bytes become readable either
//! at once or one by one at a fixed interval on the Tokio clock, so tests
//! running with a paused clock see exact timings.
//!
//! Clones share the same state, so a test can hand one clone to the code under
//! test and inspect the other afterwards.
//!
//! # Example
//!
//! ```
//! use fpmrust_transport::MockChannel;
//!
//! let mock = MockChannel::new();
//! mock.push_reply([0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x03, 0x00, 0x00, 0x0A]);
//! assert_eq!(mock.pending_replies(), 1);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::trace;

use crate::{error::*, ByteChannel};

#[derive(Debug, Clone)]
struct Script {
    bytes: Vec<u8>,
    byte_interval: Duration,
}

#[derive(Debug)]
struct Playback {
    script: Script,
    armed_at: Instant,
    cursor: usize,
}

impl Playback {
    fn next_byte(&mut self, now: Instant) -> Option<u8> {
        let byte = *self.script.bytes.get(self.cursor)?;

        // Byte n becomes readable (n + 1) intervals after arming
        let ready_at = self.armed_at + self.script.byte_interval * (self.cursor as u32 + 1);
        if now < ready_at {
            return None;
        }

        self.cursor += 1;
        Some(byte)
    }

    fn is_exhausted(&self) -> bool {
        self.cursor >= self.script.bytes.len()
    }
}

#[derive(Debug)]
struct MockState {
    scripts: VecDeque<Script>,
    playback: Option<Playback>,
    stale: VecDeque<u8>,
    sent: Vec<u8>,
    connected: bool,
}

/// A mock [`ByteChannel`] for testing without hardware
#[derive(Debug, Clone)]
pub struct MockChannel {
    state: Arc<Mutex<MockState>>,
}

impl MockChannel {
    /// Create a connected mock with no scripted replies
    ///
    /// Without replies the mock never produces a byte, like a module that is
    /// unplugged.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                scripts: VecDeque::new(),
                playback: None,
                stale: VecDeque::new(),
                sent: Vec::new(),
                connected: true,
            })),
        }
    }

    /// Queue a reply that is readable as soon as the next request is written
    pub fn push_reply(&self, bytes: impl Into<Vec<u8>>) {
        self.push_trickled_reply(bytes, Duration::ZERO);
    }

    /// Queue a reply whose bytes arrive one per `byte_interval`
    pub fn push_trickled_reply(&self, bytes: impl Into<Vec<u8>>, byte_interval: Duration) {
        self.state.lock().scripts.push_back(Script {
            bytes: bytes.into(),
            byte_interval,
        });
    }

    /// Make bytes readable immediately, ahead of any reply
    pub fn inject_stale(&self, bytes: &[u8]) {
        self.state.lock().stale.extend(bytes.iter().copied());
    }

    /// All bytes written so far, in order
    pub fn sent(&self) -> Vec<u8> {
        self.state.lock().sent.clone()
    }

    /// Return and forget the bytes written so far
    pub fn take_sent(&self) -> Vec<u8> {
        std::mem::take(&mut self.state.lock().sent)
    }

    /// Number of replies not yet armed
    pub fn pending_replies(&self) -> usize {
        self.state.lock().scripts.len()
    }

    /// Set the connected state
    ///
    /// When `false`, every channel operation fails with [`Error::NotConnected`].
    pub fn set_connected(&self, connected: bool) {
        self.state.lock().connected = connected;
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ByteChannel for MockChannel {
    async fn write_byte(&mut self, byte: u8) -> Result<()> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }

        state.sent.push(byte);

        if state.playback.is_none() {
            if let Some(script) = state.scripts.pop_front() {
                trace!(reply_len = script.bytes.len(), "Mock reply armed");
                state.playback = Some(Playback {
                    script,
                    armed_at: Instant::now(),
                    cursor: 0,
                });
            }
        }

        Ok(())
    }

    async fn try_read_byte(&mut self) -> Result<Option<u8>> {
        let mut state = self.state.lock();
        if !state.connected {
            return Err(Error::NotConnected);
        }

        if let Some(byte) = state.stale.pop_front() {
            return Ok(Some(byte));
        }

        let Some(playback) = state.playback.as_mut() else {
            return Ok(None);
        };

        let byte = playback.next_byte(Instant::now());
        if playback.is_exhausted() {
            state.playback = None;
        }

        Ok(byte)
    }

    fn description(&self) -> String {
        "mock".to_string()
    }
}
