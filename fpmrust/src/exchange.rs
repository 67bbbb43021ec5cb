//! Request/response exchange over a byte channel
//!
//! One exchange writes a command frame, then polls the channel for the reply
//! until either the catalog reply length is reached or a single absolute
//! deadline passes. The deadline is computed once; bytes trickling in never
//! extend it.

use std::time::Duration;

use bytes::Bytes;
use tokio::time::Instant;
use tracing::{debug, trace, warn};

use fpmrust_core::{interpret, Error as CoreError, Packet, Reply, Request, Session};
use fpmrust_transport::ByteChannel;

use crate::{config::SensorConfig, error::Result};

/// Exchange driver
///
/// # Examples
///
/// ```
/// use fpmrust::{Exchange, SensorConfig};
/// use fpmrust_core::Request;
/// use fpmrust_transport::MockChannel;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> fpmrust::Result<()> {
/// let mut channel = MockChannel::new();
/// channel.push_reply([0xEF, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x07, 0x00, 0x03, 0x00, 0x00, 0x0A]);
///
/// let exchange = Exchange::new(&SensorConfig::default());
/// let payload = exchange.execute(&mut channel, &Request::verify_password(0)).await?;
/// assert!(payload.is_empty());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Exchange {
    address: u32,
    timeout: Duration,
    poll_interval: Duration,
}

impl Exchange {
    /// Create an exchange driver from sensor settings
    pub fn new(config: &SensorConfig) -> Self {
        Self {
            address: config.address,
            timeout: config.timeout,
            poll_interval: config.poll_interval,
        }
    }

    /// Run one exchange; the deadline starts when the request has been written
    pub async fn execute(
        &self,
        channel: &mut dyn ByteChannel,
        request: &Request,
    ) -> Result<Bytes> {
        let mut session = Session::new(request.opcode());

        self.send(channel, &mut session, request).await?;

        let deadline = Instant::now() + self.timeout;
        self.receive(channel, &mut session, deadline, self.timeout)
            .await
    }

    /// Run one exchange against a caller-supplied deadline
    pub async fn execute_until(
        &self,
        channel: &mut dyn ByteChannel,
        request: &Request,
        deadline: Instant,
    ) -> Result<Bytes> {
        let mut session = Session::new(request.opcode());

        self.send(channel, &mut session, request).await?;

        let budget = deadline.saturating_duration_since(Instant::now());
        self.receive(channel, &mut session, deadline, budget).await
    }

    async fn send(
        &self,
        channel: &mut dyn ByteChannel,
        session: &mut Session,
        request: &Request,
    ) -> Result<()> {
        session.begin_send()?;

        let frame = request.encode(self.address);

        debug!(
            opcode = %request.opcode(),
            channel = %channel.description(),
            "Sending command"
        );
        trace!(frame = %hex::encode_upper(&frame), "Command frame");

        channel.send_frame(&frame).await?;

        session.begin_receive()?;
        Ok(())
    }

    async fn receive(
        &self,
        channel: &mut dyn ByteChannel,
        session: &mut Session,
        deadline: Instant,
        budget: Duration,
    ) -> Result<Bytes> {
        let timeout_ms = budget.as_millis() as u64;

        loop {
            let now = Instant::now();
            if now >= deadline {
                session.time_out()?;

                warn!(
                    opcode = %session.opcode(),
                    received = session.received(),
                    expected = session.expected(),
                    timeout_ms = timeout_ms,
                    "Timeout waiting for reply"
                );

                return Err(CoreError::Timeout {
                    timeout_ms,
                    received: session.received(),
                    expected: session.expected(),
                }
                .into());
            }

            match channel.try_read_byte().await? {
                Some(byte) => {
                    if session.push_byte(byte)? {
                        break;
                    }
                }
                None => {
                    let wait = self.poll_interval.min(deadline.saturating_duration_since(now));
                    if wait.is_zero() {
                        tokio::task::yield_now().await;
                    } else {
                        tokio::time::sleep(wait).await;
                    }
                }
            }
        }

        let raw = session.take_reply()?;
        trace!(frame = %hex::encode_upper(&raw), "Reply frame");

        let packet = match Packet::decode_ack(raw, session.expected()) {
            Ok(packet) => packet,
            Err(e) => {
                session.mark_malformed()?;
                warn!(opcode = %session.opcode(), error = %e, "Malformed reply");
                return Err(e.into());
            }
        };

        session.complete()?;

        let payload = interpret(session.opcode(), Reply::from_packet(packet))?;
        Ok(payload)
    }
}
