//! Interactive shell channel over an SSH PTY.

use std::time::{Duration, Instant};

use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};
use tokio::time::timeout;

use super::buffer::PatternBuffer;
use crate::error::{ChannelError, Result};

/// A PTY-backed shell on an open SSH session.
///
/// Two read disciplines are offered: [`read_until_pattern`] blocks until a
/// prompt regex matches the buffer tail (used to settle the login banner
/// and escalation prompts), and [`read_timed`] waits a fixed window and
/// returns whatever arrived (used for command output capture).
///
/// [`read_until_pattern`]: ShellChannel::read_until_pattern
/// [`read_timed`]: ShellChannel::read_timed
pub struct ShellChannel {
    channel: Channel<Msg>,
    buffer: PatternBuffer,
    read_timeout: Duration,
}

impl ShellChannel {
    pub(crate) fn new(channel: Channel<Msg>, read_timeout: Duration) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::default(),
            read_timeout,
        }
    }

    /// Send a line of input, newline-terminated.
    pub async fn send_line(&mut self, line: &str) -> Result<()> {
        let payload = format!("{line}\n");
        self.channel
            .data(payload.as_bytes())
            .await
            .map_err(ChannelError::Ssh)?;
        Ok(())
    }

    /// Read until `pattern` appears in the buffer tail or `wait` elapses.
    pub async fn read_until_pattern(&mut self, pattern: &Regex, wait: Duration) -> Result<Vec<u8>> {
        let deadline = Instant::now() + wait;
        loop {
            if self.buffer.tail_contains(pattern) {
                return Ok(self.buffer.take().to_vec());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(ChannelError::PatternTimeout(wait).into());
            }

            match timeout(remaining, self.channel.wait()).await {
                Err(_) => return Err(ChannelError::PatternTimeout(wait).into()),
                Ok(None) => return Err(ChannelError::Closed.into()),
                Ok(Some(ChannelMsg::Data { ref data })) => self.buffer.extend(data),
                Ok(Some(ChannelMsg::ExtendedData { ref data, .. })) => self.buffer.extend(data),
                Ok(Some(_)) => {}
            }
        }
    }

    /// Time-boxed read: collect whatever arrives within the read window
    /// and return it, matching no pattern.
    pub async fn read_timed(&mut self) -> Result<Vec<u8>> {
        let deadline = Instant::now() + self.read_timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }

            match timeout(remaining, self.channel.wait()).await {
                Err(_) => break,
                Ok(None) => {
                    if self.buffer.is_empty() {
                        return Err(ChannelError::Closed.into());
                    }
                    break;
                }
                Ok(Some(ChannelMsg::Data { ref data })) => self.buffer.extend(data),
                Ok(Some(ChannelMsg::ExtendedData { ref data, .. })) => self.buffer.extend(data),
                Ok(Some(_)) => {}
            }
        }
        Ok(self.buffer.take().to_vec())
    }
}
