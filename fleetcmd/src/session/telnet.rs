//! Raw telnet fallback: a client-driven prompt-matching state machine
//! over a plain TCP stream.
//!
//! Reads follow telnet-client semantics: waiting for a prompt byte gives
//! up after the read window and hands back whatever arrived, so a slow
//! device yields a truncated capture rather than an error. The login
//! check compensates: the post-login output must echo the device's own
//! name, a banner convention most fleet devices follow (ones that do not
//! will spuriously fail here - a documented limitation of this path).

use std::time::{Duration, Instant};

use log::debug;
use secrecy::ExposeSecret;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use super::{CommandOutput, ConnectionParams, DEFAULT_TELNET_PORT};
use crate::channel::PatternBuffer;
use crate::error::TelnetError;

/// Byte that terminates a login or password prompt.
const LOGIN_PROMPT: u8 = b':';

/// Byte that terminates a command prompt.
const COMMAND_PROMPT: u8 = b'#';

/// Run the full fallback sequence for one device: login, authentication
/// check, optional enable escalation, then the command loop.
pub(crate) async fn run(
    device: &str,
    params: &ConnectionParams,
    commands: &[String],
    connect_timeout: Duration,
    read_timeout: Duration,
) -> Result<Vec<CommandOutput>, TelnetError> {
    let port = params.port.unwrap_or(DEFAULT_TELNET_PORT);
    let mut session =
        TelnetSession::connect(&params.host, port, connect_timeout, read_timeout).await?;

    session.read_until(LOGIN_PROMPT).await?;
    session.send_line(&params.credentials.username).await?;

    session.read_until(LOGIN_PROMPT).await?;
    session
        .send_line(params.credentials.password.expose_secret())
        .await?;

    let auth_response = session.read_until(COMMAND_PROMPT).await?;
    let auth_text = String::from_utf8_lossy(&auth_response);
    if !auth_text.contains(device) {
        return Err(TelnetError::AuthenticationRejected {
            device: device.to_string(),
        });
    }

    if let Some(secret) = &params.credentials.enable_secret {
        debug!("{device}: requesting enable mode");
        session.send_line("enable").await?;
        session.read_until(LOGIN_PROMPT).await?;
        session.send_line(secret.expose_secret()).await?;
        session.read_until(COMMAND_PROMPT).await?;
    }

    let mut outputs = Vec::with_capacity(commands.len());
    for command in commands {
        session.send_line(command).await?;
        let raw = session.read_until(COMMAND_PROMPT).await?;
        outputs.push(CommandOutput {
            command: command.clone(),
            output: super::normalize_output(&String::from_utf8_lossy(&raw), command),
        });
    }

    Ok(outputs)
}

/// A raw telnet connection with prompt-byte matching.
pub struct TelnetSession {
    stream: TcpStream,
    buffer: PatternBuffer,
    read_timeout: Duration,
}

impl TelnetSession {
    /// Connect to the device.
    pub async fn connect(
        host: &str,
        port: u16,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Result<Self, TelnetError> {
        let stream = timeout(connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| TelnetError::ConnectTimeout(connect_timeout))?
            .map_err(|source| TelnetError::ConnectionFailed {
                host: host.to_string(),
                port,
                source,
            })?;

        Ok(Self {
            stream,
            buffer: PatternBuffer::default(),
            read_timeout,
        })
    }

    /// Send a line of input, newline-terminated.
    pub async fn send_line(&mut self, line: &str) -> Result<(), TelnetError> {
        let payload = format!("{line}\n");
        self.stream.write_all(payload.as_bytes()).await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Read until `needle` arrives or the read window elapses.
    ///
    /// A timeout hands back whatever was buffered; data past the needle
    /// stays buffered for the next read.
    pub async fn read_until(&mut self, needle: u8) -> Result<Vec<u8>, TelnetError> {
        let deadline = Instant::now() + self.read_timeout;
        let mut chunk = [0u8; 4096];

        loop {
            if let Some(pos) = self.buffer.find_byte(needle) {
                return Ok(self.buffer.take_through(pos).to_vec());
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Ok(self.buffer.take().to_vec());
            }

            match timeout(remaining, self.stream.read(&mut chunk)).await {
                Err(_) => return Ok(self.buffer.take().to_vec()),
                Ok(Ok(0)) => {
                    if self.buffer.is_empty() {
                        return Err(TelnetError::Eof);
                    }
                    return Ok(self.buffer.take().to_vec());
                }
                Ok(Ok(n)) => {
                    let cleaned = self.negotiate(&chunk[..n]).await?;
                    self.buffer.extend(&cleaned);
                }
                Ok(Err(source)) => return Err(source.into()),
            }
        }
    }

    /// Strip IAC sequences from a chunk, refusing every option the peer
    /// proposes.
    async fn negotiate(&mut self, raw: &[u8]) -> Result<Vec<u8>, TelnetError> {
        const IAC: u8 = 255;
        const DONT: u8 = 254;
        const DO: u8 = 253;
        const WONT: u8 = 252;
        const WILL: u8 = 251;
        const SB: u8 = 250;
        const SE: u8 = 240;

        let mut cleaned = Vec::with_capacity(raw.len());
        let mut reply = Vec::new();
        let mut i = 0;

        while i < raw.len() {
            if raw[i] != IAC {
                cleaned.push(raw[i]);
                i += 1;
                continue;
            }
            match raw.get(i + 1).copied() {
                Some(IAC) => {
                    // Escaped 0xff data byte
                    cleaned.push(IAC);
                    i += 2;
                }
                Some(DO) | Some(DONT) => {
                    if let Some(option) = raw.get(i + 2) {
                        reply.extend_from_slice(&[IAC, WONT, *option]);
                    }
                    i += 3;
                }
                Some(WILL) | Some(WONT) => {
                    if let Some(option) = raw.get(i + 2) {
                        reply.extend_from_slice(&[IAC, DONT, *option]);
                    }
                    i += 3;
                }
                Some(SB) => {
                    let mut j = i + 2;
                    while j + 1 < raw.len() && !(raw[j] == IAC && raw[j + 1] == SE) {
                        j += 1;
                    }
                    i = if j + 1 < raw.len() { j + 2 } else { raw.len() };
                }
                Some(_) => i += 2,
                None => i += 1,
            }
        }

        if !reply.is_empty() {
            self.stream.write_all(&reply).await?;
            self.stream.flush().await?;
        }

        Ok(cleaned)
    }
}
