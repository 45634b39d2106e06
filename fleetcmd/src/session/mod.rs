//! Session protocol engine: the two-stage connect-and-run state machine.
//!
//! Each device gets one interactive SSH attempt; any failure there is
//! recovered by exactly one raw telnet attempt. Either stage is
//! all-or-nothing: a failure partway through discards that stage's
//! partial output, and a device whose fallback also fails is skipped.

mod ssh_run;
mod telnet;

pub use telnet::TelnetSession;

use std::future::Future;
use std::time::Duration;

use log::warn;
use thiserror::Error;

use crate::credentials::Credentials;
use crate::error::TelnetError;

/// Default SSH port.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Default telnet port.
pub const DEFAULT_TELNET_PORT: u16 = 23;

/// Default per-read window for command output capture.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(2);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Everything the engine needs for one device's attempts. Owned by the
/// engine for the duration of that device's processing and discarded
/// afterwards.
#[derive(Debug, Clone)]
pub struct ConnectionParams {
    /// Resolved network address.
    pub host: String,

    /// Custom port; protocol defaults apply when unset.
    pub port: Option<u16>,

    /// Platform tag, resolved against the registry at connect time.
    pub platform: String,

    /// Credentials for both protocol stages.
    pub credentials: Credentials,
}

/// Which protocol ended up carrying a device's commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Via {
    Ssh,
    Telnet,
}

/// One executed command and what the device answered.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub command: String,
    pub output: String,
}

/// Per-device success: the ordered command outputs and the protocol that
/// produced them.
#[derive(Debug)]
pub struct SessionSuccess {
    pub via: Via,
    pub outputs: Vec<CommandOutput>,
}

/// Per-device failure, tagged by how the final (telnet) stage died.
///
/// An interactive-stage error never terminates a device on its own - the
/// fallback always runs - so the terminal taxonomy covers the raw stage;
/// the interactive error is logged at the fallback boundary.
#[derive(Error, Debug)]
pub enum SessionFailure {
    /// The post-login output did not echo the device name.
    #[error("raw terminal login not accepted by '{device}'")]
    RawAuth { device: String },

    /// The raw connection could not be established in time.
    #[error("raw terminal connect timed out after {0:?}")]
    RawTimeout(Duration),

    /// Any other raw-stage failure.
    #[error("raw terminal session failed: {0}")]
    Raw(#[source] TelnetError),
}

/// Runs one device's commands end to end.
///
/// The trait exists so the batch orchestrator can be exercised with a
/// scripted engine instead of the network.
pub trait DeviceExecutor: Send + Sync {
    fn run_device(
        &self,
        device: &str,
        params: &ConnectionParams,
        commands: &[String],
    ) -> impl Future<Output = Result<SessionSuccess, SessionFailure>> + Send;
}

/// The two-stage protocol engine: interactive SSH first, raw telnet
/// second.
#[derive(Debug, Clone)]
pub struct ProtocolEngine {
    read_timeout: Duration,
    connect_timeout: Duration,
}

impl ProtocolEngine {
    /// Create an engine with the default timeouts.
    pub fn new() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    /// Set the per-read capture window.
    pub fn with_read_timeout(mut self, read_timeout: Duration) -> Self {
        self.read_timeout = read_timeout;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

impl Default for ProtocolEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceExecutor for ProtocolEngine {
    async fn run_device(
        &self,
        device: &str,
        params: &ConnectionParams,
        commands: &[String],
    ) -> Result<SessionSuccess, SessionFailure> {
        match ssh_run::run(device, params, commands, self.connect_timeout, self.read_timeout).await
        {
            Ok(outputs) => {
                return Ok(SessionSuccess {
                    via: Via::Ssh,
                    outputs,
                });
            }
            Err(err) => {
                warn!("{device}: interactive session failed ({err}), trying telnet");
            }
        }

        match telnet::run(device, params, commands, self.connect_timeout, self.read_timeout).await
        {
            Ok(outputs) => Ok(SessionSuccess {
                via: Via::Telnet,
                outputs,
            }),
            Err(TelnetError::AuthenticationRejected { device }) => {
                Err(SessionFailure::RawAuth { device })
            }
            Err(TelnetError::ConnectTimeout(elapsed)) => Err(SessionFailure::RawTimeout(elapsed)),
            Err(err) => Err(SessionFailure::Raw(err)),
        }
    }
}

/// Strip the echoed command from the head of a capture. The rest is left
/// as the device produced it.
pub(crate) fn normalize_output(raw: &str, command: &str) -> String {
    raw.strip_prefix(command)
        .unwrap_or(raw)
        .trim_start_matches(['\r', '\n'])
        .to_string()
}
