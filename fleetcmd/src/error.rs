//! Error types for fleetcmd.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for the interactive (SSH) path.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Shell channel errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Platform lookup errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// Connection attempt timed out
    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),
}

/// Shell channel errors (prompt matching, reads and writes on the PTY).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Prompt pattern was not seen in time
    #[error("Prompt pattern not found within {0:?}")]
    PatternTimeout(Duration),

    /// Channel closed unexpectedly
    #[error("Channel closed")]
    Closed,

    /// SSH protocol error on the channel
    #[error("Channel SSH error: {0}")]
    Ssh(russh::Error),
}

/// Platform registry errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Platform tag is not in the registry
    #[error("Unknown platform tag '{name}'")]
    UnknownPlatform { name: String },
}

/// Errors on the raw telnet path.
///
/// Kept apart from [`Error`]: a telnet failure terminates a device,
/// while an SSH failure only triggers the fallback.
#[derive(Error, Debug)]
pub enum TelnetError {
    /// TCP connect failed
    #[error("Connection failed to {host}:{port}: {source}")]
    ConnectionFailed {
        host: String,
        port: u16,
        #[source]
        source: io::Error,
    },

    /// TCP connect timed out
    #[error("Connection timed out after {0:?}")]
    ConnectTimeout(Duration),

    /// Post-login output did not echo the device name
    #[error("Login not accepted by '{device}'")]
    AuthenticationRejected { device: String },

    /// Peer closed the connection before any data arrived
    #[error("Connection closed by peer")]
    Eof,

    /// I/O error on the socket
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Errors loading the inventory or process configuration documents.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Result type alias using fleetcmd's Error.
pub type Result<T> = std::result::Result<T, Error>;
