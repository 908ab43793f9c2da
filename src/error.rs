//! Error types for batch-ssh.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal, run-level errors.
///
/// Anything that goes wrong for a single host is a [`SessionError`] instead,
/// and is recorded rather than propagated.
#[derive(Error, Debug)]
pub enum BatchSshError {
    /// No configuration file was found at the given path.
    #[error("configuration file not found: {}", .0.display())]
    ConfigMissing(PathBuf),

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {0}")]
    Config(ConfigError),

    /// Command-line arguments could not be parsed.
    #[error("invalid arguments: {0}")]
    Args(String),

    /// I/O error on the operator's terminal.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A background task panicked or was cancelled.
    #[error("task failed: {0}")]
    Join(String),
}

impl From<ConfigError> for BatchSshError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Missing(path) => Self::ConfigMissing(path),
            other => Self::Config(other),
        }
    }
}

/// Convenience Result type for batch-ssh operations.
pub type Result<T> = std::result::Result<T, BatchSshError>;

/// Failure of a single host's session operation.
///
/// Every variant carries a human-readable reason. These never abort work on
/// sibling hosts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// DNS resolution, TCP connect or SSH handshake failed.
    #[error("connection failed: {0}")]
    Connect(String),

    /// The server rejected the credential.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The interactive shell could not be opened after authentication.
    #[error("failed to open shell: {0}")]
    Channel(String),

    /// Writing a command to the shell failed.
    #[error("failed to send command: {0}")]
    Write(String),

    /// Reading buffered output failed.
    #[error("failed to read output: {0}")]
    Read(String),

    /// Closing the channel or transport failed.
    #[error("failed to close connection: {0}")]
    Close(String),
}

impl SessionError {
    /// Short tag naming the phase that failed, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Connect(_) => "connect",
            Self::Auth(_) => "auth",
            Self::Channel(_) => "channel",
            Self::Write(_) => "write",
            Self::Read(_) => "read",
            Self::Close(_) => "close",
        }
    }

    /// The reason text without the phase prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::Connect(r)
            | Self::Auth(r)
            | Self::Channel(r)
            | Self::Write(r)
            | Self::Read(r)
            | Self::Close(r) => r,
        }
    }
}
