//! Connection inputs supplied once per run.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Port used when a server entry does not name one.
pub const DEFAULT_SSH_PORT: u16 = 22;

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

/// Address of one remote host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionSpec {
    /// Hostname or IP address.
    pub host: String,
    /// SSH port.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl ConnectionSpec {
    /// Create a spec for `host` on the default SSH port.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_SSH_PORT,
        }
    }

    /// Override the port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// `host:port` form, used to disambiguate repeated host names.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// How every host is authenticated. Exactly one variant is active per run.
///
/// `Debug` never prints secret material.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// Private key file with an optional passphrase.
    Key {
        path: PathBuf,
        passphrase: Option<String>,
    },
    /// Plain password.
    Password { secret: String },
}

impl Credential {
    /// Short name of the active method, safe to log.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Key { .. } => "publickey",
            Self::Password { .. } => "password",
        }
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key { path, passphrase } => f
                .debug_struct("Key")
                .field("path", path)
                .field("passphrase", &passphrase.as_ref().map(|_| "<redacted>"))
                .finish(),
            Self::Password { .. } => f
                .debug_struct("Password")
                .field("secret", &"<redacted>")
                .finish(),
        }
    }
}
