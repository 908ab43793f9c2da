//! Configuration management for batch-ssh.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values
//!
//! Unlike most settings, the configuration file itself is mandatory: it is
//! the only place the server list comes from. When it is missing, a
//! template can be written with [`Config::write_template`].

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::dispatch::{DispatchSettings, DEFAULT_READ_CHUNK};
use crate::session::{ConnectionSpec, Credential};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_PATH: &str = "batch-ssh.json";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Login user on every host.
    pub user: String,
    /// Hosts to connect to, in display order.
    pub servers: Vec<ConnectionSpec>,
    /// Private key path. Empty selects password authentication.
    pub private_key: String,
    /// Passphrase for the private key, if it has one.
    pub key_passphrase: String,
    /// Password, used only when `private_key` is empty.
    pub password: String,
    /// Wait between sending a command and reading output, in milliseconds.
    pub settle_delay_ms: u64,
    /// Maximum bytes read per host per round.
    pub read_chunk_size: usize,
    /// TCP connect and SSH operation timeout, in seconds.
    pub connect_timeout_secs: u64,
    /// Strip ANSI escape sequences from displayed output.
    pub strip_ansi: bool,
    /// Logging configuration.
    pub logging: LoggingSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user: String::new(),
            servers: Vec::new(),
            private_key: String::new(),
            key_passphrase: String::new(),
            password: String::new(),
            settle_delay_ms: 1000,
            read_chunk_size: DEFAULT_READ_CHUNK,
            connect_timeout_secs: 10,
            strip_ansi: false,
            logging: LoggingSection::default(),
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a full filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Example configuration written when no file exists yet.
    pub fn template() -> Self {
        Self {
            user: "root".to_string(),
            servers: vec![
                ConnectionSpec::new("127.0.0.1").port(11451),
                ConnectionSpec::new("localhost").port(41919),
            ],
            private_key: "private".to_string(),
            ..Self::default()
        }
    }

    /// Write the template to `path`.
    ///
    /// Refuses to overwrite an existing file.
    pub fn write_template(path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(&Self::template()).map_err(ConfigError::Json)?;
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(ConfigError::Io)?;
        file.write_all(json.as_bytes()).map_err(ConfigError::Io)?;
        file.write_all(b"\n").map_err(ConfigError::Io)?;
        Ok(())
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::Missing(path.to_path_buf())
            } else {
                ConfigError::Io(e)
            }
        })?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(user) = std::env::var("BATCH_SSH_USER") {
            self.user = user;
        }

        if let Ok(password) = std::env::var("BATCH_SSH_PASSWORD") {
            self.password = password;
        }

        if let Ok(key) = std::env::var("BATCH_SSH_KEY") {
            self.private_key = key;
        }

        if let Ok(passphrase) = std::env::var("BATCH_SSH_KEY_PASSPHRASE") {
            self.key_passphrase = passphrase;
        }

        if let Ok(ms) = std::env::var("BATCH_SSH_SETTLE_MS") {
            if let Ok(ms) = ms.parse() {
                self.settle_delay_ms = ms;
            }
        }

        if let Ok(level) = std::env::var("BATCH_SSH_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(ref user) = args.user {
            self.user = user.clone();
        }

        if let Some(ref identity) = args.identity {
            self.private_key = identity.to_string_lossy().into_owned();
        }

        if let Some(ms) = args.settle_ms {
            self.settle_delay_ms = ms;
        }

        if args.strip_ansi {
            self.strip_ansi = true;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain, then validate it.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::from_file(&args.config_path())?;
        config.apply_env();
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Check that the config can drive a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.user.trim().is_empty() {
            return Err(ConfigError::Invalid("user must not be empty".into()));
        }
        if self.servers.is_empty() {
            return Err(ConfigError::Invalid("servers must list at least one host".into()));
        }
        for (i, server) in self.servers.iter().enumerate() {
            if server.host.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("servers[{}]: host is empty", i)));
            }
            if server.port == 0 {
                return Err(ConfigError::Invalid(format!(
                    "servers[{}] ({}): port must be non-zero",
                    i, server.host
                )));
            }
        }
        if self.read_chunk_size == 0 {
            return Err(ConfigError::Invalid("read_chunk_size must be non-zero".into()));
        }
        if self.private_key.is_empty() && self.password.is_empty() {
            return Err(ConfigError::Invalid(
                "set either private_key or password".into(),
            ));
        }
        Ok(())
    }

    /// The credential for this run. An empty `private_key` selects the password.
    pub fn credential(&self) -> Credential {
        if self.private_key.is_empty() {
            Credential::Password {
                secret: self.password.clone(),
            }
        } else {
            Credential::Key {
                path: PathBuf::from(&self.private_key),
                passphrase: Some(self.key_passphrase.clone()).filter(|p| !p.is_empty()),
            }
        }
    }

    /// Settings for each broadcast/collect round.
    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            read_chunk_size: self.read_chunk_size,
        }
    }

    /// Connect timeout for the SSH transport.
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    /// Get the log level filter string.
    pub fn log_filter(&self) -> &str {
        &self.logging.level
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// No file at the given path.
    Missing(PathBuf),
    /// IO error reading or writing the config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
    /// The file parsed but cannot drive a run.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "config file not found: {}", path.display()),
            Self::Io(e) => write!(f, "failed to access config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
            Self::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
