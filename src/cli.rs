//! Command-line interface for batch-ssh.
//!
//! Uses lexopt for minimal binary size overhead.

use std::ffi::OsString;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Command-line arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
    /// Path to configuration file.
    pub config: Option<PathBuf>,
    /// Login user (overrides config file).
    pub user: Option<String>,
    /// Private key path (overrides config file).
    pub identity: Option<PathBuf>,
    /// Settle delay in milliseconds (overrides config file).
    pub settle_ms: Option<u64>,
    /// Strip ANSI escape sequences from output.
    pub strip_ansi: bool,
    /// Write a template config and exit.
    pub init: bool,
    /// Log level (error, warn, info, debug, trace).
    pub log_level: Option<String>,
    /// Show version and exit.
    pub version: bool,
    /// Show help and exit.
    pub help: bool,
}

impl Args {
    /// Config file to read, falling back to [`DEFAULT_CONFIG_PATH`].
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

/// Parse command-line arguments.
pub fn parse_args() -> Result<Args, ArgsError> {
    parse_args_from(std::env::args_os())
}

/// Parse arguments from an iterator (for testing).
pub fn parse_args_from<I>(args: I) -> Result<Args, ArgsError>
where
    I: IntoIterator<Item = OsString>,
{
    use lexopt::prelude::*;

    let mut result = Args::default();
    let mut parser = lexopt::Parser::from_iter(args);

    while let Some(arg) = parser.next()? {
        match arg {
            Short('h') | Long("help") => {
                result.help = true;
            }
            Short('V') | Long("version") => {
                result.version = true;
            }
            Short('c') | Long("config") => {
                result.config = Some(parser.value()?.parse()?);
            }
            Short('u') | Long("user") => {
                let value: String = parser.value()?.parse()?;
                if value.trim().is_empty() {
                    return Err(ArgsError::InvalidValue("user", value));
                }
                result.user = Some(value);
            }
            Short('i') | Long("identity") => {
                result.identity = Some(parser.value()?.parse()?);
            }
            Short('s') | Long("settle-ms") => {
                let value: String = parser.value()?.parse()?;
                result.settle_ms = Some(
                    value
                        .parse()
                        .map_err(|_| ArgsError::InvalidValue("settle-ms", value))?,
                );
            }
            Long("strip-ansi") => {
                result.strip_ansi = true;
            }
            Long("init") => {
                result.init = true;
            }
            Short('l') | Long("log-level") => {
                result.log_level = Some(parser.value()?.parse()?);
            }
            Value(val) => {
                return Err(ArgsError::UnexpectedArgument(val.to_string_lossy().into()));
            }
            _ => return Err(arg.unexpected().into()),
        }
    }

    Ok(result)
}

/// Print help message.
pub fn print_help() {
    let version = env!("CARGO_PKG_VERSION");
    println!(
        r#"batch-ssh {version}
Broadcast shell commands to many SSH hosts and compare their responses

USAGE:
    batch-ssh [OPTIONS]

OPTIONS:
    -c, --config <FILE>     Configuration file [default: {DEFAULT_CONFIG_PATH}]
    -u, --user <USER>       Login user for every host
    -i, --identity <KEY>    Private key file (empty config value = password auth)
    -s, --settle-ms <MS>    Wait after each command before reading output [default: 1000]
        --strip-ansi        Remove terminal escape sequences from output
        --init              Write a template configuration file and exit
    -l, --log-level <LVL>   Log level (error, warn, info, debug, trace)
    -h, --help              Print help
    -V, --version           Print version

ENVIRONMENT VARIABLES:
    BATCH_SSH_USER            Login user (overrides config)
    BATCH_SSH_PASSWORD        Password (overrides config)
    BATCH_SSH_KEY             Private key path (overrides config)
    BATCH_SSH_KEY_PASSPHRASE  Private key passphrase (overrides config)
    BATCH_SSH_SETTLE_MS       Settle delay in milliseconds (overrides config)
    BATCH_SSH_LOG_LEVEL       Log level (overrides config)
    RUST_LOG                  Alternative log level setting

INTERACTIVE USE:
    Type a command to send it to every connected host.
    Type 'quit' or press Ctrl-C to close all sessions and exit.

EXAMPLES:
    # First run: writes {DEFAULT_CONFIG_PATH} for you to edit
    batch-ssh

    # Use another config and a longer settle delay
    batch-ssh -c /etc/batch-ssh/prod.json -s 3000
"#
    );
}

/// Print version.
pub fn print_version() {
    println!("batch-ssh {}", env!("CARGO_PKG_VERSION"));
}

/// Argument parsing errors.
#[derive(Debug)]
pub enum ArgsError {
    /// Lexopt parsing error.
    Lexopt(lexopt::Error),
    /// Invalid argument value.
    InvalidValue(&'static str, String),
    /// Unexpected positional argument.
    UnexpectedArgument(String),
}

impl std::fmt::Display for ArgsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lexopt(e) => write!(f, "{}", e),
            Self::InvalidValue(name, value) => {
                write!(f, "invalid value for --{}: '{}'", name, value)
            }
            Self::UnexpectedArgument(arg) => {
                write!(f, "unexpected argument: '{}'", arg)
            }
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<lexopt::Error> for ArgsError {
    fn from(e: lexopt::Error) -> Self {
        Self::Lexopt(e)
    }
}
