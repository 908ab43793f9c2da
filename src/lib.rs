//! # batch-ssh
//!
//! Broadcast shell commands to a fleet of SSH hosts and view every host's
//! response side by side.
//!
//! ## Features
//!
//! - **Concurrent connect**: all hosts are dialed in parallel; one host
//!   failing never stops the others
//! - **Fan-out**: each typed command is written to every live shell
//! - **Bounded collection**: output is read after a fixed settle delay,
//!   never blocking on a slow host
//! - **Clean teardown**: every session is closed exactly once on quit,
//!   Ctrl-C or error
//!
//! ## Quick Start
//!
//! ```no_run
//! use batch_ssh::{cli, config::Config};
//!
//! #[tokio::main]
//! async fn main() -> batch_ssh::Result<()> {
//!     batch_ssh::logging::try_init().ok();
//!
//!     let args = cli::parse_args().map_err(|e| batch_ssh::BatchSshError::Args(e.to_string()))?;
//!     let config = Config::load(&args)?;
//!
//!     let exit = batch_ssh::app::run(config).await?;
//!     println!("stopped: {:?}", exit);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod cli;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod logging;
pub mod output;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use dispatch::{
    CommandResult, DispatchSettings, Dispatcher, HostFailure, Outcome, Round, Teardown,
};
pub use error::{BatchSshError, Result, SessionError};
pub use output::{OutputSanitizer, ReportStyle};
pub use repl::LoopExit;
pub use session::{
    ConnectionSpec, Connector, Credential, Session, SessionStore, ShellChannel, SshConnector,
};
