//! Session dispatcher.
//!
//! The dispatcher owns the run's [`SessionStore`] and drives four steps:
//! - [`establish`]: connect every host concurrently
//! - [`broadcast`]: write one command line to every session
//! - [`collect`]: after the settle delay, drain buffered output without blocking
//! - [`close_all`]: close every session exactly once
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use batch_ssh::dispatch::{DispatchSettings, Dispatcher};
//! use batch_ssh::session::{ConnectionSpec, Credential, SshConnector};
//!
//! # async fn demo() -> batch_ssh::Result<()> {
//! let specs = vec![ConnectionSpec::new("10.0.0.1"), ConnectionSpec::new("10.0.0.2")];
//! let credential = Credential::Password { secret: "secret".into() };
//!
//! let (mut dispatcher, failures) = Dispatcher::connect(
//!     Arc::new(SshConnector::default()),
//!     &specs,
//!     "root",
//!     &credential,
//!     DispatchSettings::default(),
//! )
//! .await;
//!
//! let round = dispatcher.round("uptime").await?;
//! for (host, outcome) in round.result.iter() {
//!     println!("{host}: {outcome:?}");
//! }
//! dispatcher.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod broadcast;
mod collect;
mod establish;
mod reap;
mod result;

pub use broadcast::{broadcast, LINE_TERMINATOR};
pub use collect::{collect, DEFAULT_READ_CHUNK};
pub use establish::establish;
pub use reap::close_all;
pub use result::{CommandResult, Establishment, HostFailure, Outcome, Teardown};

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::error::{BatchSshError, SessionError};
use crate::session::{ConnectionSpec, Connector, Credential, SessionStore};
use crate::Result;

/// Default wait between broadcast and collect.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Timing and sizing for each round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Fixed wait after broadcast before output is read.
    pub settle_delay: Duration,
    /// Maximum bytes read per host per round.
    pub read_chunk_size: usize,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            read_chunk_size: DEFAULT_READ_CHUNK,
        }
    }
}

/// Outcome of one broadcast + collect round.
#[derive(Debug, Clone, Default)]
pub struct Round {
    /// Hosts the command could not be written to.
    pub write_failures: Vec<HostFailure>,
    /// Output per live session.
    pub result: CommandResult,
}

/// Owns the live sessions for one run.
#[derive(Debug)]
pub struct Dispatcher {
    store: SessionStore,
    settings: DispatchSettings,
    reaped: bool,
}

impl Dispatcher {
    /// Wrap an already-populated store.
    pub fn new(store: SessionStore, settings: DispatchSettings) -> Self {
        Self {
            store,
            settings,
            reaped: false,
        }
    }

    /// Establish sessions to every spec and wrap the survivors.
    pub async fn connect(
        connector: Arc<dyn Connector>,
        specs: &[ConnectionSpec],
        username: &str,
        credential: &Credential,
        settings: DispatchSettings,
    ) -> (Self, Vec<HostFailure>) {
        let Establishment { sessions, failures } =
            establish(connector, specs, username, credential).await;
        (Self::new(sessions, settings), failures)
    }

    /// The live sessions.
    pub fn sessions(&self) -> &SessionStore {
        &self.store
    }

    /// Round settings.
    pub fn settings(&self) -> DispatchSettings {
        self.settings
    }

    /// Write a command to every session.
    pub fn broadcast(&mut self, command: &str) -> Vec<HostFailure> {
        broadcast(&mut self.store, command)
    }

    /// Read buffered output from every session now.
    pub fn collect(&mut self) -> CommandResult {
        collect(&mut self.store, self.settings.read_chunk_size)
    }

    /// Broadcast, wait the settle delay, then collect.
    ///
    /// Session I/O runs on the blocking pool. The wait is fixed and not
    /// cancellable. Fails only if a session task panicked, in which case the
    /// sessions it held are gone.
    pub async fn round(&mut self, command: &str) -> Result<Round> {
        let command = command.to_owned();
        let write_failures = self
            .with_store(move |store| broadcast(store, &command))
            .await
            .map_err(|e| BatchSshError::Join(format!("broadcast: {}", e)))?;

        debug!(delay_ms = self.settings.settle_delay.as_millis() as u64, "settling");
        tokio::time::sleep(self.settings.settle_delay).await;

        let chunk = self.settings.read_chunk_size;
        let result = self
            .with_store(move |store| collect(store, chunk))
            .await
            .map_err(|e| BatchSshError::Join(format!("collect: {}", e)))?;

        Ok(Round {
            write_failures,
            result,
        })
    }

    /// Close every session. Only the first call does any work.
    pub async fn shutdown(&mut self) -> Teardown {
        if self.reaped {
            debug!("shutdown already ran");
            return Teardown::default();
        }
        self.reaped = true;

        let hosts = self.store.hosts();
        match self.with_store(close_all).await {
            Ok(teardown) => teardown,
            Err(e) => {
                let reason = format!("close task failed: {}", e);
                Teardown {
                    closed: Vec::new(),
                    failures: hosts
                        .into_iter()
                        .map(|host| HostFailure::new(host, SessionError::Close(reason.clone())))
                        .collect(),
                }
            }
        }
    }

    /// Run `op` over the store on the blocking pool and put the store back.
    async fn with_store<T, F>(&mut self, op: F) -> std::result::Result<T, tokio::task::JoinError>
    where
        F: FnOnce(&mut SessionStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let mut store = std::mem::take(&mut self.store);
        let joined = tokio::task::spawn_blocking(move || {
            let out = op(&mut store);
            (store, out)
        })
        .await;

        match joined {
            Ok((store, out)) => {
                self.store = store;
                Ok(out)
            }
            Err(e) => {
                error!(error = %e, "session task failed; its sessions were dropped");
                Err(e)
            }
        }
    }

    /// Whether [`shutdown`](Self::shutdown) has run.
    pub fn is_shut_down(&self) -> bool {
        self.reaped
    }
}
