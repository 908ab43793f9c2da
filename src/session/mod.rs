//! Session management module.
//!
//! This module provides the connection inputs ([`ConnectionSpec`],
//! [`Credential`]), the transport seam used to open remote shells, and the
//! ordered [`SessionStore`] that owns every live session for a run.

mod spec;
mod ssh;
mod store;
mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use spec::{ConnectionSpec, Credential, DEFAULT_SSH_PORT};
pub use ssh::{SshConnector, SshShell, DEFAULT_CONNECT_TIMEOUT};
pub use store::{session_keys, Session, SessionStore};
pub use transport::{Connector, ShellChannel};
