//! Transport seam between the dispatcher and the SSH library.

use std::io;

use super::{ConnectionSpec, Credential};
use crate::error::SessionError;

/// One open interactive shell on a remote host.
///
/// Owns both the shell stream and the transport beneath it.
pub trait ShellChannel: Send {
    /// Write `data` to the shell's input and flush it.
    fn send(&mut self, data: &[u8]) -> io::Result<()>;

    /// Read whatever output is already buffered, without waiting.
    ///
    /// Returns `Ok(None)` when nothing is buffered right now.
    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>>;

    /// Close the shell channel, then the transport.
    fn close(&mut self) -> Result<(), SessionError>;
}

/// Opens authenticated shells. Called from blocking worker threads.
pub trait Connector: Send + Sync + 'static {
    /// Connect to `spec`, authenticate as `username` and open a shell.
    fn connect(
        &self,
        spec: &ConnectionSpec,
        username: &str,
        credential: &Credential,
    ) -> Result<Box<dyn ShellChannel>, SessionError>;
}
