//! Command fan-out.

use tracing::{debug, warn};

use super::result::HostFailure;
use crate::error::SessionError;
use crate::session::SessionStore;

/// Line terminator the remote shell expects after a command.
pub const LINE_TERMINATOR: &str = "\n";

/// Write `command` to every session.
///
/// Never reads a reply. A host whose write fails is reported and the rest
/// still receive the command. Session membership is left untouched.
pub fn broadcast(store: &mut SessionStore, command: &str) -> Vec<HostFailure> {
    if command.is_empty() {
        debug!("ignoring empty command");
        return Vec::new();
    }

    let line = format!("{}{}", command, LINE_TERMINATOR);
    let mut failures = Vec::new();

    for session in store.iter_mut() {
        match session.channel_mut().send(line.as_bytes()) {
            Ok(()) => debug!(host = session.host(), bytes = line.len(), "command sent"),
            Err(e) => {
                warn!(host = session.host(), error = %e, "command write failed");
                failures.push(HostFailure::new(
                    session.host(),
                    SessionError::Write(e.to_string()),
                ));
            }
        }
    }

    failures
}
