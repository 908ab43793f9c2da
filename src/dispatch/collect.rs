//! Non-blocking response collection.

use tracing::{debug, warn};

use super::result::{CommandResult, Outcome};
use crate::session::SessionStore;

/// Default number of bytes read per host per round.
pub const DEFAULT_READ_CHUNK: usize = 4096;

/// Drain whatever each session has buffered, without waiting.
///
/// Reads at most `chunk_size` bytes per host; anything beyond that stays
/// buffered and shows up in a later round. Produces exactly one entry per
/// session in the store.
pub fn collect(store: &mut SessionStore, chunk_size: usize) -> CommandResult {
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut result = CommandResult::with_capacity(store.len());

    for session in store.iter_mut() {
        let outcome = match session.channel_mut().try_read(&mut buf) {
            Ok(Some(n)) if n > 0 => {
                let n = n.min(buf.len());
                debug!(host = session.host(), bytes = n, "output collected");
                Outcome::Output(String::from_utf8_lossy(&buf[..n]).into_owned())
            }
            Ok(_) => Outcome::NoOutputYet,
            Err(e) => {
                warn!(host = session.host(), error = %e, "output read failed");
                Outcome::Error(e.to_string())
            }
        };
        result.push(session.host(), outcome);
    }

    result
}
