//! Session teardown.

use tracing::{info, warn};

use super::result::{HostFailure, Teardown};
use crate::session::SessionStore;

/// Close every session and empty the store.
///
/// The shell channel is closed before its transport. A failed close is
/// recorded and the remaining sessions are still closed. Calling this on an
/// already-empty store returns an empty [`Teardown`].
pub fn close_all(store: &mut SessionStore) -> Teardown {
    let mut teardown = Teardown::default();

    for mut session in store.drain() {
        match session.channel_mut().close() {
            Ok(()) => {
                info!(host = session.host(), "session closed");
                teardown.closed.push(session.host().to_string());
            }
            Err(error) => {
                warn!(host = session.host(), %error, "session close failed");
                teardown
                    .failures
                    .push(HostFailure::new(session.host(), error));
            }
        }
    }

    teardown
}
