//! Concurrent session establishment.

use std::sync::Arc;

use futures_util::future::join_all;
use tracing::{info, warn};

use super::result::{Establishment, HostFailure};
use crate::error::SessionError;
use crate::session::{
    session_keys, ConnectionSpec, Connector, Credential, Session, ShellChannel,
};

/// Open one shell per spec, all hosts in parallel.
///
/// Each host runs on its own blocking task, so DNS, TCP, key exchange and
/// auth latency overlap. A failure on one host never affects another. The
/// returned store holds exactly the hosts that fully succeeded, in spec
/// order. Every other host appears once in `failures`.
pub async fn establish(
    connector: Arc<dyn Connector>,
    specs: &[ConnectionSpec],
    username: &str,
    credential: &Credential,
) -> Establishment {
    let username: Arc<str> = Arc::from(username);
    let credential = Arc::new(credential.clone());

    let attempts = specs
        .iter()
        .cloned()
        .zip(session_keys(specs))
        .map(|(spec, key)| {
            let connector = Arc::clone(&connector);
            let username = Arc::clone(&username);
            let credential = Arc::clone(&credential);

            info!(host = %key, port = spec.port, method = credential.method(), "connecting");
            let handle = tokio::task::spawn_blocking(move || {
                connector.connect(&spec, &username, &credential)
            });
            async move { (key, handle.await) }
        });

    let mut establishment = Establishment::default();
    for (key, joined) in join_all(attempts).await {
        let outcome = match joined {
            Ok(result) => result,
            Err(e) => Err(SessionError::Connect(format!("connection task failed: {}", e))),
        };

        match outcome {
            Ok(channel) => {
                info!(host = %key, "shell opened");
                admit(&mut establishment, key, channel);
            }
            Err(error) => {
                warn!(host = %key, kind = error.kind(), %error, "connection failed");
                establishment.failures.push(HostFailure::new(key, error));
            }
        }
    }

    info!(
        connected = establishment.sessions.len(),
        failed = establishment.failures.len(),
        "establishment finished"
    );
    establishment
}

/// Store a freshly opened shell.
///
/// If the key is already taken the shell is closed again and the host is
/// recorded as a failure, so every requested entry is still accounted for.
fn admit(establishment: &mut Establishment, key: String, channel: Box<dyn ShellChannel>) {
    let Err(mut dup) = establishment.sessions.insert(Session::new(key, channel)) else {
        return;
    };

    warn!(host = dup.host(), "duplicate host key, closing extra shell");
    if let Err(error) = dup.channel_mut().close() {
        warn!(host = dup.host(), %error, "failed to close duplicate shell");
    }
    establishment.failures.push(HostFailure::new(
        dup.host(),
        SessionError::Connect("duplicate host entry".into()),
    ));
}
