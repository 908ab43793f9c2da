//! SSH transport backed by libssh2.

use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use ssh2::{Channel, Session as SshSession};
use tracing::{debug, trace};

use super::{ConnectionSpec, Connector, Credential, ShellChannel};
use crate::error::SessionError;

/// Default bound on TCP connect and blocking SSH operations.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Terminal type requested for the remote PTY.
const PTY_TERM: &str = "vt100";

/// Opens interactive shells over SSH.
///
/// Host keys are accepted unconditionally (trust on first use). Nothing is
/// read from or written to `known_hosts`.
#[derive(Debug, Clone)]
pub struct SshConnector {
    timeout: Duration,
}

impl SshConnector {
    /// Create a connector with the given connect timeout.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn open_tcp(&self, spec: &ConnectionSpec) -> Result<TcpStream, SessionError> {
        let addrs = (spec.host.as_str(), spec.port)
            .to_socket_addrs()
            .map_err(|e| SessionError::Connect(format!("cannot resolve {}: {}", spec.host, e)))?;

        let mut last_err = None;
        for addr in addrs {
            trace!(%addr, "trying address");
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = Some(e),
            }
        }

        Err(SessionError::Connect(match last_err {
            Some(e) => format!("{}: {}", spec.address(), e),
            None => format!("{}: no addresses found", spec.address()),
        }))
    }
}

impl Default for SshConnector {
    fn default() -> Self {
        Self::new(DEFAULT_CONNECT_TIMEOUT)
    }
}

impl Connector for SshConnector {
    fn connect(
        &self,
        spec: &ConnectionSpec,
        username: &str,
        credential: &Credential,
    ) -> Result<Box<dyn ShellChannel>, SessionError> {
        let tcp = self.open_tcp(spec)?;

        let mut session = SshSession::new()
            .map_err(|e| SessionError::Connect(format!("cannot create session: {}", e)))?;
        session.set_tcp_stream(tcp);
        session.set_timeout(u32::try_from(self.timeout.as_millis()).unwrap_or(u32::MAX));
        session
            .handshake()
            .map_err(|e| SessionError::Connect(format!("handshake failed: {}", e)))?;
        debug!(host = %spec.host, "host key accepted without verification");

        authenticate(&session, username, credential)?;

        let mut channel = session
            .channel_session()
            .map_err(|e| SessionError::Channel(e.to_string()))?;
        channel
            .request_pty(PTY_TERM, None, None)
            .map_err(|e| SessionError::Channel(format!("pty request refused: {}", e)))?;
        channel
            .shell()
            .map_err(|e| SessionError::Channel(format!("shell request refused: {}", e)))?;

        Ok(Box::new(SshShell { session, channel }))
    }
}

fn authenticate(
    session: &SshSession,
    username: &str,
    credential: &Credential,
) -> Result<(), SessionError> {
    let result = match credential {
        Credential::Key { path, passphrase } => {
            session.userauth_pubkey_file(username, None, path, passphrase.as_deref())
        }
        Credential::Password { secret } => session.userauth_password(username, secret),
    };
    result.map_err(|e| {
        SessionError::Auth(format!("{} as {}: {}", credential.method(), username, e))
    })?;

    if !session.authenticated() {
        return Err(SessionError::Auth(format!(
            "{} as {}: server did not accept credentials",
            credential.method(),
            username
        )));
    }
    Ok(())
}

/// A live SSH connection and the interactive shell channel on it.
pub struct SshShell {
    session: SshSession,
    channel: Channel,
}

impl ShellChannel for SshShell {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        self.channel.write_all(data)?;
        self.channel.flush()
    }

    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        self.session.set_blocking(false);
        let result = self.channel.read(buf);
        self.session.set_blocking(true);

        match result {
            Ok(0) if self.channel.eof() => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "remote shell has exited",
            )),
            Ok(0) => Ok(None),
            Ok(n) => Ok(Some(n)),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn close(&mut self) -> Result<(), SessionError> {
        let channel = self
            .channel
            .close()
            .map_err(|e| SessionError::Close(format!("channel: {}", e)));
        let transport = self
            .session
            .disconnect(None, "session closed by operator", None)
            .map_err(|e| SessionError::Close(format!("transport: {}", e)));
        channel.and(transport)
    }
}
