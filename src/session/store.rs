//! Session storage for a single run.

use std::collections::HashMap;
use std::fmt;

use super::{ConnectionSpec, ShellChannel};

/// A live remote shell.
///
/// Only fully established shells become `Session`s, so a session in the
/// store always has an open transport and an open channel.
pub struct Session {
    host: String,
    channel: Box<dyn ShellChannel>,
}

impl Session {
    /// Wrap an open channel under the given host key.
    pub fn new(host: impl Into<String>, channel: Box<dyn ShellChannel>) -> Self {
        Self {
            host: host.into(),
            channel,
        }
    }

    /// Host key identifying this session.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The underlying shell channel.
    pub fn channel_mut(&mut self) -> &mut dyn ShellChannel {
        self.channel.as_mut()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").field("host", &self.host).finish()
    }
}

/// Ordered map from host key to live session.
///
/// Iteration follows insertion order. Membership changes only through
/// [`insert`](Self::insert) and [`drain`](Self::drain).
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: Vec<Session>,
}

impl SessionStore {
    /// Create a new empty session store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a session.
    ///
    /// A session whose host key is already present is handed back unchanged.
    pub fn insert(&mut self, session: Session) -> Result<(), Session> {
        if self.contains(session.host()) {
            return Err(session);
        }
        self.sessions.push(session);
        Ok(())
    }

    /// Check if a session exists for `host`.
    pub fn contains(&self, host: &str) -> bool {
        self.sessions.iter().any(|s| s.host == host)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// True when no sessions are live.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Host keys in iteration order.
    pub fn hosts(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.host.clone()).collect()
    }

    /// Mutable iteration for I/O. Does not allow adding or removing sessions.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.sessions.iter_mut()
    }

    /// Remove and yield every session, leaving the store empty.
    pub fn drain(&mut self) -> impl Iterator<Item = Session> + '_ {
        self.sessions.drain(..)
    }
}

/// Compute a unique host key for each spec, in order.
///
/// The plain host name is used unless it repeats, in which case every entry
/// for that name becomes `host:port`. Entries that are still equal get a
/// `#n` suffix.
pub fn session_keys(specs: &[ConnectionSpec]) -> Vec<String> {
    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for spec in specs {
        *name_counts.entry(spec.host.as_str()).or_default() += 1;
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    specs
        .iter()
        .map(|spec| {
            let base = if name_counts[spec.host.as_str()] > 1 {
                spec.address()
            } else {
                spec.host.clone()
            };
            let count = seen.entry(base.clone()).or_default();
            *count += 1;
            if *count == 1 {
                base
            } else {
                format!("{}#{}", base, count)
            }
        })
        .collect()
}
