//! Per-host outcome types.

use crate::error::SessionError;
use crate::session::SessionStore;

/// A failure recorded against one host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostFailure {
    /// Host key the failure belongs to.
    pub host: String,
    /// What went wrong.
    pub error: SessionError,
}

impl HostFailure {
    /// Create a new failure record.
    pub fn new(host: impl Into<String>, error: SessionError) -> Self {
        Self {
            host: host.into(),
            error,
        }
    }
}

/// What one host returned during a collect round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Decoded text that was buffered at read time.
    Output(String),
    /// Nothing was buffered. Not an error.
    NoOutputYet,
    /// The read itself failed.
    Error(String),
}

impl Outcome {
    /// True for [`Outcome::Output`].
    pub fn is_output(&self) -> bool {
        matches!(self, Self::Output(_))
    }
}

/// Result of one collect round, one entry per session in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    entries: Vec<(String, Outcome)>,
}

impl CommandResult {
    /// Create an empty result with room for `capacity` hosts.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, host: impl Into<String>, outcome: Outcome) {
        self.entries.push((host.into(), outcome));
    }

    /// Look up a host's outcome.
    pub fn get(&self, host: &str) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(h, _)| h == host)
            .map(|(_, outcome)| outcome)
    }

    /// Number of hosts in this round.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no sessions were live.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in store order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Outcome)> {
        self.entries.iter().map(|(h, o)| (h.as_str(), o))
    }
}

/// What [`establish`](super::establish) produced.
#[derive(Debug, Default)]
pub struct Establishment {
    /// Hosts that completed transport, auth and shell setup.
    pub sessions: SessionStore,
    /// Every other requested host, in request order.
    pub failures: Vec<HostFailure>,
}

/// What [`close_all`](super::close_all) did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Teardown {
    /// Hosts closed cleanly.
    pub closed: Vec<String>,
    /// Hosts whose close reported an error. They are gone from the store too.
    pub failures: Vec<HostFailure>,
}

impl Teardown {
    /// Total number of sessions that were removed.
    pub fn total(&self) -> usize {
        self.closed.len() + self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_result_lookup() {
        let mut result = CommandResult::default();
        result.push("a", Outcome::Output("hi\n".into()));
        result.push("b", Outcome::NoOutputYet);

        assert_eq!(result.len(), 2);
        assert_eq!(result.get("a"), Some(&Outcome::Output("hi\n".into())));
        assert_eq!(result.get("b"), Some(&Outcome::NoOutputYet));
        assert_eq!(result.get("c"), None);
    }

    #[test]
    fn test_command_result_order() {
        let mut result = CommandResult::default();
        result.push("z", Outcome::NoOutputYet);
        result.push("a", Outcome::Error("reset".into()));

        let hosts: Vec<_> = result.iter().map(|(h, _)| h).collect();
        assert_eq!(hosts, vec!["z", "a"]);
    }

    #[test]
    fn test_outcome_is_output() {
        assert!(Outcome::Output(String::new()).is_output());
        assert!(!Outcome::NoOutputYet.is_output());
        assert!(!Outcome::Error("x".into()).is_output());
    }

    #[test]
    fn test_teardown_total() {
        let teardown = Teardown {
            closed: vec!["a".into(), "b".into()],
            failures: vec![HostFailure::new("c", SessionError::Close("gone".into()))],
        };
        assert_eq!(teardown.total(), 3);
    }
}
