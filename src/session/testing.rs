//! In-memory shell channel for unit tests.

use std::io;
use std::sync::{Arc, Mutex};

use super::ShellChannel;
use crate::error::SessionError;

/// Shared view of what a [`StubChannel`] saw.
#[derive(Debug, Default)]
pub(crate) struct StubLog {
    pub sent: Vec<String>,
    pub closes: usize,
}

/// Echo-style channel: every line sent queues `reply` for the next read.
#[derive(Default)]
pub(crate) struct StubChannel {
    pub reply: Option<Vec<u8>>,
    pub fail_write: bool,
    pub fail_read: bool,
    pub fail_close: bool,
    pub panic_on_write: bool,
    pub pending: Vec<u8>,
    pub log: Arc<Mutex<StubLog>>,
}

impl StubChannel {
    pub fn replying(reply: &[u8]) -> Self {
        Self {
            reply: Some(reply.to_vec()),
            ..Self::default()
        }
    }
}

impl ShellChannel for StubChannel {
    fn send(&mut self, data: &[u8]) -> io::Result<()> {
        if self.panic_on_write {
            panic!("stub shell crashed");
        }
        if self.fail_write {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "channel closed"));
        }
        self.log
            .lock()
            .unwrap()
            .sent
            .push(String::from_utf8_lossy(data).into_owned());
        if let Some(reply) = &self.reply {
            self.pending.extend_from_slice(reply);
        }
        Ok(())
    }

    fn try_read(&mut self, buf: &mut [u8]) -> io::Result<Option<usize>> {
        if self.fail_read {
            return Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"));
        }
        if self.pending.is_empty() {
            return Ok(None);
        }
        let n = buf.len().min(self.pending.len());
        buf[..n].copy_from_slice(&self.pending[..n]);
        self.pending.drain(..n);
        Ok(Some(n))
    }

    fn close(&mut self) -> Result<(), SessionError> {
        let mut log = self.log.lock().unwrap();
        log.closes += 1;
        if self.fail_close {
            return Err(SessionError::Close("transport already gone".into()));
        }
        Ok(())
    }
}
