//! In-memory capture sink
//!
//! Records every write as a separate `Bytes` chunk so that tests (and the
//! CLI when no transport is configured) can observe exact framing.

use super::Sink;
use bytes::Bytes;
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared record of which sink received each write, across sinks
pub type Journal = Arc<Mutex<Vec<String>>>;

/// Recording sink; clones share the same storage
#[derive(Clone)]
pub struct CaptureSink {
    name: String,
    writes: Arc<Mutex<Vec<Bytes>>>,
    journal: Option<Journal>,
}

impl CaptureSink {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            writes: Arc::new(Mutex::new(Vec::new())),
            journal: None,
        }
    }

    pub fn shared_journal() -> Journal {
        Arc::new(Mutex::new(Vec::new()))
    }

    /// Also append this sink's name to `journal` on every write
    pub fn with_journal(mut self, journal: Journal) -> Self {
        self.journal = Some(journal);
        self
    }

    /// Individual writes, in arrival order
    pub fn writes(&self) -> Vec<Bytes> {
        self.writes.lock().clone()
    }

    /// All written bytes joined together
    pub fn concat(&self) -> Vec<u8> {
        self.writes.lock().iter().flat_map(|b| b.iter().copied()).collect()
    }

    /// Joined output as text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.concat()).into_owned()
    }

    pub fn clear(&self) {
        self.writes.lock().clear();
    }
}

impl Sink for CaptureSink {
    fn name(&self) -> &str {
        &self.name
    }

    fn transmit(&mut self, bytes: &[u8]) {
        self.writes.lock().push(Bytes::copy_from_slice(bytes));
        if let Some(journal) = &self.journal {
            journal.lock().push(self.name.clone());
        }
    }
}
