//! Debugger-attached diagnostic (semihosting) sink
//!
//! Semihosted writes trap into the debugger and end up on the host's stderr.
//! Without a debugger attached such a write would hang the target, so the
//! sink checks the probe first and silently does nothing when detached.

use super::Sink;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::trace;

pub const NAME: &str = "semihost";

/// Reports whether a debugger is currently attached
pub trait DebugProbe: Send {
    fn is_attached(&self) -> bool;
}

/// Probe that always reports an attached debugger (host console)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAttached;

impl DebugProbe for AlwaysAttached {
    fn is_attached(&self) -> bool {
        true
    }
}

/// Probe backed by a shared flag, toggled by whoever tracks the debug link
#[derive(Debug, Clone, Default)]
pub struct AttachFlag(Arc<AtomicBool>);

impl AttachFlag {
    pub fn new(attached: bool) -> Self {
        Self(Arc::new(AtomicBool::new(attached)))
    }

    pub fn set(&self, attached: bool) {
        self.0.store(attached, Ordering::Relaxed);
    }
}

impl DebugProbe for AttachFlag {
    fn is_attached(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct SemihostSink<P: DebugProbe> {
    probe: P,
    console: Box<dyn Write + Send>,
}

impl SemihostSink<AlwaysAttached> {
    /// Host console on stderr
    pub fn stderr() -> Self {
        Self::new(AlwaysAttached, std::io::stderr())
    }
}

impl<P: DebugProbe> SemihostSink<P> {
    pub fn new(probe: P, console: impl Write + Send + 'static) -> Self {
        Self {
            probe,
            console: Box::new(console),
        }
    }
}

impl<P: DebugProbe> Sink for SemihostSink<P> {
    fn name(&self) -> &str {
        NAME
    }

    fn transmit(&mut self, bytes: &[u8]) {
        if !self.probe.is_attached() {
            return;
        }
        if let Err(e) = self.console.write_all(bytes) {
            trace!("Semihost write dropped ({} bytes): {}", bytes.len(), e);
        }
    }
}
