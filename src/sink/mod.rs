//! Sink abstraction and registry
//!
//! Separates transport concerns from message rendering:
//! - **Sink**: how bytes leave the device (trace unit, UART, debugger, UDP...)
//! - **Transmitter**: fan-out of one byte sequence to every enabled sink
//!
//! Sinks are best-effort and fire-and-forget. A failed write is dropped by the
//! sink itself; nothing is ever reported back to the log call site.
//!
//! # Adding a new sink
//!
//! 1. Create `sink/my_sink.rs`
//! 2. Implement the `Sink` trait
//! 3. Add `pub mod my_sink;` here
//! 4. Enable it on a `SinkRegistry` (or through `Config`)

pub mod capture;
pub mod itm;
pub mod semihost;
pub mod uart;
pub mod udp;

pub use capture::CaptureSink;
pub use itm::ItmSink;
pub use semihost::SemihostSink;
pub use uart::UartSink;
pub use udp::UdpSink;

use tracing::debug;

/// Byte-oriented output channel
///
/// # Contract
///
/// - `transmit` receives an explicit-length slice, which may contain zero
///   bytes, and must not retain it past the call
/// - `transmit` may block (e.g. serial write with timeout)
/// - `transmit` never fails from the caller's point of view: errors are
///   swallowed (optionally traced) by the sink
pub trait Sink: Send {
    /// Stable identity of the sink inside a registry
    fn name(&self) -> &str;

    /// Best-effort write of `bytes`
    fn transmit(&mut self, bytes: &[u8]);
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn transmit(&mut self, bytes: &[u8]) {
        (**self).transmit(bytes)
    }
}

/// Something a rendered line can be handed to
pub trait Transmitter {
    fn send(&mut self, bytes: &[u8]);
}

impl Transmitter for Vec<u8> {
    fn send(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Position of a sink in its registry (registration order)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkId(pub usize);

struct SinkSlot {
    enabled: bool,
    sink: Box<dyn Sink>,
}

/// Ordered set of sinks with their enabled flags
///
/// Writes are delivered in registration order. Re-enabling a sink with the
/// same name replaces its context in place and keeps its position.
#[derive(Default)]
pub struct SinkRegistry {
    slots: Vec<SinkSlot>,
}

impl SinkRegistry {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store a sink's context and mark it enabled (idempotent per name)
    pub fn enable(&mut self, sink: impl Sink + 'static) -> SinkId {
        self.enable_boxed(Box::new(sink))
    }

    pub fn enable_boxed(&mut self, sink: Box<dyn Sink>) -> SinkId {
        if let Some(index) = self.position(sink.name()) {
            debug!("Sink '{}' re-enabled at slot {}", sink.name(), index);
            let slot = &mut self.slots[index];
            slot.sink = sink;
            slot.enabled = true;
            return SinkId(index);
        }

        debug!("Sink '{}' enabled at slot {}", sink.name(), self.slots.len());
        self.slots.push(SinkSlot {
            enabled: true,
            sink,
        });
        SinkId(self.slots.len() - 1)
    }

    /// Stop delivering to a sink. Returns false if no such sink exists.
    pub fn disable(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.slots[index].enabled = false;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.position(name)
            .map(|i| self.slots[i].enabled)
            .unwrap_or(false)
    }

    /// Number of registered sinks (enabled or not)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn enabled_count(&self) -> usize {
        self.slots.iter().filter(|s| s.enabled).count()
    }

    /// Sink names in registration order
    pub fn names(&self) -> Vec<String> {
        self.slots.iter().map(|s| s.sink.name().to_string()).collect()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.slots.iter().position(|s| s.sink.name() == name)
    }
}

impl Transmitter for SinkRegistry {
    fn send(&mut self, bytes: &[u8]) {
        for slot in self.slots.iter_mut().filter(|s| s.enabled) {
            slot.sink.transmit(bytes);
        }
    }
}
