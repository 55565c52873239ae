//! Logger context
//!
//! Ties the pipeline together:
//!
//! ```text
//! caller ──▶ SeverityGate ──▶ format / hexdump ──▶ SinkRegistry ──▶ sink 0..n
//!            (atomic, O(1))   (stack LineBuffer)    (registration order)
//! ```
//!
//! # Rules
//!
//! - A suppressed call touches nothing but the threshold (and a counter)
//! - Every call runs to completion on the calling thread; a blocking sink
//!   blocks the caller
//! - Records are rendered before the registry lock is taken, so a `Display`
//!   impl in the arguments may itself log through the same logger
//! - The registry lock is held while a call transmits, so one call's tag,
//!   body and rows are never interleaved with another caller's output
//! - Logging never fails: there is no error path back to the call site
//!
//! # Example
//!
//! ```ignore
//! static LOGGER: Logger = Logger::new();
//!
//! LOGGER.enable_sink(UartSink::open_default("/dev/ttyACM0")?);
//! LOGGER.set_threshold(Severity::Info);
//! log_info!(LOGGER, "boot in {} ms", elapsed);
//! log_hex_dump_debug!(LOGGER, "rx frame", &frame);
//! ```

use crate::format::{self, RecordOutcome};
use crate::gate::SeverityGate;
use crate::hexdump::{self, DumpOutcome};
use crate::line::{LineBuffer, LINE_CAPACITY};
use crate::severity::Severity;
use crate::sink::{Sink, SinkId, SinkRegistry, Transmitter};
use crate::stats::{LogStats, StatsSnapshot};
use core::fmt;
use parking_lot::Mutex;
use tracing::debug;

/// Leveled multi-sink logger
pub struct Logger {
    gate: SeverityGate,
    sinks: Mutex<SinkRegistry>,
    stats: LogStats,
}

/// Transmitter adapter that counts bytes on their way to the registry
struct Counting<'a> {
    inner: &'a mut SinkRegistry,
    bytes: usize,
}

impl Transmitter for Counting<'_> {
    fn send(&mut self, bytes: &[u8]) {
        self.bytes += bytes.len();
        self.inner.send(bytes);
    }
}

impl Logger {
    /// Logger with no sinks and the most permissive threshold
    pub const fn new() -> Self {
        Self {
            gate: SeverityGate::new(),
            sinks: parking_lot::const_mutex(SinkRegistry::new()),
            stats: LogStats::new(),
        }
    }

    pub fn with_registry(registry: SinkRegistry) -> Self {
        Self {
            gate: SeverityGate::new(),
            sinks: Mutex::new(registry),
            stats: LogStats::new(),
        }
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn set_threshold(&self, level: Severity) {
        debug!("Log threshold set to {}", level);
        self.gate.set_threshold(level);
    }

    /// Set a raw threshold value (sentinels allowed, no validation)
    pub fn set_threshold_raw(&self, value: i8) {
        debug!("Log threshold set to raw value {}", value);
        self.gate.set_threshold_raw(value);
    }

    pub fn threshold(&self) -> Option<Severity> {
        self.gate.threshold()
    }

    #[inline]
    pub fn is_enabled(&self, level: Severity) -> bool {
        self.gate.is_enabled(level)
    }

    pub fn enable_sink(&self, sink: impl Sink + 'static) -> SinkId {
        self.sinks.lock().enable(sink)
    }

    pub fn disable_sink(&self, name: &str) -> bool {
        self.sinks.lock().disable(name)
    }

    /// Names of registered sinks, in delivery order
    pub fn sink_names(&self) -> Vec<String> {
        self.sinks.lock().names()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // =========================================================================
    // Logging
    // =========================================================================

    /// Format and emit one leveled record
    ///
    /// Returns `None` when the record was suppressed by the threshold.
    pub fn log_record(&self, level: Severity, args: fmt::Arguments<'_>) -> Option<RecordOutcome> {
        if !self.gate.is_enabled(level) {
            self.stats.add_suppressed();
            return None;
        }

        // Render before locking: argument impls may log through this logger.
        let mut line = LineBuffer::<LINE_CAPACITY>::new();
        format::render(&mut line, args);

        let mut registry = self.sinks.lock();
        let mut tx = Counting {
            inner: &mut *registry,
            bytes: 0,
        };
        let outcome = format::transmit(&mut tx, &line, level);

        self.stats.add_record();
        self.stats.add_bytes(tx.bytes);
        if outcome.truncated {
            self.stats.add_truncated(1);
        }
        Some(outcome)
    }

    /// Emit an annotated hex dump of `region`
    ///
    /// Returns `None` when the dump was suppressed by the threshold.
    pub fn hex_dump(&self, level: Severity, annotation: &str, region: &[u8]) -> Option<DumpOutcome> {
        if !self.gate.is_enabled(level) {
            self.stats.add_suppressed();
            return None;
        }

        let mut registry = self.sinks.lock();
        let mut tx = Counting {
            inner: &mut *registry,
            bytes: 0,
        };
        let outcome = hexdump::dump(&mut tx, level, annotation, region);

        self.stats.add_hex_dump();
        self.stats.add_bytes(tx.bytes);
        if let DumpOutcome::Rows { truncated, .. } = outcome {
            self.stats.add_truncated(truncated as u64);
        }
        Some(outcome)
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Macros
// =============================================================================

/// Leveled record with an explicit severity.
///
/// ```ignore
/// log_record!(LOGGER, Severity::Info, "adc={} mV\r\n", millivolts);
/// ```
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_record {
    ($logger:expr, $level:expr, $($arg:tt)*) => {{
        let _ = $logger.log_record($level, format_args!($($arg)*));
    }};
}

/// Unframed output: no tag, no line terminator.
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_raw {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_record!($logger, $crate::Severity::Raw, $($arg)*)
    };
}

/// Trace record, terminated with `\r\n`.
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_trace {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_record!($logger, $crate::Severity::Trace, "{}\r\n", format_args!($($arg)*))
    };
}

/// Debug record, terminated with `\r\n`.
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_record!($logger, $crate::Severity::Debug, "{}\r\n", format_args!($($arg)*))
    };
}

/// Info record, terminated with `\r\n`.
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_info {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_record!($logger, $crate::Severity::Info, "{}\r\n", format_args!($($arg)*))
    };
}

/// Warning record, terminated with `\r\n`.
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_warn {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_record!($logger, $crate::Severity::Warn, "{}\r\n", format_args!($($arg)*))
    };
}

/// Error record, terminated with `\r\n`.
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_err {
    ($logger:expr, $($arg:tt)*) => {
        $crate::log_record!($logger, $crate::Severity::Error, "{}\r\n", format_args!($($arg)*))
    };
}

/// Hex dump with an explicit severity.
#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_hex_dump {
    ($logger:expr, $level:expr, $annotation:expr, $region:expr) => {{
        let _ = $logger.hex_dump($level, $annotation, $region);
    }};
}

#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_hex_dump_raw {
    ($logger:expr, $annotation:expr, $region:expr) => {
        $crate::log_hex_dump!($logger, $crate::Severity::Raw, $annotation, $region)
    };
}

#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_hex_dump_trace {
    ($logger:expr, $annotation:expr, $region:expr) => {
        $crate::log_hex_dump!($logger, $crate::Severity::Trace, $annotation, $region)
    };
}

#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_hex_dump_debug {
    ($logger:expr, $annotation:expr, $region:expr) => {
        $crate::log_hex_dump!($logger, $crate::Severity::Debug, $annotation, $region)
    };
}

#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_hex_dump_info {
    ($logger:expr, $annotation:expr, $region:expr) => {
        $crate::log_hex_dump!($logger, $crate::Severity::Info, $annotation, $region)
    };
}

#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_hex_dump_warn {
    ($logger:expr, $annotation:expr, $region:expr) => {
        $crate::log_hex_dump!($logger, $crate::Severity::Warn, $annotation, $region)
    };
}

#[cfg(not(feature = "disable"))]
#[macro_export]
macro_rules! log_hex_dump_err {
    ($logger:expr, $annotation:expr, $region:expr) => {
        $crate::log_hex_dump!($logger, $crate::Severity::Error, $annotation, $region)
    };
}

// With `disable`, every macro compiles to nothing.
#[cfg(feature = "disable")]
mod disabled {
    #[macro_export]
    macro_rules! log_record { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_raw { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_trace { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_debug { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_info { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_warn { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_err { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_hex_dump { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_hex_dump_raw { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_hex_dump_trace { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_hex_dump_debug { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_hex_dump_info { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_hex_dump_warn { ($($t:tt)*) => {{}}; }
    #[macro_export]
    macro_rules! log_hex_dump_err { ($($t:tt)*) => {{}}; }
}
