//! Logger instrumentation counters
//!
//! Lock-free counters that observe the pipeline independently of the sinks:
//! they advance even when no sink is enabled, so gating and formatting can be
//! verified without any transport attached.

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct LogStats {
    /// Records that passed the gate and were formatted
    records: AtomicU64,
    /// Hex dumps that passed the gate
    hex_dumps: AtomicU64,
    /// Calls rejected by the severity gate
    suppressed: AtomicU64,
    /// Lines cut short by the line buffer capacity
    truncated: AtomicU64,
    /// Bytes handed to the transmitter
    bytes_sent: AtomicU64,
}

/// Point-in-time copy of `LogStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub records: u64,
    pub hex_dumps: u64,
    pub suppressed: u64,
    pub truncated: u64,
    pub bytes_sent: u64,
}

impl LogStats {
    pub const fn new() -> Self {
        Self {
            records: AtomicU64::new(0),
            hex_dumps: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            truncated: AtomicU64::new(0),
            bytes_sent: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn add_record(&self) {
        self.records.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_hex_dump(&self) {
        self.hex_dumps.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_suppressed(&self) {
        self.suppressed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_truncated(&self, lines: u64) {
        self.truncated.fetch_add(lines, Ordering::Relaxed);
    }

    #[inline]
    pub fn add_bytes(&self, bytes: usize) {
        self.bytes_sent.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            records: self.records.load(Ordering::Relaxed),
            hex_dumps: self.hex_dumps.load(Ordering::Relaxed),
            suppressed: self.suppressed.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        self.records.store(0, Ordering::Relaxed);
        self.hex_dumps.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.truncated.store(0, Ordering::Relaxed);
        self.bytes_sent.store(0, Ordering::Relaxed);
    }
}
