//! Severity gate
//!
//! Single threshold consulted before any formatting work. Stored as a raw
//! `i8` so that out-of-range sentinels are accepted and compared numerically.

use crate::severity::Severity;
use std::sync::atomic::{AtomicI8, Ordering};

pub struct SeverityGate {
    threshold: AtomicI8,
}

impl SeverityGate {
    /// Most permissive gate (`Raw`): everything passes
    pub const fn new() -> Self {
        Self::with_threshold(Severity::Raw)
    }

    pub const fn with_threshold(level: Severity) -> Self {
        Self {
            threshold: AtomicI8::new(level.as_i8()),
        }
    }

    #[inline]
    pub fn set_threshold(&self, level: Severity) {
        self.set_threshold_raw(level.as_i8());
    }

    /// Replace the threshold without validation
    #[inline]
    pub fn set_threshold_raw(&self, value: i8) {
        self.threshold.store(value, Ordering::Relaxed);
    }

    #[inline]
    pub fn threshold_raw(&self) -> i8 {
        self.threshold.load(Ordering::Relaxed)
    }

    /// Current threshold, `None` if a sentinel value is configured
    pub fn threshold(&self) -> Option<Severity> {
        Severity::from_i8(self.threshold_raw())
    }

    /// True if a record at `level` is at least as severe as the threshold
    #[inline]
    pub fn is_enabled(&self, level: Severity) -> bool {
        self.threshold_raw() >= level.as_i8()
    }
}

impl Default for SeverityGate {
    fn default() -> Self {
        Self::new()
    }
}
