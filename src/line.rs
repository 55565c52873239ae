//! Fixed-capacity line buffer
//!
//! Stages one rendered line before transmission. Never grows: text past
//! `C - 1` bytes is dropped silently, and the final byte is reserved for the
//! NUL terminator, so the buffer is always terminated.

use core::fmt;

/// Capacity of the stack buffer used for one record or hex dump row
pub const LINE_CAPACITY: usize = 400;

pub struct LineBuffer<const C: usize = LINE_CAPACITY> {
    buf: [u8; C],
    len: usize,
    truncated: bool,
}

impl<const C: usize> LineBuffer<C> {
    pub const fn new() -> Self {
        assert!(C > 0, "Line buffer needs room for the terminator");

        Self {
            buf: [0; C],
            len: 0,
            truncated: false,
        }
    }

    /// Maximum number of content bytes (capacity minus terminator)
    #[inline]
    pub const fn limit() -> usize {
        C - 1
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True if any write was cut short since the last `clear`
    #[inline]
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Rendered bytes, explicit length (embedded zeros preserved)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Rendered bytes including the terminator
    #[inline]
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf[..=self.len]
    }

    pub fn clear(&mut self) {
        self.buf[..self.len].fill(0);
        self.len = 0;
        self.truncated = false;
    }

    /// Append raw bytes, truncating at the limit
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        let remaining = Self::limit() - self.len;
        let to_write = bytes.len().min(remaining);
        self.buf[self.len..self.len + to_write].copy_from_slice(&bytes[..to_write]);
        self.len += to_write;
        if to_write < bytes.len() {
            self.truncated = true;
        }
    }
}

impl<const C: usize> Default for LineBuffer<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const C: usize> fmt::Write for LineBuffer<C> {
    // Always Ok: truncation is not an error.
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.push_bytes(s.as_bytes());
        Ok(())
    }
}
