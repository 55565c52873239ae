//! Leveled record formatter
//!
//! Renders `format_args!` output into a stack `LineBuffer`, then emits the
//! severity tag and the body as two separate transmitter writes. Observers
//! reading the raw stream rely on that framing.

use crate::line::{LineBuffer, LINE_CAPACITY};
use crate::severity::Severity;
use crate::sink::Transmitter;
use core::fmt::{self, Write};

/// What a formatted record produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordOutcome {
    /// Body bytes transmitted (excluding tag)
    pub body_len: usize,
    /// Body was cut at the buffer capacity
    pub truncated: bool,
}

/// Format and transmit one record using a default-capacity buffer
///
/// The caller is expected to have consulted the severity gate already.
pub fn record<T: Transmitter + ?Sized>(
    tx: &mut T,
    level: Severity,
    args: fmt::Arguments<'_>,
) -> RecordOutcome {
    let mut line = LineBuffer::<LINE_CAPACITY>::new();
    record_into(tx, &mut line, level, args)
}

/// Format and transmit one record through a caller-provided buffer
pub fn record_into<T: Transmitter + ?Sized, const C: usize>(
    tx: &mut T,
    line: &mut LineBuffer<C>,
    level: Severity,
    args: fmt::Arguments<'_>,
) -> RecordOutcome {
    render(line, args);
    transmit(tx, line, level)
}

/// Render `args` into `line`, replacing its previous contents
///
/// Runs the caller's `Display`/`Debug` impls, so it must not be called with
/// any lock held that those impls could try to take.
pub fn render<const C: usize>(line: &mut LineBuffer<C>, args: fmt::Arguments<'_>) {
    line.clear();
    // LineBuffer never reports an error; a formatting trait impl might.
    let _ = line.write_fmt(args);
}

/// Send the tag (if any) and the already rendered body
pub fn transmit<T: Transmitter + ?Sized, const C: usize>(
    tx: &mut T,
    line: &LineBuffer<C>,
    level: Severity,
) -> RecordOutcome {
    let tag = level.tag();
    if !tag.is_empty() {
        tx.send(tag);
    }
    tx.send(line.as_bytes());

    RecordOutcome {
        body_len: line.len(),
        truncated: line.is_truncated(),
    }
}
