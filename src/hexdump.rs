//! Hex dump engine
//!
//! Output shape (after the severity tag):
//!
//! ```text
//! <annotation> :
//!     0 |  00 01 02 03 04 05 06 07 08 09 0a 0b 0c 0d 0e 0f
//!    16 |  10 11
//!
//! ```
//!
//! A region made of one repeated byte collapses into a single summary line
//! instead:
//!
//! ```text
//! <annotation> :
//!  0 | All FF (256 Bytes)
//! ```
//!
//! The uniform check needs at least two bytes: a one-byte region always takes
//! the row path.

use crate::constants::{BYTES_PER_ROW, HEX_DUMP_HEADER_SUFFIX};
use crate::line::{LineBuffer, LINE_CAPACITY};
use crate::severity::Severity;
use crate::sink::Transmitter;
use core::fmt::Write;

/// Which rendering path a dump took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpOutcome {
    /// Uniform region collapsed into one line
    Summary { value: u8, len: usize },
    /// Row-by-row listing
    Rows { rows: usize, truncated: usize },
}

/// Dump `region` using default-capacity line buffers
///
/// The caller is expected to have consulted the severity gate already.
pub fn dump<T: Transmitter + ?Sized>(
    tx: &mut T,
    level: Severity,
    annotation: &str,
    region: &[u8],
) -> DumpOutcome {
    dump_with::<T, LINE_CAPACITY>(tx, level, annotation, region)
}

/// Dump `region` with line buffers of capacity `C`
pub fn dump_with<T: Transmitter + ?Sized, const C: usize>(
    tx: &mut T,
    level: Severity,
    annotation: &str,
    region: &[u8],
) -> DumpOutcome {
    let tag = level.tag();
    if !tag.is_empty() {
        tx.send(tag);
    }
    tx.send(annotation.as_bytes());
    tx.send(HEX_DUMP_HEADER_SUFFIX);

    let mut line = LineBuffer::<C>::new();

    if let Some(value) = uniform_value(region) {
        let _ = write!(line, " 0 | All {:02X} ({} Bytes)", value, region.len());
        tx.send(line.as_bytes());
        tx.send(b"\n");
        return DumpOutcome::Summary {
            value,
            len: region.len(),
        };
    }

    let mut rows = 0;
    let mut truncated = 0;
    for (index, row) in region.chunks(BYTES_PER_ROW).enumerate() {
        line.clear();
        let _ = write!(line, " {:4} | ", index * BYTES_PER_ROW);
        for byte in row {
            let _ = write!(line, " {:02x}", byte);
        }

        tx.send(line.as_bytes());
        tx.send(b"\n");

        rows += 1;
        if line.is_truncated() {
            truncated += 1;
        }
    }

    tx.send(b"\n");
    DumpOutcome::Rows { rows, truncated }
}

/// The repeated byte if `region` holds two or more identical bytes
///
/// Stops at the first differing adjacent pair.
pub fn uniform_value(region: &[u8]) -> Option<u8> {
    match region {
        [first, rest @ ..] if !rest.is_empty() && rest.iter().all(|b| b == first) => Some(*first),
        _ => None,
    }
}
