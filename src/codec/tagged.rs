//! Tagged line parsing
//!
//! Recognizes the severity prefix the formatter puts in front of a record.
//! Format: `X: message` where X is one of P, F, E, W, I, D, T.
//! Example: `W: Low battery`

use crate::severity::Severity;

/// Split a line into its severity tag and message
///
/// Returns `(None, line)` for untagged (raw) output.
pub fn parse(line: &str) -> (Option<Severity>, &str) {
    let bytes = line.as_bytes();
    if bytes.len() < 3 || &bytes[1..3] != b": " {
        return (None, line);
    }

    let level = match bytes[0] {
        b'P' => Severity::Panic,
        b'F' => Severity::Fatal,
        b'E' => Severity::Error,
        b'W' => Severity::Warn,
        b'I' => Severity::Info,
        b'D' => Severity::Debug,
        b'T' => Severity::Trace,
        _ => return (None, line),
    };

    (Some(level), &line[3..])
}
