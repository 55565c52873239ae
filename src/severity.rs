//! Message severity
//!
//! Lower numeric value = more severe. The numeric value is compared directly
//! against the gate threshold, so the discriminants are part of the contract.

use serde::{Deserialize, Serialize};

/// Severity of a log record, most severe first
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
#[repr(i8)]
pub enum Severity {
    Panic = -2,
    Fatal = -1,
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
    Trace = 4,
    /// Unframed passthrough output, no tag prefix
    Raw = 5,
}

impl Severity {
    /// All severities in ascending numeric order
    pub const ALL: [Severity; 8] = [
        Severity::Panic,
        Severity::Fatal,
        Severity::Error,
        Severity::Warn,
        Severity::Info,
        Severity::Debug,
        Severity::Trace,
        Severity::Raw,
    ];

    #[inline]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -2 => Some(Severity::Panic),
            -1 => Some(Severity::Fatal),
            0 => Some(Severity::Error),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Info),
            3 => Some(Severity::Debug),
            4 => Some(Severity::Trace),
            5 => Some(Severity::Raw),
            _ => None,
        }
    }

    /// Line prefix emitted ahead of a record body (empty for `Raw`)
    pub const fn tag(self) -> &'static [u8] {
        match self {
            Severity::Panic => b"P: ",
            Severity::Fatal => b"F: ",
            Severity::Error => b"E: ",
            Severity::Warn => b"W: ",
            Severity::Info => b"I: ",
            Severity::Debug => b"D: ",
            Severity::Trace => b"T: ",
            Severity::Raw => b"",
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Panic => "PANIC",
            Severity::Fatal => "FATAL",
            Severity::Error => "ERROR",
            Severity::Warn => "WARN",
            Severity::Info => "INFO",
            Severity::Debug => "DEBUG",
            Severity::Trace => "TRACE",
            Severity::Raw => "RAW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
