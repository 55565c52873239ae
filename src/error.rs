//! Centralized error types for logger setup
//!
//! Only configuration and sink construction can fail. The logging paths
//! themselves (`log_record`, `hex_dump`) never return errors.
//! Use `Result<T>` as shorthand for `std::result::Result<T, LoggerError>`.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

/// All logger setup errors
#[derive(Debug)]
pub enum LoggerError {
    // === Sinks ===
    /// Failed to open serial port
    SerialOpen {
        port: String,
        source: std::io::Error,
    },
    /// Failed to create or bind the UDP sink socket
    UdpBind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    // === IO ===
    /// File system operation failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // === Config ===
    /// Config file is not valid TOML for the expected schema
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },
    /// Invalid config value
    ConfigValidation { field: &'static str, reason: String },
}

impl std::error::Error for LoggerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SerialOpen { source, .. }
            | Self::UdpBind { source, .. }
            | Self::Io { source, .. } => Some(source),
            Self::ConfigParse { source, .. } => Some(source),
            Self::ConfigValidation { .. } => None,
        }
    }
}

impl fmt::Display for LoggerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerialOpen { port, .. } => write!(f, "Cannot open serial port: {}", port),
            Self::UdpBind { addr, .. } => write!(f, "Cannot bind UDP socket on {}", addr),
            Self::Io { path, .. } => write!(f, "IO error: {}", path.display()),
            Self::ConfigParse { path, source } => {
                write!(f, "Invalid config {}: {}", path.display(), source)
            }
            Self::ConfigValidation { field, reason } => {
                write!(f, "Invalid {}: {}", field, reason)
            }
        }
    }
}

/// Alias for Result with LoggerError
pub type Result<T> = std::result::Result<T, LoggerError>;
