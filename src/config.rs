//! Configuration management
//!
//! The logger is configured from a TOML file:
//!
//! ```toml
//! [logger]
//! level = "info"
//!
//! [sinks.itm]
//! path = "swo.bin"
//! stimulus_port = 0
//!
//! [sinks.uart]
//! port = "/dev/ttyACM0"
//! baud_rate = 115200
//! timeout_ms = 255
//!
//! [sinks.semihost]
//! enabled = true
//!
//! [sinks.udp]
//! target = "127.0.0.1:9300"
//! ```
//!
//! Sinks are enabled in a fixed order: itm, uart, semihost, udp.

use crate::constants::{DEFAULT_ITM_STIMULUS_PORT, DEFAULT_UART_BAUD_RATE, DEFAULT_UART_TIMEOUT_MS};
use crate::error::{LoggerError, Result};
use crate::logger::Logger;
use crate::severity::Severity;
use crate::sink::{ItmSink, SemihostSink, UartSink, UdpSink};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::BufWriter;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

// =============================================================================
// Configuration
// =============================================================================

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logger: LoggerConfig,
    pub sinks: SinksConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Least severe level that is still emitted
    pub level: Severity,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: Severity::Raw,
        }
    }
}

/// Optional transports; an absent table means the sink is never enabled
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SinksConfig {
    pub itm: Option<ItmConfig>,
    pub uart: Option<UartConfig>,
    pub semihost: Option<SemihostConfig>,
    pub udp: Option<UdpConfig>,
}

/// Trace port capture file receiving ITM packets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItmConfig {
    pub path: PathBuf,
    #[serde(default = "default_stimulus_port")]
    pub stimulus_port: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UartConfig {
    pub port: String,
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,
    /// Blocking transmit timeout per write
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemihostConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UdpConfig {
    /// Remote console address, e.g. "127.0.0.1:9300"
    pub target: String,
}

fn default_stimulus_port() -> u8 {
    DEFAULT_ITM_STIMULUS_PORT
}

fn default_baud_rate() -> u32 {
    DEFAULT_UART_BAUD_RATE
}

fn default_timeout_ms() -> u64 {
    DEFAULT_UART_TIMEOUT_MS
}

fn default_true() -> bool {
    true
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml(content: &str, origin: &Path) -> Result<Self> {
        let config: Config = toml::from_str(content).map_err(|e| LoggerError::ConfigParse {
            path: origin.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values serde cannot check on its own
    pub fn validate(&self) -> Result<()> {
        if let Some(itm) = &self.sinks.itm {
            if itm.stimulus_port > crate::codec::itm::MAX_PORT {
                return Err(LoggerError::ConfigValidation {
                    field: "sinks.itm.stimulus_port",
                    reason: format!("{} is above 31", itm.stimulus_port),
                });
            }
        }
        if let Some(uart) = &self.sinks.uart {
            if uart.port.is_empty() {
                return Err(LoggerError::ConfigValidation {
                    field: "sinks.uart.port",
                    reason: "empty port name".into(),
                });
            }
            if uart.baud_rate == 0 {
                return Err(LoggerError::ConfigValidation {
                    field: "sinks.uart.baud_rate",
                    reason: "must be non-zero".into(),
                });
            }
        }
        if let Some(udp) = &self.sinks.udp {
            parse_target(&udp.target)?;
        }
        Ok(())
    }

    /// Create a logger with the configured threshold and every configured sink enabled
    pub fn build_logger(&self) -> Result<Logger> {
        let logger = Logger::new();
        logger.set_threshold(self.logger.level);
        self.enable_sinks(&logger)?;
        Ok(logger)
    }

    /// Open and enable the configured sinks on `logger`
    pub fn enable_sinks(&self, logger: &Logger) -> Result<()> {
        if let Some(itm) = &self.sinks.itm {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&itm.path)
                .map_err(|e| LoggerError::Io {
                    path: itm.path.clone(),
                    source: e,
                })?;
            logger.enable_sink(ItmSink::with_stimulus_port(
                BufWriter::new(file),
                itm.stimulus_port,
            ));
        }

        if let Some(uart) = &self.sinks.uart {
            let sink = UartSink::open(
                &uart.port,
                uart.baud_rate,
                Duration::from_millis(uart.timeout_ms),
            )?;
            logger.enable_sink(sink);
        }

        if let Some(semihost) = &self.sinks.semihost {
            if semihost.enabled {
                logger.enable_sink(SemihostSink::stderr());
            }
        }

        if let Some(udp) = &self.sinks.udp {
            logger.enable_sink(UdpSink::connect(parse_target(&udp.target)?)?);
        }

        debug!("Enabled sinks: {:?}", logger.sink_names());
        Ok(())
    }

    /// True if at least one sink is configured
    pub fn has_sinks(&self) -> bool {
        self.sinks.itm.is_some()
            || self.sinks.uart.is_some()
            || self.sinks.semihost.as_ref().map(|s| s.enabled).unwrap_or(false)
            || self.sinks.udp.is_some()
    }
}

fn parse_target(target: &str) -> Result<SocketAddr> {
    target.parse().map_err(|_| LoggerError::ConfigValidation {
        field: "sinks.udp.target",
        reason: format!("'{}' is not a socket address", target),
    })
}

/// Load config from file
pub fn load(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| LoggerError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Config::from_toml(&content, path)
}

/// Load config from `path` if given, else from the default file if it exists
pub fn load_or_default(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(p) => load(p),
        None => {
            let default_path = Path::new(crate::constants::DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                load(default_path)
            } else {
                debug!("No config file, using defaults");
                Ok(Config::default())
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
