//! Hardware serial (UART) sink
//!
//! Blocking transmit with a per-write timeout: a log call on a slow or
//! unplugged port blocks for at most the timeout, then the write is dropped.
//!
//! # Example
//!
//! ```ignore
//! let uart = UartSink::open("/dev/ttyACM0", 115_200, Duration::from_millis(255))?;
//! registry.enable(uart);
//! ```

use super::Sink;
use crate::constants::{DEFAULT_UART_BAUD_RATE, DEFAULT_UART_TIMEOUT_MS};
use crate::error::{LoggerError, Result};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, trace};

pub const NAME: &str = "uart";

/// Serial port context needed to transmit
pub struct UartSink {
    port_name: String,
    port: Box<dyn Write + Send>,
}

impl UartSink {
    /// Open a serial port for log output
    pub fn open(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| LoggerError::SerialOpen {
                port: port_name.to_string(),
                source: std::io::Error::other(e.to_string()),
            })?;

        debug!("UART sink opened on {} @ {} baud", port_name, baud_rate);
        Ok(Self {
            port_name: port_name.to_string(),
            port: Box::new(port),
        })
    }

    /// Open with the default baud rate and transmit timeout
    pub fn open_default(port_name: &str) -> Result<Self> {
        Self::open(
            port_name,
            DEFAULT_UART_BAUD_RATE,
            Duration::from_millis(DEFAULT_UART_TIMEOUT_MS),
        )
    }

    /// Wrap an already-open byte writer (USB CDC handle, test double...)
    pub fn from_writer(port_name: impl Into<String>, writer: impl Write + Send + 'static) -> Self {
        Self {
            port_name: port_name.into(),
            port: Box::new(writer),
        }
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }
}

impl Sink for UartSink {
    fn name(&self) -> &str {
        NAME
    }

    fn transmit(&mut self, bytes: &[u8]) {
        if let Err(e) = self.port.write_all(bytes) {
            trace!(
                "UART write on {} dropped ({} bytes): {}",
                self.port_name,
                bytes.len(),
                e
            );
        }
    }
}
