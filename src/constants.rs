//! Crate-wide constants
//!
//! Centralized constants to avoid duplication and ensure consistency.

// =============================================================================
// Rendering
// =============================================================================

/// Bytes rendered per hex dump row
pub const BYTES_PER_ROW: usize = 16;

/// Line terminator appended by the leveled macros
pub const RECORD_TERMINATOR: &str = "\r\n";

/// Separator between a hex dump annotation and its rows
pub const HEX_DUMP_HEADER_SUFFIX: &[u8] = b" :\n";

// =============================================================================
// UART
// =============================================================================

/// Default baud rate for the UART sink
pub const DEFAULT_UART_BAUD_RATE: u32 = 115_200;

/// Blocking transmit timeout per write (milliseconds)
pub const DEFAULT_UART_TIMEOUT_MS: u64 = 0xFF;

// =============================================================================
// ITM
// =============================================================================

/// Stimulus port used for log text
pub const DEFAULT_ITM_STIMULUS_PORT: u8 = 0;

// =============================================================================
// CLI
// =============================================================================

/// Config file looked up next to the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "oc-logger.toml";

/// Read chunk size when decoding a captured trace stream
pub const DECODE_CHUNK_SIZE: usize = 4096;
