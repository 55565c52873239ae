//! Command-line interface definition using clap
//!
//! Provides structured argument parsing with automatic help generation.

use clap::{Parser, Subcommand};
use open_control_logger::Severity;
use std::path::PathBuf;

// =============================================================================
// CLI Definition
// =============================================================================

/// Leveled multi-sink logger for open-control firmware targets
#[derive(Parser, Debug)]
#[command(name = "oc-logger")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose debug output
    #[arg(short, long)]
    pub verbose: bool,

    /// Config file (default: ./oc-logger.toml if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Threshold override (least severe level still emitted)
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub level: Option<Severity>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Emit one leveled record to the configured sinks
    Log {
        #[arg(value_enum)]
        severity: Severity,

        /// Message text (words are joined with spaces)
        #[arg(required = true)]
        message: Vec<String>,
    },

    /// Hex dump a file (or a slice of it) to the configured sinks
    Dump {
        #[arg(value_enum)]
        severity: Severity,

        file: PathBuf,

        /// Annotation printed before the rows (default: file name)
        #[arg(long, value_name = "TEXT")]
        annotate: Option<String>,

        /// First byte to dump
        #[arg(long, default_value_t = 0)]
        offset: usize,

        /// Number of bytes to dump (default: to end of file)
        #[arg(long)]
        length: Option<usize>,
    },

    /// Decode a captured ITM/SWO stream and print one stimulus port as text
    SwoDecode {
        file: PathBuf,

        /// Stimulus port to extract
        #[arg(long, default_value_t = 0)]
        port: u8,

        /// Drop tagged lines less severe than this level (untagged lines, such
        /// as hex dump rows, are always kept even when their header is dropped)
        #[arg(long, value_enum, value_name = "LEVEL")]
        min_level: Option<Severity>,
    },
}

// =============================================================================
// Tests
// =============================================================================
