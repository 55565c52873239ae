//! Open Control Logger - leveled multi-sink logging with hex dumps
//!
//! Pipeline (leaf first):
//! - `sink` - transports and the registry that fans writes out to them
//! - `gate` - process-wide severity threshold
//! - `format` - leveled record rendering into a bounded `LineBuffer`
//! - `hexdump` - annotated hex listings with uniform-region collapse
//! - `logger` - the context object tying them together, plus the macros
//!
//! Supporting modules:
//! - `codec` - ITM trace stream encoding/decoding, tagged line parsing
//! - `config` - TOML configuration for threshold and sinks
//! - `stats` - instrumentation counters

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod gate;
pub mod hexdump;
pub mod line;
pub mod logger;
pub mod severity;
pub mod sink;
pub mod stats;

pub use error::{LoggerError, Result};
pub use line::{LineBuffer, LINE_CAPACITY};
pub use logger::Logger;
pub use severity::Severity;
pub use sink::{Sink, SinkRegistry, Transmitter};

/// Initialize internal tracing for logger diagnostics
///
/// Call early in main() before any sink is opened.
/// Set `verbose` to true for debug-level output.
pub fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose { "debug" } else { "warn" };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_file(false)
                .compact(),
        )
        .with(tracing_subscriber::EnvFilter::new(level))
        .try_init();
}
