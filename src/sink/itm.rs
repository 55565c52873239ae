//! Debug trace (ITM/SWO) sink
//!
//! Mirrors a per-character stimulus port write: every byte of a log line is
//! sent as its own one-byte ITM software packet. On a host the "trace port"
//! is any byte writer (capture file, pipe into a SWO viewer).

use super::Sink;
use crate::codec::{Codec, ItmCodec};
use crate::constants::DEFAULT_ITM_STIMULUS_PORT;
use std::io::Write;
use tracing::trace;

pub const NAME: &str = "itm";

pub struct ItmSink<W: Write + Send> {
    port: W,
    codec: ItmCodec,
    scratch: Vec<u8>,
}

impl<W: Write + Send> ItmSink<W> {
    /// Trace output on the default stimulus port
    pub fn new(port: W) -> Self {
        Self::with_stimulus_port(port, DEFAULT_ITM_STIMULUS_PORT)
    }

    pub fn with_stimulus_port(port: W, stimulus: u8) -> Self {
        Self {
            port,
            codec: ItmCodec::new(stimulus),
            scratch: Vec::new(),
        }
    }

    pub fn stimulus_port(&self) -> u8 {
        self.codec.port()
    }

    pub fn into_inner(self) -> W {
        self.port
    }
}

impl<W: Write + Send> Sink for ItmSink<W> {
    fn name(&self) -> &str {
        NAME
    }

    fn transmit(&mut self, bytes: &[u8]) {
        self.scratch.clear();
        self.codec.encode(bytes, &mut self.scratch);
        if let Err(e) = self.port.write_all(&self.scratch).and_then(|_| self.port.flush()) {
            trace!("ITM write dropped ({} bytes): {}", bytes.len(), e);
        }
    }
}
