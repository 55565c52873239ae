//! Codec abstraction for trace stream encoding/decoding
//!
//! Separates encoding concerns from transport:
//! - **Codec**: how bytes are framed on the wire (ITM stimulus packets...)
//! - **Sink**: how framed bytes leave the device
//!
//! # Adding a new codec
//!
//! 1. Create `codec/my_codec.rs`
//! 2. Implement the `Codec` trait
//! 3. Add `pub mod my_codec;` here
//! 4. No other changes needed

pub mod itm;
pub mod tagged;

pub use itm::ItmCodec;

use bytes::Bytes;

/// Decoded packet from a trace stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Synchronization packet
    Sync,
    /// The trace unit dropped packets
    Overflow,
    /// Local timestamp delta (in trace clock cycles)
    Timestamp(u32),
    /// Software instrumentation (stimulus port) payload
    Stimulus {
        /// Stimulus port number (0..=31)
        port: u8,
        /// Payload bytes in wire order (1, 2 or 4)
        payload: Bytes,
    },
    /// Hardware source packet (DWT events), payload kept raw
    Hardware {
        /// Discriminator ID from the packet header
        id: u8,
        payload: Bytes,
    },
}

/// Codec trait for encoding/decoding trace streams
///
/// A codec transforms raw bytes into structured frames (decode)
/// and payloads into bytes for transmission (encode).
pub trait Codec: Send {
    /// Decode incoming bytes
    ///
    /// Calls `on_frame` for each complete frame detected.
    /// May buffer partial packets internally.
    fn decode(&mut self, data: &[u8], on_frame: impl FnMut(Frame));

    /// Encode a payload for transmission
    ///
    /// Appends encoded bytes to `output`.
    fn encode(&self, payload: &[u8], output: &mut Vec<u8>);
}
