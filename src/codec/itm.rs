//! ITM (Instrumentation Trace Macrocell) packet codec
//!
//! The SWO pin of a Cortex-M carries ITM packets. Each header byte selects
//! the packet type:
//! - `0x00`: start of a synchronization packet (zeros then `0x80`)
//! - `0x70`: overflow
//! - `xxxx_x0SS`, `SS != 0`: software stimulus packet, port in bits 7:3
//! - `xxxx_x1SS`, `SS != 0`: hardware source packet
//! - `Cxxx_0000`: local timestamp (continuation bytes when C is set)
//! - `10x1_0100`: global timestamp, continuation-coded payload
//! - `Cxxx_1x00`: extension packet, continuation-coded payload
//!
//! Writing one character to a stimulus port emits a one-byte stimulus packet,
//! which is what `encode` produces.

use super::{Codec, Frame};
use crate::constants::DEFAULT_ITM_STIMULUS_PORT;
use bytes::Bytes;

/// Highest stimulus port number
pub const MAX_PORT: u8 = 31;

const HEADER_SYNC: u8 = 0x00;
const HEADER_OVERFLOW: u8 = 0x70;
const SYNC_TERMINATOR: u8 = 0x80;
const CONTINUATION: u8 = 0x80;
/// Longest continuation-coded payload
const MAX_CONTINUATION_BYTES: u8 = 4;

#[derive(Debug, Clone, Copy)]
enum Source {
    Software,
    Hardware,
}

#[derive(Debug, Clone, Copy)]
enum Continued {
    LocalTimestamp,
    Ignored,
}

#[derive(Debug)]
enum State {
    Header,
    Sync,
    Source {
        source: Source,
        id: u8,
        size: usize,
        buf: [u8; 4],
        filled: usize,
    },
    Continuation {
        kind: Continued,
        value: u32,
        count: u8,
    },
}

/// ITM stream codec
///
/// Decoding is incremental: packets split across `decode` calls are
/// reassembled. Encoding wraps each byte in a one-byte stimulus packet on
/// the configured port.
pub struct ItmCodec {
    port: u8,
    state: State,
}

impl ItmCodec {
    /// Create a codec that encodes on stimulus port `port` (masked to 0..=31)
    pub fn new(port: u8) -> Self {
        Self {
            port: port & MAX_PORT,
            state: State::Header,
        }
    }

    pub fn port(&self) -> u8 {
        self.port
    }

    /// Header byte of a one-byte stimulus packet on `port`
    #[inline]
    pub const fn stimulus_header(port: u8) -> u8 {
        ((port & MAX_PORT) << 3) | 0x01
    }

    fn header(&mut self, byte: u8, on_frame: &mut impl FnMut(Frame)) {
        match byte {
            HEADER_SYNC => self.state = State::Sync,
            HEADER_OVERFLOW => on_frame(Frame::Overflow),
            b if b & 0x03 != 0 => {
                let size = match b & 0x03 {
                    1 => 1,
                    2 => 2,
                    _ => 4,
                };
                let source = if b & 0x04 == 0 {
                    Source::Software
                } else {
                    Source::Hardware
                };
                self.state = State::Source {
                    source,
                    id: b >> 3,
                    size,
                    buf: [0; 4],
                    filled: 0,
                };
            }
            b if b & 0x0F == 0x00 => {
                if b & CONTINUATION == 0 {
                    // Single-byte form: value in bits 6:4
                    on_frame(Frame::Timestamp(u32::from((b >> 4) & 0x07)));
                } else {
                    self.state = State::Continuation {
                        kind: Continued::LocalTimestamp,
                        value: 0,
                        count: 0,
                    };
                }
            }
            b if b & 0xDF == 0x94 || (b & 0x0B == 0x08 && b & CONTINUATION != 0) => {
                self.state = State::Continuation {
                    kind: Continued::Ignored,
                    value: 0,
                    count: 0,
                };
            }
            // Single-byte extension or reserved header
            _ => {}
        }
    }

    fn push(&mut self, byte: u8, on_frame: &mut impl FnMut(Frame)) {
        match std::mem::replace(&mut self.state, State::Header) {
            State::Header => self.header(byte, on_frame),
            State::Sync => match byte {
                HEADER_SYNC => self.state = State::Sync,
                SYNC_TERMINATOR => on_frame(Frame::Sync),
                // Malformed sync: resynchronize on this byte
                other => self.header(other, on_frame),
            },
            State::Source {
                source,
                id,
                size,
                mut buf,
                mut filled,
            } => {
                buf[filled] = byte;
                filled += 1;
                if filled < size {
                    self.state = State::Source {
                        source,
                        id,
                        size,
                        buf,
                        filled,
                    };
                    return;
                }

                let payload = Bytes::copy_from_slice(&buf[..size]);
                match source {
                    Source::Software => on_frame(Frame::Stimulus { port: id, payload }),
                    Source::Hardware => on_frame(Frame::Hardware { id, payload }),
                }
            }
            State::Continuation {
                kind,
                mut value,
                mut count,
            } => {
                value |= u32::from(byte & 0x7F) << (7 * u32::from(count));
                count += 1;
                if byte & CONTINUATION != 0 && count < MAX_CONTINUATION_BYTES {
                    self.state = State::Continuation { kind, value, count };
                    return;
                }

                if let Continued::LocalTimestamp = kind {
                    on_frame(Frame::Timestamp(value));
                }
            }
        }
    }

    /// Bytes written to stimulus `port` across `frames`
    pub fn stimulus_bytes<'a>(frames: impl IntoIterator<Item = &'a Frame>, port: u8) -> Vec<u8> {
        let mut out = Vec::new();
        for frame in frames {
            if let Frame::Stimulus { port: p, payload } = frame {
                if *p == port {
                    out.extend_from_slice(payload);
                }
            }
        }
        out
    }
}

impl Default for ItmCodec {
    fn default() -> Self {
        Self::new(DEFAULT_ITM_STIMULUS_PORT)
    }
}

impl Codec for ItmCodec {
    fn decode(&mut self, data: &[u8], mut on_frame: impl FnMut(Frame)) {
        for &byte in data {
            self.push(byte, &mut on_frame);
        }
    }

    fn encode(&self, payload: &[u8], output: &mut Vec<u8>) {
        let header = Self::stimulus_header(self.port);
        output.reserve(payload.len() * 2);
        for &byte in payload {
            output.push(header);
            output.push(byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(data: &[u8]) -> Vec<Frame> {
        let mut codec = ItmCodec::default();
        let mut frames = Vec::new();
        codec.decode(data, |f| frames.push(f));
        frames
    }

    #[test]
    fn test_default_uses_default_stimulus_port() {
        assert_eq!(ItmCodec::default().port(), DEFAULT_ITM_STIMULUS_PORT);
    }

    #[test]
    fn test_encode_one_packet_per_byte() {
        let codec = ItmCodec::new(0);
        let mut output = Vec::new();

        codec.encode(b"I: ", &mut output);

        assert_eq!(output, vec![0x01, b'I', 0x01, b':', 0x01, b' ']);
    }

    #[test]
    fn test_encode_other_port() {
        let codec = ItmCodec::new(1);
        let mut output = Vec::new();

        codec.encode(&[0x00], &mut output);

        assert_eq!(output, vec![0x09, 0x00]);
    }

    #[test]
    fn test_decode_stimulus_text() {
        let frames = decode_all(&[0x01, b'h', 0x01, b'i', 0x09, b'x']);

        assert_eq!(frames.len(), 3);
        assert_eq!(ItmCodec::stimulus_bytes(&frames, 0), b"hi");
        assert_eq!(ItmCodec::stimulus_bytes(&frames, 1), b"x");
    }

    #[test]
    fn test_decode_multibyte_stimulus() {
        let frames = decode_all(&[0x03, 1, 2, 3, 4, 0x02, 5, 6]);

        assert_eq!(
            frames,
            vec![
                Frame::Stimulus {
                    port: 0,
                    payload: Bytes::from_static(&[1, 2, 3, 4]),
                },
                Frame::Stimulus {
                    port: 0,
                    payload: Bytes::from_static(&[5, 6]),
                },
            ]
        );
    }

    #[test]
    fn test_decode_split_across_calls() {
        let mut codec = ItmCodec::default();
        let mut frames = Vec::new();

        codec.decode(&[0x03, 0xAA], |f| frames.push(f));
        assert!(frames.is_empty());
        codec.decode(&[0xBB, 0xCC, 0xDD], |f| frames.push(f));

        assert_eq!(ItmCodec::stimulus_bytes(&frames, 0), vec![0xAA, 0xBB, 0xCC, 0xDD]);
    }

    #[test]
    fn test_decode_sync_and_overflow() {
        let frames = decode_all(&[0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x70, 0x01, b'a']);

        assert_eq!(frames[0], Frame::Sync);
        assert_eq!(frames[1], Frame::Overflow);
        assert_eq!(ItmCodec::stimulus_bytes(&frames, 0), b"a");
    }

    #[test]
    fn test_decode_timestamps() {
        // Single-byte local timestamp (value 3), then continuation form (0x81, 0x01)
        let frames = decode_all(&[0x30, 0xC0, 0x81, 0x01]);

        assert_eq!(frames, vec![Frame::Timestamp(3), Frame::Timestamp(0x81)]);
    }

    #[test]
    fn test_decode_skips_global_timestamp_and_hardware() {
        let frames = decode_all(&[0x94, 0x85, 0x01, 0x05, 0x10, 0x01, b'z']);

        assert_eq!(
            frames[0],
            Frame::Hardware {
                id: 0,
                payload: Bytes::from_static(&[0x10]),
            }
        );
        assert_eq!(ItmCodec::stimulus_bytes(&frames, 0), b"z");
    }

    #[test]
    fn test_encode_decode_keeps_zero_bytes() {
        let codec = ItmCodec::default();
        let mut wire = Vec::new();
        codec.encode(&[b'a', 0x00, b'b'], &mut wire);

        let frames = decode_all(&wire);
        assert_eq!(ItmCodec::stimulus_bytes(&frames, 0), vec![b'a', 0x00, b'b']);
    }
}
