//! Integration tests for the logging pipeline
//!
//! Drives the public `Logger` API end to end with capture sinks standing in
//! for real transports.

use open_control_logger::codec::{Codec, Frame, ItmCodec};
use open_control_logger::hexdump::DumpOutcome;
use open_control_logger::sink::{CaptureSink, ItmSink, Sink};
use open_control_logger::{Logger, Severity, LINE_CAPACITY};
use parking_lot::Mutex;
use proptest::prelude::*;
use std::io::{self, Write};
use std::sync::Arc;

// =============================================================================
// Helpers
// =============================================================================

fn logger_with(names: &[&str]) -> (Logger, Vec<CaptureSink>) {
    let logger = Logger::new();
    let sinks: Vec<CaptureSink> = names.iter().map(|n| CaptureSink::new(*n)).collect();
    for sink in &sinks {
        logger.enable_sink(sink.clone());
    }
    (logger, sinks)
}

/// Writer whose bytes stay observable after it is moved into a sink
#[derive(Clone, Default)]
struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// =============================================================================
// Records
// =============================================================================

#[test]
fn test_warn_record_at_info_threshold() {
    let (logger, sinks) = logger_with(&["cap"]);
    logger.set_threshold(Severity::Info);

    logger.log_record(Severity::Warn, format_args!("x={}\r\n", 5));

    let writes = sinks[0].writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].as_ref(), b"W: ");
    assert_eq!(writes[1].as_ref(), b"x=5\r\n");
}

#[test]
fn test_debug_record_suppressed_at_info_threshold() {
    let (logger, sinks) = logger_with(&["cap"]);
    logger.set_threshold(Severity::Info);

    assert!(logger.log_record(Severity::Debug, format_args!("noise")).is_none());
    assert!(sinks[0].writes().is_empty());
}

#[test]
fn test_raw_record_has_no_tag() {
    let (logger, sinks) = logger_with(&["cap"]);

    logger.log_record(Severity::Raw, format_args!("ok"));

    assert_eq!(sinks[0].writes().len(), 1);
    assert_eq!(sinks[0].text(), "ok");
}

#[test]
fn test_gate_is_monotonic_across_levels() {
    for threshold in Severity::ALL {
        let (logger, sinks) = logger_with(&["cap"]);
        logger.set_threshold(threshold);

        for level in Severity::ALL {
            sinks[0].clear();
            let emitted = logger.log_record(level, format_args!("m")).is_some();
            assert_eq!(emitted, level <= threshold, "{} at {}", level, threshold);
            assert_eq!(!sinks[0].writes().is_empty(), emitted);
        }
    }
}

#[test]
fn test_fatal_emitted_at_fatal_threshold() {
    let (logger, sinks) = logger_with(&["cap"]);
    logger.set_threshold(Severity::Fatal);

    logger.log_record(Severity::Panic, format_args!("p"));
    logger.log_record(Severity::Fatal, format_args!("f"));
    logger.log_record(Severity::Error, format_args!("e"));

    assert_eq!(sinks[0].text(), "P: pF: f");
}

#[test]
fn test_long_record_truncated_to_line_limit() {
    let (logger, sinks) = logger_with(&["cap"]);

    let outcome = logger
        .log_record(Severity::Info, format_args!("{}", "a".repeat(1000)))
        .unwrap();

    assert!(outcome.truncated);
    let writes = sinks[0].writes();
    assert_eq!(writes[0].as_ref(), b"I: ");
    assert_eq!(writes[1].len(), LINE_CAPACITY - 1);
    assert!(writes[1].iter().all(|&b| b == b'a'));
    assert_eq!(logger.stats().truncated, 1);
}

// =============================================================================
// Fan-out
// =============================================================================

#[test]
fn test_two_sinks_receive_identical_sequences() {
    let (logger, sinks) = logger_with(&["first", "second"]);

    logger.log_record(Severity::Error, format_args!("boom\r\n"));
    logger.hex_dump(Severity::Info, "buf", &[1, 2, 3]);

    assert_eq!(sinks[0].writes(), sinks[1].writes());
    assert!(!sinks[0].writes().is_empty());
}

#[test]
fn test_each_write_goes_to_every_sink_before_the_next() {
    let journal = CaptureSink::shared_journal();
    let logger = Logger::new();
    logger.enable_sink(CaptureSink::new("a").with_journal(journal.clone()));
    logger.enable_sink(CaptureSink::new("b").with_journal(journal.clone()));

    logger.log_record(Severity::Info, format_args!("hi"));

    assert_eq!(*journal.lock(), vec!["a", "b", "a", "b"]);
}

#[test]
fn test_no_sinks_is_silent_but_counted() {
    let logger = Logger::new();

    assert!(logger.log_record(Severity::Info, format_args!("alone")).is_some());
    assert!(logger.hex_dump(Severity::Info, "alone", &[0; 8]).is_some());

    let stats = logger.stats();
    assert_eq!(stats.records, 1);
    assert_eq!(stats.hex_dumps, 1);
}

#[test]
fn test_disabled_sink_stops_receiving() {
    let (logger, sinks) = logger_with(&["a", "b"]);

    logger.log_record(Severity::Raw, format_args!("1"));
    assert!(logger.disable_sink("a"));
    logger.log_record(Severity::Raw, format_args!("2"));

    assert_eq!(sinks[0].text(), "1");
    assert_eq!(sinks[1].text(), "12");
}

// =============================================================================
// Hex dumps
// =============================================================================

#[test]
fn test_hex_dump_rows_and_offsets() {
    let (logger, sinks) = logger_with(&["cap"]);
    let region: Vec<u8> = (0u8..33).collect();

    let outcome = logger.hex_dump(Severity::Info, "buf", &region).unwrap();

    assert_eq!(
        outcome,
        DumpOutcome::Rows {
            rows: 3,
            truncated: 0
        }
    );
    let text = sinks[0].text();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "I: buf :");
    assert!(lines[1].starts_with("    0 |  00 01"));
    assert!(lines[2].starts_with("   16 |  10 11"));
    assert_eq!(lines[3], "   32 |  20");
    assert!(text.ends_with("\n\n"));
}

#[test]
fn test_hex_dump_uniform_summary() {
    let (logger, sinks) = logger_with(&["cap"]);

    let outcome = logger.hex_dump(Severity::Raw, "blank", &[0xFF; 256]).unwrap();

    assert_eq!(outcome, DumpOutcome::Summary { value: 0xFF, len: 256 });
    assert_eq!(sinks[0].text(), "blank :\n 0 | All FF (256 Bytes)\n");
}

#[test]
fn test_hex_dump_two_equal_bytes_is_uniform() {
    let (logger, sinks) = logger_with(&["cap"]);

    logger.hex_dump(Severity::Raw, "pair", &[0xab, 0xab]);

    assert_eq!(sinks[0].text(), "pair :\n 0 | All AB (2 Bytes)\n");
}

#[test]
fn test_hex_dump_single_byte_takes_row_path() {
    let (logger, sinks) = logger_with(&["cap"]);

    let outcome = logger.hex_dump(Severity::Raw, "one", &[0x7f]).unwrap();

    assert_eq!(
        outcome,
        DumpOutcome::Rows {
            rows: 1,
            truncated: 0
        }
    );
    assert_eq!(sinks[0].text(), "one :\n    0 |  7f\n\n");
}

#[test]
fn test_hex_dump_empty_region() {
    let (logger, sinks) = logger_with(&["cap"]);

    let outcome = logger.hex_dump(Severity::Raw, "none", &[]).unwrap();

    assert_eq!(
        outcome,
        DumpOutcome::Rows {
            rows: 0,
            truncated: 0
        }
    );
    assert_eq!(sinks[0].text(), "none :\n\n");
}

// =============================================================================
// Transports
// =============================================================================

#[test]
fn test_itm_sink_output_decodes_back_to_text() {
    let wire = SharedWriter::default();
    let logger = Logger::new();
    logger.enable_sink(ItmSink::with_stimulus_port(wire.clone(), 3));

    logger.log_record(Severity::Warn, format_args!("low battery\r\n"));
    logger.hex_dump(Severity::Debug, "regs", &[0xde, 0xad]);

    let mut codec = ItmCodec::default();
    let mut frames = Vec::new();
    codec.decode(&wire.0.lock(), |f| frames.push(f));

    assert!(frames
        .iter()
        .all(|f| matches!(f, Frame::Stimulus { port: 3, .. })));
    let text = ItmCodec::stimulus_bytes(&frames, 3);
    assert_eq!(
        String::from_utf8(text).unwrap(),
        "W: low battery\r\nD: regs :\n    0 |  de ad\n\n"
    );
}

#[test]
fn test_custom_sink_through_trait_object() {
    struct Counter(Arc<Mutex<usize>>);

    impl Sink for Counter {
        fn name(&self) -> &str {
            "counter"
        }

        fn transmit(&mut self, bytes: &[u8]) {
            *self.0.lock() += bytes.len();
        }
    }

    let count = Arc::new(Mutex::new(0));
    let logger = Logger::new();
    logger.enable_sink(Counter(count.clone()));

    logger.log_record(Severity::Info, format_args!("12345"));

    assert_eq!(*count.lock(), 3 + 5);
    assert_eq!(logger.stats().bytes_sent, 8);
}

#[test]
fn test_concurrent_records_do_not_interleave() {
    let logger = Arc::new(Logger::new());
    let sink = CaptureSink::new("cap");
    logger.enable_sink(sink.clone());

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.clone();
            std::thread::spawn(move || {
                for i in 0..50 {
                    logger.log_record(Severity::Info, format_args!("t{}-{}\n", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let writes = sink.writes();
    assert_eq!(writes.len(), 4 * 50 * 2);
    for pair in writes.chunks(2) {
        assert_eq!(pair[0].as_ref(), b"I: ");
        assert!(pair[1].starts_with(b"t"));
    }
}

// =============================================================================
// Properties
// =============================================================================

proptest! {
    #[test]
    fn prop_body_never_exceeds_limit(len in 0usize..2000) {
        let (logger, sinks) = logger_with(&["cap"]);

        let outcome = logger
            .log_record(Severity::Raw, format_args!("{}", "z".repeat(len)))
            .unwrap();

        let body = sinks[0].concat();
        prop_assert_eq!(body.len(), len.min(LINE_CAPACITY - 1));
        prop_assert_eq!(outcome.truncated, len > LINE_CAPACITY - 1);
    }

    #[test]
    fn prop_row_count_is_ceil_len_over_16(region in proptest::collection::vec(any::<u8>(), 0..200)) {
        let (logger, _sinks) = logger_with(&["cap"]);

        let outcome = logger.hex_dump(Severity::Raw, "p", &region).unwrap();

        let uniform = region.len() >= 2 && region.iter().all(|&b| b == region[0]);
        match outcome {
            DumpOutcome::Summary { value, len } => {
                prop_assert!(uniform);
                prop_assert_eq!(value, region[0]);
                prop_assert_eq!(len, region.len());
            }
            DumpOutcome::Rows { rows, truncated } => {
                prop_assert!(!uniform);
                prop_assert_eq!(rows, (region.len() + 15) / 16);
                prop_assert_eq!(truncated, 0);
            }
        }
    }
}
