//! Tests for the scan pipeline over in-memory records
//!
//! These tests verify:
//! - A record that fails to decode does not stop the scan
//! - Skipped and suppressed records are counted, not printed
//! - Iteration errors end the scan with the output so far intact
//! - The CSV header is printed once

use bytes::Bytes;
use idbscan::storage::RawRecord;
use idbscan::{IdbError, KindFilter, OutputMode, ScanConfig, ScanStats, Scanner, TimestampFormula};

use crate::{contact_key, contact_value, message_key, message_value, object_body, text_message, Field};

// =============================================================================
// Helper Functions
// =============================================================================

fn record(key: Vec<u8>, value: Vec<u8>) -> idbscan::Result<RawRecord> {
    Ok(RawRecord {
        key: Bytes::from(key),
        value: Bytes::from(value),
    })
}

fn scanner(mode: OutputMode) -> Scanner {
    Scanner::new(
        ScanConfig::builder()
            .mode(mode)
            .timestamps(TimestampFormula::UNIX_MILLIS)
            .build(),
    )
    .unwrap()
}

fn run(scanner: &Scanner, records: Vec<idbscan::Result<RawRecord>>) -> (idbscan::Result<ScanStats>, String) {
    let mut out = Vec::new();
    let stats = scanner.run(records, &mut out);
    (stats, String::from_utf8(out).unwrap())
}

// =============================================================================
// Failure Isolation
// =============================================================================

#[test]
fn test_bad_body_fails_one_record() {
    let records = vec![
        record(
            contact_key("8:alice"),
            contact_value(1, &object_body(&[("name", Field::Text("Alice"))])),
        ),
        // Valid envelope, unknown tag in the body
        record(message_key("m1"), message_value(2, b"Zjunk")),
        record(message_key("m2"), message_value(3, &text_message("Text", "hello", 0))),
    ];

    let (stats, out) = run(&scanner(OutputMode::Debug), records);
    let stats = stats.unwrap();
    assert_eq!(stats.visited, 3);
    assert_eq!(stats.failed, 1);
    assert_eq!(stats.emitted, 2);
    assert!(out.starts_with("BEGIN Contact -----\n\n    name=Alice\nEND Contact -----\n"));
    assert!(out.contains("BEGIN Message -----\n"));
    assert!(out.contains("    content=hello\n"));
}

#[test]
fn test_trailing_bytes_do_not_fail() {
    let mut body = object_body(&[("name", Field::Text("Alice"))]);
    body.extend_from_slice(b"\x00\x00\x00");
    let (stats, out) = run(
        &scanner(OutputMode::Debug),
        vec![record(contact_key("8:alice"), contact_value(1, &body))],
    );
    assert_eq!(stats.unwrap().emitted, 1);
    assert!(out.contains("name=Alice"));
}

// =============================================================================
// Skips and Suppression
// =============================================================================

#[test]
fn test_skipped_and_suppressed_counts() {
    let records = vec![
        // Unclassified
        record(b"\x00\x00\x00\x00\x32".to_vec(), b"meta".to_vec()),
        // Message-prefixed, other shape
        record(message_key("m0"), b"\x05\x22\x00".to_vec()),
        // Not an accepted message type
        record(message_key("m1"), message_value(1, &text_message("Event/Call", "", 0))),
        // Contacts never render as messages
        record(
            contact_key("8:alice"),
            contact_value(1, &object_body(&[("name", Field::Text("Alice"))])),
        ),
        record(message_key("m2"), message_value(2, &text_message("RichText", "hi", 1_577_836_800_000))),
    ];

    let (stats, out) = run(&scanner(OutputMode::Messages), records);
    assert_eq!(
        stats.unwrap(),
        ScanStats {
            visited: 5,
            emitted: 1,
            suppressed: 2,
            skipped: 2,
            failed: 0,
        }
    );
    assert_eq!(
        out,
        "BEGIN Message -----\n\
         timestamp=2020-01-01 00:00:00\n\
         conversation=19:lunch\n\
         creator=8:bob\n\
         type=RichText\n\
         content=hi\n\
         END Message -----\n"
    );
}

#[test]
fn test_kind_filter_skips_before_decoding() {
    let scanner = Scanner::new(ScanConfig::builder().kind_filter(KindFilter::Contact).build()).unwrap();
    let records = vec![
        record(message_key("m1"), b"not even an envelope".to_vec()),
        record(
            contact_key("8:alice"),
            contact_value(1, &object_body(&[("name", Field::Text("Alice"))])),
        ),
    ];
    let (stats, _) = run(&scanner, records);
    let stats = stats.unwrap();
    assert_eq!(stats.skipped, 1);
    assert_eq!(stats.failed, 0);
    assert_eq!(stats.emitted, 1);
}

// =============================================================================
// CSV
// =============================================================================

#[test]
fn test_csv_header_and_records() {
    let scanner = Scanner::new(
        ScanConfig::builder()
            .mode(OutputMode::Csv)
            .csv_header(true)
            .timestamps(TimestampFormula::UNIX_MILLIS)
            .build(),
    )
    .unwrap();
    let records = vec![
        record(message_key("m1"), message_value(1, &text_message("Text", "a, \"b\"", 1_577_836_800_000))),
        record(message_key("m2"), message_value(2, &text_message("Text", "c", 1_577_836_801_000))),
    ];

    let (stats, out) = run(&scanner, records);
    assert_eq!(stats.unwrap().emitted, 2);
    assert_eq!(
        out,
        "timestamp,conversation,creator,type,content\n\
         2020-01-01 00:00:00,19:lunch,8:bob,Text,\"a, \"\"b\"\"\"\n\
         2020-01-01 00:00:01,19:lunch,8:bob,Text,c\n"
    );
}

#[test]
fn test_csv_header_printed_for_empty_scan() {
    let scanner = Scanner::new(ScanConfig::builder().mode(OutputMode::Csv).csv_header(true).build()).unwrap();
    let (stats, out) = run(&scanner, Vec::new());
    assert_eq!(stats.unwrap(), ScanStats::default());
    assert_eq!(out, "timestamp,conversation,creator,type,content\n");
}

// =============================================================================
// Fatal Errors
// =============================================================================

#[test]
fn test_iteration_error_ends_scan() {
    let records = vec![
        record(message_key("m1"), message_value(1, &text_message("Text", "first", 0))),
        Err(IdbError::Iteration("block checksum mismatch".into())),
        record(message_key("m2"), message_value(2, &text_message("Text", "never", 0))),
    ];

    let (stats, out) = run(&scanner(OutputMode::Messages), records);
    assert!(matches!(stats, Err(IdbError::Iteration(_))));
    assert!(out.contains("content=first"));
    assert!(!out.contains("never"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = ScanConfig::builder().max_depth(0).build();
    assert!(matches!(Scanner::new(config), Err(IdbError::Config(_))));
}
