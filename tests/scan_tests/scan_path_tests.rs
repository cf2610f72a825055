//! End-to-end scans of on-disk stores
//!
//! These tests verify:
//! - Records are read through tables and logs with the IndexedDB comparator
//! - The newest version of a record is the one rendered
//! - Deleted records are not visited
//! - Stores holding only tables scan without a log
//! - Open failures surface before any output

use idbscan::key::IdbComparator;
use idbscan::{IdbError, OutputMode, ScanConfig, ScanStats, Scanner, TimestampFormula};
use tempfile::TempDir;

use crate::common::{delete, put, StoreBuilder};
use crate::{contact_key, contact_value, message_key, message_value, object_body, text_message, Field};

fn messages_scanner() -> Scanner {
    Scanner::new(
        ScanConfig::builder()
            .mode(OutputMode::Csv)
            .timestamps(TimestampFormula::UNIX_MILLIS)
            .build(),
    )
    .unwrap()
}

#[test]
fn test_scan_table_and_log() {
    let temp = TempDir::new().unwrap();
    let mut builder = StoreBuilder::new(temp.path(), IdbComparator::NAME);
    builder.table(
        &IdbComparator,
        &[
            put(&message_key("m1"), &message_value(1, &text_message("Text", "draft", 1_577_836_800_000))),
            put(&message_key("m3"), &message_value(3, &text_message("Text", "gone", 1_577_836_800_000))),
            put(
                &contact_key("8:alice"),
                &contact_value(1, &object_body(&[("name", Field::Text("Alice"))])),
            ),
        ],
        true,
    );
    builder.log(&[vec![
        put(&message_key("m1"), &message_value(1, &text_message("Text", "hello", 1_577_836_800_000))),
        put(&message_key("m2"), &message_value(2, &text_message("Event/Call", "", 0))),
        delete(&message_key("m3")),
    ]]);
    builder.finish();

    let mut out = Vec::new();
    let stats = messages_scanner().scan_path(temp.path(), &mut out).unwrap();

    assert_eq!(stats.visited, 3);
    assert_eq!(stats.emitted, 1);
    assert_eq!(stats.suppressed, 2);
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "2020-01-01 00:00:00,19:lunch,8:bob,Text,hello\n"
    );
}

#[test]
fn test_scan_table_only_store() {
    let temp = TempDir::new().unwrap();
    let mut builder = StoreBuilder::new(temp.path(), IdbComparator::NAME);
    builder.table(
        &IdbComparator,
        &[
            put(&message_key("m1"), &message_value(1, &text_message("Text", "one", 1_577_836_800_000))),
            put(&message_key("m2"), &message_value(2, &text_message("Text", "two", 1_577_836_801_000))),
        ],
        false,
    );
    builder.finish();

    let scanner = Scanner::new(
        ScanConfig::builder()
            .mode(OutputMode::Csv)
            .csv_header(true)
            .timestamps(TimestampFormula::UNIX_MILLIS)
            .build(),
    )
    .unwrap();
    let mut out = Vec::new();
    let stats = scanner.scan_path(temp.path(), &mut out).unwrap();

    assert_eq!(
        stats,
        ScanStats {
            visited: 2,
            emitted: 2,
            ..ScanStats::default()
        }
    );
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "timestamp,conversation,creator,type,content\n\
         2020-01-01 00:00:00,19:lunch,8:bob,Text,one\n\
         2020-01-01 00:00:01,19:lunch,8:bob,Text,two\n"
    );
}

#[test]
fn test_scan_orders_by_idb_keys() {
    let temp = TempDir::new().unwrap();
    let mut builder = StoreBuilder::new(temp.path(), IdbComparator::NAME);
    // Byte order would put "m9" first: its length prefix is smaller
    builder.log(&[vec![
        put(&message_key("m9"), &message_value(9, &text_message("Text", "nine", 0))),
        put(&message_key("m10"), &message_value(10, &text_message("Text", "ten", 0))),
        put(&message_key("a"), &message_value(1, &text_message("Text", "first", 0))),
    ]]);
    builder.finish();

    let mut out = Vec::new();
    messages_scanner().scan_path(temp.path(), &mut out).unwrap();
    let contents: Vec<String> = String::from_utf8(out)
        .unwrap()
        .lines()
        .map(|line| line.rsplit(',').next().unwrap().to_string())
        .collect();
    assert_eq!(contents, vec!["first", "ten", "nine"]);
}

#[test]
fn test_missing_store_fails_before_output() {
    let temp = TempDir::new().unwrap();
    let mut out = Vec::new();
    let err = messages_scanner()
        .scan_path(temp.path().join("absent"), &mut out)
        .unwrap_err();
    assert!(matches!(err, IdbError::Open { .. }));
    assert!(err.is_fatal());
    assert!(out.is_empty());
}

#[test]
fn test_comparator_mismatch() {
    let temp = TempDir::new().unwrap();
    let mut builder = StoreBuilder::new(temp.path(), "leveldb.BytewiseComparator");
    builder.log(&[vec![put(b"k", b"v")]]);
    builder.finish();

    let mut out = Vec::new();
    let err = messages_scanner().scan_path(temp.path(), &mut out).unwrap_err();
    assert!(matches!(err, IdbError::ComparatorMismatch { .. }));
}
