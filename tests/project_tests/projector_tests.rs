//! Tests for the projector
//!
//! These tests verify:
//! - Debug blocks for contacts and messages
//! - Message lines and CSV only render accepted messages
//! - JSON lines carry kind, escaped key and value tree
//! - The CSV header preamble

use idbscan::codec::Value;
use idbscan::key::RecordKind;
use idbscan::project::{OutputMode, Projector, TimestampFormula};

// =============================================================================
// Helper Functions
// =============================================================================

fn text(s: &str) -> Value {
    Value::Utf8String(s.to_string())
}

fn object(pairs: Vec<(&str, Value)>) -> Value {
    Value::Object(pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

fn text_message() -> Value {
    object(vec![
        ("messagetype", text("Text")),
        ("conversationId", text("19:group")),
        ("creator", text("8:bob")),
        ("createdTime", Value::UInt64(1_577_836_800_000)),
        ("content", text("lunch, today?")),
        ("properties", object(vec![("edited", Value::Boolean(false))])),
    ])
}

fn projector(mode: OutputMode) -> Projector {
    Projector::new(mode, TimestampFormula::UNIX_MILLIS)
}

// =============================================================================
// Debug Mode
// =============================================================================

#[test]
fn test_debug_contact_block() {
    let contact = object(vec![
        ("name", text("Alice")),
        ("tags", Value::Array(vec![text("friend"), text("work")])),
        ("blocked", Value::Boolean(false)),
        ("avatar", Value::Unit),
    ]);
    let out = projector(OutputMode::Debug)
        .project(RecordKind::Contact, b"k", &contact)
        .unwrap()
        .unwrap();
    assert_eq!(
        out,
        "BEGIN Contact -----\n\
         \n    name=Alice\n\
         \x20   tags=\n        friend\n        work\n\n\
         \x20   blocked=False\n\
         \x20   avatar=Null\n\
         END Contact -----\n"
    );
}

#[test]
fn test_debug_pair_array_prints_second_elements() {
    let value = Value::PairArray(vec![
        (Value::Int32(0), text("first")),
        (Value::Int32(1), Value::UInt64(7)),
    ]);
    let out = projector(OutputMode::Debug)
        .project(RecordKind::Message, b"k", &value)
        .unwrap()
        .unwrap();
    assert_eq!(out, "BEGIN Message -----\n    first\n    7\nEND Message -----\n");
}

// =============================================================================
// Message Modes
// =============================================================================

#[test]
fn test_messages_mode_lines() {
    let out = projector(OutputMode::Messages)
        .project(RecordKind::Message, b"k", &text_message())
        .unwrap()
        .unwrap();
    assert_eq!(
        out,
        "BEGIN Message -----\n\
         timestamp=2020-01-01 00:00:00\n\
         conversation=19:group\n\
         creator=8:bob\n\
         type=Text\n\
         content=lunch, today?\n\
         END Message -----\n"
    );
}

#[test]
fn test_csv_mode_record() {
    let out = projector(OutputMode::Csv)
        .project(RecordKind::Message, b"k", &text_message())
        .unwrap()
        .unwrap();
    assert_eq!(out, "2020-01-01 00:00:00,19:group,8:bob,Text,\"lunch, today?\"\n");
}

#[test]
fn test_message_modes_suppress_other_records() {
    let call = object(vec![("messagetype", text("Event/Call"))]);
    let contact = object(vec![("name", text("Alice"))]);

    for mode in [OutputMode::Messages, OutputMode::Csv] {
        let p = projector(mode);
        assert_eq!(p.project(RecordKind::Message, b"k", &call).unwrap(), None);
        assert_eq!(p.project(RecordKind::Contact, b"k", &contact).unwrap(), None);
        assert_eq!(p.project(RecordKind::Message, b"k", &Value::Int32(1)).unwrap(), None);
    }
}

#[test]
fn test_first_occurrence_wins() {
    let value = object(vec![
        ("messagetype", text("Text")),
        ("content", text("first")),
        ("messagetype", text("Event/Call")),
        ("content", text("second")),
    ]);
    let out = projector(OutputMode::Csv)
        .project(RecordKind::Message, b"k", &value)
        .unwrap()
        .unwrap();
    assert_eq!(out, ",,,Text,first\n");
}

#[test]
fn test_csv_header_preamble() {
    assert_eq!(
        projector(OutputMode::Csv).preamble(true),
        Some("timestamp,conversation,creator,type,content\n")
    );
    assert_eq!(projector(OutputMode::Csv).preamble(false), None);
    assert_eq!(projector(OutputMode::Messages).preamble(true), None);
}

// =============================================================================
// JSON Mode
// =============================================================================

#[test]
fn test_json_line() {
    let value = object(vec![
        ("id", Value::Int32(-4)),
        ("tags", Value::Array(vec![text("a")])),
        ("pairs", Value::PairArray(vec![(Value::Int32(0), Value::Boolean(true))])),
        ("none", Value::Unit),
    ]);
    let out = projector(OutputMode::Json)
        .project(RecordKind::Contact, b"\x00\x01\x06key", &value)
        .unwrap()
        .unwrap();
    assert!(out.ends_with('\n'));

    let parsed: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
    assert_eq!(parsed["kind"], "Contact");
    assert_eq!(parsed["key"], "\\x00\\x01\\x06key");
    assert_eq!(parsed["value"]["id"], -4);
    assert_eq!(parsed["value"]["tags"], serde_json::json!(["a"]));
    assert_eq!(parsed["value"]["pairs"], serde_json::json!([[0, true]]));
    assert!(parsed["value"]["none"].is_null());
}

// =============================================================================
// Mode Names
// =============================================================================

#[test]
fn test_mode_names() {
    for mode in [OutputMode::Debug, OutputMode::Messages, OutputMode::Csv, OutputMode::Json] {
        assert_eq!(mode.to_string().parse::<OutputMode>().unwrap(), mode);
    }
    assert!("xml".parse::<OutputMode>().is_err());
    assert_eq!(Projector::default().mode(), OutputMode::Debug);
}
