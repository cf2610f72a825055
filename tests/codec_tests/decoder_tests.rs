//! Tests for the tagged value decoder
//!
//! These tests verify:
//! - Scalar productions
//! - Objects, arrays and pair arrays with their closers
//! - Truncation and malformed input
//! - Cursor positioning after each production

use idbscan::codec::{decode_record_body, decode_value, decode_value_with, Closer, Cursor, DecodeOptions, Value};
use idbscan::IdbError;

// =============================================================================
// Helper Functions
// =============================================================================

fn decode(bytes: &[u8]) -> Result<Value, IdbError> {
    decode_value(&mut Cursor::new(bytes))
}

fn text(s: &str) -> Value {
    Value::Utf8String(s.to_string())
}

// =============================================================================
// Scalars
// =============================================================================

#[test]
fn test_scalars() {
    assert_eq!(decode(b"T").unwrap(), Value::Boolean(true));
    assert_eq!(decode(b"F").unwrap(), Value::Boolean(false));
    assert_eq!(decode(b"_").unwrap(), Value::Unit);
    assert_eq!(decode(b"0").unwrap(), Value::Unit);
    assert_eq!(decode(b"I\x2a").unwrap(), Value::Int32(42));
    assert_eq!(
        decode(b"N\x01\x00\x00\x00\x00\x00\x00\x80").unwrap(),
        Value::UInt64(0x8000_0000_0000_0001)
    );
}

#[test]
fn test_latin1_string() {
    assert_eq!(decode(b"\"\x04caf\xe9").unwrap(), text("café"));
}

#[test]
fn test_utf16_string() {
    assert_eq!(decode(b"c\x04h\x00i\x00").unwrap(), text("hi"));
}

#[test]
fn test_odd_utf16_length() {
    assert!(matches!(decode(b"c\x03h\x00i"), Err(IdbError::InvalidUtf16Length { len: 3, .. })));
}

#[test]
fn test_truncated_uint64() {
    assert!(matches!(
        decode(b"N\x01\x02\x03"),
        Err(IdbError::UnexpectedEnd { need: 8, rem: 3, .. })
    ));
}

#[test]
fn test_truncated_string() {
    assert!(matches!(decode(b"\"\x05ab"), Err(IdbError::UnexpectedEnd { .. })));
}

#[test]
fn test_unknown_tag() {
    assert!(matches!(decode(b"Q"), Err(IdbError::MalformedTag { tag: b'Q', at: 0 })));
}

#[test]
fn test_empty_input() {
    assert!(matches!(decode(b""), Err(IdbError::UnexpectedEnd { .. })));
}

// =============================================================================
// Composites
// =============================================================================

#[test]
fn test_object_with_one_pair() {
    let bytes = b"o\"\x01kT{\x00";
    let mut cursor = Cursor::new(bytes);
    let value = decode_value(&mut cursor).unwrap();

    assert_eq!(value, Value::Object(vec![("k".to_string(), Value::Boolean(true))]));
    assert!(cursor.is_empty());
}

#[test]
fn test_object_keeps_order_and_duplicates() {
    let value = decode(b"o\"\x01bI\x01\"\x01aI\x02\"\x01bI\x03{\x00").unwrap();
    assert_eq!(
        value,
        Value::Object(vec![
            ("b".into(), Value::Int32(1)),
            ("a".into(), Value::Int32(2)),
            ("b".into(), Value::Int32(3)),
        ])
    );
}

#[test]
fn test_array_of_three() {
    let bytes = b"A\x03TF_$\x00\x03";
    let mut cursor = Cursor::new(bytes);
    let value = decode_value(&mut cursor).unwrap();

    assert_eq!(
        value,
        Value::Array(vec![Value::Boolean(true), Value::Boolean(false), Value::Unit])
    );
    assert!(cursor.is_empty());
}

#[test]
fn test_pair_array() {
    let value = decode(b"a\x02I\x00\"\x01xI\x01\"\x01y@\x00\x02").unwrap();
    assert_eq!(
        value,
        Value::PairArray(vec![
            (Value::Int32(0), text("x")),
            (Value::Int32(1), text("y")),
        ])
    );
}

#[test]
fn test_nested_composites() {
    let value = decode(b"o\"\x04listA\x01o\"\x01nI\x07{\x00$\x00\x01{\x00").unwrap();
    let list = value.get("list").unwrap();
    assert_eq!(
        list,
        &Value::Array(vec![Value::Object(vec![("n".into(), Value::Int32(7))])])
    );
}

#[test]
fn test_padding_before_tags() {
    let value = decode(b"\x00o\x01\"\x01k\x00T\x00{\x00").unwrap();
    assert_eq!(value, Value::Object(vec![("k".into(), Value::Boolean(true))]));
}

#[test]
fn test_mismatched_closer() {
    assert!(matches!(
        decode(b"A\x01T@\x00\x01"),
        Err(IdbError::MismatchedClose {
            expected: Closer::Array,
            found: Closer::PairArray,
            ..
        })
    ));
    assert!(matches!(
        decode(b"o$\x00\x00"),
        Err(IdbError::MismatchedClose {
            expected: Closer::Object,
            ..
        })
    ));
}

#[test]
fn test_missing_closer() {
    assert!(matches!(decode(b"A\x01TT"), Err(IdbError::MalformedTag { tag: b'T', .. })));
    assert!(matches!(decode(b"A\x01T"), Err(IdbError::UnexpectedEnd { .. })));
}

#[test]
fn test_non_string_object_key() {
    assert!(matches!(decode(b"oI\x01T{\x00"), Err(IdbError::NonStringKey { at: 1 })));
}

#[test]
fn test_stray_closer() {
    assert!(matches!(decode(b"{\x00"), Err(IdbError::StrayClose { at: 0 })));
    assert!(matches!(decode(b"A\x02T$\x00\x00"), Err(IdbError::StrayClose { .. })));
}

#[test]
fn test_huge_declared_count_fails_cleanly() {
    assert!(matches!(
        decode(b"A\xff\xff\xff\xff\x0fT"),
        Err(IdbError::UnexpectedEnd { .. })
    ));
}

#[test]
fn test_depth_limit() {
    let mut bytes = Vec::new();
    for _ in 0..10 {
        bytes.extend_from_slice(b"A\x01");
    }
    bytes.push(b'T');
    for _ in 0..10 {
        bytes.extend_from_slice(b"$\x00\x01");
    }

    let shallow = DecodeOptions { max_depth: 5 };
    assert!(matches!(
        decode_value_with(&mut Cursor::new(&bytes), &shallow),
        Err(IdbError::DepthExceeded { max_depth: 5 })
    ));
    assert!(decode(&bytes).is_ok());
}

#[test]
fn test_empty_composites_at_depth_limit() {
    fn decode_at_limit(bytes: &[u8]) -> idbscan::Result<Value> {
        decode_value_with(&mut Cursor::new(bytes), &DecodeOptions { max_depth: 1 })
    }

    // Empty array, object and pair array one level down: no children past the limit
    assert_eq!(
        decode_at_limit(b"A\x01A\x00$\x00\x00$\x00\x01").unwrap(),
        Value::Array(vec![Value::Array(vec![])])
    );
    assert_eq!(
        decode_at_limit(b"A\x01o{\x00$\x00\x01").unwrap(),
        Value::Array(vec![Value::Object(vec![])])
    );
    assert_eq!(
        decode_at_limit(b"A\x01a\x00@\x00\x00$\x00\x01").unwrap(),
        Value::Array(vec![Value::PairArray(vec![])])
    );

    // A child at depth 2 is still rejected
    assert!(matches!(
        decode_at_limit(b"A\x01A\x01T$\x00\x01$\x00\x01"),
        Err(IdbError::DepthExceeded { max_depth: 1 })
    ));
}

// =============================================================================
// Record Bodies
// =============================================================================

#[test]
fn test_record_body_reports_trailing_bytes() {
    let (value, trailing) = decode_record_body(b"T\x00\x00\x00", &DecodeOptions::default()).unwrap();
    assert_eq!(value, Value::Boolean(true));
    assert_eq!(trailing, 3);
}
