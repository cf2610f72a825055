//! Scan tests: the record pipeline and end-to-end scans of on-disk stores.

#[path = "../common/mod.rs"]
mod common;

mod pipeline_tests;
mod scan_path_tests;

use idbscan::key::{IdbKey, KeyPrefix};

// =============================================================================
// Record Builders
// =============================================================================

pub fn contact_key(id: &str) -> Vec<u8> {
    let mut key = KeyPrefix::new(1, 6, 1).encode().unwrap();
    IdbKey::String(id.into()).encode(&mut key);
    key
}

pub fn message_key(id: &str) -> Vec<u8> {
    let mut key = KeyPrefix::new(1, 4, 1).encode().unwrap();
    IdbKey::String(id.into()).encode(&mut key);
    key
}

/// Field value inside an encoded object
pub enum Field<'a> {
    Text(&'a str),
    Ticks(u64),
}

/// `o` followed by string keys and values, closed by `{`.
pub fn object_body(fields: &[(&str, Field<'_>)]) -> Vec<u8> {
    let mut out = vec![b'o'];
    for (key, value) in fields {
        push_string(&mut out, key);
        match value {
            Field::Text(text) => push_string(&mut out, text),
            Field::Ticks(ticks) => {
                out.push(b'N');
                out.extend_from_slice(&ticks.to_le_bytes());
            }
        }
    }
    out.push(b'{');
    out.push(fields.len() as u8);
    out
}

fn push_string(out: &mut Vec<u8>, text: &str) {
    assert!(text.len() < 0x80);
    out.push(b'"');
    out.push(text.len() as u8);
    out.extend_from_slice(text.as_bytes());
}

pub fn contact_value(id: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![id, 0xff, 0x00, 0xff, 0x0d];
    out.extend_from_slice(body);
    out
}

pub fn message_value(id: u8, body: &[u8]) -> Vec<u8> {
    let mut out = vec![id, 0xff, 0x12, 0xff, 0x0d];
    out.extend_from_slice(body);
    out
}

pub fn text_message(kind: &str, content: &str, created_ms: u64) -> Vec<u8> {
    object_body(&[
        ("messagetype", Field::Text(kind)),
        ("conversationId", Field::Text("19:lunch")),
        ("creator", Field::Text("8:bob")),
        ("createdTime", Field::Ticks(created_ms)),
        ("content", Field::Text(content)),
    ])
}
