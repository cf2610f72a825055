//! Message field extraction
//!
//! Picks a closed set of top-level fields out of a message object.

use crate::codec::Value;

use super::timestamp::TimestampFormula;

/// Message types that are rendered; everything else is suppressed.
pub const ACCEPTED_MESSAGE_TYPES: &[&str] = &["Text", "RichText"];

const KEY_MESSAGE_TYPE: &str = "messagetype";
const KEY_CONVERSATION: &str = "conversationId";
const KEY_CREATOR: &str = "creator";
const KEY_CONTENT: &str = "content";
/// Timestamp keys, most preferred first
const TIMESTAMP_KEYS: [&str; 2] = ["createdTime", "composeTime"];

/// Fields of one message record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFields {
    pub timestamp: Option<String>,
    pub conversation_id: Option<String>,
    pub creator: Option<String>,
    pub message_type: Option<String>,
    pub content: Option<String>,
}

/// Extract message fields from a decoded record.
///
/// Returns `None` when the value is not an object or its message type is not
/// accepted. The first occurrence of each key wins.
pub fn extract_message(value: &Value, timestamps: &TimestampFormula) -> Option<MessageFields> {
    let Value::Object(pairs) = value else {
        return None;
    };

    let mut fields = MessageFields::default();
    let mut timestamp_rank = TIMESTAMP_KEYS.len();

    for (key, child) in pairs {
        match key.as_str() {
            KEY_MESSAGE_TYPE => set_once(&mut fields.message_type, child),
            KEY_CONVERSATION => set_once(&mut fields.conversation_id, child),
            KEY_CREATOR => set_once(&mut fields.creator, child),
            KEY_CONTENT => set_once(&mut fields.content, child),
            other => {
                if let Some(rank) = TIMESTAMP_KEYS.iter().position(|k| *k == other) {
                    if rank < timestamp_rank {
                        if let Some(text) = timestamp_text(child, timestamps) {
                            fields.timestamp = Some(text);
                            timestamp_rank = rank;
                        }
                    }
                }
            }
        }
    }

    let accepted = fields
        .message_type
        .as_deref()
        .is_some_and(|t| ACCEPTED_MESSAGE_TYPES.contains(&t));
    accepted.then_some(fields)
}

fn set_once(slot: &mut Option<String>, value: &Value) {
    if slot.is_none() {
        *slot = scalar_text(value);
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Utf8String(s) => Some(s.clone()),
        Value::Int32(v) => Some(v.to_string()),
        Value::UInt64(v) => Some(v.to_string()),
        Value::Boolean(b) => Some(if *b { "True" } else { "False" }.to_string()),
        _ => None,
    }
}

fn timestamp_text(value: &Value, timestamps: &TimestampFormula) -> Option<String> {
    match value.as_integer() {
        Some(ticks) => Some(timestamps.format(ticks)),
        None => value.as_str().map(str::to_string),
    }
}

/// Human-readable block for one message.
pub fn render_message_lines(fields: &MessageFields) -> String {
    let rows = [
        ("timestamp", &fields.timestamp),
        ("conversation", &fields.conversation_id),
        ("creator", &fields.creator),
        ("type", &fields.message_type),
        ("content", &fields.content),
    ];

    let mut out = String::from("BEGIN Message -----\n");
    for (label, field) in rows {
        out.push_str(label);
        out.push('=');
        out.push_str(field.as_deref().unwrap_or(""));
        out.push('\n');
    }
    out.push_str("END Message -----\n");
    out
}
