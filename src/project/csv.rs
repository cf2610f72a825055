//! CSV emission
//!
//! Fields containing a comma, quote, CR or LF are quoted, with embedded
//! quotes doubled.

use std::borrow::Cow;

use super::message::MessageFields;

/// Header line for message records
pub const CSV_HEADER: &str = "timestamp,conversation,creator,type,content\n";

/// Quote a field when it needs it.
pub fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\r', '\n']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

/// One CSV line, newline terminated.
pub fn csv_record<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    let mut line = String::new();
    for (i, field) in fields.into_iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&quote_field(field));
    }
    line.push('\n');
    line
}

/// `timestamp,conversation,creator,type,content`
pub fn message_csv_record(fields: &MessageFields) -> String {
    csv_record([
        fields.timestamp.as_deref().unwrap_or(""),
        fields.conversation_id.as_deref().unwrap_or(""),
        fields.creator.as_deref().unwrap_or(""),
        fields.message_type.as_deref().unwrap_or(""),
        fields.content.as_deref().unwrap_or(""),
    ])
}
