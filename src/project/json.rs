//! JSON lines output

use serde::Serialize;

use crate::codec::Value;
use crate::error::{IdbError, Result};
use crate::key::RecordKind;

#[derive(Serialize)]
struct JsonRecord<'a> {
    kind: RecordKind,
    key: String,
    value: &'a Value,
}

/// One JSON object per record, newline terminated.
pub fn json_line(kind: RecordKind, key: &[u8], value: &Value) -> Result<String> {
    let record = JsonRecord {
        kind,
        key: escape_bytes(key),
        value,
    };
    let mut line = serde_json::to_string(&record).map_err(|e| IdbError::Serialization(e.to_string()))?;
    line.push('\n');
    Ok(line)
}

/// Printable ASCII verbatim, everything else as `\xNN`.
pub fn escape_bytes(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if b.is_ascii_graphic() || b == b' ' {
            if b == b'\\' {
                out.push_str("\\\\");
            } else {
                out.push(char::from(b));
            }
        } else {
            out.push_str(&format!("\\x{b:02x}"));
        }
    }
    out
}
