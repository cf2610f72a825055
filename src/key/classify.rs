//! Key prefix classifier
//!
//! Records of interest live in fixed object stores, so a literal byte prefix
//! of the key identifies them.

use std::fmt;

use serde::Serialize;

/// Kind of record a key belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecordKind {
    Contact,
    Message,
}

impl RecordKind {
    /// Label used in rendered output.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Contact => "Contact",
            RecordKind::Message => "Message",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Known record prefixes, checked in order.
///
/// Messages carry three prefixes, one per schema revision of the store.
pub static RECORD_PREFIXES: &[(&[u8], RecordKind)] = &[
    // db 1, store 6, string key
    (b"\x00\x01\x06\x01\x01", RecordKind::Contact),
    // db 1, store 2, 36-character string key
    (b"\x00\x01\x02\x01\x01\x24\x00", RecordKind::Message),
    // db 1, store 1, [string, ...] array key
    (b"\x00\x01\x01\x01\x04\x02\x01", RecordKind::Message),
    // db 1, store 4, string key
    (b"\x00\x01\x04\x01\x01", RecordKind::Message),
];

/// Classify a key; `None` means unclassified and the record is skipped.
pub fn classify(key: &[u8]) -> Option<RecordKind> {
    RECORD_PREFIXES
        .iter()
        .find(|(prefix, _)| key.starts_with(prefix))
        .map(|(_, kind)| *kind)
}
