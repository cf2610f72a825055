//! Encoded IndexedDB keys
//!
//! ```text
//! 01 len:varint u16be*len     string (len in code units)
//! 02 f64le                    date
//! 03 f64le                    number
//! 04 n:varint key*n           array
//! 05                          min key
//! 06 len:varint bytes[len]    binary
//! ```

use std::cmp::Ordering;

use crate::codec::{varint, Cursor};

pub const KEY_NULL: u8 = 0;
pub const KEY_STRING: u8 = 1;
pub const KEY_DATE: u8 = 2;
pub const KEY_NUMBER: u8 = 3;
pub const KEY_ARRAY: u8 = 4;
pub const KEY_MIN: u8 = 5;
pub const KEY_BINARY: u8 = 6;

/// An IndexedDB key, for building encoded keys.
#[derive(Debug, Clone, PartialEq)]
pub enum IdbKey {
    Array(Vec<IdbKey>),
    Binary(Vec<u8>),
    String(String),
    Date(f64),
    Number(f64),
    MinKey,
}

impl IdbKey {
    /// Append the encoded form to `out`.
    pub fn encode(&self, out: &mut Vec<u8>) {
        match self {
            IdbKey::Array(items) => {
                out.push(KEY_ARRAY);
                varint::encode(items.len() as u64, out);
                for item in items {
                    item.encode(out);
                }
            }
            IdbKey::Binary(bytes) => {
                out.push(KEY_BINARY);
                varint::encode(bytes.len() as u64, out);
                out.extend_from_slice(bytes);
            }
            IdbKey::String(text) => {
                out.push(KEY_STRING);
                encode_string_with_length(text, out);
            }
            IdbKey::Date(value) => {
                out.push(KEY_DATE);
                out.extend_from_slice(&value.to_le_bytes());
            }
            IdbKey::Number(value) => {
                out.push(KEY_NUMBER);
                out.extend_from_slice(&value.to_le_bytes());
            }
            IdbKey::MinKey => out.push(KEY_MIN),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode(&mut out);
        out
    }
}

/// Varint code-unit count followed by big-endian UTF-16.
pub fn encode_string_with_length(text: &str, out: &mut Vec<u8>) {
    let units: Vec<u16> = text.encode_utf16().collect();
    varint::encode(units.len() as u64, out);
    for unit in units {
        out.extend_from_slice(&unit.to_be_bytes());
    }
}

/// Rank of a key type; a lower rank sorts *after* a higher one.
fn type_rank(type_byte: u8) -> Option<u8> {
    match type_byte {
        KEY_NULL => Some(0),
        KEY_ARRAY => Some(1),
        KEY_BINARY => Some(2),
        KEY_STRING => Some(3),
        KEY_DATE => Some(4),
        KEY_NUMBER => Some(5),
        KEY_MIN => Some(7),
        _ => None,
    }
}

pub(crate) fn read_varint_i64(cursor: &mut Cursor<'_>) -> Option<i64> {
    varint::decode_u64(cursor).ok().map(|value| value as i64)
}

/// Raw big-endian UTF-16 bytes of a length-prefixed string.
pub(crate) fn read_string_with_length<'a>(cursor: &mut Cursor<'a>) -> Option<&'a [u8]> {
    let units = read_varint_i64(cursor)?;
    let len = usize::try_from(units).ok()?.checked_mul(2)?;
    cursor.read_exact(len).ok()
}

fn read_binary<'a>(cursor: &mut Cursor<'a>) -> Option<&'a [u8]> {
    let len = usize::try_from(read_varint_i64(cursor)?).ok()?;
    cursor.read_exact(len).ok()
}

/// Compare two encoded keys, advancing both cursors past them.
///
/// `None` means one of the keys could not be decoded.
pub(crate) fn compare_encoded_keys(a: &mut Cursor<'_>, b: &mut Cursor<'_>) -> Option<Ordering> {
    let type_a = a.read_u8().ok()?;
    let type_b = b.read_u8().ok()?;
    let (rank_a, rank_b) = (type_rank(type_a)?, type_rank(type_b)?);
    if rank_a != rank_b {
        return Some(rank_b.cmp(&rank_a));
    }

    match type_a {
        KEY_NULL | KEY_MIN => Some(Ordering::Equal),
        KEY_ARRAY => {
            let len_a = read_varint_i64(a)?;
            let len_b = read_varint_i64(b)?;
            for _ in 0..len_a.min(len_b).max(0) {
                match compare_encoded_keys(a, b)? {
                    Ordering::Equal => {}
                    other => return Some(other),
                }
            }
            Some(len_a.cmp(&len_b))
        }
        KEY_BINARY => Some(read_binary(a)?.cmp(read_binary(b)?)),
        // Big-endian code units: byte order is code unit order.
        KEY_STRING => Some(read_string_with_length(a)?.cmp(read_string_with_length(b)?)),
        KEY_DATE | KEY_NUMBER => {
            // NaN is not a valid key and makes the key undecodable
            let x = a.read_f64_le().ok()?;
            let y = b.read_f64_le().ok()?;
            x.partial_cmp(&y)
        }
        _ => None,
    }
}
