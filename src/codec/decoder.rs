//! Tagged value decoder
//!
//! Recursive descent over a [`Cursor`], driven by one tag byte per value.
//! A single `0x00`/`0x01` padding byte may precede any tag.

use crate::error::{IdbError, Result};

use super::text::{latin1_to_utf8, utf16le_to_utf8};
use super::{varint, Closer, Cursor, Value};

/// Limits applied while decoding.
#[derive(Debug, Clone, Copy)]
pub struct DecodeOptions {
    /// Maximum composite nesting depth.
    pub max_depth: u32,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Decode one value with default options.
pub fn decode_value(cursor: &mut Cursor<'_>) -> Result<Value> {
    decode_value_with(cursor, &DecodeOptions::default())
}

/// Decode one value.
///
/// The cursor advances past the value on success and stays where it was on
/// failure. A closing marker in value position is rejected.
pub fn decode_value_with(cursor: &mut Cursor<'_>, options: &DecodeOptions) -> Result<Value> {
    let mut lookahead = cursor.clone();
    let value = decode_child(&mut lookahead, options, 0)?;
    *cursor = lookahead;
    Ok(value)
}

/// Decode the root value of a record body.
///
/// Returns the tree and the number of trailing bytes left unread.
pub fn decode_record_body(body: &[u8], options: &DecodeOptions) -> Result<(Value, usize)> {
    let mut cursor = Cursor::new(body);
    let value = decode_value_with(&mut cursor, options)?;
    Ok((value, cursor.remaining()))
}

/// Skip optional padding and return the next tag and its offset, unconsumed.
fn next_tag(cursor: &mut Cursor<'_>) -> Result<(u8, usize)> {
    let tag = cursor.peek_u8()?;
    if tag == 0x00 || tag == 0x01 {
        cursor.skip(1)?;
    }
    Ok((cursor.peek_u8()?, cursor.pos()))
}

fn closer_for(tag: u8) -> Option<Closer> {
    match tag {
        b'$' => Some(Closer::Array),
        b'@' => Some(Closer::PairArray),
        b'{' => Some(Closer::Object),
        _ => None,
    }
}

/// Decode a value that must not be a closing marker.
fn decode_child(cursor: &mut Cursor<'_>, options: &DecodeOptions, depth: u32) -> Result<Value> {
    let at = cursor.pos();
    match decode_item(cursor, options, depth)? {
        Value::Sentinel(_) => Err(IdbError::StrayClose { at }),
        value => Ok(value),
    }
}

fn decode_item(cursor: &mut Cursor<'_>, options: &DecodeOptions, depth: u32) -> Result<Value> {
    let (tag, at) = next_tag(cursor)?;
    // Closers end the enclosing composite and sit outside the depth limit
    if depth > options.max_depth && closer_for(tag).is_none() {
        return Err(IdbError::DepthExceeded {
            max_depth: options.max_depth,
        });
    }
    cursor.skip(1)?;

    match tag {
        b'"' => {
            let bytes = read_len_prefixed(cursor)?;
            Ok(Value::Utf8String(latin1_to_utf8(bytes)))
        }
        b'c' => {
            let bytes = read_len_prefixed(cursor)?;
            Ok(Value::Utf8String(utf16le_to_utf8(bytes, at)?))
        }
        b'N' => Ok(Value::UInt64(cursor.read_u64_le()?)),
        // No sign scheme is defined for this tag: the low 32 bits of the
        // varint are reinterpreted as two's complement.
        b'I' => {
            let (raw, _) = varint::decode(cursor)?;
            Ok(Value::Int32(raw as u32 as i32))
        }
        b'_' | b'0' => Ok(Value::Unit),
        b'F' => Ok(Value::Boolean(false)),
        b'T' => Ok(Value::Boolean(true)),
        b'o' => decode_object(cursor, options, depth),
        b'A' => decode_array(cursor, options, depth),
        b'a' => decode_pair_array(cursor, options, depth),
        b'$' => {
            cursor.skip(2)?;
            Ok(Value::Sentinel(Closer::Array))
        }
        b'@' => {
            cursor.skip(2)?;
            Ok(Value::Sentinel(Closer::PairArray))
        }
        b'{' => {
            cursor.skip(1)?;
            Ok(Value::Sentinel(Closer::Object))
        }
        _ => Err(IdbError::MalformedTag { tag, at }),
    }
}

fn read_len_prefixed<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let at = cursor.pos();
    let (len, _) = varint::decode(cursor)?;
    let len = usize::try_from(len).map_err(|_| IdbError::UnexpectedEnd {
        at,
        need: usize::MAX,
        rem: cursor.remaining(),
    })?;
    cursor.read_exact(len)
}

/// Clamp a declared element count to what the input could possibly hold.
fn capacity_hint(count: u64, cursor: &Cursor<'_>) -> usize {
    usize::try_from(count)
        .unwrap_or(usize::MAX)
        .min(cursor.remaining())
}

fn expect_closer(cursor: &mut Cursor<'_>, options: &DecodeOptions, depth: u32, expected: Closer) -> Result<()> {
    let mut lookahead = cursor.clone();
    let (tag, at) = next_tag(&mut lookahead)?;
    match closer_for(tag) {
        Some(found) if found == expected => {
            decode_item(cursor, options, depth)?;
            Ok(())
        }
        Some(found) => Err(IdbError::MismatchedClose { at, expected, found }),
        None => Err(IdbError::MalformedTag { tag, at }),
    }
}

fn decode_object(cursor: &mut Cursor<'_>, options: &DecodeOptions, depth: u32) -> Result<Value> {
    let mut pairs = Vec::new();
    loop {
        let key_at = cursor.pos();
        match decode_item(cursor, options, depth + 1)? {
            Value::Utf8String(key) => {
                let value = decode_child(cursor, options, depth + 1)?;
                pairs.push((key, value));
            }
            Value::Sentinel(Closer::Object) => return Ok(Value::Object(pairs)),
            Value::Sentinel(found) => {
                return Err(IdbError::MismatchedClose {
                    at: key_at,
                    expected: Closer::Object,
                    found,
                })
            }
            _ => return Err(IdbError::NonStringKey { at: key_at }),
        }
    }
}

fn decode_array(cursor: &mut Cursor<'_>, options: &DecodeOptions, depth: u32) -> Result<Value> {
    let (count, _) = varint::decode(cursor)?;
    let mut items = Vec::with_capacity(capacity_hint(count, cursor));
    for _ in 0..count {
        items.push(decode_child(cursor, options, depth + 1)?);
    }
    expect_closer(cursor, options, depth + 1, Closer::Array)?;
    Ok(Value::Array(items))
}

fn decode_pair_array(cursor: &mut Cursor<'_>, options: &DecodeOptions, depth: u32) -> Result<Value> {
    let (count, _) = varint::decode(cursor)?;
    let mut pairs = Vec::with_capacity(capacity_hint(count, cursor) / 2);
    for _ in 0..count {
        let first = decode_child(cursor, options, depth + 1)?;
        let second = decode_child(cursor, options, depth + 1)?;
        pairs.push((first, second));
    }
    expect_closer(cursor, options, depth + 1, Closer::PairArray)?;
    Ok(Value::PairArray(pairs))
}
