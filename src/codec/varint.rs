//! Varint codec
//!
//! Little-endian base-128: each byte carries 7 bits, the high bit means more
//! groups follow, and the first byte holds the least significant group.
//!
//! ```text
//! 300 = 0b1_0010_1100  →  [1010_1100] [0000_0010]
//!                           ^ more      ^ last
//! ```

use crate::error::{IdbError, Result};

use super::Cursor;

/// Group limit of the tagged value format (56 payload bits).
pub const MAX_VALUE_GROUPS: usize = 8;

/// Group limit of a 64-bit container varint.
pub const MAX_VARINT64_GROUPS: usize = 10;

/// Group limit of a 32-bit container varint.
pub const MAX_VARINT32_GROUPS: usize = 5;

/// Decode a tagged-value varint.
///
/// Returns the value and the number of bytes consumed.
pub fn decode(cursor: &mut Cursor<'_>) -> Result<(u64, usize)> {
    decode_limited(cursor, MAX_VALUE_GROUPS)
}

/// Decode a 64-bit varint as used by the LevelDB container and key encodings.
pub fn decode_u64(cursor: &mut Cursor<'_>) -> Result<u64> {
    decode_limited(cursor, MAX_VARINT64_GROUPS).map(|(value, _)| value)
}

/// Decode a 32-bit varint; values that do not fit are rejected.
pub fn decode_u32(cursor: &mut Cursor<'_>) -> Result<u32> {
    let mut lookahead = cursor.clone();
    let (value, _) = decode_limited(&mut lookahead, MAX_VARINT32_GROUPS)?;
    let value = u32::try_from(value).map_err(|_| IdbError::VarintTooLong {
        at: cursor.pos(),
        max_groups: MAX_VARINT32_GROUPS,
    })?;
    *cursor = lookahead;
    Ok(value)
}

/// Decode a varint of at most `max_groups` groups.
///
/// Only the groups actually read contribute to the result; a group whose
/// bits would shift past 64 is reported as too long. The cursor advances
/// only on success.
pub fn decode_limited(cursor: &mut Cursor<'_>, max_groups: usize) -> Result<(u64, usize)> {
    let mut lookahead = cursor.clone();
    let decoded = read_groups(&mut lookahead, max_groups)?;
    *cursor = lookahead;
    Ok(decoded)
}

fn read_groups(cursor: &mut Cursor<'_>, max_groups: usize) -> Result<(u64, usize)> {
    let start = cursor.pos();
    let mut value = 0_u64;

    for group in 0..max_groups {
        let byte = cursor.read_u8()?;
        let chunk = u64::from(byte & 0x7f);
        let shift = 7 * group as u32;

        if shift >= 64 || (shift > 0 && chunk >> (64 - shift) != 0) {
            return Err(IdbError::VarintTooLong { at: start, max_groups });
        }
        value |= chunk << shift;

        if byte & 0x80 == 0 {
            return Ok((value, group + 1));
        }
    }

    Err(IdbError::VarintTooLong { at: start, max_groups })
}

/// Append the varint encoding of `value`.
pub fn encode(mut value: u64, out: &mut Vec<u8>) {
    while value >= 0x80 {
        out.push((value as u8 & 0x7f) | 0x80);
        value >>= 7;
    }
    out.push(value as u8);
}

/// Number of bytes `encode` produces for `value`.
pub fn encoded_len(value: u64) -> usize {
    let bits = 64 - value.max(1).leading_zeros() as usize;
    bits.div_ceil(7)
}
