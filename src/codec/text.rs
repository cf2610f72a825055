//! Character set conversion helpers.

use crate::error::{IdbError, Result};

/// Decode single-byte (ISO-8859-1) text. Every byte maps to one code point.
pub fn latin1_to_utf8(bytes: &[u8]) -> String {
    bytes.iter().map(|&byte| char::from(byte)).collect()
}

/// Decode little-endian UTF-16 text.
///
/// Fails only when the byte length is odd. Unpaired surrogates are replaced
/// with U+FFFD. `at` is the offset reported in the error.
pub fn utf16le_to_utf8(bytes: &[u8], at: usize) -> Result<String> {
    if bytes.len() % 2 != 0 {
        return Err(IdbError::InvalidUtf16Length { at, len: bytes.len() });
    }
    let units = bytes
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]));
    Ok(char::decode_utf16(units)
        .map(|unit| unit.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect())
}
