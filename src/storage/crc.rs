//! Masked CRC-32C
//!
//! Stored checksums are rotated and offset so that a CRC over data that
//! itself embeds CRCs does not degenerate.

const MASK_DELTA: u32 = 0xa282_ead8;

pub(crate) fn mask(crc: u32) -> u32 {
    crc.rotate_right(15).wrapping_add(MASK_DELTA)
}

pub(crate) fn unmask(masked: u32) -> u32 {
    masked.wrapping_sub(MASK_DELTA).rotate_left(15)
}

/// CRC-32C of a type byte followed by `payload`.
pub(crate) fn typed_crc(type_byte: u8, payload: &[u8]) -> u32 {
    crc32c::crc32c_append(crc32c::crc32c(&[type_byte]), payload)
}
