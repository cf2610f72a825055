//! Internal keys
//!
//! Every stored key carries an 8-byte little-endian tag after the user key:
//! `sequence << 8 | value_type`.

use std::cmp::Ordering;

use bytes::Bytes;

use crate::error::{IdbError, Result};
use crate::key::KeyComparator;

/// Tag size appended to user keys.
pub const TAG_SIZE: usize = 8;

/// Whether an entry holds a value or hides older versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ValueType {
    Deletion = 0,
    Value = 1,
}

impl ValueType {
    pub fn from_byte(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(ValueType::Deletion),
            1 => Ok(ValueType::Value),
            other => Err(IdbError::Corruption(format!("unknown value type {other}"))),
        }
    }
}

/// One version of a user key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternalEntry {
    pub user_key: Bytes,
    pub sequence: u64,
    pub value_type: ValueType,
    /// Empty for deletions.
    pub value: Bytes,
}

impl InternalEntry {
    /// Split an encoded internal key and attach its value.
    pub fn from_encoded(internal_key: &[u8], value: Bytes) -> Result<Self> {
        if internal_key.len() < TAG_SIZE {
            return Err(IdbError::Corruption(format!(
                "internal key of {} bytes is shorter than its tag",
                internal_key.len()
            )));
        }
        let split = internal_key.len() - TAG_SIZE;
        let mut tag_bytes = [0_u8; TAG_SIZE];
        tag_bytes.copy_from_slice(&internal_key[split..]);
        let tag = u64::from_le_bytes(tag_bytes);

        Ok(Self {
            user_key: Bytes::copy_from_slice(&internal_key[..split]),
            sequence: tag >> 8,
            value_type: ValueType::from_byte(tag as u8)?,
            value,
        })
    }
}

/// Pack a sequence number and value type into a tag.
pub fn pack_tag(sequence: u64, value_type: ValueType) -> u64 {
    (sequence << 8) | value_type as u64
}

/// User key ascending by `comparator`, then newest version first.
pub fn compare_entries<C: KeyComparator + ?Sized>(
    comparator: &C,
    a: &InternalEntry,
    b: &InternalEntry,
) -> Ordering {
    comparator
        .compare(&a.user_key, &b.user_key)
        .then_with(|| pack_tag(b.sequence, b.value_type).cmp(&pack_tag(a.sequence, a.value_type)))
}
