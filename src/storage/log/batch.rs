//! Write batch decoding

use bytes::Bytes;

use crate::codec::{varint, Cursor};
use crate::error::{IdbError, Result};
use crate::storage::internal_key::{InternalEntry, ValueType};

/// Sequence (8) + count (4)
pub const BATCH_HEADER_SIZE: usize = 12;

const TAG_DELETION: u8 = 0;
const TAG_VALUE: u8 = 1;

/// Decode a write batch into one entry per operation.
///
/// Operations take consecutive sequence numbers starting at the batch's.
pub fn decode_batch(record: &[u8]) -> Result<Vec<InternalEntry>> {
    if record.len() < BATCH_HEADER_SIZE {
        return Err(IdbError::Corruption(format!(
            "write batch of {} bytes is too small",
            record.len()
        )));
    }

    let mut cursor = Cursor::new(record);
    let corrupt = |e: IdbError| IdbError::Corruption(format!("write batch: {e}"));

    let sequence = cursor.read_u64_le().map_err(corrupt)?;
    let count = cursor.read_u32_le().map_err(corrupt)?;

    // Each operation needs at least two bytes.
    let mut entries = Vec::with_capacity((count as usize).min(cursor.remaining() / 2));
    for i in 0..u64::from(count) {
        let tag = cursor.read_u8().map_err(corrupt)?;
        let (value_type, user_key, value) = match tag {
            TAG_VALUE => {
                let key = read_slice(&mut cursor).map_err(corrupt)?;
                let value = read_slice(&mut cursor).map_err(corrupt)?;
                (ValueType::Value, key, value)
            }
            TAG_DELETION => {
                let key = read_slice(&mut cursor).map_err(corrupt)?;
                (ValueType::Deletion, key, &[][..])
            }
            other => {
                return Err(IdbError::Corruption(format!(
                    "unknown write batch tag {other:#04x}"
                )))
            }
        };
        entries.push(InternalEntry {
            user_key: Bytes::copy_from_slice(user_key),
            sequence: sequence.wrapping_add(i),
            value_type,
            value: Bytes::copy_from_slice(value),
        });
    }

    if !cursor.is_empty() {
        return Err(IdbError::Corruption(format!(
            "write batch has {} bytes beyond its {} operations",
            cursor.remaining(),
            count
        )));
    }
    Ok(entries)
}

fn read_slice<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let len = varint::decode_u32(cursor)?;
    cursor.read_exact(len as usize)
}
