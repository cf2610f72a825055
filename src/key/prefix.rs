//! IndexedDB key prefix
//!
//! ```text
//! ┌──────────────────────┬──────────┬──────────┬──────────┐
//! │ lengths (1)          │ db id    │ store id │ index id │
//! │ ddd sss ii           │ 1-8 (LE) │ 1-8 (LE) │ 1-4 (LE) │
//! └──────────────────────┴──────────┴──────────┴──────────┘
//! ```
//! Each 3- or 2-bit field holds the byte width of its id minus one.

use crate::codec::Cursor;
use crate::error::{IdbError, Result};

/// Index id of object store records.
pub const OBJECT_STORE_DATA_INDEX_ID: i64 = 1;
/// Index id of "exists" entries.
pub const EXISTS_ENTRY_INDEX_ID: i64 = 2;
/// Index id of blob entries.
pub const BLOB_ENTRY_INDEX_ID: i64 = 3;
/// Smallest index id of user-defined indexes.
pub const MINIMUM_INDEX_ID: i64 = 30;

const MAX_DATABASE_BYTES: usize = 8;
const MAX_OBJECT_STORE_BYTES: usize = 8;
const MAX_INDEX_BYTES: usize = 4;

/// What the rest of the key encodes, as implied by the prefix ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixType {
    GlobalMetadata,
    DatabaseMetadata,
    ObjectStoreData,
    ExistsEntry,
    BlobEntry,
    IndexData,
    Invalid,
}

/// Decoded (database, object store, index) id triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct KeyPrefix {
    pub database_id: i64,
    pub object_store_id: i64,
    pub index_id: i64,
}

impl KeyPrefix {
    pub fn new(database_id: i64, object_store_id: i64, index_id: i64) -> Self {
        Self {
            database_id,
            object_store_id,
            index_id,
        }
    }

    /// Decode a prefix, leaving the cursor at the key suffix.
    pub fn decode(cursor: &mut Cursor<'_>) -> Option<Self> {
        let first = cursor.read_u8().ok()?;
        let database_bytes = usize::from((first >> 5) & 0x7) + 1;
        let object_store_bytes = usize::from((first >> 2) & 0x7) + 1;
        let index_bytes = usize::from(first & 0x3) + 1;

        if database_bytes + object_store_bytes + index_bytes > cursor.remaining() {
            return None;
        }

        Some(Self {
            database_id: decode_int(cursor.read_exact(database_bytes).ok()?)?,
            object_store_id: decode_int(cursor.read_exact(object_store_bytes).ok()?)?,
            index_id: decode_int(cursor.read_exact(index_bytes).ok()?)?,
        })
    }

    /// Encode with the minimal width for each id.
    ///
    /// Ids must be non-negative; the index id must fit 4 bytes.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let database = encode_id("database_id", self.database_id, MAX_DATABASE_BYTES)?;
        let object_store = encode_id("object_store_id", self.object_store_id, MAX_OBJECT_STORE_BYTES)?;
        let index = encode_id("index_id", self.index_id, MAX_INDEX_BYTES)?;

        let first = (((database.len() - 1) as u8) << 5)
            | (((object_store.len() - 1) as u8) << 2)
            | ((index.len() - 1) as u8);

        let mut out = Vec::with_capacity(1 + database.len() + object_store.len() + index.len());
        out.push(first);
        out.extend_from_slice(&database);
        out.extend_from_slice(&object_store);
        out.extend_from_slice(&index);
        Ok(out)
    }

    pub fn kind(&self) -> PrefixType {
        if self.database_id == 0 {
            PrefixType::GlobalMetadata
        } else if self.object_store_id == 0 {
            PrefixType::DatabaseMetadata
        } else if self.index_id == OBJECT_STORE_DATA_INDEX_ID {
            PrefixType::ObjectStoreData
        } else if self.index_id == EXISTS_ENTRY_INDEX_ID {
            PrefixType::ExistsEntry
        } else if self.index_id == BLOB_ENTRY_INDEX_ID {
            PrefixType::BlobEntry
        } else if self.index_id >= MINIMUM_INDEX_ID {
            PrefixType::IndexData
        } else {
            PrefixType::Invalid
        }
    }
}

/// Little-endian integer of 1 to 8 bytes.
fn decode_int(bytes: &[u8]) -> Option<i64> {
    if bytes.is_empty() || bytes.len() > 8 {
        return None;
    }
    let value = bytes
        .iter()
        .enumerate()
        .fold(0_u64, |acc, (i, &byte)| acc | (u64::from(byte) << (8 * i)));
    Some(value as i64)
}

fn encode_id(field: &'static str, value: i64, max_bytes: usize) -> Result<Vec<u8>> {
    let bytes = encode_int(value);
    if value < 0 || bytes.len() > max_bytes {
        return Err(IdbError::KeyPrefixRange { field, value, max_bytes });
    }
    Ok(bytes)
}

fn encode_int(value: i64) -> Vec<u8> {
    let mut n = value as u64;
    let mut out = Vec::with_capacity(8);
    loop {
        out.push(n as u8);
        n >>= 8;
        if n == 0 {
            break;
        }
    }
    out
}
