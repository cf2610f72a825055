//! Key ordering rules
//!
//! A store can only be iterated correctly with the comparator it was written
//! with. `IdbComparator` reproduces the IndexedDB collation: ids compare
//! numerically, typed key values compare by type and then by value.

use std::cmp::Ordering;

use crate::codec::Cursor;

use super::idb_key::{compare_encoded_keys, read_string_with_length, read_varint_i64};
use super::prefix::{KeyPrefix, PrefixType};

/// Ordering over raw key bytes, identified by a persistent name.
pub trait KeyComparator {
    /// Name recorded in the store manifest.
    fn name(&self) -> &str;

    /// Total order over raw keys.
    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering;
}

impl<C: KeyComparator + ?Sized> KeyComparator for &C {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        (**self).compare(a, b)
    }
}

/// Plain byte-wise ordering, LevelDB's built-in default.
#[derive(Debug, Clone, Copy, Default)]
pub struct BytewiseComparator;

impl KeyComparator for BytewiseComparator {
    fn name(&self) -> &str {
        "leveldb.BytewiseComparator"
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        a.cmp(b)
    }
}

// Global metadata type bytes
const MAX_SIMPLE_GLOBAL_METADATA: u8 = 7;
const SCOPES_PREFIX: u8 = 50;
const DATABASE_FREE_LIST: u8 = 100;
const DATABASE_NAME: u8 = 201;

// Database metadata type bytes
const MAX_SIMPLE_DATABASE_METADATA: u8 = 6;
const OBJECT_STORE_METADATA: u8 = 50;
const INDEX_METADATA: u8 = 100;
const OBJECT_STORE_FREE_LIST: u8 = 150;
const INDEX_FREE_LIST: u8 = 151;
const OBJECT_STORE_NAMES: u8 = 200;
const INDEX_NAMES: u8 = 201;

/// The IndexedDB comparator (`idb_cmp1`).
///
/// Keys that cannot be decoded sort after every decodable key and compare
/// byte-wise among themselves, so the ordering stays total.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdbComparator;

impl IdbComparator {
    pub const NAME: &'static str = "idb_cmp1";
}

impl KeyComparator for IdbComparator {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn compare(&self, a: &[u8], b: &[u8]) -> Ordering {
        match (is_decodable(a), is_decodable(b)) {
            (true, true) => compare_idb_keys(a, b, false).unwrap_or_else(|| a.cmp(b)),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => a.cmp(b),
        }
    }
}

/// A key decodes when it compares against itself: that walks every field
/// the ordering would read.
fn is_decodable(key: &[u8]) -> bool {
    compare_idb_keys(key, key, false).is_some()
}

/// Compare two IndexedDB keys.
///
/// With `only_index_keys`, index entries compare by their indexed value
/// alone, ignoring sequence number and primary key. `None` means a key
/// could not be decoded.
pub fn compare_idb_keys(a: &[u8], b: &[u8], only_index_keys: bool) -> Option<Ordering> {
    let mut a = Cursor::new(a);
    let mut b = Cursor::new(b);

    let prefix_a = KeyPrefix::decode(&mut a)?;
    let prefix_b = KeyPrefix::decode(&mut b)?;
    match prefix_a.cmp(&prefix_b) {
        Ordering::Equal => {}
        other => return Some(other),
    }

    match prefix_a.kind() {
        PrefixType::GlobalMetadata => compare_global_metadata(&mut a, &mut b),
        PrefixType::DatabaseMetadata => compare_database_metadata(&mut a, &mut b),
        PrefixType::ObjectStoreData | PrefixType::ExistsEntry | PrefixType::BlobEntry => {
            if a.is_empty() || b.is_empty() {
                return Some(a.remaining().cmp(&b.remaining()));
            }
            compare_encoded_keys(&mut a, &mut b)
        }
        PrefixType::IndexData => {
            if a.is_empty() || b.is_empty() {
                return Some(a.remaining().cmp(&b.remaining()));
            }
            compare_index_data(&mut a, &mut b, only_index_keys)
        }
        PrefixType::Invalid => None,
    }
}

fn compare_global_metadata(a: &mut Cursor<'_>, b: &mut Cursor<'_>) -> Option<Ordering> {
    let type_a = a.read_u8().ok()?;
    let type_b = b.read_u8().ok()?;
    if type_a != type_b {
        return Some(type_a.cmp(&type_b));
    }

    match type_a {
        t if t < MAX_SIMPLE_GLOBAL_METADATA => Some(Ordering::Equal),
        SCOPES_PREFIX => Some(a.rest().cmp(b.rest())),
        DATABASE_FREE_LIST => Some(read_varint_i64(a)?.cmp(&read_varint_i64(b)?)),
        DATABASE_NAME => {
            let (origin_a, name_a) = (read_string_with_length(a)?, read_string_with_length(a)?);
            let (origin_b, name_b) = (read_string_with_length(b)?, read_string_with_length(b)?);
            Some(origin_a.cmp(origin_b).then_with(|| name_a.cmp(name_b)))
        }
        _ => None,
    }
}

fn compare_database_metadata(a: &mut Cursor<'_>, b: &mut Cursor<'_>) -> Option<Ordering> {
    let type_a = a.read_u8().ok()?;
    let type_b = b.read_u8().ok()?;
    if type_a != type_b {
        return Some(type_a.cmp(&type_b));
    }

    match type_a {
        t if t < MAX_SIMPLE_DATABASE_METADATA => Some(Ordering::Equal),
        OBJECT_STORE_METADATA => {
            let x = (read_varint_i64(a)?, a.read_u8().ok()?);
            let y = (read_varint_i64(b)?, b.read_u8().ok()?);
            Some(x.cmp(&y))
        }
        INDEX_METADATA => {
            let x = (read_varint_i64(a)?, read_varint_i64(a)?, a.read_u8().ok()?);
            let y = (read_varint_i64(b)?, read_varint_i64(b)?, b.read_u8().ok()?);
            Some(x.cmp(&y))
        }
        OBJECT_STORE_FREE_LIST => Some(read_varint_i64(a)?.cmp(&read_varint_i64(b)?)),
        INDEX_FREE_LIST => {
            let x = (read_varint_i64(a)?, read_varint_i64(a)?);
            let y = (read_varint_i64(b)?, read_varint_i64(b)?);
            Some(x.cmp(&y))
        }
        OBJECT_STORE_NAMES => Some(read_string_with_length(a)?.cmp(read_string_with_length(b)?)),
        INDEX_NAMES => {
            let x = (read_varint_i64(a)?, read_string_with_length(a)?);
            let y = (read_varint_i64(b)?, read_string_with_length(b)?);
            Some(x.cmp(&y))
        }
        _ => None,
    }
}

/// Index entry: indexed key, optional sequence number, optional primary key.
fn compare_index_data(a: &mut Cursor<'_>, b: &mut Cursor<'_>, only_index_keys: bool) -> Option<Ordering> {
    match compare_encoded_keys(a, b)? {
        Ordering::Equal => {}
        other => return Some(other),
    }
    if only_index_keys {
        return Some(Ordering::Equal);
    }

    let sequence_a = if a.is_empty() { -1 } else { read_varint_i64(a)? };
    let sequence_b = if b.is_empty() { -1 } else { read_varint_i64(b)? };

    if a.is_empty() || b.is_empty() {
        return Some(a.remaining().cmp(&b.remaining()));
    }

    match compare_encoded_keys(a, b)? {
        Ordering::Equal => Some(sequence_a.cmp(&sequence_b)),
        other => Some(other),
    }
}
