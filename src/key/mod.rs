//! Key Module
//!
//! Ordering and classification of raw store keys.
//!
//! ## Key Layout
//! ```text
//! ┌────────────┬──────────────────────────────────────────────┐
//! │ KeyPrefix  │ Suffix (depends on prefix type)              │
//! │ (ids)      │ metadata type byte + fields | encoded key(s) │
//! └────────────┴──────────────────────────────────────────────┘
//! ```

mod classify;
mod comparator;
mod idb_key;
mod prefix;

pub use classify::{classify, RecordKind, RECORD_PREFIXES};
pub use comparator::{compare_idb_keys, BytewiseComparator, IdbComparator, KeyComparator};
pub use idb_key::{encode_string_with_length, IdbKey};
pub use prefix::{KeyPrefix, PrefixType};
