//! Storage Module
//!
//! Read-only access to a LevelDB directory.
//!
//! ## Layout
//! ```text
//! <dir>/
//! ├── CURRENT              names the live manifest
//! ├── MANIFEST-NNNNNN      log of version edits (live files, comparator)
//! ├── NNNNNN.log           write-ahead log (replayed into a memtable)
//! └── NNNNNN.ldb / .sst    sorted tables
//! ```
//!
//! ## Read Path
//! ```text
//! ┌──────────┐  ┌──────────┐       ┌──────────┐
//! │ MemTable │  │ Table 1  │  ...  │ Table N  │
//! └────┬─────┘  └────┬─────┘       └────┬─────┘
//!      └─────────────┼──────────────────┘
//!                    ▼
//!          MergingIterator (internal key order)
//!                    ▼
//!          LatestVersions (newest, not deleted)
//!                    ▼
//!              StoreIter → RawRecord
//! ```
//!
//! Nothing under the directory is ever written.

pub(crate) mod crc;
mod internal_key;
pub mod log;
mod manifest;
mod memtable;
mod merge;
pub mod sstable;
mod store;

pub use internal_key::{compare_entries, pack_tag, InternalEntry, ValueType, TAG_SIZE};
pub use manifest::{read_current, FileMeta, Manifest, VersionEdit};
pub use memtable::MemTable;
pub use merge::{EntrySource, LatestVersions, MergingIterator};
pub use store::{RawRecord, Store, StoreIter, StoreOptions};
