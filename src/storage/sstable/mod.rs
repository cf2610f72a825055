//! SSTable Module
//!
//! Immutable on-disk sorted tables (`NNNNNN.ldb`, formerly `.sst`).
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Data Block 0 │ trailer                                  │
//! │ ...                                                     │
//! │ Data Block N │ trailer                                  │
//! ├─────────────────────────────────────────────────────────┤
//! │ Meta Blocks (filters; not read)                         │
//! ├─────────────────────────────────────────────────────────┤
//! │ Metaindex Block │ trailer                               │
//! ├─────────────────────────────────────────────────────────┤
//! │ Index Block │ trailer                                   │
//! │   separator key → BlockHandle of each data block        │
//! ├─────────────────────────────────────────────────────────┤
//! │ Footer (48 bytes)                                       │
//! │   metaindex handle | index handle | padding | magic u64 │
//! └─────────────────────────────────────────────────────────┘
//!
//! BlockHandle: varint64 offset, varint64 size
//! Trailer:     compression type (1) | masked CRC-32C (4)
//! ```
//!
//! ## Block Format
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ Entry: shared varint32 | non_shared varint32 |          │
//! │        value_len varint32 | key delta | value           │
//! │ ... repeated ...                                        │
//! ├─────────────────────────────────────────────────────────┤
//! │ Restart offsets: u32 LE × num_restarts                  │
//! │ num_restarts: u32 LE                                    │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod block;
mod iterator;
mod reader;

use std::path::{Path, PathBuf};

pub use block::{Block, BlockIter};
pub use iterator::SSTableIterator;
pub use reader::SSTableReader;

use crate::codec::{varint, Cursor};
use crate::error::{IdbError, Result};

// =============================================================================
// Shared Constants (used by block, reader, iterator)
// =============================================================================

/// Magic number closing every table file
pub(crate) const TABLE_MAGIC: u64 = 0xdb47_7524_8b80_fb57;

/// Footer size: two padded handles (40) + magic (8)
pub(crate) const FOOTER_SIZE: usize = 48;

/// Compression type (1) + masked CRC (4)
pub(crate) const BLOCK_TRAILER_SIZE: usize = 5;

pub(crate) const NO_COMPRESSION: u8 = 0;
pub(crate) const SNAPPY_COMPRESSION: u8 = 1;

// =============================================================================
// Block Handle
// =============================================================================

/// Location of a block within a table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHandle {
    pub offset: u64,
    /// Size excluding the trailer
    pub size: u64,
}

impl BlockHandle {
    pub fn decode(cursor: &mut Cursor<'_>) -> Result<Self> {
        let offset = varint::decode_u64(cursor)?;
        let size = varint::decode_u64(cursor)?;
        Ok(Self { offset, size })
    }

    pub fn encode(&self, out: &mut Vec<u8>) {
        varint::encode(self.offset, out);
        varint::encode(self.size, out);
    }
}

/// Locate the file of table `number`, preferring `.ldb` over legacy `.sst`.
pub fn table_path(db_dir: &Path, number: u64) -> Result<PathBuf> {
    let ldb = db_dir.join(format!("{number:06}.ldb"));
    if ldb.exists() {
        return Ok(ldb);
    }
    let sst = db_dir.join(format!("{number:06}.sst"));
    if sst.exists() {
        return Ok(sst);
    }
    Err(IdbError::Corruption(format!(
        "table file {number:06}.ldb is missing"
    )))
}
