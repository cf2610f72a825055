//! SSTable Reader
//!
//! Opens table files and loads the index block into memory.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::codec::Cursor;
use crate::error::{IdbError, Result};
use crate::storage::crc;

use super::block::Block;
use super::iterator::SSTableIterator;
use super::{BlockHandle, BLOCK_TRAILER_SIZE, FOOTER_SIZE, NO_COMPRESSION, SNAPPY_COMPRESSION, TABLE_MAGIC};

/// Reader for one table file
#[derive(Debug)]
pub struct SSTableReader {
    path: PathBuf,
    file_size: u64,
    /// Handles of the data blocks, in key order
    data_blocks: Vec<BlockHandle>,
    verify_checksums: bool,
}

impl SSTableReader {
    /// Open a table for reading.
    ///
    /// Validates the footer and loads the index; data blocks are read lazily
    /// during iteration.
    pub fn open(path: &Path, verify_checksums: bool) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size < FOOTER_SIZE as u64 {
            return Err(IdbError::Corruption(format!(
                "{} is too short to be a table",
                path.display()
            )));
        }

        // Read footer
        let mut footer = [0u8; FOOTER_SIZE];
        file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
        file.read_exact(&mut footer)?;

        let mut magic = [0u8; 8];
        magic.copy_from_slice(&footer[FOOTER_SIZE - 8..]);
        if u64::from_le_bytes(magic) != TABLE_MAGIC {
            return Err(IdbError::Corruption(format!(
                "{} has a bad table magic number",
                path.display()
            )));
        }

        let mut cursor = Cursor::new(&footer[..FOOTER_SIZE - 8]);
        let _metaindex = BlockHandle::decode(&mut cursor)?;
        let index_handle = BlockHandle::decode(&mut cursor)?;

        // Load index into memory
        let index = Block::new(read_block(&mut file, file_size, index_handle, verify_checksums)?)?;
        let mut data_blocks = Vec::new();
        for entry in index.iter() {
            let (_separator, handle) = entry?;
            data_blocks.push(BlockHandle::decode(&mut Cursor::new(&handle))?);
        }

        tracing::debug!(path = %path.display(), blocks = data_blocks.len(), "opened table");

        Ok(Self {
            path: path.to_path_buf(),
            file_size,
            data_blocks,
            verify_checksums,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of data blocks
    pub fn block_count(&self) -> usize {
        self.data_blocks.len()
    }

    /// Iterate over every entry of the table, in internal key order.
    pub fn iter(&self) -> Result<SSTableIterator<'_>> {
        let file = File::open(&self.path)?;
        Ok(SSTableIterator::new(self, file))
    }

    pub(super) fn data_block(&self, file: &mut File, index: usize) -> Result<Option<Block>> {
        match self.data_blocks.get(index) {
            Some(handle) => {
                let data = read_block(file, self.file_size, *handle, self.verify_checksums)?;
                Block::new(data).map(Some)
            }
            None => Ok(None),
        }
    }
}

/// Read a block and its trailer, verify it and undo compression.
fn read_block(file: &mut File, file_size: u64, handle: BlockHandle, verify_checksums: bool) -> Result<Bytes> {
    let end = handle
        .offset
        .checked_add(handle.size)
        .and_then(|end| end.checked_add(BLOCK_TRAILER_SIZE as u64));
    if end.map_or(true, |end| end > file_size) {
        return Err(IdbError::Corruption(format!(
            "block at {} of {} bytes runs past end of file",
            handle.offset, handle.size
        )));
    }

    let n = handle.size as usize;
    let mut buf = vec![0u8; n + BLOCK_TRAILER_SIZE];
    file.seek(SeekFrom::Start(handle.offset))?;
    file.read_exact(&mut buf)?;

    let compression = buf[n];
    if verify_checksums {
        let stored = u32::from_le_bytes([buf[n + 1], buf[n + 2], buf[n + 3], buf[n + 4]]);
        if crc::unmask(stored) != crc32c::crc32c(&buf[..n + 1]) {
            return Err(IdbError::Corruption(format!(
                "block checksum mismatch at offset {}",
                handle.offset
            )));
        }
    }
    buf.truncate(n);

    match compression {
        NO_COMPRESSION => Ok(Bytes::from(buf)),
        SNAPPY_COMPRESSION => snap::raw::Decoder::new()
            .decompress_vec(&buf)
            .map(Bytes::from)
            .map_err(|e| IdbError::Corruption(format!("snappy block at offset {}: {e}", handle.offset))),
        other => Err(IdbError::Corruption(format!(
            "unknown block compression type {other}"
        ))),
    }
}
