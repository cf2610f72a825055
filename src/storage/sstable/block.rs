//! Data and index blocks

use bytes::Bytes;

use crate::codec::{varint, Cursor};
use crate::error::{IdbError, Result};

/// A decompressed block with its restart array located.
#[derive(Debug, Clone)]
pub struct Block {
    data: Bytes,
    /// Offset of the restart array; entries end here
    restarts_offset: usize,
}

impl Block {
    pub fn new(data: Bytes) -> Result<Self> {
        if data.len() < 4 {
            return Err(IdbError::Corruption(format!(
                "block of {} bytes has no restart count",
                data.len()
            )));
        }
        let tail = data.len() - 4;
        let num_restarts =
            u32::from_le_bytes([data[tail], data[tail + 1], data[tail + 2], data[tail + 3]]) as usize;
        if num_restarts > tail / 4 {
            return Err(IdbError::Corruption(format!(
                "block claims {num_restarts} restarts in {} bytes",
                data.len()
            )));
        }
        Ok(Self {
            restarts_offset: tail - num_restarts * 4,
            data,
        })
    }

    /// Entries in stored order.
    pub fn iter(&self) -> BlockIter {
        BlockIter {
            data: self.data.clone(),
            pos: 0,
            end: self.restarts_offset,
            key: Vec::new(),
        }
    }
}

/// Iterator over the entries of a block.
///
/// Keys are rebuilt from their prefix-compressed deltas; values are
/// zero-copy slices of the block.
pub struct BlockIter {
    data: Bytes,
    pos: usize,
    end: usize,
    key: Vec<u8>,
}

impl BlockIter {
    fn read_entry(&mut self) -> Result<(Vec<u8>, Bytes)> {
        let mut cursor = Cursor::new(&self.data[self.pos..self.end]);
        let shared = varint::decode_u32(&mut cursor)? as usize;
        let non_shared = varint::decode_u32(&mut cursor)? as usize;
        let value_len = varint::decode_u32(&mut cursor)? as usize;

        if shared > self.key.len() {
            return Err(IdbError::Corruption(format!(
                "entry shares {shared} bytes of a {}-byte key",
                self.key.len()
            )));
        }
        let delta = cursor.read_exact(non_shared)?;
        self.key.truncate(shared);
        self.key.extend_from_slice(delta);

        let value_start = self.pos + cursor.pos();
        cursor.skip(value_len)?;
        let value = self.data.slice(value_start..value_start + value_len);
        self.pos += cursor.pos();

        Ok((self.key.clone(), value))
    }
}

impl Iterator for BlockIter {
    /// (internal key, value)
    type Item = Result<(Vec<u8>, Bytes)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }
        match self.read_entry() {
            Ok(entry) => Some(Ok(entry)),
            Err(e) => {
                self.pos = self.end;
                Some(Err(IdbError::Corruption(format!("bad block entry: {e}"))))
            }
        }
    }
}
