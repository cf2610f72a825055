//! SSTable Iterator
//!
//! Sequential iteration over all entries in a table, one block at a time.

use std::fs::File;

use crate::error::Result;
use crate::storage::internal_key::InternalEntry;

use super::block::BlockIter;
use super::reader::SSTableReader;

/// Iterator over table entries in internal key order
pub struct SSTableIterator<'a> {
    reader: &'a SSTableReader,
    file: File,
    /// Index of the next data block to load
    next_block: usize,
    current: Option<BlockIter>,
    done: bool,
}

impl<'a> SSTableIterator<'a> {
    pub(super) fn new(reader: &'a SSTableReader, file: File) -> Self {
        Self {
            reader,
            file,
            next_block: 0,
            current: None,
            done: false,
        }
    }

    fn advance(&mut self) -> Result<Option<InternalEntry>> {
        loop {
            if let Some(block) = self.current.as_mut() {
                match block.next() {
                    Some(entry) => {
                        let (key, value) = entry?;
                        return InternalEntry::from_encoded(&key, value).map(Some);
                    }
                    None => self.current = None,
                }
            }

            match self.reader.data_block(&mut self.file, self.next_block)? {
                Some(block) => {
                    self.next_block += 1;
                    self.current = Some(block.iter());
                }
                None => return Ok(None),
            }
        }
    }
}

impl<'a> Iterator for SSTableIterator<'a> {
    type Item = Result<InternalEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.advance() {
            Ok(Some(entry)) => Some(Ok(entry)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}
