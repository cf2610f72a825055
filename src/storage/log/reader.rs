//! Log Reader
//!
//! Reassembles records from the block-structured log format.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IdbError, Result};
use crate::storage::crc;

use super::{RecordType, BLOCK_SIZE, HEADER_SIZE};

/// Reads records from a LevelDB log file (write-ahead log or manifest).
pub struct LogReader {
    /// Source path, for diagnostics
    path: PathBuf,
    /// Whole file contents
    data: Vec<u8>,
    /// Current read offset
    pos: usize,
    verify_checksums: bool,
}

impl LogReader {
    /// Open a log file for reading. Checksums are verified.
    pub fn open(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        Ok(Self::from_bytes(path, data))
    }

    /// Read records from an in-memory copy of a log file.
    pub fn from_bytes(path: &Path, data: Vec<u8>) -> Self {
        Self {
            path: path.to_path_buf(),
            data,
            pos: 0,
            verify_checksums: true,
        }
    }

    /// Disable checksum verification.
    pub fn without_checksums(mut self) -> Self {
        self.verify_checksums = false;
        self
    }

    fn corruption(&self, at: usize, what: &str) -> IdbError {
        IdbError::Corruption(format!("{} at offset {}: {}", self.path.display(), at, what))
    }

    /// Read the next complete record.
    ///
    /// A record cut short at the end of the file ends the log; it is what a
    /// crash in the middle of an append leaves behind.
    pub fn next_record(&mut self) -> Result<Option<Vec<u8>>> {
        let mut scratch: Option<Vec<u8>> = None;

        loop {
            let left_in_block = BLOCK_SIZE - self.pos % BLOCK_SIZE;
            if left_in_block < HEADER_SIZE {
                // Trailer too small for a header: zero filled, skip it.
                self.pos += left_in_block;
                continue;
            }

            if self.pos + HEADER_SIZE > self.data.len() {
                if self.pos < self.data.len() || scratch.is_some() {
                    tracing::warn!(path = %self.path.display(), offset = self.pos, "truncated log tail ignored");
                }
                self.pos = self.data.len();
                return Ok(None);
            }

            let start = self.pos;
            let header = &self.data[start..start + HEADER_SIZE];
            let stored_crc = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
            let length = usize::from(u16::from_le_bytes([header[4], header[5]]));
            let type_byte = header[6];

            if type_byte == RecordType::Zero as u8 && length == 0 {
                // Preallocated region: nothing more in this block.
                self.pos += left_in_block;
                continue;
            }

            let end = start + HEADER_SIZE + length;
            if end > self.data.len() {
                tracing::warn!(path = %self.path.display(), offset = start, "truncated log record ignored");
                self.pos = self.data.len();
                return Ok(None);
            }
            if HEADER_SIZE + length > left_in_block {
                return Err(self.corruption(start, "record crosses block boundary"));
            }

            let payload = &self.data[start + HEADER_SIZE..end];
            if self.verify_checksums && crc::unmask(stored_crc) != crc::typed_crc(type_byte, payload) {
                return Err(self.corruption(start, "checksum mismatch"));
            }
            self.pos = end;

            match RecordType::from_byte(type_byte) {
                Some(RecordType::Full) => {
                    if scratch.is_some() {
                        return Err(self.corruption(start, "full record inside fragmented record"));
                    }
                    return Ok(Some(payload.to_vec()));
                }
                Some(RecordType::First) => {
                    if scratch.is_some() {
                        return Err(self.corruption(start, "first fragment inside fragmented record"));
                    }
                    scratch = Some(payload.to_vec());
                }
                Some(RecordType::Middle) => match scratch.as_mut() {
                    Some(buf) => buf.extend_from_slice(payload),
                    None => return Err(self.corruption(start, "middle fragment without first")),
                },
                Some(RecordType::Last) => match scratch.take() {
                    Some(mut buf) => {
                        buf.extend_from_slice(payload);
                        return Ok(Some(buf));
                    }
                    None => return Err(self.corruption(start, "last fragment without first")),
                },
                Some(RecordType::Zero) | None => {
                    return Err(self.corruption(start, &format!("unknown record type {type_byte}")));
                }
            }
        }
    }

    /// Iterate over all records.
    pub fn records(self) -> LogRecords {
        LogRecords {
            reader: self,
            done: false,
        }
    }
}

/// Iterator over log records
pub struct LogRecords {
    reader: LogReader,
    done: bool,
}

impl Iterator for LogRecords {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.reader.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
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
