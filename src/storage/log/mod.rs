//! Log Module
//!
//! Write-ahead logs and the manifest share one physical format.
//!
//! ## Physical Format
//! ```text
//! ┌──────────────────────── 32 KiB block ────────────────────────┐
//! │ Record │ Record │ ... │ Record │ Trailer (< 7 bytes, zeroed) │
//! └──────────────────────────────────────────────────────────────┘
//!
//! Record:
//! ┌──────────────┬─────────────┬──────────┬──────────────────────┐
//! │ Masked CRC   │ Length      │ Type (1) │ Payload              │
//! │ u32 LE (4)   │ u16 LE (2)  │ 1..=4    │ (Length bytes)       │
//! └──────────────┴─────────────┴──────────┴──────────────────────┘
//! Type: 1 = FULL, 2 = FIRST, 3 = MIDDLE, 4 = LAST
//! ```
//!
//! ## Write Batch (payload of a write-ahead log record)
//! ```text
//! ┌───────────────┬────────────┬─────────────────────────────────┐
//! │ Sequence u64  │ Count u32  │ Records                         │
//! └───────────────┴────────────┴─────────────────────────────────┘
//! Record: 0x01 varint32-len key, varint32-len value  (put)
//!         0x00 varint32-len key                      (delete)
//! ```

mod batch;
mod reader;

pub use batch::decode_batch;
pub use reader::{LogReader, LogRecords};

/// Physical block size
pub const BLOCK_SIZE: usize = 32 * 1024;

/// Record header: checksum (4) + length (2) + type (1)
pub const HEADER_SIZE: usize = 7;

/// Fragment type of a physical record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordType {
    /// Preallocated, zero-filled space
    Zero = 0,
    Full = 1,
    First = 2,
    Middle = 3,
    Last = 4,
}

impl RecordType {
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(RecordType::Zero),
            1 => Some(RecordType::Full),
            2 => Some(RecordType::First),
            3 => Some(RecordType::Middle),
            4 => Some(RecordType::Last),
            _ => None,
        }
    }
}
