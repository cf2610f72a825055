//! Tests for table files
//!
//! These tests verify:
//! - Footer and index parsing
//! - Iteration across many data blocks
//! - Snappy-compressed blocks
//! - Block checksum verification

use bytes::Bytes;
use idbscan::storage::sstable::SSTableReader;
use idbscan::storage::ValueType;
use idbscan::IdbError;
use tempfile::TempDir;

use crate::common::{internal_key, TableWriter};

// =============================================================================
// Helper Functions
// =============================================================================

fn write_table(dir: &TempDir, count: usize, compress: bool) -> std::path::PathBuf {
    let mut writer = TableWriter::new(128, compress);
    for i in 0..count {
        let key = format!("key{:05}", i);
        let value = format!("value{}", i).repeat(3);
        writer.add(&internal_key(key.as_bytes(), i as u64 + 1, ValueType::Value), value.as_bytes());
    }
    let path = dir.path().join("000005.ldb");
    std::fs::write(&path, writer.finish()).unwrap();
    path
}

// =============================================================================
// Reader Tests
// =============================================================================

#[test]
fn test_iterates_all_entries_in_order() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, 200, false);

    let reader = SSTableReader::open(&path, true).unwrap();
    assert!(reader.block_count() > 1);

    let entries: Vec<_> = reader.iter().unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(entries.len(), 200);
    assert_eq!(&entries[0].user_key[..], b"key00000");
    assert_eq!(&entries[199].user_key[..], b"key00199");
    assert_eq!(entries[42].sequence, 43);
    assert_eq!(entries[42].value, Bytes::from("value42value42value42"));
}

#[test]
fn test_snappy_blocks() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, 100, true);

    let reader = SSTableReader::open(&path, true).unwrap();
    let entries: Vec<_> = reader.iter().unwrap().collect::<Result<_, _>>().unwrap();
    assert_eq!(entries.len(), 100);
    assert_eq!(&entries[99].user_key[..], b"key00099");
}

#[test]
fn test_bad_magic_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, 10, false);
    let mut data = std::fs::read(&path).unwrap();
    let last = data.len() - 1;
    data[last] ^= 0x01;
    std::fs::write(&path, data).unwrap();

    assert!(matches!(SSTableReader::open(&path, false), Err(IdbError::Corruption(_))));
}

#[test]
fn test_short_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("000009.ldb");
    std::fs::write(&path, b"tiny").unwrap();

    assert!(SSTableReader::open(&path, false).is_err());
}

#[test]
fn test_block_checksum_verified_on_request() {
    let temp = TempDir::new().unwrap();
    let path = write_table(&temp, 50, false);
    let mut data = std::fs::read(&path).unwrap();
    // Damage a key byte of the first data block
    data[4] ^= 0x20;
    std::fs::write(&path, data).unwrap();

    let reader = SSTableReader::open(&path, true).unwrap();
    let result: Result<Vec<_>, _> = reader.iter().unwrap().collect();
    assert!(matches!(result, Err(IdbError::Corruption(_))));
}
