//! MemTable
//!
//! Entries replayed from the live write-ahead logs, held sorted in memory.
//! These are writes that never reached a table file.

use std::path::Path;

use crate::error::Result;
use crate::key::KeyComparator;

use super::internal_key::{compare_entries, InternalEntry};
use super::log::{decode_batch, LogReader};

/// Sorted, read-only view of unflushed writes
#[derive(Debug, Default)]
pub struct MemTable {
    entries: Vec<InternalEntry>,
}

impl MemTable {
    /// Replay the given log files, in order.
    pub fn from_logs<C: KeyComparator + ?Sized>(logs: &[impl AsRef<Path>], comparator: &C) -> Result<Self> {
        let mut entries = Vec::new();
        for path in logs {
            let path = path.as_ref();
            let before = entries.len();
            for record in LogReader::open(path)?.records() {
                entries.extend(decode_batch(&record?)?);
            }
            tracing::debug!(log = %path.display(), entries = entries.len() - before, "replayed log");
        }
        Ok(Self::from_entries(entries, comparator))
    }

    /// Build from unordered entries.
    pub fn from_entries<C: KeyComparator + ?Sized>(mut entries: Vec<InternalEntry>, comparator: &C) -> Self {
        entries.sort_by(|a, b| compare_entries(comparator, a, b));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest sequence number replayed
    pub fn max_sequence(&self) -> Option<u64> {
        self.entries.iter().map(|e| e.sequence).max()
    }

    /// Entries in internal key order
    pub fn iter(&self) -> impl Iterator<Item = &InternalEntry> {
        self.entries.iter()
    }
}
