//! Store
//!
//! Read-only view of a LevelDB directory.
//!
//! ## Responsibilities
//! - Resolve `CURRENT` → manifest → live table files
//! - Replay live write-ahead logs into a memtable
//! - Merge everything into one forward iterator over the newest versions

use std::fs;
use std::path::{Path, PathBuf};

use bytes::Bytes;

use crate::error::{IdbError, Result};
use crate::key::KeyComparator;

use super::manifest::Manifest;
use super::memtable::MemTable;
use super::merge::{EntrySource, LatestVersions, MergingIterator};
use super::sstable::{table_path, SSTableReader};

/// Options for opening a store
#[derive(Debug, Clone, Default)]
pub struct StoreOptions {
    /// Verify the checksum of every table block read.
    /// Log records are always verified.
    pub verify_checksums: bool,
}

/// One live key-value pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord {
    pub key: Bytes,
    pub value: Bytes,
}

/// Read-only store opened with a key comparator
pub struct Store<C: KeyComparator> {
    /// Store directory
    path: PathBuf,
    comparator: C,
    manifest: Manifest,
    /// Open table readers, by level then file number
    tables: Vec<SSTableReader>,
    memtable: MemTable,
}

impl<C: KeyComparator> Store<C> {
    /// Open the store at `path`.
    ///
    /// On open:
    /// 1. Read `CURRENT` and replay the manifest it names
    /// 2. Check the manifest's comparator against `comparator`
    /// 3. Open a reader for each live table (loads indexes into RAM)
    /// 4. Replay live write-ahead logs
    pub fn open(path: impl AsRef<Path>, comparator: C, options: &StoreOptions) -> Result<Self> {
        let path = path.as_ref();
        Self::open_inner(path, comparator, options).map_err(|e| IdbError::open(path, e))
    }

    fn open_inner(path: &Path, comparator: C, options: &StoreOptions) -> Result<Self> {
        if !path.is_dir() {
            return Err(IdbError::Open {
                path: path.to_path_buf(),
                reason: "not a directory".into(),
            });
        }

        let manifest = Manifest::load(path)?;
        match manifest.comparator.as_deref() {
            Some(found) if found != comparator.name() => {
                return Err(IdbError::ComparatorMismatch {
                    expected: comparator.name().to_string(),
                    found: found.to_string(),
                });
            }
            Some(_) => {}
            None => {
                tracing::warn!(path = %path.display(), "manifest names no comparator");
            }
        }

        let mut tables = Vec::new();
        for meta in manifest.live_files() {
            let table = table_path(path, meta.number)?;
            tables.push(SSTableReader::open(&table, options.verify_checksums)?);
        }

        let logs = live_logs(path, &manifest)?;
        let memtable = MemTable::from_logs(&logs, &comparator)?;

        tracing::info!(
            path = %path.display(),
            tables = tables.len(),
            logs = logs.len(),
            memtable_entries = memtable.len(),
            "opened store"
        );

        Ok(Self {
            path: path.to_path_buf(),
            comparator,
            manifest,
            tables,
            memtable,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// Number of live table files
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// Number of entries replayed from write-ahead logs
    pub fn memtable_len(&self) -> usize {
        self.memtable.len()
    }

    /// Last sequence recorded by the manifest, or replayed from the logs
    pub fn last_sequence(&self) -> u64 {
        self.memtable
            .max_sequence()
            .map_or(self.manifest.last_sequence, |s| s.max(self.manifest.last_sequence))
    }

    /// Forward iterator over every live key in comparator order.
    ///
    /// Each call starts a fresh pass.
    pub fn iter(&self) -> Result<StoreIter<'_, C>> {
        let mut sources: Vec<EntrySource<'_>> = Vec::with_capacity(self.tables.len() + 1);
        sources.push(Box::new(self.memtable.iter().cloned().map(Ok::<_, IdbError>)));
        for table in &self.tables {
            sources.push(Box::new(table.iter().map_err(IdbError::iteration)?));
        }
        Ok(StoreIter {
            inner: LatestVersions::new(MergingIterator::new(&self.comparator, sources)),
        })
    }
}

/// Lazy iterator over a store's live records
pub struct StoreIter<'a, C: KeyComparator> {
    inner: LatestVersions<'a, C>,
}

impl<'a, C: KeyComparator> Iterator for StoreIter<'a, C> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|item| {
            item.map(|(key, value)| RawRecord { key, value })
                .map_err(IdbError::iteration)
        })
    }
}

/// Write-ahead logs still holding entries, oldest first.
fn live_logs(db_dir: &Path, manifest: &Manifest) -> Result<Vec<PathBuf>> {
    let mut logs: Vec<(u64, PathBuf)> = Vec::new();

    for entry in fs::read_dir(db_dir)? {
        let entry = entry?;
        let file_path = entry.path();

        if !file_path.is_file() {
            continue;
        }
        let number = file_path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.strip_suffix(".log"))
            .and_then(|stem| stem.parse::<u64>().ok());

        if let Some(number) = number {
            if manifest.is_live_log(number) {
                logs.push((number, file_path));
            }
        }
    }

    logs.sort_by_key(|(number, _)| *number);
    Ok(logs.into_iter().map(|(_, path)| path).collect())
}
