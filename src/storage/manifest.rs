//! Manifest
//!
//! `CURRENT` names the live manifest; the manifest is a log of version
//! edits whose replay yields the set of live table files.
//!
//! ## Version Edit
//! ```text
//! repeated { varint32 tag, fields }
//!   1  comparator         lp-string
//!   2  log number         varint64
//!   3  next file number   varint64
//!   4  last sequence      varint64
//!   5  compact pointer    varint32 level, lp-bytes key
//!   6  deleted file       varint32 level, varint64 number
//!   7  new file           varint32 level, varint64 number, varint64 size,
//!                         lp-bytes smallest, lp-bytes largest
//!   9  prev log number    varint64
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::{varint, Cursor};
use crate::error::{IdbError, Result};

use super::log::LogReader;

const TAG_COMPARATOR: u32 = 1;
const TAG_LOG_NUMBER: u32 = 2;
const TAG_NEXT_FILE_NUMBER: u32 = 3;
const TAG_LAST_SEQUENCE: u32 = 4;
const TAG_COMPACT_POINTER: u32 = 5;
const TAG_DELETED_FILE: u32 = 6;
const TAG_NEW_FILE: u32 = 7;
const TAG_PREV_LOG_NUMBER: u32 = 9;

/// Number of levels in the tree
pub const NUM_LEVELS: u32 = 7;

/// A live table file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMeta {
    pub level: u32,
    pub number: u64,
    pub file_size: u64,
    /// Smallest internal key
    pub smallest: Vec<u8>,
    /// Largest internal key
    pub largest: Vec<u8>,
}

/// One decoded manifest record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionEdit {
    pub comparator: Option<String>,
    pub log_number: Option<u64>,
    pub prev_log_number: Option<u64>,
    pub next_file_number: Option<u64>,
    pub last_sequence: Option<u64>,
    pub deleted_files: Vec<(u32, u64)>,
    pub new_files: Vec<FileMeta>,
}

impl VersionEdit {
    pub fn decode(record: &[u8]) -> Result<Self> {
        let mut cursor = Cursor::new(record);
        let mut edit = VersionEdit::default();

        while !cursor.is_empty() {
            let tag = varint::decode_u32(&mut cursor).map_err(corrupt)?;
            match tag {
                TAG_COMPARATOR => {
                    let name = read_slice(&mut cursor)?;
                    edit.comparator = Some(String::from_utf8_lossy(name).into_owned());
                }
                TAG_LOG_NUMBER => edit.log_number = Some(read_u64(&mut cursor)?),
                TAG_NEXT_FILE_NUMBER => edit.next_file_number = Some(read_u64(&mut cursor)?),
                TAG_LAST_SEQUENCE => edit.last_sequence = Some(read_u64(&mut cursor)?),
                TAG_COMPACT_POINTER => {
                    read_level(&mut cursor)?;
                    read_slice(&mut cursor)?;
                }
                TAG_DELETED_FILE => {
                    let level = read_level(&mut cursor)?;
                    let number = read_u64(&mut cursor)?;
                    edit.deleted_files.push((level, number));
                }
                TAG_NEW_FILE => {
                    let level = read_level(&mut cursor)?;
                    let number = read_u64(&mut cursor)?;
                    let file_size = read_u64(&mut cursor)?;
                    let smallest = read_slice(&mut cursor)?.to_vec();
                    let largest = read_slice(&mut cursor)?.to_vec();
                    edit.new_files.push(FileMeta {
                        level,
                        number,
                        file_size,
                        smallest,
                        largest,
                    });
                }
                TAG_PREV_LOG_NUMBER => edit.prev_log_number = Some(read_u64(&mut cursor)?),
                other => {
                    return Err(IdbError::Corruption(format!(
                        "unknown version edit tag {other}"
                    )))
                }
            }
        }
        Ok(edit)
    }
}

fn corrupt(e: IdbError) -> IdbError {
    IdbError::Corruption(format!("version edit: {e}"))
}

fn read_u64(cursor: &mut Cursor<'_>) -> Result<u64> {
    varint::decode_u64(cursor).map_err(corrupt)
}

fn read_level(cursor: &mut Cursor<'_>) -> Result<u32> {
    let level = varint::decode_u32(cursor).map_err(corrupt)?;
    if level >= NUM_LEVELS {
        return Err(IdbError::Corruption(format!("level {level} out of range")));
    }
    Ok(level)
}

fn read_slice<'a>(cursor: &mut Cursor<'a>) -> Result<&'a [u8]> {
    let len = varint::decode_u32(cursor).map_err(corrupt)?;
    cursor.read_exact(len as usize).map_err(corrupt)
}

/// Store state after replaying every edit of the manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    pub comparator: Option<String>,
    pub log_number: u64,
    pub prev_log_number: u64,
    pub next_file_number: u64,
    pub last_sequence: u64,
    /// Live files keyed by (level, number)
    files: BTreeMap<(u32, u64), FileMeta>,
}

impl Manifest {
    /// Load the manifest named by `CURRENT` in `db_dir`.
    pub fn load(db_dir: &Path) -> Result<Self> {
        let manifest_path = read_current(db_dir)?;
        let mut manifest = Manifest::default();
        let mut edits = 0_usize;

        for record in LogReader::open(&manifest_path)?.records() {
            manifest.apply(VersionEdit::decode(&record?)?);
            edits += 1;
        }
        if edits == 0 {
            return Err(IdbError::Corruption(format!(
                "{} holds no version edits",
                manifest_path.display()
            )));
        }

        tracing::debug!(
            manifest = %manifest_path.display(),
            edits,
            files = manifest.files.len(),
            log_number = manifest.log_number,
            "replayed manifest"
        );
        Ok(manifest)
    }

    /// Fold one edit into the current state.
    pub fn apply(&mut self, edit: VersionEdit) {
        if let Some(name) = edit.comparator {
            self.comparator = Some(name);
        }
        if let Some(n) = edit.log_number {
            self.log_number = n;
        }
        if let Some(n) = edit.prev_log_number {
            self.prev_log_number = n;
        }
        if let Some(n) = edit.next_file_number {
            self.next_file_number = n;
        }
        if let Some(n) = edit.last_sequence {
            self.last_sequence = n;
        }
        for key in edit.deleted_files {
            self.files.remove(&key);
        }
        for file in edit.new_files {
            self.files.insert((file.level, file.number), file);
        }
    }

    /// Live table files, by level then file number.
    pub fn live_files(&self) -> impl Iterator<Item = &FileMeta> {
        self.files.values()
    }

    /// Whether a write-ahead log still holds entries not yet in a table.
    pub fn is_live_log(&self, number: u64) -> bool {
        number >= self.log_number || (number != 0 && number == self.prev_log_number)
    }
}

/// Resolve the manifest path named by `CURRENT`.
pub fn read_current(db_dir: &Path) -> Result<PathBuf> {
    let current = db_dir.join("CURRENT");
    let contents = fs::read_to_string(&current)?;
    let name = contents
        .strip_suffix('\n')
        .ok_or_else(|| IdbError::Corruption("CURRENT does not end with a newline".into()))?;

    if !name.starts_with("MANIFEST-") || name.contains('/') || name.contains('\\') {
        return Err(IdbError::Corruption(format!(
            "CURRENT names {name:?}, not a manifest"
        )));
    }
    Ok(db_dir.join(name))
}
