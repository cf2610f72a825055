//! Scanner
//!
//! Drives records through decoding and projection and writes the output.

use std::io::Write;
use std::path::Path;

use crate::config::ScanConfig;
use crate::error::Result;
use crate::key::IdbComparator;
use crate::project::{escape_bytes, Projector};
use crate::storage::{RawRecord, Store};

use super::record::{process_record, RecordOutcome};

/// Counters for one scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Records read from the store
    pub visited: u64,
    /// Records that produced output
    pub emitted: u64,
    /// Decoded records the projection chose not to render
    pub suppressed: u64,
    /// Unclassified, filtered or differently shaped records
    pub skipped: u64,
    /// Records that failed to decode or render
    pub failed: u64,
}

/// Runs one scan with a fixed configuration
pub struct Scanner {
    config: ScanConfig,
    projector: Projector,
}

impl Scanner {
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let projector = config.projector();
        Ok(Self { config, projector })
    }

    /// Process every record of `entries`, writing rendered output to `out`.
    ///
    /// Record-level failures are logged and counted. The first iteration
    /// error or output error ends the scan and is returned.
    pub fn run<I, W>(&self, entries: I, out: &mut W) -> Result<ScanStats>
    where
        I: IntoIterator<Item = Result<RawRecord>>,
        W: Write,
    {
        let mut stats = ScanStats::default();

        if let Some(preamble) = self.projector.preamble(self.config.csv_header) {
            out.write_all(preamble.as_bytes())?;
        }

        for entry in entries {
            let record = entry?;
            stats.visited += 1;

            match process_record(&record.key, &record.value, &self.config) {
                RecordOutcome::Decoded(decoded) => {
                    if decoded.trailing > 0 {
                        tracing::debug!(
                            key = %escape_bytes(&record.key),
                            trailing = decoded.trailing,
                            "bytes left after root value"
                        );
                    }
                    match self.projector.project(decoded.kind, &record.key, &decoded.value) {
                        Ok(Some(text)) => {
                            out.write_all(text.as_bytes())?;
                            stats.emitted += 1;
                        }
                        Ok(None) => stats.suppressed += 1,
                        Err(e) => {
                            tracing::warn!(key = %escape_bytes(&record.key), kind = %decoded.kind, error = %e, "failed to render record");
                            stats.failed += 1;
                        }
                    }
                }
                RecordOutcome::Skipped(reason) => {
                    tracing::debug!(key = %escape_bytes(&record.key), ?reason, "skipped record");
                    stats.skipped += 1;
                }
                RecordOutcome::Failed { kind, error } => {
                    tracing::warn!(key = %escape_bytes(&record.key), %kind, %error, "failed to decode record");
                    stats.failed += 1;
                }
            }
        }

        out.flush()?;
        tracing::info!(
            visited = stats.visited,
            emitted = stats.emitted,
            suppressed = stats.suppressed,
            skipped = stats.skipped,
            failed = stats.failed,
            "scan complete"
        );
        Ok(stats)
    }

    /// Open the store at `path` with the IndexedDB comparator and scan it.
    pub fn scan_path(&self, path: impl AsRef<Path>, out: &mut impl Write) -> Result<ScanStats> {
        let store = Store::open(path, IdbComparator, &self.config.store_options())?;
        let stats = self.run(store.iter()?, out);
        stats
    }
}
