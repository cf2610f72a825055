//! Scan Module
//!
//! ## Pipeline
//! ```text
//! Store::iter() ──► classify ──► strip_envelope ──► decode ──► project ──► out
//!                      │              │               │           │
//!                   skipped        skipped          failed    suppressed
//!                (unclassified) (other shape)   (warn, go on)
//! ```

mod record;
mod scanner;

pub use record::{process_record, DecodedRecord, RecordOutcome, SkipReason};
pub use scanner::{ScanStats, Scanner};
