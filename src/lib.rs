//! # idbscan
//!
//! A read-only scanner that recovers contacts and messages from a Chromium
//! IndexedDB LevelDB store:
//! - LevelDB reader (manifest, write-ahead logs, Snappy tables)
//! - IndexedDB key ordering (`idb_cmp1`)
//! - Tagged binary value decoder
//! - Debug, message, CSV and JSON projections
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       CLI (idbscan)                         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Scanner                              │
//! │          (classify → strip → decode → project)              │
//! └──────────┬──────────────────────────────────┬───────────────┘
//!            │                                  │
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │     Storage     │                │      Codec      │
//!   │ (read-only LDB) │                │ (varint, value, │
//!   └────────┬────────┘                │   envelope)     │
//!            │                         └────────┬────────┘
//!            ▼                                  ▼
//!   ┌─────────────────┐                ┌─────────────────┐
//!   │       Key       │                │     Project     │
//!   │ (idb_cmp1, kind │                │ (debug, csv,    │
//!   │  classifier)    │                │  messages, json)│
//!   └─────────────────┘                └─────────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod key;
pub mod storage;
pub mod project;
pub mod scan;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{IdbError, Result};
pub use config::{KindFilter, ScanConfig, ScanConfigBuilder};
pub use codec::{decode_value, strip_envelope, Cursor, DecodeOptions, Value};
pub use key::{classify, IdbComparator, KeyComparator, RecordKind};
pub use project::{OutputMode, Projector, TimestampFormula};
pub use scan::{process_record, RecordOutcome, ScanStats, Scanner};
pub use storage::{RawRecord, Store, StoreOptions};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of idbscan
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
