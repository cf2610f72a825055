//! Error types for idbscan
//!
//! Provides a unified error type for decoding, store access and scanning.
//!
//! ## Propagation policy
//! - Decode-level errors fail a single record; the scan moves on.
//! - `UnrecognizedRecordShape` is a skip, not a failure.
//! - `Open`, `ComparatorMismatch` and `Iteration` end the whole scan.

use std::path::PathBuf;

use thiserror::Error;

use crate::codec::Closer;

/// Result type alias using IdbError
pub type Result<T> = std::result::Result<T, IdbError>;

/// Unified error type for idbscan operations
#[derive(Debug, Error)]
pub enum IdbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Decode Errors (per record)
    // -------------------------------------------------------------------------
    /// The cursor ran out of bytes in the middle of a production.
    #[error("unexpected end of input at offset {at}: need {need} bytes, remaining {rem}")]
    UnexpectedEnd {
        /// Offset where the read was attempted.
        at: usize,
        /// Bytes the production needed.
        need: usize,
        /// Bytes still available.
        rem: usize,
    },

    #[error("varint at offset {at} exceeds {max_groups} groups")]
    VarintTooLong { at: usize, max_groups: usize },

    #[error("malformed tag 0x{tag:02x} at offset {at}")]
    MalformedTag { tag: u8, at: usize },

    #[error("expected {expected} closer at offset {at}, found {found} closer")]
    MismatchedClose {
        at: usize,
        expected: Closer,
        found: Closer,
    },

    #[error("closing marker at offset {at} where a value was expected")]
    StrayClose { at: usize },

    #[error("object key at offset {at} is not a string")]
    NonStringKey { at: usize },

    #[error("UTF-16 string at offset {at} has odd byte length {len}")]
    InvalidUtf16Length { at: usize, len: usize },

    #[error("value nesting exceeded max depth {max_depth}")]
    DepthExceeded { max_depth: u32 },

    // -------------------------------------------------------------------------
    // Envelope Errors (per record)
    // -------------------------------------------------------------------------
    #[error("malformed envelope at offset {at}: expected {expected}, found 0x{found:02x}")]
    MalformedEnvelope {
        at: usize,
        expected: &'static str,
        found: u8,
    },

    /// Not a failure: the record is not a message and is skipped.
    #[error("unrecognized record shape: marker 0x{found:02x}")]
    UnrecognizedRecordShape { found: u8 },

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("key prefix {field} {value} does not fit {max_bytes} bytes")]
    KeyPrefixRange {
        field: &'static str,
        value: i64,
        max_bytes: usize,
    },

    // -------------------------------------------------------------------------
    // Store Errors (fatal to the scan)
    // -------------------------------------------------------------------------
    #[error("cannot open store at {}: {reason}", path.display())]
    Open { path: PathBuf, reason: String },

    #[error("store was written with comparator {found:?}, opened with {expected:?}")]
    ComparatorMismatch { expected: String, found: String },

    #[error("store iteration failed: {0}")]
    Iteration(String),

    #[error("store corruption: {0}")]
    Corruption(String),

    // -------------------------------------------------------------------------
    // Output Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IdbError {
    /// Wrap a failure raised while opening the store at `path`.
    ///
    /// Errors that already describe an open failure pass through unchanged.
    pub fn open(path: impl Into<PathBuf>, err: IdbError) -> Self {
        match err {
            IdbError::Open { .. } | IdbError::ComparatorMismatch { .. } => err,
            other => IdbError::Open {
                path: path.into(),
                reason: other.to_string(),
            },
        }
    }

    /// Wrap a failure raised while advancing a store iterator.
    pub fn iteration(err: IdbError) -> Self {
        match err {
            IdbError::Iteration(_) => err,
            other => IdbError::Iteration(other.to_string()),
        }
    }

    /// True when the error ends the whole scan rather than a single record.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            IdbError::Io(_)
                | IdbError::Open { .. }
                | IdbError::ComparatorMismatch { .. }
                | IdbError::Iteration(_)
                | IdbError::Corruption(_)
                | IdbError::Config(_)
        )
    }

    /// True when the record should be skipped silently.
    pub fn is_skip(&self) -> bool {
        matches!(self, IdbError::UnrecognizedRecordShape { .. })
    }
}
