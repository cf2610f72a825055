//! Per-record processing
//!
//! classify → strip envelope → decode. Pure: no I/O, no logging.

use crate::codec::{decode_record_body, strip_envelope, Value};
use crate::config::ScanConfig;
use crate::error::IdbError;
use crate::key::{classify, RecordKind};

/// Why a record produced no tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Key matches no known record prefix
    Unclassified,
    /// Message-prefixed record with a different envelope layout
    UnrecognizedShape,
    /// Kind excluded by the configured filter
    KindFiltered,
}

/// A successfully decoded record
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub kind: RecordKind,
    pub record_id: u64,
    /// Message sub-type discriminator
    pub subtype: Option<u8>,
    pub value: Value,
    /// Bytes left after the root value
    pub trailing: usize,
}

/// Result of processing one record
#[derive(Debug)]
pub enum RecordOutcome {
    Decoded(DecodedRecord),
    Skipped(SkipReason),
    Failed {
        kind: RecordKind,
        error: IdbError,
    },
}

/// Process one raw (key, value) pair.
pub fn process_record(key: &[u8], value: &[u8], config: &ScanConfig) -> RecordOutcome {
    let Some(kind) = classify(key) else {
        return RecordOutcome::Skipped(SkipReason::Unclassified);
    };
    if !config.kind_filter.allows(kind) {
        return RecordOutcome::Skipped(SkipReason::KindFiltered);
    }

    let envelope = match strip_envelope(value, kind) {
        Ok(envelope) => envelope,
        Err(e) if e.is_skip() => return RecordOutcome::Skipped(SkipReason::UnrecognizedShape),
        Err(error) => return RecordOutcome::Failed { kind, error },
    };

    match decode_record_body(envelope.body, &config.decode_options()) {
        Ok((value, trailing)) => RecordOutcome::Decoded(DecodedRecord {
            kind,
            record_id: envelope.record_id,
            subtype: envelope.subtype,
            value,
            trailing,
        }),
        Err(error) => RecordOutcome::Failed { kind, error },
    }
}
