//! Projection Module
//!
//! Turns a decoded value tree into output text.
//!
//! ## Output Modes
//! ```text
//! ┌──────────┬──────────────────────────────────────────────┐
//! │ debug    │ BEGIN <Kind> ----- / full tree / END <Kind>  │
//! │ messages │ BEGIN Message ----- / key=value lines / END  │
//! │ csv      │ timestamp,conversation,creator,type,content  │
//! │ json     │ {"kind":..,"key":..,"value":..} per line     │
//! └──────────┴──────────────────────────────────────────────┘
//! ```
//!
//! `messages` and `csv` only render messages of an accepted type; every
//! other record produces no output.

mod csv;
mod debug;
mod json;
mod message;
mod timestamp;

use std::fmt;
use std::str::FromStr;

pub use csv::{csv_record, message_csv_record, quote_field, CSV_HEADER};
pub use debug::{render_block, render_value};
pub use json::{escape_bytes, json_line};
pub use message::{extract_message, render_message_lines, MessageFields, ACCEPTED_MESSAGE_TYPES};
pub use timestamp::TimestampFormula;

use crate::codec::Value;
use crate::error::{IdbError, Result};
use crate::key::RecordKind;

/// How decoded records are rendered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// Full value tree per record
    #[default]
    Debug,
    /// Selected message fields as lines
    Messages,
    /// Selected message fields as one CSV record
    Csv,
    /// Full value tree as JSON, one record per line
    Json,
}

impl FromStr for OutputMode {
    type Err = IdbError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "debug" => Ok(OutputMode::Debug),
            "messages" => Ok(OutputMode::Messages),
            "csv" => Ok(OutputMode::Csv),
            "json" => Ok(OutputMode::Json),
            other => Err(IdbError::Config(format!("unknown output mode {other:?}"))),
        }
    }
}

impl fmt::Display for OutputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputMode::Debug => "debug",
            OutputMode::Messages => "messages",
            OutputMode::Csv => "csv",
            OutputMode::Json => "json",
        })
    }
}

/// Renders records for one output mode
#[derive(Debug, Clone, Copy)]
pub struct Projector {
    mode: OutputMode,
    timestamps: TimestampFormula,
}

impl Projector {
    pub fn new(mode: OutputMode, timestamps: TimestampFormula) -> Self {
        Self { mode, timestamps }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    /// Text printed once before the first record, if any.
    pub fn preamble(&self, csv_header: bool) -> Option<&'static str> {
        (self.mode == OutputMode::Csv && csv_header).then_some(CSV_HEADER)
    }

    /// Render one record; `Ok(None)` means the record is suppressed.
    pub fn project(&self, kind: RecordKind, key: &[u8], value: &Value) -> Result<Option<String>> {
        match self.mode {
            OutputMode::Debug => Ok(Some(render_block(kind.label(), value))),
            OutputMode::Json => json_line(kind, key, value).map(Some),
            OutputMode::Messages | OutputMode::Csv => {
                if kind != RecordKind::Message {
                    return Ok(None);
                }
                let Some(fields) = extract_message(value, &self.timestamps) else {
                    return Ok(None);
                };
                Ok(Some(match self.mode {
                    OutputMode::Csv => message_csv_record(&fields),
                    _ => render_message_lines(&fields),
                }))
            }
        }
    }
}

impl Default for Projector {
    fn default() -> Self {
        Self::new(OutputMode::default(), TimestampFormula::default())
    }
}
