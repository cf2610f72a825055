//! Configuration for idbscan
//!
//! Centralized scan configuration with sensible defaults.

use std::fmt;
use std::str::FromStr;

use crate::codec::DecodeOptions;
use crate::error::{IdbError, Result};
use crate::key::RecordKind;
use crate::project::{OutputMode, Projector, TimestampFormula};
use crate::storage::StoreOptions;

/// Main configuration for a scan
#[derive(Debug, Clone)]
pub struct ScanConfig {
    // -------------------------------------------------------------------------
    // Store Configuration
    // -------------------------------------------------------------------------
    /// Verify the checksum of every table block read
    pub verify_checksums: bool,

    // -------------------------------------------------------------------------
    // Decoder Configuration
    // -------------------------------------------------------------------------
    /// Maximum nesting depth of a decoded value
    pub max_depth: u32,

    // -------------------------------------------------------------------------
    // Output Configuration
    // -------------------------------------------------------------------------
    /// How decoded records are rendered
    pub mode: OutputMode,

    /// Which record kinds are decoded
    pub kind_filter: KindFilter,

    /// Conversion of integer message timestamps
    pub timestamps: TimestampFormula,

    /// Print a header line before CSV records
    pub csv_header: bool,
}

/// Record kinds selected for decoding
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Contact,
    Message,
}

impl KindFilter {
    pub fn allows(&self, kind: RecordKind) -> bool {
        match self {
            KindFilter::All => true,
            KindFilter::Contact => kind == RecordKind::Contact,
            KindFilter::Message => kind == RecordKind::Message,
        }
    }
}

impl FromStr for KindFilter {
    type Err = IdbError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "all" => Ok(KindFilter::All),
            "contact" => Ok(KindFilter::Contact),
            "message" => Ok(KindFilter::Message),
            other => Err(IdbError::Config(format!("unknown record kind {other:?}"))),
        }
    }
}

impl fmt::Display for KindFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KindFilter::All => "all",
            KindFilter::Contact => "contact",
            KindFilter::Message => "message",
        })
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            verify_checksums: false,
            max_depth: DecodeOptions::default().max_depth,
            mode: OutputMode::Debug,
            kind_filter: KindFilter::All,
            timestamps: TimestampFormula::DOTNET_TICKS,
            csv_header: false,
        }
    }
}

impl ScanConfig {
    /// Create a new config builder
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Reject settings no scan can run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(IdbError::Config("max_depth must be at least 1".into()));
        }
        if self.timestamps.ticks_per_second <= 0 {
            return Err(IdbError::Config(format!(
                "ticks_per_second must be positive, got {}",
                self.timestamps.ticks_per_second
            )));
        }
        Ok(())
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            verify_checksums: self.verify_checksums,
        }
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            max_depth: self.max_depth,
        }
    }

    pub fn projector(&self) -> Projector {
        Projector::new(self.mode, self.timestamps)
    }
}

/// Builder for ScanConfig
#[derive(Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    /// Verify table block checksums while reading
    pub fn verify_checksums(mut self, verify: bool) -> Self {
        self.config.verify_checksums = verify;
        self
    }

    /// Set the maximum value nesting depth
    pub fn max_depth(mut self, depth: u32) -> Self {
        self.config.max_depth = depth;
        self
    }

    /// Set the output mode
    pub fn mode(mut self, mode: OutputMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Restrict decoding to one record kind
    pub fn kind_filter(mut self, filter: KindFilter) -> Self {
        self.config.kind_filter = filter;
        self
    }

    /// Set the timestamp conversion
    pub fn timestamps(mut self, formula: TimestampFormula) -> Self {
        self.config.timestamps = formula;
        self
    }

    /// Print a CSV header line
    pub fn csv_header(mut self, enabled: bool) -> Self {
        self.config.csv_header = enabled;
        self
    }

    pub fn build(self) -> ScanConfig {
        self.config
    }
}
