//! Timestamp conversion
//!
//! Integer timestamps count fixed-size ticks from an epoch. Conversion is
//! defined in absolute UTC time and never consults the local time zone.

use std::fmt;
use std::str::FromStr;

use time::macros::format_description;
use time::OffsetDateTime;

use crate::error::IdbError;

const NANOS_PER_SECOND: i128 = 1_000_000_000;

/// Tick count to calendar time: `ticks / ticks_per_second - epoch_offset_secs`
/// seconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimestampFormula {
    pub ticks_per_second: i64,
    /// Seconds from the tick epoch to 1970-01-01 UTC
    pub epoch_offset_secs: i64,
}

impl TimestampFormula {
    /// 100 ns ticks since 0001-01-01 UTC
    pub const DOTNET_TICKS: Self = Self {
        ticks_per_second: 10_000_000,
        epoch_offset_secs: 62_135_596_800,
    };

    /// Milliseconds since 1970-01-01 UTC
    pub const UNIX_MILLIS: Self = Self {
        ticks_per_second: 1_000,
        epoch_offset_secs: 0,
    };

    /// Convert a tick count; `None` when it falls outside the calendar range.
    pub fn to_utc(&self, ticks: i128) -> Option<OffsetDateTime> {
        let per_second = i128::from(self.ticks_per_second);
        if per_second <= 0 {
            return None;
        }
        let seconds = ticks.div_euclid(per_second) - i128::from(self.epoch_offset_secs);
        let sub_nanos = ticks.rem_euclid(per_second) * NANOS_PER_SECOND / per_second;
        let nanos = seconds.checked_mul(NANOS_PER_SECOND)?.checked_add(sub_nanos)?;
        OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }

    /// `YYYY-MM-DD hh:mm:ss` in UTC, or the raw integer when out of range.
    pub fn format(&self, ticks: i128) -> String {
        let layout = format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
        self.to_utc(ticks)
            .and_then(|at| at.format(layout).ok())
            .unwrap_or_else(|| ticks.to_string())
    }
}

impl Default for TimestampFormula {
    fn default() -> Self {
        Self::DOTNET_TICKS
    }
}

impl FromStr for TimestampFormula {
    type Err = IdbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dotnet-ticks" => Ok(Self::DOTNET_TICKS),
            "unix-millis" => Ok(Self::UNIX_MILLIS),
            other => Err(IdbError::Config(format!("unknown timestamp formula {other:?}"))),
        }
    }
}

impl fmt::Display for TimestampFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::DOTNET_TICKS => f.write_str("dotnet-ticks"),
            Self::UNIX_MILLIS => f.write_str("unix-millis"),
            Self { ticks_per_second, epoch_offset_secs } => {
                write!(f, "ticks/{ticks_per_second}-{epoch_offset_secs}s")
            }
        }
    }
}
