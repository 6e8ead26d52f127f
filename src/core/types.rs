use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{GraphError, GraphResult};

pub const MILLIS_PER_SECOND: f64 = 1_000.0;
pub const ONE_DAY_MS: f64 = 86_400_000.0;
pub const ONE_YEAR_MS: f64 = 31_536_000_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    pub fn validate(self) -> GraphResult<Self> {
        if !self.is_valid() {
            return Err(GraphError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Visible time window. Either bound may be unknown while auto-fit is pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl TimeRange {
    #[must_use]
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    /// Builds a range from epoch milliseconds; out-of-range instants become unknown.
    #[must_use]
    pub fn from_millis(from_ms: i64, to_ms: i64) -> Self {
        Self {
            from: DateTime::<Utc>::from_timestamp_millis(from_ms),
            to: DateTime::<Utc>::from_timestamp_millis(to_ms),
        }
    }

    #[must_use]
    pub fn from_ms(self) -> Option<f64> {
        self.from.map(datetime_to_millis)
    }

    #[must_use]
    pub fn to_ms(self) -> Option<f64> {
        self.to.map(datetime_to_millis)
    }

    /// Both bounds in epoch milliseconds, when both are known.
    #[must_use]
    pub fn bounds_ms(self) -> Option<(f64, f64)> {
        Some((self.from_ms()?, self.to_ms()?))
    }
}

/// Timezone used for tick snapping and label rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DisplayTimezone {
    #[default]
    Utc,
    /// Fixed offset east of UTC, in seconds.
    FixedOffsetSeconds(i32),
}

impl DisplayTimezone {
    #[must_use]
    pub fn fixed_offset(self) -> FixedOffset {
        let utc = Utc.fix();
        match self {
            Self::Utc => utc,
            Self::FixedOffsetSeconds(seconds) => FixedOffset::east_opt(seconds).unwrap_or(utc),
        }
    }
}

#[must_use]
pub fn datetime_to_millis<Tz: chrono::TimeZone>(time: DateTime<Tz>) -> f64 {
    time.timestamp_millis() as f64
}

/// Converts epoch milliseconds to a zoned instant; non-finite or out-of-range values yield `None`.
#[must_use]
pub fn millis_to_datetime(millis: f64, timezone: DisplayTimezone) -> Option<DateTime<FixedOffset>> {
    if !millis.is_finite() {
        return None;
    }
    let utc = DateTime::<Utc>::from_timestamp_millis(millis.round() as i64)?;
    Some(utc.with_timezone(&timezone.fixed_offset()))
}
