//! The `[from, to]` UTC range requested from the API for one run.

use std::fmt;

use chrono::{DateTime, TimeDelta, Timelike, Utc};
use serde::Serialize;
use thiserror::Error;

/// Length of one settlement slot, in minutes.
pub const SLOT_MINUTES: u32 = 30;

/// Widest span a single window may cover.
pub const MAX_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WindowError {
    #[error("window start {from} is after window end {to}")]
    Inverted {
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    },

    #[error("window spans more than {max_days} days")]
    TooWide { max_days: i64 },

    #[error("{0} is not on a 30-minute boundary")]
    Unaligned(DateTime<Utc>),
}

/// Returns true when `dt` sits exactly on a half-hour boundary.
pub fn is_slot_aligned(dt: DateTime<Utc>) -> bool {
    dt.minute() % SLOT_MINUTES == 0 && dt.second() == 0 && dt.nanosecond() == 0
}

/// An immutable, slot-aligned UTC window.
///
/// Invariants, checked by [`TimeWindow::new`]:
/// - `from <= to`
/// - `to - from <= 7 days`
/// - both bounds aligned to a 30-minute boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeWindow {
    from: DateTime<Utc>,
    to: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<Self, WindowError> {
        if from > to {
            return Err(WindowError::Inverted { from, to });
        }
        if to - from > TimeDelta::days(MAX_WINDOW_DAYS) {
            return Err(WindowError::TooWide {
                max_days: MAX_WINDOW_DAYS,
            });
        }
        for bound in [from, to] {
            if !is_slot_aligned(bound) {
                return Err(WindowError::Unaligned(bound));
            }
        }
        Ok(Self { from, to })
    }

    /// A degenerate window covering a single slot start (`from == to`).
    pub fn instant(at: DateTime<Utc>) -> Result<Self, WindowError> {
        Self::new(at, at)
    }

    pub fn from(&self) -> DateTime<Utc> {
        self.from
    }

    pub fn to(&self) -> DateTime<Utc> {
        self.to
    }

    pub fn span(&self) -> TimeDelta {
        self.to - self.from
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]",
            self.from.format("%Y-%m-%dT%H:%MZ"),
            self.to.format("%Y-%m-%dT%H:%MZ")
        )
    }
}
