//! Parameter resolution: turns a run trigger into a [`TimeWindow`].
//!
//! Scheduled runs ask for the single slot published most recently. The
//! publisher runs 90 minutes behind, so the slot is the logical time floored
//! to the half hour, minus 90 minutes. Manual runs pass explicit bounds that
//! are parsed, checked and then floored.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use generation_ingestor::models::window::{MAX_WINDOW_DAYS, SLOT_MINUTES, TimeWindow, is_slot_aligned};

use crate::errors::ParameterError;

/// How far the publisher trails real time.
pub const REPORTING_LAG_MINUTES: i64 = 90;

/// Naive layouts accepted for manual bounds, read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

/// What started a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunTrigger {
    /// Fired by the scheduler at `logical_date`.
    Scheduled { logical_date: DateTime<Utc> },
    /// Started by an operator with explicit bounds.
    Manual { date_from: String, date_to: String },
}

impl RunTrigger {
    pub fn scheduled(logical_date: DateTime<Utc>) -> Self {
        RunTrigger::Scheduled { logical_date }
    }

    pub fn manual(date_from: impl Into<String>, date_to: impl Into<String>) -> Self {
        RunTrigger::Manual {
            date_from: date_from.into(),
            date_to: date_to.into(),
        }
    }
}

/// Truncates `t` to the previous half-hour boundary, dropping seconds.
pub fn floored_to_30_min(t: DateTime<Utc>) -> DateTime<Utc> {
    let excess = TimeDelta::minutes(i64::from(t.minute() % SLOT_MINUTES))
        + TimeDelta::seconds(i64::from(t.second()))
        + TimeDelta::nanoseconds(i64::from(t.nanosecond()));
    t - excess
}

/// Slot start a scheduled run at `logical_date` should request.
pub fn date_param(logical_date: DateTime<Utc>) -> DateTime<Utc> {
    floored_to_30_min(logical_date) - TimeDelta::minutes(REPORTING_LAG_MINUTES)
}

/// Parses an operator-supplied timestamp.
///
/// RFC 3339 input keeps its offset and is converted to UTC; everything else is
/// taken as UTC wall time. A bare date means midnight.
pub fn parse_datetime(input: &str) -> Result<DateTime<Utc>, ParameterError> {
    let s = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ParameterError::Format {
        input: input.to_string(),
    })
}

/// Checks that both bounds already sit on :00 or :30.
///
/// Resolution floors unaligned input instead of rejecting it; this only
/// reports whether flooring will change anything.
pub fn validate_minutes(from: DateTime<Utc>, to: DateTime<Utc>) -> Result<(), ParameterError> {
    if is_slot_aligned(from) && is_slot_aligned(to) {
        Ok(())
    } else {
        Err(ParameterError::Minutes)
    }
}

/// Resolves the window a run should fetch.
pub fn resolve(trigger: &RunTrigger) -> Result<TimeWindow, ParameterError> {
    match trigger {
        RunTrigger::Scheduled { logical_date } => {
            Ok(TimeWindow::instant(date_param(*logical_date))?)
        }
        RunTrigger::Manual { date_from, date_to } => {
            let from = parse_datetime(date_from)?;
            let to = parse_datetime(date_to)?;

            if from > to {
                return Err(ParameterError::Order { from, to });
            }
            if to - from > TimeDelta::days(MAX_WINDOW_DAYS) {
                return Err(ParameterError::Range {
                    max_days: MAX_WINDOW_DAYS,
                });
            }
            if let Err(e) = validate_minutes(from, to) {
                tracing::debug!(%from, %to, "{e} Flooring to the half hour");
            }

            Ok(TimeWindow::new(floored_to_30_min(from), floored_to_30_min(to))?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn date_param_applies_floor_then_lag() {
        assert_eq!(date_param(utc(2024, 10, 16, 10, 45)), utc(2024, 10, 16, 9, 0));
        assert_eq!(date_param(utc(2024, 10, 16, 0, 10)), utc(2024, 10, 15, 22, 30));
    }

    #[test]
    fn floor_drops_seconds_and_subseconds() {
        let t = Utc.with_ymd_and_hms(2024, 10, 16, 14, 59, 59).unwrap()
            + TimeDelta::milliseconds(999);
        assert_eq!(floored_to_30_min(t), utc(2024, 10, 16, 14, 30));
    }

    #[test]
    fn scheduled_trigger_gives_degenerate_window() {
        let w = resolve(&RunTrigger::scheduled(utc(2024, 10, 16, 10, 45))).unwrap();
        assert_eq!(w.from(), utc(2024, 10, 16, 9, 0));
        assert_eq!(w.from(), w.to());
    }

    #[test]
    fn manual_trigger_accepts_common_layouts() {
        for (from, to) in [
            ("2024-10-10 00:00", "2024-10-12 00:00"),
            ("2024-10-10T00:00", "2024-10-12T00:00:00"),
            ("2024-10-10", "2024-10-12"),
            ("2024-10-10T00:00:00Z", "2024-10-12T01:00:00+01:00"),
        ] {
            let w = resolve(&RunTrigger::manual(from, to)).unwrap();
            assert_eq!(w.from(), utc(2024, 10, 10, 0, 0), "{from}");
            assert_eq!(w.to(), utc(2024, 10, 12, 0, 0), "{to}");
        }
    }

    #[test]
    fn manual_bounds_are_floored() {
        let w = resolve(&RunTrigger::manual("2024-10-10 00:17", "2024-10-10 10:45")).unwrap();
        assert_eq!(w.from(), utc(2024, 10, 10, 0, 0));
        assert_eq!(w.to(), utc(2024, 10, 10, 10, 30));
    }

    #[test]
    fn manual_trigger_rejections() {
        let err = resolve(&RunTrigger::manual("16/10/2024", "2024-10-12 00:00")).unwrap_err();
        assert_eq!(err.to_string(), "Expected format is 'YYYY-MM-DD HH:MM'.");

        let err = resolve(&RunTrigger::manual("2024-10-12 00:00", "2024-10-10 00:00")).unwrap_err();
        assert!(matches!(err, ParameterError::Order { .. }));
        assert_eq!(err.to_string(), "From date must be before or equal to To date.");

        let err = resolve(&RunTrigger::manual("2024-10-01 00:00", "2024-10-08 00:30")).unwrap_err();
        assert_eq!(err, ParameterError::Range { max_days: 7 });

        // exactly seven days is allowed
        assert!(resolve(&RunTrigger::manual("2024-10-01 00:00", "2024-10-08 00:00")).is_ok());
    }

    #[test]
    fn validate_minutes_flags_unaligned_bounds() {
        assert!(validate_minutes(utc(2024, 1, 1, 0, 0), utc(2024, 1, 1, 0, 30)).is_ok());
        assert_eq!(
            validate_minutes(utc(2024, 1, 1, 0, 0), utc(2024, 1, 1, 0, 15)),
            Err(ParameterError::Minutes)
        );
    }

    proptest! {
        #[test]
        fn floor_is_idempotent_and_close(secs in 0i64..4_102_444_800, nanos in 0u32..1_000_000_000) {
            let t = DateTime::from_timestamp(secs, nanos).unwrap();
            let f = floored_to_30_min(t);

            prop_assert_eq!(floored_to_30_min(f), f);
            prop_assert!(is_slot_aligned(f));
            prop_assert!(f <= t);
            prop_assert!(t - f < TimeDelta::minutes(30));
        }

        #[test]
        fn manual_windows_never_exceed_seven_days(
            start in 0i64..4_000_000_000,
            span in 0i64..(7 * 24 * 3600),
        ) {
            let from = DateTime::from_timestamp(start, 0).unwrap();
            let to = from + TimeDelta::seconds(span);
            let trigger = RunTrigger::manual(from.to_rfc3339(), to.to_rfc3339());

            let w = resolve(&trigger).unwrap();
            prop_assert!(w.span() <= TimeDelta::days(7));
            prop_assert!(w.from() <= w.to());
        }

        #[test]
        fn inverted_manual_bounds_are_rejected(
            start in 0i64..4_000_000_000,
            back in 1i64..(30 * 24 * 3600),
        ) {
            let to = DateTime::from_timestamp(start, 0).unwrap();
            let from = to + TimeDelta::seconds(back);
            let trigger = RunTrigger::manual(from.to_rfc3339(), to.to_rfc3339());

            prop_assert_eq!(resolve(&trigger), Err(ParameterError::Order { from, to }));
        }

        #[test]
        fn manual_spans_over_seven_days_are_rejected(
            start in 0i64..4_000_000_000,
            span in (7 * 24 * 3600 + 1)..(30i64 * 24 * 3600),
        ) {
            let from = DateTime::from_timestamp(start, 0).unwrap();
            let to = from + TimeDelta::seconds(span);
            let trigger = RunTrigger::manual(from.to_rfc3339(), to.to_rfc3339());

            prop_assert_eq!(resolve(&trigger), Err(ParameterError::Range { max_days: 7 }));
        }
    }
}
