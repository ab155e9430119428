//! Row types for [`crate::schema::power_data`].
//!
//! [`CurveRow`] is what the transformer produces and the destination accepts.
//! [`NewCurvePoint`] is the borrowed Insertable view Diesel writes; timestamps
//! are stored as naive UTC.

use chrono::{DateTime, NaiveDateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

use crate::schema::power_data;

/// One value of one curve at one half-hour slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurveRow {
    /// Composite series name, e.g. "bmreports, Wind Onshore, min30".
    pub curve_name: String,
    /// Slot start (UTC).
    pub curve_date: DateTime<Utc>,
    /// Measured quantity in MW.
    pub value: f64,
}

impl CurveRow {
    pub(crate) fn as_insertable(&self) -> NewCurvePoint<'_> {
        NewCurvePoint {
            curve_name: &self.curve_name,
            curve_date: self.curve_date.naive_utc(),
            value: self.value,
        }
    }
}

/// Insert payload for [`crate::schema::power_data`].
#[derive(Debug, Insertable)]
#[diesel(table_name = power_data, treat_none_as_default_value = false)]
pub struct NewCurvePoint<'a> {
    pub curve_name: &'a str,
    pub curve_date: NaiveDateTime,
    pub value: f64,
}
