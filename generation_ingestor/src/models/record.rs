//! Record shapes returned by the wind-and-solar generation endpoint.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One element of the API `data` array, untouched.
///
/// The fetcher hands these to the quality gate before anything is trusted, so
/// missing or null fields are still visible at that point.
pub type RawRecord = Map<String, Value>;

/// A typed generation measurement for one PSR type and settlement slot.
///
/// Only `psrType`, `quantity` and `startTime` are needed downstream; the rest
/// is kept for reporting. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRecord {
    /// Power-system-resource type, e.g. "Wind Onshore" or "Solar".
    pub psr_type: String,

    /// Generated quantity in MW. Non-negative.
    pub quantity: f64,

    /// Start of the settlement slot (UTC).
    pub start_time: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish_time: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_date: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settlement_period: Option<u32>,
}

impl GenerationRecord {
    /// Decodes a raw API object into a typed record.
    pub fn from_raw(raw: &RawRecord) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(raw.clone()))
    }
}
