//! Raw records to curve rows.

use generation_ingestor::models::record::{GenerationRecord, RawRecord};

use crate::{errors::ValidationError, models::CurveRow};

/// Source tag used in curve names when none is configured.
pub const DEFAULT_SOURCE_TAG: &str = "bmreports";

/// `"<source tag>, <psrType>, min30"`
pub fn curve_name(source_tag: &str, psr_type: &str) -> String {
    format!("{source_tag}, {psr_type}, min30")
}

/// Decodes records that passed the quality gate into typed form.
///
/// Fails on the first record that does not decode, naming its index.
pub fn decode_records(records: &[RawRecord]) -> Result<Vec<GenerationRecord>, ValidationError> {
    records
        .iter()
        .enumerate()
        .map(|(index, raw)| {
            GenerationRecord::from_raw(raw).map_err(|source| ValidationError::Decode { index, source })
        })
        .collect()
}

/// Projects records onto curve rows, one row per record, order preserved.
pub fn transform(source_tag: &str, records: &[GenerationRecord]) -> Vec<CurveRow> {
    records
        .iter()
        .map(|r| CurveRow {
            curve_name: curve_name(source_tag, &r.psr_type),
            curve_date: r.start_time,
            value: r.quantity,
        })
        .collect()
}
