//! Statistical suite: value ranges, known categories, slot alignment and
//! uniqueness. Records missing required fields are left to the completeness
//! suite and skipped here.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use generation_ingestor::models::{record::RawRecord, window::is_slot_aligned};
use serde_json::Value;

use crate::quality::{QualityIssue, QualityRules, SuiteResult, completeness::is_complete};

pub const SUITE: &str = "statistical";

/// Valid settlement periods; 50 covers the long clock-change day.
pub const SETTLEMENT_PERIODS: std::ops::RangeInclusive<u64> = 1..=50;

pub fn check(records: &[RawRecord], rules: &QualityRules) -> SuiteResult {
    let mut issues = Vec::new();
    let mut seen: HashMap<(String, DateTime<Utc>), usize> = HashMap::new();
    let mut evaluated = 0;

    for (i, rec) in records.iter().enumerate() {
        if !is_complete(rec) {
            continue;
        }
        evaluated += 1;

        match rec.get("quantity").and_then(Value::as_f64) {
            Some(q) if q.is_finite() && (0.0..=rules.max_quantity).contains(&q) => {}
            Some(q) => issues.push(QualityIssue::record(
                "quantity_range",
                i,
                format!("quantity {q} outside [0, {}]", rules.max_quantity),
            )),
            None => issues.push(QualityIssue::record(
                "quantity_range",
                i,
                "quantity is not a number",
            )),
        }

        let psr_type = match rec.get("psrType") {
            Some(Value::String(s)) if rules.psr_types.iter().any(|t| t == s) => Some(s.clone()),
            Some(Value::String(s)) => {
                issues.push(QualityIssue::record(
                    "psr_type_known",
                    i,
                    format!("unknown psrType `{s}`"),
                ));
                Some(s.clone())
            }
            _ => {
                issues.push(QualityIssue::record(
                    "psr_type_known",
                    i,
                    "psrType is not a string",
                ));
                None
            }
        };

        let start_time = match rec.get("startTime") {
            Some(Value::String(s)) => match DateTime::parse_from_rfc3339(s) {
                Ok(dt) => {
                    let dt = dt.with_timezone(&Utc);
                    if !is_slot_aligned(dt) {
                        issues.push(QualityIssue::record(
                            "start_time_aligned",
                            i,
                            format!("startTime {s} is not on a 30-minute boundary"),
                        ));
                    }
                    Some(dt)
                }
                Err(_) => {
                    issues.push(QualityIssue::record(
                        "start_time_aligned",
                        i,
                        format!("startTime `{s}` is not a timestamp"),
                    ));
                    None
                }
            },
            _ => {
                issues.push(QualityIssue::record(
                    "start_time_aligned",
                    i,
                    "startTime is not a string",
                ));
                None
            }
        };

        match rec.get("settlementPeriod") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_u64() {
                Some(p) if SETTLEMENT_PERIODS.contains(&p) => {}
                _ => issues.push(QualityIssue::record(
                    "settlement_period_range",
                    i,
                    format!("settlementPeriod {v} outside 1..=50"),
                )),
            },
        }

        check_optional_formats(rec, i, &mut issues);

        if let (Some(psr), Some(at)) = (psr_type, start_time) {
            if let Some(first) = seen.insert((psr, at), i) {
                issues.push(QualityIssue::record(
                    "unique_slot",
                    i,
                    format!("duplicates record {first}"),
                ));
            }
        }
    }

    SuiteResult::from_issues(SUITE, evaluated, issues)
}

/// Optional fields, when present, must have the shape the typed record expects.
fn check_optional_formats(rec: &RawRecord, i: usize, issues: &mut Vec<QualityIssue>) {
    let present = |field: &str| rec.get(field).filter(|v| !v.is_null());

    if let Some(v) = present("publishTime") {
        if !v.as_str().is_some_and(|s| DateTime::parse_from_rfc3339(s).is_ok()) {
            issues.push(QualityIssue::record(
                "optional_format",
                i,
                format!("publishTime {v} is not a timestamp"),
            ));
        }
    }
    if let Some(v) = present("businessType") {
        if !v.is_string() {
            issues.push(QualityIssue::record(
                "optional_format",
                i,
                format!("businessType {v} is not a string"),
            ));
        }
    }
    if let Some(v) = present("settlementDate") {
        if !v.as_str().is_some_and(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()) {
            issues.push(QualityIssue::record(
                "optional_format",
                i,
                format!("settlementDate {v} is not a YYYY-MM-DD date"),
            ));
        }
    }
}
