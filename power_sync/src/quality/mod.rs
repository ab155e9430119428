//! Two-stage data-quality gate run on raw API records before they are trusted.
//!
//! The gate runs a completeness suite and a statistical suite over the same
//! batch; it passes only if both pass. Validators never touch their input.
//! The [`QualityReport`] they return serializes to JSON so it can be kept as a
//! run artifact (see [`write_report`]).

pub mod completeness;
pub mod statistical;

use std::path::{Path, PathBuf};

use generation_ingestor::models::{record::RawRecord, window::TimeWindow};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// The psrType values the endpoint is known to publish.
pub const DEFAULT_PSR_TYPES: [&str; 3] = ["Solar", "Wind Onshore", "Wind Offshore"];

/// Upper bound on a single half-hourly quantity, in MW.
pub const DEFAULT_MAX_QUANTITY: f64 = 30_000.0;

/// Pass/fail contract for a batch of raw records.
pub trait DataValidator {
    fn validate(&self, records: &[RawRecord]) -> QualityReport;
}

/// One failed expectation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityIssue {
    /// Name of the failed check, e.g. `quantity_range`.
    pub check: &'static str,
    /// Offending record; `None` for batch-level checks.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_index: Option<usize>,
    pub description: String,
}

impl QualityIssue {
    pub(crate) fn record(check: &'static str, index: usize, description: impl Into<String>) -> Self {
        Self {
            check,
            record_index: Some(index),
            description: description.into(),
        }
    }

    pub(crate) fn batch(check: &'static str, description: impl Into<String>) -> Self {
        Self {
            check,
            record_index: None,
            description: description.into(),
        }
    }
}

/// Outcome of one suite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuiteResult {
    pub name: &'static str,
    pub passed: bool,
    /// Records the suite looked at.
    pub evaluated: usize,
    pub issues: Vec<QualityIssue>,
}

impl SuiteResult {
    pub(crate) fn from_issues(name: &'static str, evaluated: usize, issues: Vec<QualityIssue>) -> Self {
        Self {
            name,
            passed: issues.is_empty(),
            evaluated,
            issues,
        }
    }
}

/// Quantity summary for one psrType.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub passed: bool,
    pub record_count: usize,
    pub suites: Vec<SuiteResult>,
    /// Per-psrType quantity summary, in first-seen order.
    pub series: IndexMap<String, SeriesStats>,
}

impl QualityReport {
    pub fn new(record_count: usize, suites: Vec<SuiteResult>, series: IndexMap<String, SeriesStats>) -> Self {
        Self {
            passed: suites.iter().all(|s| s.passed),
            record_count,
            suites,
            series,
        }
    }

    pub fn issues(&self) -> impl Iterator<Item = &QualityIssue> {
        self.suites.iter().flat_map(|s| s.issues.iter())
    }

    /// One line per report, e.g. `completeness: 2 issue(s); statistical: passed`.
    pub fn summary(&self) -> String {
        self.suites
            .iter()
            .map(|s| {
                if s.passed {
                    format!("{}: passed", s.name)
                } else {
                    format!("{}: {} issue(s)", s.name, s.issues.len())
                }
            })
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Thresholds for the statistical suite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QualityRules {
    pub max_quantity: f64,
    pub psr_types: Vec<String>,
}

impl Default for QualityRules {
    fn default() -> Self {
        Self {
            max_quantity: DEFAULT_MAX_QUANTITY,
            psr_types: DEFAULT_PSR_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// The production validator: completeness plus statistical checks.
#[derive(Debug, Clone, Default)]
pub struct QualityGate {
    rules: QualityRules,
}

impl QualityGate {
    pub fn new(rules: QualityRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &QualityRules {
        &self.rules
    }
}

impl DataValidator for QualityGate {
    fn validate(&self, records: &[RawRecord]) -> QualityReport {
        let suites = vec![
            completeness::check(records),
            statistical::check(records, &self.rules),
        ];
        let report = QualityReport::new(records.len(), suites, series_stats(records));

        for issue in report.issues() {
            tracing::debug!(check = issue.check, index = ?issue.record_index, "{}", issue.description);
        }
        tracing::info!(
            records = records.len(),
            passed = report.passed,
            summary = %report.summary(),
            "quality gate finished"
        );
        report
    }
}

/// Quantity summary per psrType. Records without a string psrType or numeric
/// quantity are left out.
pub fn series_stats(records: &[RawRecord]) -> IndexMap<String, SeriesStats> {
    let mut acc: IndexMap<String, (usize, f64, f64, f64)> = IndexMap::new();
    for rec in records {
        let (Some(Value::String(psr)), Some(q)) =
            (rec.get("psrType"), rec.get("quantity").and_then(Value::as_f64))
        else {
            continue;
        };
        let entry = acc
            .entry(psr.clone())
            .or_insert((0, f64::INFINITY, f64::NEG_INFINITY, 0.0));
        entry.0 += 1;
        entry.1 = entry.1.min(q);
        entry.2 = entry.2.max(q);
        entry.3 += q;
    }

    acc.into_iter()
        .map(|(psr, (count, min, max, sum))| {
            let stats = SeriesStats {
                count,
                min,
                max,
                mean: sum / count as f64,
            };
            (psr, stats)
        })
        .collect()
}

/// `quality_<window start>_<run id>.json`
pub fn report_file_name(window: &TimeWindow, run_id: Uuid) -> String {
    format!("quality_{}_{}.json", window.from().format("%Y%m%dT%H%M"), run_id)
}

/// Writes `report` as pretty JSON under `dir`, creating the directory if needed.
pub async fn write_report(
    dir: &Path,
    window: &TimeWindow,
    run_id: Uuid,
    report: &QualityReport,
) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(report_file_name(window, run_id));
    let json = serde_json::to_vec_pretty(report)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}
