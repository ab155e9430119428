//! Completeness suite: every expected field is present and nothing is an
//! unexpected null.

use generation_ingestor::models::record::RawRecord;
use serde_json::Value;

use crate::quality::{QualityIssue, SuiteResult};

pub const SUITE: &str = "completeness";

/// Fields every record must carry with a non-null value.
pub const REQUIRED_FIELDS: [&str; 3] = ["psrType", "quantity", "startTime"];

/// Fields that may be absent but must not be an explicit null.
pub const OPTIONAL_FIELDS: [&str; 4] = [
    "publishTime",
    "businessType",
    "settlementDate",
    "settlementPeriod",
];

/// True when all required fields are present and non-null.
pub fn is_complete(record: &RawRecord) -> bool {
    REQUIRED_FIELDS
        .iter()
        .all(|f| matches!(record.get(*f), Some(v) if !v.is_null()))
}

pub fn check(records: &[RawRecord]) -> SuiteResult {
    let mut issues = Vec::new();

    if records.is_empty() {
        issues.push(QualityIssue::batch("batch_not_empty", "batch contains no records"));
    }

    for (i, rec) in records.iter().enumerate() {
        for field in REQUIRED_FIELDS {
            match rec.get(field) {
                None => issues.push(QualityIssue::record(
                    "required_field",
                    i,
                    format!("missing `{field}`"),
                )),
                Some(Value::Null) => issues.push(QualityIssue::record(
                    "required_field",
                    i,
                    format!("`{field}` is null"),
                )),
                Some(_) => {}
            }
        }
        for field in OPTIONAL_FIELDS {
            if let Some(Value::Null) = rec.get(field) {
                issues.push(QualityIssue::record(
                    "unexpected_null",
                    i,
                    format!("`{field}` is null"),
                ));
            }
        }
    }

    SuiteResult::from_issues(SUITE, records.len(), issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(v: Value) -> RawRecord {
        match v {
            Value::Object(m) => m,
            _ => unreachable!(),
        }
    }

    #[test]
    fn full_record_passes() {
        let records = vec![raw(json!({
            "publishTime": "2023-07-21T06:58:08Z",
            "businessType": "Wind generation",
            "psrType": "Wind Onshore",
            "quantity": 640.283,
            "startTime": "2023-07-21T04:30:00Z",
            "settlementDate": "2023-07-21",
            "settlementPeriod": 12
        }))];
        let result = check(&records);
        assert!(result.passed, "{:?}", result.issues);
        assert_eq!(result.evaluated, 1);
    }

    #[test]
    fn absent_optionals_are_fine_but_nulls_are_not() {
        let ok = raw(json!({"psrType": "Solar", "quantity": 1.0, "startTime": "2023-07-21T04:30:00Z"}));
        assert!(check(&[ok]).passed);

        let nulled = raw(json!({
            "psrType": "Solar", "quantity": 1.0, "startTime": "2023-07-21T04:30:00Z",
            "publishTime": null
        }));
        let result = check(&[nulled]);
        assert!(!result.passed);
        assert_eq!(result.issues[0].check, "unexpected_null");
        assert_eq!(result.issues[0].record_index, Some(0));
    }

    #[test]
    fn missing_and_null_required_fields_are_reported() {
        let records = vec![
            raw(json!({"psrType": "Solar", "startTime": "2023-07-21T04:30:00Z"})),
            raw(json!({"psrType": null, "quantity": 2.0, "startTime": "2023-07-21T04:30:00Z"})),
        ];
        let result = check(&records);
        let described: Vec<_> = result
            .issues
            .iter()
            .map(|i| (i.record_index, i.description.as_str()))
            .collect();
        assert_eq!(
            described,
            [(Some(0), "missing `quantity`"), (Some(1), "`psrType` is null")]
        );
        assert!(!is_complete(&records[0]));
        assert!(!is_complete(&records[1]));
    }

    #[test]
    fn empty_batch_fails() {
        let result = check(&[]);
        assert!(!result.passed);
        assert_eq!(result.issues[0].record_index, None);
    }
}
