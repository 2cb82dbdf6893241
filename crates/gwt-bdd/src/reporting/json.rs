//! JSON writer for scenario outcome records.
//!
//! Status labels and clause keywords are lowercase so downstream tools can
//! rely on consistent casing.

use std::io::Write;

use serde::Serialize;

use super::{ScenarioRecord, ScenarioStatus, snapshot};

#[derive(Serialize)]
struct JsonReport<'a> {
    scenarios: Vec<JsonScenario<'a>>,
}

#[derive(Serialize)]
struct JsonScenario<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    feature: Option<&'a str>,
    scenario: &'a str,
    file: &'a str,
    line: u32,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'a str>,
    clauses: Vec<JsonClause<'a>>,
}

#[derive(Serialize)]
struct JsonClause<'a> {
    keyword: String,
    text: &'a str,
}

impl<'a> From<&'a [ScenarioRecord]> for JsonReport<'a> {
    fn from(records: &'a [ScenarioRecord]) -> Self {
        let scenarios = records.iter().map(JsonScenario::from).collect();
        Self { scenarios }
    }
}

impl<'a> From<&'a ScenarioRecord> for JsonScenario<'a> {
    fn from(record: &'a ScenarioRecord) -> Self {
        let reason = match record.status() {
            ScenarioStatus::Failed(details) => Some(details.reason()),
            ScenarioStatus::Passed | ScenarioStatus::Unchecked => None,
        };
        let clauses = record
            .clauses()
            .iter()
            .map(|clause| JsonClause {
                keyword: clause.kind().label().to_ascii_lowercase(),
                text: clause.text(),
            })
            .collect();
        Self {
            feature: record.feature(),
            scenario: record.scenario(),
            file: record.file(),
            line: record.line(),
            status: record.status().label(),
            reason,
            clauses,
        }
    }
}

/// Serialize the provided scenario records into the supplied writer.
///
/// # Examples
/// ```rust
/// use gwt_bdd::reporting::{json, ScenarioRecord, ScenarioStatus};
///
/// let records = vec![ScenarioRecord::new("refund", ScenarioStatus::Passed)];
/// let mut buffer = Vec::new();
/// json::write(&mut buffer, &records).unwrap();
/// let output = String::from_utf8(buffer).unwrap();
/// assert!(output.contains("\"status\":\"passed\""));
/// ```
///
/// # Errors
/// Returns an error when serialization of the provided records fails.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> serde_json::Result<()> {
    serde_json::to_writer(writer, &JsonReport::from(records))
}

/// Serialize the current collector snapshot into the supplied writer.
///
/// # Errors
/// Returns an error when serializing the snapshot fails.
pub fn write_snapshot<W: Write>(writer: &mut W) -> serde_json::Result<()> {
    let snapshot = snapshot();
    write(writer, &snapshot)
}

/// Produce a JSON string representation of the provided scenario records.
///
/// # Errors
/// Returns an error when serializing the provided records fails.
pub fn to_string(records: &[ScenarioRecord]) -> serde_json::Result<String> {
    serde_json::to_string(&JsonReport::from(records))
}

/// Produce a JSON string representation of the current collector snapshot.
///
/// # Errors
/// Returns an error when serializing the snapshot fails.
pub fn snapshot_string() -> serde_json::Result<String> {
    let snapshot = snapshot();
    to_string(&snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ClauseKind;
    use crate::reporting::{ClauseRecord, FailedScenario, record};
    use serial_test::serial;

    #[test]
    fn serializes_reason_and_clauses() {
        let records = vec![
            ScenarioRecord::new(
                "refund",
                ScenarioStatus::Failed(FailedScenario::new("THEN clause missing.")),
            )
            .with_feature("payments")
            .with_location("tests/payments.rs", 7)
            .with_clauses(vec![ClauseRecord::new(ClauseKind::Given, "a paid order")]),
        ];
        let json = match to_string(&records) {
            Ok(json) => json,
            Err(error) => panic!("records should serialize: {error}"),
        };
        assert_eq!(
            json,
            concat!(
                r#"{"scenarios":[{"feature":"payments","scenario":"refund","#,
                r#""file":"tests/payments.rs","line":7,"status":"failed","#,
                r#""reason":"THEN clause missing.","#,
                r#""clauses":[{"keyword":"given","text":"a paid order"}]}]}"#
            )
        );
    }

    #[test]
    fn omits_absent_feature_and_reason() {
        let records = vec![ScenarioRecord::new("refund", ScenarioStatus::Unchecked)];
        let json = match to_string(&records) {
            Ok(json) => json,
            Err(error) => panic!("records should serialize: {error}"),
        };
        assert!(!json.contains("\"feature\""));
        assert!(!json.contains("\"reason\""));
        assert!(json.contains("\"status\":\"unchecked\""));
    }

    #[test]
    #[serial(reporting)]
    fn snapshot_writers_include_recorded_scenarios() {
        record(ScenarioRecord::new("json snapshot refund", ScenarioStatus::Unchecked));
        let mut buffer = Vec::new();
        if let Err(error) = write_snapshot(&mut buffer) {
            panic!("snapshot should serialize: {error}");
        }
        let written = match String::from_utf8(buffer) {
            Ok(written) => written,
            Err(error) => panic!("JSON output is UTF-8: {error}"),
        };
        let json = match snapshot_string() {
            Ok(json) => json,
            Err(error) => panic!("snapshot should serialize: {error}"),
        };
        for report in [&written, &json] {
            let value: serde_json::Value = match serde_json::from_str(report) {
                Ok(value) => value,
                Err(error) => panic!("snapshot should parse back: {error}"),
            };
            let found = value
                .get("scenarios")
                .and_then(serde_json::Value::as_array)
                .is_some_and(|scenarios| {
                    scenarios.iter().any(|scenario| {
                        scenario.get("scenario").and_then(serde_json::Value::as_str)
                            == Some("json snapshot refund")
                    })
                });
            assert!(found, "recorded scenario missing from {report}");
        }
    }
}
