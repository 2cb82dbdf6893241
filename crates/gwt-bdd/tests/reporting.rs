//! Tests for the scenario outcome collector and its report writers.

#[cfg(feature = "diagnostics")]
use std::io::{Read, Seek, SeekFrom};

#[cfg(feature = "diagnostics")]
use gwt_bdd::reporting::json;
use gwt_bdd::reporting::{self, ScenarioStatus, junit};
use gwt_bdd::{ClauseCheck, QuietSink, Scenario};

fn run_quietly(name: &str, complete: bool) {
    let scenario = Scenario::builder(name)
        .feature("Reporting")
        .check(ClauseCheck::Strict)
        .location(file!(), line!())
        .sink(QuietSink)
        .enter();
    scenario.given("a collector");
    scenario.when("a scenario ends");
    if complete {
        scenario.then("its outcome is recorded");
    }
    let _ = scenario.finish();
}

#[test]
#[expect(clippy::expect_used, reason = "test ensures the scenario was recorded")]
fn finished_scenarios_are_recorded() {
    run_quietly("reporting: passed", true);
    run_quietly("reporting: failed", false);
    let snapshot = reporting::snapshot();

    let passed = snapshot
        .iter()
        .find(|record| record.scenario() == "reporting: passed")
        .expect("passed scenario recorded");
    assert_eq!(passed.status(), &ScenarioStatus::Passed);
    assert_eq!(passed.feature(), Some("Reporting"));
    assert!(passed.file().ends_with("reporting.rs"));
    assert_eq!(passed.clauses().len(), 3);

    let failed = snapshot
        .iter()
        .find(|record| record.scenario() == "reporting: failed")
        .expect("failed scenario recorded");
    let ScenarioStatus::Failed(details) = failed.status() else {
        panic!("incomplete scenario must be recorded as failed");
    };
    assert_eq!(details.reason(), "THEN clause missing.");
}

#[cfg(feature = "diagnostics")]
#[test]
#[expect(clippy::expect_used, reason = "test writes into a temporary file")]
fn json_report_is_written_to_a_file() {
    run_quietly("reporting: json", true);
    let records: Vec<_> = reporting::snapshot()
        .into_iter()
        .filter(|record| record.scenario() == "reporting: json")
        .collect();

    let mut file = tempfile::tempfile().expect("create temporary file");
    json::write(&mut file, &records).expect("write json report");
    file.seek(SeekFrom::Start(0)).expect("rewind report");
    let mut contents = String::new();
    file.read_to_string(&mut contents).expect("read report");

    let report: serde_json::Value = serde_json::from_str(&contents).expect("valid json");
    let scenario = &report["scenarios"][0];
    assert_eq!(scenario["scenario"], "reporting: json");
    assert_eq!(scenario["feature"], "Reporting");
    assert_eq!(scenario["status"], "passed");
    assert_eq!(scenario["clauses"][2]["keyword"], "then");
    assert!(scenario.get("reason").is_none());
}

#[test]
#[expect(clippy::expect_used, reason = "writing to a String cannot fail")]
fn junit_report_marks_failures() {
    run_quietly("reporting: junit failure", false);
    let records: Vec<_> = reporting::snapshot()
        .into_iter()
        .filter(|record| record.scenario() == "reporting: junit failure")
        .collect();

    let mut xml = String::new();
    junit::write(&mut xml, &records).expect("write junit report");
    assert!(xml.contains("tests=\"1\""), "{xml}");
    assert!(xml.contains("failures=\"1\""), "{xml}");
    assert!(xml.contains("classname=\"Reporting\""), "{xml}");
    assert!(xml.contains("THEN clause missing."), "{xml}");
}
