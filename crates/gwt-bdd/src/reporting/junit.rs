//! JUnit XML writer for scenario outcome records.
//!
//! The writer produces a single `<testsuite>` document. Each test case is
//! named after its scenario and classed by its feature (or source file when
//! the scenario has no feature). Recorded clauses are written to
//! `<system-out>` in narrative form.

use std::fmt::{self, Write};

use super::{ScenarioRecord, ScenarioStatus, snapshot};
use crate::output::NarrativeLine;

/// Render the supplied scenario records as a `JUnit` XML document.
///
/// # Examples
/// ```
/// use gwt_bdd::reporting::{junit, ScenarioRecord, ScenarioStatus};
///
/// let records = vec![ScenarioRecord::new("refund", ScenarioStatus::Passed)];
/// let mut output = String::new();
/// junit::write(&mut output, &records).unwrap();
/// assert!(output.contains("<testsuite"));
/// assert!(output.contains("name=\"refund\""));
/// ```
///
/// # Errors
/// Returns an error if writing to the provided formatter fails.
pub fn write<W: Write>(writer: &mut W, records: &[ScenarioRecord]) -> fmt::Result {
    let tests = records.len();
    let failures = records
        .iter()
        .filter(|record| matches!(record.status(), ScenarioStatus::Failed(_)))
        .count();
    let skipped = records
        .iter()
        .filter(|record| matches!(record.status(), ScenarioStatus::Unchecked))
        .count();
    writer.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n")?;
    writeln!(
        writer,
        "<testsuite name=\"gwt-bdd\" tests=\"{tests}\" failures=\"{failures}\" skipped=\"{skipped}\">",
    )?;
    for record in records {
        write_case(writer, record)?;
    }
    writer.write_str("</testsuite>\n")
}

fn write_case<W: Write>(writer: &mut W, record: &ScenarioRecord) -> fmt::Result {
    writer.write_str("  <testcase name=\"")?;
    write_escaped(writer, record.scenario())?;
    writer.write_str("\" classname=\"")?;
    write_escaped(writer, record.feature().unwrap_or_else(|| record.file()))?;
    writer.write_str("\">\n")?;
    match record.status() {
        ScenarioStatus::Passed => {}
        ScenarioStatus::Failed(details) => {
            writer.write_str("    <failure type=\"clause\" message=\"")?;
            write_escaped(writer, details.reason())?;
            writer.write_str("\" />\n")?;
        }
        ScenarioStatus::Unchecked => writer.write_str("    <skipped />\n")?,
    }
    if !record.clauses().is_empty() {
        writer.write_str("    <system-out>")?;
        for clause in record.clauses() {
            let line = NarrativeLine::Clause {
                kind: clause.kind(),
                text: clause.text().to_owned(),
            };
            write_escaped(writer, line.render().trim_start())?;
            writer.write_char('\n')?;
        }
        writer.write_str("</system-out>\n")?;
    }
    writer.write_str("  </testcase>\n")
}

/// Render the collector snapshot as a `JUnit` XML document.
///
/// # Errors
/// Returns an error if writing to the provided formatter fails.
pub fn write_snapshot<W: Write>(writer: &mut W) -> fmt::Result {
    let snapshot = snapshot();
    write(writer, &snapshot)
}

fn write_escaped<W: Write>(writer: &mut W, value: &str) -> fmt::Result {
    const INVALID_REPLACEMENT: &str = "&#xFFFD;";
    for character in value.chars() {
        if !is_valid_xml_character(character) {
            writer.write_str(INVALID_REPLACEMENT)?;
            continue;
        }
        match character {
            '&' => writer.write_str("&amp;")?,
            '<' => writer.write_str("&lt;")?,
            '>' => writer.write_str("&gt;")?,
            '"' => writer.write_str("&quot;")?,
            '\'' => writer.write_str("&apos;")?,
            other => writer.write_char(other)?,
        }
    }
    Ok(())
}

fn is_valid_xml_character(character: char) -> bool {
    matches!(
        u32::from(character),
        0x09 | 0x0A | 0x0D
            | 0x20..=0xD7FF
            | 0xE000..=0xFFFD
            | 0x1_0000..=0x10_FFFF
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clause::ClauseKind;
    use crate::reporting::{ClauseRecord, FailedScenario, record};
    use serial_test::serial;

    fn render(records: &[ScenarioRecord]) -> String {
        let mut output = String::new();
        if let Err(error) = write(&mut output, records) {
            panic!("writing to a String cannot fail: {error}");
        }
        output
    }

    #[test]
    fn counts_failures_and_unchecked_scenarios() {
        let output = render(&[
            ScenarioRecord::new("a", ScenarioStatus::Passed),
            ScenarioRecord::new("b", ScenarioStatus::Failed(FailedScenario::new("boom"))),
            ScenarioRecord::new("c", ScenarioStatus::Unchecked),
        ]);
        assert!(output.contains("tests=\"3\" failures=\"1\" skipped=\"1\""));
        assert!(output.contains("<failure type=\"clause\" message=\"boom\" />"));
        assert!(output.contains("<skipped />"));
    }

    #[test]
    fn classes_cases_by_feature_then_file() {
        let output = render(&[
            ScenarioRecord::new("a", ScenarioStatus::Passed).with_feature("payments"),
            ScenarioRecord::new("b", ScenarioStatus::Passed).with_location("tests/x.rs", 3),
        ]);
        assert!(output.contains("classname=\"payments\""));
        assert!(output.contains("classname=\"tests/x.rs\""));
    }

    #[test]
    fn writes_clauses_and_escapes_text() {
        let record = ScenarioRecord::new("<refund>", ScenarioStatus::Passed).with_clauses(vec![
            ClauseRecord::new(ClauseKind::Given, "a \"paid\" order"),
            ClauseRecord::new(ClauseKind::And, "a receipt & invoice"),
        ]);
        let output = render(&[record]);
        assert!(output.contains("name=\"&lt;refund&gt;\""));
        assert!(output.contains("GIVEN a &quot;paid&quot; order\n"));
        assert!(output.contains("AND a receipt &amp; invoice\n"));
    }

    #[test]
    fn replaces_invalid_xml_characters() {
        let mut output = String::new();
        if let Err(error) = write_escaped(&mut output, "a\u{1}b") {
            panic!("writing to a String cannot fail: {error}");
        }
        assert_eq!(output, "a&#xFFFD;b");
    }

    #[test]
    #[serial(reporting)]
    fn snapshot_includes_recorded_scenarios() {
        record(
            ScenarioRecord::new("junit snapshot refund", ScenarioStatus::Passed)
                .with_feature("junit snapshot")
                .with_clauses(vec![ClauseRecord::new(ClauseKind::Then, "money returns")]),
        );
        let mut output = String::new();
        if let Err(error) = write_snapshot(&mut output) {
            panic!("writing to a String cannot fail: {error}");
        }
        assert!(output.starts_with("<?xml"));
        assert!(output.contains("name=\"junit snapshot refund\""));
        assert!(output.contains("classname=\"junit snapshot\""));
        assert!(output.contains("THEN money returns\n"));
    }
}
