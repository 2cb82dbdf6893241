//! Scenario outcome collector.
//!
//! Every scenario guard stores its outcome in a global, thread-safe collector
//! when it ends. Reporters read the collected entries to render narrative
//! summaries; pass/fail accounting stays with the host test harness.

use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

use crate::clause::ClauseKind;

/// JSON report writer for scenario outcomes.
#[cfg(feature = "diagnostics")]
pub mod json;
/// JUnit XML writer for scenario outcomes.
pub mod junit;

static REPORTS: OnceLock<Mutex<Vec<ScenarioRecord>>> = OnceLock::new();

fn lock_reports() -> MutexGuard<'static, Vec<ScenarioRecord>> {
    REPORTS
        .get_or_init(|| Mutex::new(Vec::new()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// A clause as it was recorded by a scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClauseRecord {
    kind: ClauseKind,
    text: String,
}

impl ClauseRecord {
    /// Create a record for one clause.
    #[must_use]
    pub fn new(kind: ClauseKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    /// Keyword of the clause.
    #[must_use]
    pub const fn kind(&self) -> ClauseKind {
        self.kind
    }

    /// Text of the clause.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Outcome recorded for a single scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenarioRecord {
    feature: Option<String>,
    scenario: String,
    file: String,
    line: u32,
    clauses: Vec<ClauseRecord>,
    status: ScenarioStatus,
}

impl ScenarioRecord {
    /// Construct a record with no feature, location or clauses.
    ///
    /// # Examples
    /// ```
    /// use gwt_bdd::reporting::{ScenarioRecord, ScenarioStatus};
    ///
    /// let record = ScenarioRecord::new("refund", ScenarioStatus::Passed)
    ///     .with_feature("payments")
    ///     .with_location("tests/payments.rs", 12);
    /// assert_eq!(record.feature(), Some("payments"));
    /// assert_eq!(record.scenario(), "refund");
    /// assert_eq!(record.line(), 12);
    /// ```
    #[must_use]
    pub fn new(scenario: impl Into<String>, status: ScenarioStatus) -> Self {
        Self {
            feature: None,
            scenario: scenario.into(),
            file: String::from("<unknown>"),
            line: 0,
            clauses: Vec::new(),
            status,
        }
    }

    /// Attach the feature description.
    #[must_use]
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Attach the source location of the scenario.
    #[must_use]
    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.file = file.into();
        self.line = line;
        self
    }

    /// Attach the recorded clauses.
    #[must_use]
    pub fn with_clauses(mut self, clauses: Vec<ClauseRecord>) -> Self {
        self.clauses = clauses;
        self
    }

    /// Feature description, if the scenario belonged to one.
    #[must_use]
    pub fn feature(&self) -> Option<&str> {
        self.feature.as_deref()
    }

    /// Scenario description.
    #[must_use]
    pub fn scenario(&self) -> &str {
        &self.scenario
    }

    /// Source file of the scenario, or `<unknown>`.
    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    /// One-based source line of the scenario, or `0` when unknown.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Clauses recorded without an ordering violation, in order.
    #[must_use]
    pub fn clauses(&self) -> &[ClauseRecord] {
        &self.clauses
    }

    /// Outcome of the scenario.
    #[must_use]
    pub fn status(&self) -> &ScenarioStatus {
        &self.status
    }
}

/// Status of a scenario as seen by its guard.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// Every required clause was recorded in order.
    Passed,
    /// A clause arrived out of order or a required clause was missing.
    Failed(FailedScenario),
    /// A lenient scenario ended without recording any clause.
    Unchecked,
}

impl ScenarioStatus {
    /// Lowercase label for the status.
    ///
    /// # Examples
    /// ```
    /// use gwt_bdd::reporting::{FailedScenario, ScenarioStatus};
    ///
    /// assert_eq!(ScenarioStatus::Passed.label(), "passed");
    /// assert_eq!(ScenarioStatus::Failed(FailedScenario::new("boom")).label(), "failed");
    /// assert_eq!(ScenarioStatus::Unchecked.label(), "unchecked");
    /// ```
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed(_) => "failed",
            Self::Unchecked => "unchecked",
        }
    }
}

/// Details captured when a scenario fails.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedScenario {
    reason: String,
}

impl FailedScenario {
    /// Create a failure with the rendered reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The localized failure message.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// Record a scenario outcome in the shared collector.
pub fn record(record: ScenarioRecord) {
    lock_reports().push(record);
}

/// Retrieve a snapshot of the recorded scenarios without clearing them.
#[must_use]
pub fn snapshot() -> Vec<ScenarioRecord> {
    lock_reports().clone()
}

/// Remove and return all recorded scenario outcomes.
///
/// # Examples
/// ```
/// use gwt_bdd::reporting::{drain, record, snapshot, ScenarioRecord, ScenarioStatus};
///
/// record(ScenarioRecord::new("scenario", ScenarioStatus::Passed));
/// let drained = drain();
/// assert!(snapshot().is_empty());
/// assert_eq!(drained.len(), 1);
/// ```
#[must_use]
pub fn drain() -> Vec<ScenarioRecord> {
    lock_reports().drain(..).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial(reporting)]
    fn drain_removes_recorded_entries() {
        let name = "drain_removes_recorded_entries";
        record(ScenarioRecord::new(name, ScenarioStatus::Passed));
        assert!(snapshot().iter().any(|entry| entry.scenario() == name));
        let drained = drain();
        assert!(drained.iter().any(|entry| entry.scenario() == name));
        assert!(!snapshot().iter().any(|entry| entry.scenario() == name));
    }

    #[test]
    fn failed_records_keep_their_reason() {
        let record = ScenarioRecord::new(
            "scenario",
            ScenarioStatus::Failed(FailedScenario::new("THEN clause missing.")),
        )
        .with_clauses(vec![ClauseRecord::new(ClauseKind::Given, "a user")]);
        let ScenarioStatus::Failed(details) = record.status() else {
            panic!("expected failed record");
        };
        assert_eq!(details.reason(), "THEN clause missing.");
        assert_eq!(record.clauses().len(), 1);
        assert_eq!(record.file(), "<unknown>");
    }
}
