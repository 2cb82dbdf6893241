//! The per-test scenario guard.
//!
//! A [`Scenario`] lives for exactly one test invocation. Creating it prints
//! the scenario header and makes it the active scenario of the current
//! thread; recording clauses validates their order; dropping it checks that
//! the narrative is complete and fails the test by panicking when it is not.

use std::cell::RefCell;
use std::rc::Rc;
use std::thread;

use crate::clause::ClauseKind;
use crate::config;
use crate::error::ClauseError;
use crate::localization;
use crate::output::{NarrativeLine, OutputSink};
use crate::reporting::{self, ClauseRecord, FailedScenario, ScenarioRecord, ScenarioStatus};
use crate::scope;
use crate::tracker::ClauseTracker;
use crate::{ClauseCheck, OutputMode};

pub(crate) struct ScenarioState {
    description: String,
    feature: Option<String>,
    check: ClauseCheck,
    mode: OutputMode,
    location: Option<(&'static str, u32)>,
    tracker: ClauseTracker,
    clauses: Vec<ClauseRecord>,
    pending: Vec<NarrativeLine>,
    failure: Option<ClauseError>,
    sink: Box<dyn OutputSink>,
}

impl ScenarioState {
    pub(crate) fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn record(&mut self, kind: ClauseKind, text: &str) -> Result<(), ClauseError> {
        if let Err(violation) = self.tracker.advance(kind) {
            let error = ClauseError::from_violation(&self.description, violation);
            self.flush();
            self.emit_error(&error);
            if self.failure.is_none() {
                self.failure = Some(error.clone());
            }
            return Err(error);
        }
        self.clauses.push(ClauseRecord::new(kind, text));
        let line = NarrativeLine::Clause {
            kind,
            text: text.to_owned(),
        };
        let defer = self.mode.is_deferred()
            && (kind == ClauseKind::Then || (kind.is_conjunction() && !self.pending.is_empty()));
        if defer {
            self.pending.push(line);
        } else {
            self.flush();
            self.sink.emit(&line);
        }
        Ok(())
    }

    pub(crate) fn flush(&mut self) {
        for line in self.pending.drain(..) {
            self.sink.emit(&line);
        }
    }

    pub(crate) fn announce_feature(&mut self, feature: &str) {
        self.flush();
        self.sink.emit(&NarrativeLine::Feature(feature.to_owned()));
        if self.feature.is_none() {
            self.feature = Some(feature.to_owned());
        }
    }

    fn emit_error(&mut self, error: &ClauseError) {
        self.sink.emit(&NarrativeLine::Error {
            scenario: self.description.clone(),
            message: error.detail(),
        });
    }

    /// Flush, check for missing clauses and store the outcome.
    ///
    /// Returns the record together with the missing-clause error, if any.
    /// Earlier ordering failures are reflected in the record but not returned
    /// again.
    fn conclude(&mut self) -> (ScenarioRecord, Option<ClauseError>) {
        self.flush();
        let missing = if self.failure.is_some() {
            Vec::new()
        } else {
            self.tracker.missing(self.check)
        };
        let missing_error = (!missing.is_empty()).then(|| ClauseError::Missing {
            scenario: self.description.clone(),
            missing,
        });
        if let Some(error) = &missing_error {
            self.emit_error(error);
        }
        let status = match self.failure.as_ref().or(missing_error.as_ref()) {
            Some(error) => ScenarioStatus::Failed(FailedScenario::new(error.detail())),
            None if self.tracker.is_untouched() => ScenarioStatus::Unchecked,
            None => ScenarioStatus::Passed,
        };
        let mut record = ScenarioRecord::new(self.description.clone(), status)
            .with_clauses(std::mem::take(&mut self.clauses));
        if let Some(feature) = &self.feature {
            record = record.with_feature(feature.clone());
        }
        if let Some((file, line)) = self.location {
            record = record.with_location(file, line);
        }
        log::debug!(
            "scenario \"{}\" finished: {}",
            self.description,
            record.status().label()
        );
        reporting::record(record.clone());
        (record, missing_error)
    }
}

/// Configures and starts a [`Scenario`].
///
/// # Examples
///
/// ```
/// use gwt_bdd::{CapturedOutput, ClauseCheck, OutputMode, Scenario};
///
/// let output = CapturedOutput::new();
/// let scenario = Scenario::builder("refund")
///     .feature("payments")
///     .check(ClauseCheck::Lenient)
///     .output(OutputMode::Deferred)
///     .sink(output.clone())
///     .enter();
/// drop(scenario);
/// assert_eq!(output.rendered(), vec!["FEATURE payments", "    SCENARIO refund"]);
/// ```
#[must_use = "a builder does nothing until `enter` is called"]
pub struct ScenarioBuilder {
    description: String,
    feature: Option<String>,
    check: Option<ClauseCheck>,
    mode: OutputMode,
    location: Option<(&'static str, u32)>,
    sink: Option<Box<dyn OutputSink>>,
}

impl ScenarioBuilder {
    fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            feature: None,
            check: None,
            mode: OutputMode::default(),
            location: None,
            sink: None,
        }
    }

    /// Name the feature the scenario belongs to; printed as a header.
    pub fn feature(mut self, feature: impl Into<String>) -> Self {
        self.feature = Some(feature.into());
        self
    }

    /// Choose the missing-clause policy. Defaults to
    /// [`config::default_clause_check`].
    pub fn check(mut self, check: ClauseCheck) -> Self {
        self.check = Some(check);
        self
    }

    /// Choose whether THEN clauses print at once or are buffered.
    pub fn output(mut self, mode: OutputMode) -> Self {
        self.mode = mode;
        self
    }

    /// Record where the scenario is defined, for reports.
    pub fn location(mut self, file: &'static str, line: u32) -> Self {
        self.location = Some((file, line));
        self
    }

    /// Write narrative to `sink` instead of the configured default.
    pub fn sink(mut self, sink: impl OutputSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Print the headers and make the scenario active on this thread.
    pub fn enter(self) -> Scenario {
        let sink = self
            .sink
            .unwrap_or_else(|| config::output_target().sink());
        let check = self.check.unwrap_or_else(config::default_clause_check);
        let mut state = ScenarioState {
            description: self.description,
            feature: None,
            check,
            mode: self.mode,
            location: self.location,
            tracker: ClauseTracker::new(),
            clauses: Vec::new(),
            pending: Vec::new(),
            failure: None,
            sink,
        };
        if let Some(feature) = self.feature {
            state.announce_feature(&feature);
        }
        state
            .sink
            .emit(&NarrativeLine::Scenario(state.description.clone()));
        log::debug!(
            "scenario \"{}\" started ({} check, {} output)",
            state.description,
            check.as_str(),
            state.mode.as_str()
        );
        let state = Rc::new(RefCell::new(state));
        scope::push(Rc::clone(&state));
        Scenario {
            state,
            finished: false,
        }
    }
}

/// Tracks the clauses of one test case and enforces their order.
///
/// The guard is `!Send`: it belongs to the thread running the test. While it
/// is alive, the free functions [`given`](crate::given),
/// [`when`](crate::when), [`then`](crate::then), [`and`](crate::and) and
/// [`but`](crate::but) and their macros record clauses on it.
///
/// # Panics
///
/// Dropping a scenario that misses required clauses, or that rejected a
/// clause through [`Scenario::try_clause`], panics, failing the enclosing
/// test. When the thread is already panicking a missing-clause failure is
/// logged instead so the original panic is preserved.
///
/// # Examples
///
/// ```
/// use gwt_bdd::{CapturedOutput, Scenario};
///
/// let output = CapturedOutput::new();
/// let scenario = Scenario::builder("withdrawal").sink(output.clone()).enter();
/// scenario.given("an account with 100");
/// scenario.when("50 is withdrawn");
/// scenario.then("the balance is 50");
/// scenario.and("a receipt is printed");
/// let record = scenario.finish().unwrap();
/// assert_eq!(record.clauses().len(), 4);
/// ```
#[must_use = "dropping the scenario ends it immediately"]
pub struct Scenario {
    state: Rc<RefCell<ScenarioState>>,
    finished: bool,
}

impl Scenario {
    /// Start configuring a scenario.
    pub fn builder(description: impl Into<String>) -> ScenarioBuilder {
        ScenarioBuilder::new(description)
    }

    /// Start a scenario with the default configuration.
    pub fn new(description: impl Into<String>) -> Self {
        Self::builder(description).enter()
    }

    /// Description of the scenario.
    #[must_use]
    pub fn description(&self) -> String {
        self.state.borrow().description.clone()
    }

    /// Returns `true` once `kind` has been recorded.
    #[must_use]
    pub fn has_seen(&self, kind: ClauseKind) -> bool {
        self.state.borrow().tracker.has_seen(kind)
    }

    /// Record a GIVEN clause.
    ///
    /// # Panics
    ///
    /// Never for GIVEN; the signature matches the other clause methods.
    #[track_caller]
    pub fn given(&self, text: impl AsRef<str>) {
        self.expect_clause(ClauseKind::Given, text.as_ref());
    }

    /// Record a WHEN clause.
    ///
    /// # Panics
    ///
    /// Panics when no GIVEN clause has been recorded.
    #[track_caller]
    pub fn when(&self, text: impl AsRef<str>) {
        self.expect_clause(ClauseKind::When, text.as_ref());
    }

    /// Record a THEN clause.
    ///
    /// # Panics
    ///
    /// Panics when no WHEN clause has been recorded.
    #[track_caller]
    pub fn then(&self, text: impl AsRef<str>) {
        self.expect_clause(ClauseKind::Then, text.as_ref());
    }

    /// Record an AND clause.
    ///
    /// # Panics
    ///
    /// Panics when no primary clause has been recorded.
    #[track_caller]
    pub fn and(&self, text: impl AsRef<str>) {
        self.expect_clause(ClauseKind::And, text.as_ref());
    }

    /// Record a BUT clause.
    ///
    /// # Panics
    ///
    /// Panics when no primary clause has been recorded.
    #[track_caller]
    pub fn but(&self, text: impl AsRef<str>) {
        self.expect_clause(ClauseKind::But, text.as_ref());
    }

    #[track_caller]
    fn expect_clause(&self, kind: ClauseKind, text: &str) {
        if let Err(error) = self.try_clause(kind, text) {
            panic!("{error}");
        }
    }

    /// Record a clause without panicking.
    ///
    /// The rejected clause is still reported as an `ERROR` line and marks the
    /// scenario failed: unless [`Scenario::finish`] takes the error, dropping
    /// the scenario panics with it.
    ///
    /// # Errors
    ///
    /// Returns [`ClauseError::OutOfOrder`] or [`ClauseError::Dangling`] when
    /// the clause violates the required order.
    pub fn try_clause(&self, kind: ClauseKind, text: impl AsRef<str>) -> Result<(), ClauseError> {
        self.state.borrow_mut().record(kind, text.as_ref())
    }

    /// Write buffered clauses now.
    pub fn flush(&self) {
        self.state.borrow_mut().flush();
    }

    /// Print a FEATURE header, adopting it as the scenario's feature when it
    /// has none.
    pub fn announce_feature(&self, feature: impl AsRef<str>) {
        self.state.borrow_mut().announce_feature(feature.as_ref());
    }

    /// End the scenario without panicking.
    ///
    /// # Errors
    ///
    /// Returns [`ClauseError::Missing`] when required clauses were never
    /// recorded, or the first ordering error recorded earlier.
    pub fn finish(mut self) -> Result<ScenarioRecord, ClauseError> {
        self.finished = true;
        let (record, missing) = self.conclude();
        let earlier = self.state.borrow_mut().failure.take();
        match missing.or(earlier) {
            Some(error) => Err(error),
            None => Ok(record),
        }
    }

    fn conclude(&self) -> (ScenarioRecord, Option<ClauseError>) {
        scope::remove(&self.state);
        self.state.borrow_mut().conclude()
    }
}

impl Drop for Scenario {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let (_, missing) = self.conclude();
        if thread::panicking() {
            // An ordering failure recorded earlier is what is unwinding now.
            if let Some(error) = missing {
                let message =
                    localization::message_with_args("scenario-unwinding-suppressed", |args| {
                        args.set("scenario", self.state.borrow().description.clone());
                        args.set("detail", error.detail());
                    });
                log::warn!("{message}");
            }
            return;
        }
        let earlier = self.state.borrow_mut().failure.take();
        if let Some(error) = missing.or(earlier) {
            panic!("{error}");
        }
    }
}
