//! Thread-local registry of active scenarios.
//!
//! Libtest runs every test on its own thread, so the innermost scenario on the
//! current thread is the one belonging to the running test. The free clause
//! functions below, and the macros built on them, record on that scenario.

use std::cell::RefCell;
use std::rc::Rc;

use crate::clause::ClauseKind;
use crate::config;
use crate::error::ClauseError;
use crate::output::NarrativeLine;
use crate::scenario::ScenarioState;

thread_local! {
    static ACTIVE: RefCell<Vec<Rc<RefCell<ScenarioState>>>> = const { RefCell::new(Vec::new()) };
}

pub(crate) fn push(state: Rc<RefCell<ScenarioState>>) {
    ACTIVE.with(|stack| stack.borrow_mut().push(state));
}

pub(crate) fn remove(state: &Rc<RefCell<ScenarioState>>) {
    ACTIVE.with(|stack| {
        let mut stack = stack.borrow_mut();
        if let Some(index) = stack.iter().rposition(|entry| Rc::ptr_eq(entry, state)) {
            stack.remove(index);
        }
    });
}

fn current() -> Option<Rc<RefCell<ScenarioState>>> {
    ACTIVE.with(|stack| stack.borrow().last().cloned())
}

/// Description of the innermost active scenario on this thread.
#[must_use]
pub fn active_scenario() -> Option<String> {
    current().map(|state| state.borrow().description().to_owned())
}

/// Record a clause on the active scenario without panicking.
///
/// # Errors
///
/// Returns [`ClauseError::NoActiveScenario`] when no scenario is active and
/// the ordering errors of [`Scenario::try_clause`](crate::Scenario::try_clause)
/// otherwise.
pub fn try_record(kind: ClauseKind, text: impl AsRef<str>) -> Result<(), ClauseError> {
    let Some(state) = current() else {
        return Err(ClauseError::NoActiveScenario { clause: kind });
    };
    state.borrow_mut().record(kind, text.as_ref())
}

#[track_caller]
fn record_or_panic(kind: ClauseKind, text: &str) {
    match try_record(kind, text) {
        Ok(()) => {}
        Err(ClauseError::NoActiveScenario { clause }) => {
            crate::panic_localized!("clause-no-active-scenario", clause = clause.label());
        }
        Err(error) => panic!("{error}"),
    }
}

/// Record a GIVEN clause on the active scenario.
///
/// # Panics
///
/// Panics when no scenario is active.
#[track_caller]
pub fn given(text: impl AsRef<str>) {
    record_or_panic(ClauseKind::Given, text.as_ref());
}

/// Record a WHEN clause on the active scenario.
///
/// # Panics
///
/// Panics when no scenario is active or no GIVEN clause was recorded.
#[track_caller]
pub fn when(text: impl AsRef<str>) {
    record_or_panic(ClauseKind::When, text.as_ref());
}

/// Record a THEN clause on the active scenario.
///
/// # Panics
///
/// Panics when no scenario is active or no WHEN clause was recorded.
#[track_caller]
pub fn then(text: impl AsRef<str>) {
    record_or_panic(ClauseKind::Then, text.as_ref());
}

/// Record an AND clause on the active scenario.
///
/// # Panics
///
/// Panics when no scenario is active or no primary clause was recorded.
#[track_caller]
pub fn and(text: impl AsRef<str>) {
    record_or_panic(ClauseKind::And, text.as_ref());
}

/// Record a BUT clause on the active scenario.
///
/// # Panics
///
/// Panics when no scenario is active or no primary clause was recorded.
#[track_caller]
pub fn but(text: impl AsRef<str>) {
    record_or_panic(ClauseKind::But, text.as_ref());
}

/// Write the active scenario's buffered clauses. Does nothing without an
/// active scenario.
pub fn flush() {
    if let Some(state) = current() {
        state.borrow_mut().flush();
    }
}

/// Print a FEATURE header.
///
/// With an active scenario the header goes to its sink and the scenario
/// adopts the feature if it has none; otherwise it goes to the configured
/// default sink.
pub fn announce_feature(feature: impl AsRef<str>) {
    let feature = feature.as_ref();
    match current() {
        Some(state) => state.borrow_mut().announce_feature(feature),
        None => config::output_target()
            .sink()
            .emit(&NarrativeLine::Feature(feature.to_owned())),
    }
}
