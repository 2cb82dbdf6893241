//! Runtime configuration for gwt-bdd.
//!
//! Two settings apply to scenarios that do not choose for themselves:
//!
//! - `GWT_BDD_OUTPUT` (`stdout`, `log` or `quiet`) selects the default sink.
//! - `GWT_BDD_CHECK` (`strict` or `lenient`) selects the default
//!   [`ClauseCheck`].
//!
//! Unparseable values fall back to the defaults. Tests can pin either value
//! for the whole process with the `set_*` functions.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::ClauseCheck;
use crate::output::OutputTarget;

const OUTPUT_ENV: &str = "GWT_BDD_OUTPUT";
const CHECK_ENV: &str = "GWT_BDD_CHECK";

const OVERRIDE_UNSET: u8 = 0;

static OUTPUT_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);
static CHECK_OVERRIDE: AtomicU8 = AtomicU8::new(OVERRIDE_UNSET);

const fn encode_target(target: OutputTarget) -> u8 {
    match target {
        OutputTarget::Stdout => 1,
        OutputTarget::Log => 2,
        OutputTarget::Quiet => 3,
    }
}

const fn decode_target(value: u8) -> Option<OutputTarget> {
    match value {
        1 => Some(OutputTarget::Stdout),
        2 => Some(OutputTarget::Log),
        3 => Some(OutputTarget::Quiet),
        _ => None,
    }
}

const fn encode_check(check: ClauseCheck) -> u8 {
    match check {
        ClauseCheck::Strict => 1,
        ClauseCheck::Lenient => 2,
    }
}

const fn decode_check(value: u8) -> Option<ClauseCheck> {
    match value {
        1 => Some(ClauseCheck::Strict),
        2 => Some(ClauseCheck::Lenient),
        _ => None,
    }
}

fn env_value<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.parse().ok()
}

/// Sink used by scenarios that were not given one.
#[must_use]
pub fn output_target() -> OutputTarget {
    decode_target(OUTPUT_OVERRIDE.load(Ordering::Relaxed))
        .or_else(|| env_value(OUTPUT_ENV))
        .unwrap_or_default()
}

/// Override the default sink for the current process.
pub fn set_output_target(target: OutputTarget) {
    OUTPUT_OVERRIDE.store(encode_target(target), Ordering::Relaxed);
}

/// Restore environment-driven sink selection.
pub fn clear_output_target_override() {
    OUTPUT_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}

/// Clause check used by scenarios that were not given one.
#[must_use]
pub fn default_clause_check() -> ClauseCheck {
    decode_check(CHECK_OVERRIDE.load(Ordering::Relaxed))
        .or_else(|| env_value(CHECK_ENV))
        .unwrap_or_default()
}

/// Override the default clause check for the current process.
pub fn set_default_clause_check(check: ClauseCheck) {
    CHECK_OVERRIDE.store(encode_check(check), Ordering::Relaxed);
}

/// Restore environment-driven clause check selection.
pub fn clear_default_clause_check_override() {
    CHECK_OVERRIDE.store(OVERRIDE_UNSET, Ordering::Relaxed);
}
