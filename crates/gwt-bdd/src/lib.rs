//! Given/When/Then narration for Rust tests.
//!
//! `gwt-bdd` lets a test describe itself as a behaviour-driven scenario
//! without changing how it is discovered, run or reported. A [`Scenario`]
//! guard lives for one test invocation: it prints each clause in an indented
//! narrative, rejects clauses recorded out of order, and fails the test when
//! it ends without GIVEN, WHEN and THEN.
//!
//! ```
//! use gwt_bdd::{and, given, start_scenario, then, when};
//!
//! start_scenario!("withdrawal", check = strict);
//! given!("an account holding 100");
//! when!("50 is withdrawn");
//! then!("the balance is 50");
//! and!("a receipt is printed");
//! ```
//!
//! The `gwt-bdd-macros` crate provides `#[scenario]` and `#[bdd_feature]`
//! attributes that register the test with libtest or rstest and install the
//! guard for the whole function body.

mod clause;
pub mod config;
mod error;
pub mod localization;
mod macros;
mod output;
pub mod reporting;
mod scenario;
mod scope;
#[cfg(test)]
mod test_log;
mod tracker;

pub use clause::{ClauseKind, ClauseKindParseError};
pub use error::ClauseError;
pub use gwt_bdd_policy::{ClauseCheck, HostFramework, OutputMode, PolicyParseError};
pub use output::{
    CapturedOutput, LogSink, NarrativeLine, OutputSink, OutputTarget, QuietSink, StdoutSink,
};
pub use scenario::{Scenario, ScenarioBuilder};
pub use scope::{
    active_scenario, and, announce_feature, but, flush, given, then, try_record, when,
};
pub use tracker::{ClauseTracker, OrderViolation};
