//! Errors raised by scenario guards.

use std::fmt;

use crate::clause::ClauseKind;
use crate::localization;
use crate::tracker::OrderViolation;

/// A clause ordering or completeness failure.
///
/// `Display` renders the localized message prefixed with the scenario
/// description; [`ClauseError::detail`] renders the message alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClauseError {
    /// A primary clause was recorded before the clause it depends on.
    OutOfOrder {
        /// Description of the failing scenario.
        scenario: String,
        /// The rejected clause.
        clause: ClauseKind,
        /// The clause that must come first.
        required: ClauseKind,
    },
    /// A conjunction was recorded before any primary clause.
    Dangling {
        /// Description of the failing scenario.
        scenario: String,
        /// The rejected conjunction.
        clause: ClauseKind,
    },
    /// The scenario ended without some primary clauses.
    Missing {
        /// Description of the failing scenario.
        scenario: String,
        /// Primary clauses never recorded, in scenario order.
        missing: Vec<ClauseKind>,
    },
    /// A clause was recorded while no scenario was active on this thread.
    NoActiveScenario {
        /// The orphaned clause.
        clause: ClauseKind,
    },
}

impl ClauseError {
    pub(crate) fn from_violation(scenario: &str, violation: OrderViolation) -> Self {
        match violation {
            OrderViolation::Requires { clause, required } => Self::OutOfOrder {
                scenario: scenario.to_owned(),
                clause,
                required,
            },
            OrderViolation::Dangling { clause } => Self::Dangling {
                scenario: scenario.to_owned(),
                clause,
            },
        }
    }

    /// Description of the scenario the error belongs to, if any.
    #[must_use]
    pub fn scenario(&self) -> Option<&str> {
        match self {
            Self::OutOfOrder { scenario, .. }
            | Self::Dangling { scenario, .. }
            | Self::Missing { scenario, .. } => Some(scenario),
            Self::NoActiveScenario { .. } => None,
        }
    }

    /// The localized message without the scenario prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use gwt_bdd::{ClauseError, ClauseKind};
    ///
    /// let error = ClauseError::Missing {
    ///     scenario: "withdrawal".into(),
    ///     missing: vec![ClauseKind::When, ClauseKind::Then],
    /// };
    /// assert_eq!(error.detail(), "WHEN, THEN clauses missing.");
    /// assert_eq!(error.to_string(), "scenario \"withdrawal\": WHEN, THEN clauses missing.");
    /// ```
    #[must_use]
    pub fn detail(&self) -> String {
        match self {
            Self::OutOfOrder {
                clause, required, ..
            } => localization::message_with_args("clause-out-of-order", |args| {
                args.set("clause", clause.label());
                args.set("required", required.label());
            }),
            Self::Dangling { clause, .. } => {
                localization::message_with_args("clause-dangling", |args| {
                    args.set("clause", clause.label());
                })
            }
            Self::Missing { missing, .. } => {
                let labels = missing
                    .iter()
                    .map(|kind| kind.label())
                    .collect::<Vec<_>>()
                    .join(", ");
                let count = missing.len();
                localization::message_with_args("clause-missing", |args| {
                    args.set("missing", labels);
                    args.set("count", count);
                })
            }
            Self::NoActiveScenario { clause } => {
                localization::message_with_args("clause-no-active-scenario", |args| {
                    args.set("clause", clause.label());
                })
            }
        }
    }
}

impl fmt::Display for ClauseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = self.detail();
        let Some(scenario) = self.scenario() else {
            return f.write_str(&detail);
        };
        let message = localization::message_with_args("scenario-error", |args| {
            args.set("scenario", scenario.to_owned());
            args.set("detail", detail);
        });
        f.write_str(&message)
    }
}

impl std::error::Error for ClauseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_order_names_both_clauses() {
        let error = ClauseError::from_violation(
            "checkout",
            OrderViolation::Requires {
                clause: ClauseKind::Then,
                required: ClauseKind::When,
            },
        );
        assert_eq!(
            error.to_string(),
            "scenario \"checkout\": THEN clause requires a preceding WHEN clause."
        );
    }

    #[test]
    fn dangling_conjunction_lists_primary_clauses() {
        let error =
            ClauseError::from_violation("checkout", OrderViolation::Dangling { clause: ClauseKind::And });
        assert_eq!(error.detail(), "AND must follow one of GIVEN, WHEN or THEN.");
        assert_eq!(error.scenario(), Some("checkout"));
    }

    #[test]
    fn orphaned_clause_has_no_scenario_prefix() {
        let error = ClauseError::NoActiveScenario {
            clause: ClauseKind::Given,
        };
        assert_eq!(error.scenario(), None);
        assert_eq!(
            error.to_string(),
            "GIVEN clause recorded outside of a scenario."
        );
    }
}
