//! Clause ordering state machine.
//!
//! [`ClauseTracker`] remembers which of GIVEN, WHEN and THEN a scenario has
//! seen and validates each new clause against that history. It performs no
//! I/O; the [`Scenario`](crate::Scenario) guard decides how violations are
//! reported.

use crate::ClauseCheck;
use crate::clause::ClauseKind;

/// Reason a clause was rejected by [`ClauseTracker::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderViolation {
    /// A primary clause arrived before the clause it depends on.
    Requires {
        /// The rejected clause.
        clause: ClauseKind,
        /// The clause that must come first.
        required: ClauseKind,
    },
    /// A conjunction arrived before any primary clause.
    Dangling {
        /// The rejected conjunction.
        clause: ClauseKind,
    },
}

/// Tracks which primary clauses a scenario has recorded.
///
/// # Examples
///
/// ```
/// use gwt_bdd::{ClauseCheck, ClauseKind, ClauseTracker};
///
/// let mut tracker = ClauseTracker::new();
/// assert!(tracker.advance(ClauseKind::When).is_err());
/// tracker.advance(ClauseKind::Given).unwrap();
/// tracker.advance(ClauseKind::When).unwrap();
/// assert_eq!(tracker.missing(ClauseCheck::Strict), vec![ClauseKind::Then]);
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClauseTracker {
    given: bool,
    when: bool,
    then: bool,
}

impl ClauseTracker {
    /// Create a tracker that has seen nothing.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            given: false,
            when: false,
            then: false,
        }
    }

    /// Validate `kind` against the clauses seen so far and record it.
    ///
    /// A rejected clause leaves the tracker unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`OrderViolation::Requires`] when WHEN precedes GIVEN or THEN
    /// precedes WHEN, and [`OrderViolation::Dangling`] when a conjunction
    /// precedes every primary clause.
    pub fn advance(&mut self, kind: ClauseKind) -> Result<(), OrderViolation> {
        match kind {
            ClauseKind::Given => self.given = true,
            ClauseKind::When => {
                Self::require(self.given, kind, ClauseKind::Given)?;
                self.when = true;
            }
            ClauseKind::Then => {
                Self::require(self.when, kind, ClauseKind::When)?;
                self.then = true;
            }
            ClauseKind::And | ClauseKind::But => {
                if self.is_untouched() {
                    return Err(OrderViolation::Dangling { clause: kind });
                }
            }
        }
        Ok(())
    }

    fn require(seen: bool, clause: ClauseKind, required: ClauseKind) -> Result<(), OrderViolation> {
        if seen {
            Ok(())
        } else {
            Err(OrderViolation::Requires { clause, required })
        }
    }

    /// Returns `true` when `kind` has been recorded. Conjunctions are never
    /// tracked and always report `false`.
    #[must_use]
    pub const fn has_seen(&self, kind: ClauseKind) -> bool {
        match kind {
            ClauseKind::Given => self.given,
            ClauseKind::When => self.when,
            ClauseKind::Then => self.then,
            ClauseKind::And | ClauseKind::But => false,
        }
    }

    /// Returns `true` when no primary clause has been recorded.
    #[must_use]
    pub const fn is_untouched(&self) -> bool {
        !(self.given || self.when || self.then)
    }

    /// List the primary clauses still missing, in scenario order.
    ///
    /// Under [`ClauseCheck::Lenient`] an untouched tracker reports nothing.
    #[must_use]
    pub fn missing(&self, check: ClauseCheck) -> Vec<ClauseKind> {
        if check.skips_untouched() && self.is_untouched() {
            return Vec::new();
        }
        ClauseKind::PRIMARY
            .into_iter()
            .filter(|kind| !self.has_seen(*kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn tracker_after(kinds: &[ClauseKind]) -> ClauseTracker {
        let mut tracker = ClauseTracker::new();
        for kind in kinds {
            if let Err(violation) = tracker.advance(*kind) {
                panic!("setup clause {kind} rejected: {violation:?}");
            }
        }
        tracker
    }

    #[test]
    fn accepts_the_canonical_order() {
        let tracker = tracker_after(&[
            ClauseKind::Given,
            ClauseKind::And,
            ClauseKind::When,
            ClauseKind::Then,
            ClauseKind::But,
        ]);
        assert!(tracker.missing(ClauseCheck::Strict).is_empty());
    }

    #[rstest]
    #[case(&[], ClauseKind::When, ClauseKind::Given)]
    #[case(&[], ClauseKind::Then, ClauseKind::When)]
    #[case(&[ClauseKind::Given], ClauseKind::Then, ClauseKind::When)]
    fn rejects_clauses_without_their_prerequisite(
        #[case] before: &[ClauseKind],
        #[case] clause: ClauseKind,
        #[case] required: ClauseKind,
    ) {
        let mut tracker = tracker_after(before);
        let snapshot = tracker;
        assert_eq!(
            tracker.advance(clause),
            Err(OrderViolation::Requires { clause, required })
        );
        assert_eq!(tracker, snapshot, "rejected clause must not change state");
    }

    #[rstest]
    #[case(ClauseKind::And)]
    #[case(ClauseKind::But)]
    fn rejects_leading_conjunctions(#[case] clause: ClauseKind) {
        let mut tracker = ClauseTracker::new();
        assert_eq!(
            tracker.advance(clause),
            Err(OrderViolation::Dangling { clause })
        );
    }

    #[test]
    fn permits_repeated_and_revisited_clauses() {
        let tracker = tracker_after(&[
            ClauseKind::Given,
            ClauseKind::When,
            ClauseKind::Then,
            ClauseKind::Given,
            ClauseKind::Then,
        ]);
        assert!(tracker.has_seen(ClauseKind::Then));
    }

    #[rstest]
    #[case(ClauseCheck::Strict, vec![ClauseKind::Given, ClauseKind::When, ClauseKind::Then])]
    #[case(ClauseCheck::Lenient, vec![])]
    fn untouched_tracker_depends_on_check(
        #[case] check: ClauseCheck,
        #[case] expected: Vec<ClauseKind>,
    ) {
        assert_eq!(ClauseTracker::new().missing(check), expected);
    }

    #[test]
    fn lenient_check_still_reports_partial_scenarios() {
        let tracker = tracker_after(&[ClauseKind::Given]);
        assert_eq!(
            tracker.missing(ClauseCheck::Lenient),
            vec![ClauseKind::When, ClauseKind::Then]
        );
    }
}
