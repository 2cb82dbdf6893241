//! Clause keywords recognised by a scenario.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Keyword of a single narrative clause.
///
/// `And` and `But` are conjunctions: they extend whichever primary clause
/// came before them and never advance the scenario on their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClauseKind {
    /// Preconditions of the scenario.
    Given,
    /// The action under test.
    When,
    /// The expected outcome.
    Then,
    /// Continues the preceding clause.
    And,
    /// Continues the preceding clause with a contrasting condition.
    But,
}

impl ClauseKind {
    /// The primary clauses in the order a scenario requires them.
    pub const PRIMARY: [Self; 3] = [Self::Given, Self::When, Self::Then];

    /// Return the upper-case keyword used in narrative output.
    ///
    /// # Examples
    ///
    /// ```
    /// use gwt_bdd::ClauseKind;
    ///
    /// assert_eq!(ClauseKind::Given.label(), "GIVEN");
    /// assert_eq!(ClauseKind::But.label(), "BUT");
    /// ```
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Given => "GIVEN",
            Self::When => "WHEN",
            Self::Then => "THEN",
            Self::And => "AND",
            Self::But => "BUT",
        }
    }

    /// Returns `true` for `And` and `But`.
    #[must_use]
    pub const fn is_conjunction(self) -> bool {
        matches!(self, Self::And | Self::But)
    }
}

impl fmt::Display for ClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing a [`ClauseKind`] from a string fails.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid clause keyword: {0}")]
pub struct ClauseKindParseError(pub String);

impl FromStr for ClauseKind {
    type Err = ClauseKindParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let kind = match value.trim().to_ascii_lowercase().as_str() {
            "given" => Self::Given,
            "when" => Self::When,
            "then" => Self::Then,
            "and" => Self::And,
            "but" => Self::But,
            _ => return Err(ClauseKindParseError(value.to_owned())),
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Given", ClauseKind::Given)]
    #[case("WHEN", ClauseKind::When)]
    #[case(" then ", ClauseKind::Then)]
    #[case("and", ClauseKind::And)]
    #[case("But", ClauseKind::But)]
    fn parses_keywords_case_insensitively(#[case] text: &str, #[case] expected: ClauseKind) {
        assert_eq!(text.parse::<ClauseKind>(), Ok(expected));
    }

    #[test]
    fn rejects_unknown_keywords() {
        let err = "Whenever".parse::<ClauseKind>();
        assert_eq!(err, Err(ClauseKindParseError("Whenever".to_owned())));
    }

    #[test]
    fn only_and_but_are_conjunctions() {
        assert!(ClauseKind::And.is_conjunction());
        assert!(ClauseKind::But.is_conjunction());
        assert!(ClauseKind::PRIMARY.iter().all(|kind| !kind.is_conjunction()));
    }
}
