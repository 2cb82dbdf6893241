//! Shared policy types for gwt-bdd.
//!
//! This crate centralizes the policy enums so both the runtime crate and the
//! proc-macro crate can depend on a single, canonical definition without
//! creating a proc-macro dependency cycle.
//!
//! It also provides the canonical test-registration attribute paths used by
//! macro codegen to decide whether a function is already registered with a
//! host test framework.

use std::fmt;
use std::str::FromStr;

/// Error returned when a policy value cannot be parsed from its name.
///
/// # Examples
///
/// ```
/// use gwt_bdd_policy::ClauseCheck;
///
/// let err = "sloppy".parse::<ClauseCheck>().unwrap_err();
/// assert_eq!(err.value(), "sloppy");
/// assert_eq!(err.to_string(), "unknown clause check `sloppy`; expected one of: strict, lenient");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyParseError {
    kind: &'static str,
    value: String,
    expected: &'static [&'static str],
}

impl PolicyParseError {
    /// Create an error for `value`, naming the policy `kind` and the accepted
    /// names.
    #[must_use]
    pub fn new(kind: &'static str, value: &str, expected: &'static [&'static str]) -> Self {
        Self {
            kind,
            value: value.to_owned(),
            expected,
        }
    }

    /// Returns the rejected input.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for PolicyParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown {} `{}`; expected one of: {}",
            self.kind,
            self.value,
            self.expected.join(", ")
        )
    }
}

impl std::error::Error for PolicyParseError {}

/// How strictly missing clauses are enforced when a scenario ends.
///
/// # Examples
///
/// ```
/// use gwt_bdd_policy::ClauseCheck;
///
/// assert_eq!(ClauseCheck::default(), ClauseCheck::Strict);
/// assert!(ClauseCheck::Lenient.skips_untouched());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClauseCheck {
    /// GIVEN, WHEN and THEN must all have been seen (default).
    #[default]
    Strict,
    /// Like `Strict`, but a scenario that never recorded a clause passes.
    Lenient,
}

const CLAUSE_CHECK_NAMES: &[&str] = &["strict", "lenient"];

impl ClauseCheck {
    /// Returns `true` when scenarios without any clause skip the check.
    #[must_use]
    pub const fn skips_untouched(self) -> bool {
        matches!(self, Self::Lenient)
    }

    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }
}

impl FromStr for ClauseCheck {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            _ => Err(PolicyParseError::new(
                "clause check",
                value,
                CLAUSE_CHECK_NAMES,
            )),
        }
    }
}

/// Whether THEN clauses print at once or wait in a pending queue.
///
/// # Examples
///
/// ```
/// use gwt_bdd_policy::OutputMode;
///
/// assert_eq!("deferred".parse::<OutputMode>(), Ok(OutputMode::Deferred));
/// assert!(!OutputMode::default().is_deferred());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OutputMode {
    /// Every clause is written as soon as it is recorded (default).
    #[default]
    Immediate,
    /// THEN clauses and the conjunctions after them are buffered until the
    /// scenario flushes or ends.
    Deferred,
}

const OUTPUT_MODE_NAMES: &[&str] = &["immediate", "deferred"];

impl OutputMode {
    /// Returns `true` for [`OutputMode::Deferred`].
    #[must_use]
    pub const fn is_deferred(self) -> bool {
        matches!(self, Self::Deferred)
    }

    /// Returns the lowercase name accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Immediate => "immediate",
            Self::Deferred => "deferred",
        }
    }
}

impl FromStr for OutputMode {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "immediate" => Ok(Self::Immediate),
            "deferred" => Ok(Self::Deferred),
            _ => Err(PolicyParseError::new(
                "output mode",
                value,
                OUTPUT_MODE_NAMES,
            )),
        }
    }
}

/// Test framework that registers and runs a scenario function.
///
/// # Examples
///
/// ```
/// use gwt_bdd_policy::HostFramework;
///
/// assert_eq!(HostFramework::Libtest.test_attribute_path(), &["test"]);
/// assert_eq!(HostFramework::Rstest.test_attribute_path(), &["rstest", "rstest"]);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostFramework {
    /// The built-in libtest harness, registered with `#[test]`.
    Libtest,
    /// `rstest`, registered with `#[rstest::rstest]`; supports fixtures and
    /// `#[case]` tables.
    Rstest,
}

const HOST_FRAMEWORK_NAMES: &[&str] = &["libtest", "rstest"];

/// Canonical path segments for the libtest registration attribute.
pub const LIBTEST_ATTRIBUTE_PATH: &[&str] = &["test"];

/// Canonical path segments for the rstest registration attribute.
pub const RSTEST_ATTRIBUTE_PATH: &[&str] = &["rstest", "rstest"];

const KNOWN_REGISTRATION_PATHS: [&[&str]; 7] = [
    LIBTEST_ATTRIBUTE_PATH,
    &["core", "prelude", "v1", "test"],
    &["std", "prelude", "v1", "test"],
    &["rstest"],
    RSTEST_ATTRIBUTE_PATH,
    &["tokio", "test"],
    &["test_case"],
];

impl HostFramework {
    /// Returns the path segments of the attribute registering a test with
    /// this framework.
    #[must_use]
    pub const fn test_attribute_path(self) -> &'static [&'static str] {
        match self {
            Self::Libtest => LIBTEST_ATTRIBUTE_PATH,
            Self::Rstest => RSTEST_ATTRIBUTE_PATH,
        }
    }

    /// Picks the framework for a function that does not name one: rstest when
    /// it takes parameters, libtest otherwise.
    ///
    /// # Examples
    ///
    /// ```
    /// use gwt_bdd_policy::HostFramework;
    ///
    /// assert_eq!(HostFramework::infer(0), HostFramework::Libtest);
    /// assert_eq!(HostFramework::infer(2), HostFramework::Rstest);
    /// ```
    #[must_use]
    pub const fn infer(parameter_count: usize) -> Self {
        if parameter_count == 0 {
            Self::Libtest
        } else {
            Self::Rstest
        }
    }
}

impl FromStr for HostFramework {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "libtest" | "test" => Ok(Self::Libtest),
            "rstest" => Ok(Self::Rstest),
            _ => Err(PolicyParseError::new(
                "host framework",
                value,
                HOST_FRAMEWORK_NAMES,
            )),
        }
    }
}

/// Reports whether an attribute path already registers a test function.
///
/// Path segments should be provided without a leading `::`.
///
/// # Examples
///
/// ```
/// use gwt_bdd_policy::is_test_registration_path;
///
/// assert!(is_test_registration_path(&["test"]));
/// assert!(is_test_registration_path(&["rstest"]));
/// assert!(is_test_registration_path(&["tokio", "test"]));
/// assert!(!is_test_registration_path(&["should_panic"]));
/// ```
#[must_use]
pub fn is_test_registration_path(path_segments: &[&str]) -> bool {
    KNOWN_REGISTRATION_PATHS
        .iter()
        .any(|known| path_segments == *known)
}
