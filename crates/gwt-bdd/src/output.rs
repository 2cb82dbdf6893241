//! Narrative output.
//!
//! Scenarios describe themselves as a sequence of [`NarrativeLine`]s written
//! to an [`OutputSink`]. The default sink prints through `println!` so the
//! host test harness captures the narrative together with the test's own
//! output and shows it only for failing tests.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use gwt_bdd_policy::PolicyParseError;

use crate::clause::ClauseKind;

const SCENARIO_INDENT: &str = "    ";
const CLAUSE_INDENT: &str = "        ";
const CONJUNCTION_INDENT: &str = "          ";

/// One line of scenario narrative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeLine {
    /// Header naming the feature a scenario belongs to.
    Feature(String),
    /// Header naming the scenario.
    Scenario(String),
    /// A recorded clause.
    Clause {
        /// Keyword of the clause.
        kind: ClauseKind,
        /// Free text supplied by the test.
        text: String,
    },
    /// A failure detected by the scenario guard.
    Error {
        /// Description of the failing scenario.
        scenario: String,
        /// Localized failure message.
        message: String,
    },
}

impl NarrativeLine {
    /// Render the line with its indentation.
    ///
    /// # Examples
    ///
    /// ```
    /// use gwt_bdd::{ClauseKind, NarrativeLine};
    ///
    /// let line = NarrativeLine::Clause { kind: ClauseKind::And, text: "a receipt".into() };
    /// assert_eq!(line.render(), "          AND a receipt");
    /// assert_eq!(NarrativeLine::Scenario("refund".into()).render(), "    SCENARIO refund");
    /// ```
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Returns `true` for error lines.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl fmt::Display for NarrativeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature(text) => write!(f, "FEATURE {text}"),
            Self::Scenario(text) => write!(f, "{SCENARIO_INDENT}SCENARIO {text}"),
            Self::Clause { kind, text } => {
                let indent = if kind.is_conjunction() {
                    CONJUNCTION_INDENT
                } else {
                    CLAUSE_INDENT
                };
                write!(f, "{indent}{kind} {text}")
            }
            Self::Error { scenario, message } => write!(f, "ERROR {scenario} {message}"),
        }
    }
}

/// Destination for narrative lines.
pub trait OutputSink {
    /// Write one line.
    fn emit(&mut self, line: &NarrativeLine);
}

/// Prints narrative lines to standard output.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    #[expect(
        clippy::print_stdout,
        reason = "println! is what libtest captures per test"
    )]
    fn emit(&mut self, line: &NarrativeLine) {
        println!("{line}");
    }
}

/// Sends narrative lines to the `log` facade.
///
/// Clause lines use the `info` level and error lines the `error` level, under
/// the `gwt_bdd::narrative` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

pub(crate) const LOG_TARGET: &str = "gwt_bdd::narrative";

impl OutputSink for LogSink {
    fn emit(&mut self, line: &NarrativeLine) {
        if line.is_error() {
            log::error!(target: LOG_TARGET, "{line}");
        } else {
            log::info!(target: LOG_TARGET, "{line}");
        }
    }
}

/// Discards every line.
#[derive(Debug, Default, Clone, Copy)]
pub struct QuietSink;

impl OutputSink for QuietSink {
    fn emit(&mut self, _line: &NarrativeLine) {}
}

/// In-memory sink whose clones share one buffer.
///
/// Hand one clone to a scenario and keep the other to inspect what it wrote.
///
/// # Examples
///
/// ```
/// use gwt_bdd::{CapturedOutput, Scenario};
///
/// let output = CapturedOutput::new();
/// {
///     let scenario = Scenario::builder("refund").sink(output.clone()).enter();
///     scenario.given("a paid order");
///     scenario.when("the customer cancels");
///     scenario.then("the payment is refunded");
/// }
/// assert_eq!(output.rendered(), vec![
///     "    SCENARIO refund",
///     "        GIVEN a paid order",
///     "        WHEN the customer cancels",
///     "        THEN the payment is refunded",
/// ]);
/// ```
#[derive(Debug, Default, Clone)]
pub struct CapturedOutput {
    lines: Rc<RefCell<Vec<NarrativeLine>>>,
}

impl CapturedOutput {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every line written so far.
    #[must_use]
    pub fn lines(&self) -> Vec<NarrativeLine> {
        self.lines.borrow().clone()
    }

    /// Every line written so far, rendered.
    #[must_use]
    pub fn rendered(&self) -> Vec<String> {
        self.lines.borrow().iter().map(NarrativeLine::render).collect()
    }

    /// Remove and return every line written so far.
    pub fn take(&self) -> Vec<NarrativeLine> {
        self.lines.borrow_mut().drain(..).collect()
    }
}

impl OutputSink for CapturedOutput {
    fn emit(&mut self, line: &NarrativeLine) {
        self.lines.borrow_mut().push(line.clone());
    }
}

/// Sink used by scenarios that do not supply their own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputTarget {
    /// [`StdoutSink`] (default).
    #[default]
    Stdout,
    /// [`LogSink`].
    Log,
    /// [`QuietSink`].
    Quiet,
}

const OUTPUT_TARGET_NAMES: &[&str] = &["stdout", "log", "quiet"];

impl OutputTarget {
    /// Build a boxed sink for this target.
    #[must_use]
    pub fn sink(self) -> Box<dyn OutputSink> {
        match self {
            Self::Stdout => Box::new(StdoutSink),
            Self::Log => Box::new(LogSink),
            Self::Quiet => Box::new(QuietSink),
        }
    }
}

impl FromStr for OutputTarget {
    type Err = PolicyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "log" => Ok(Self::Log),
            "quiet" | "none" | "off" => Ok(Self::Quiet),
            _ => Err(PolicyParseError::new(
                "output target",
                value,
                OUTPUT_TARGET_NAMES,
            )),
        }
    }
}
