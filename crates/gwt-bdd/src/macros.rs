//! Public macro helpers exported by `gwt-bdd`.
//!
//! The macros live in a dedicated module to keep `lib.rs` small and focused on
//! type exports. They remain available at the crate root via `#[macro_export]`.

/// Record a GIVEN clause on the active scenario.
///
/// Accepts `format!`-style arguments.
///
/// # Examples
/// ```
/// use gwt_bdd::{given, start_scenario, then, when};
///
/// start_scenario!("withdrawal");
/// let amount = 100;
/// given!("an account holding {amount}");
/// when!("{} is withdrawn", amount / 2);
/// then!("the balance is {}", amount / 2);
/// ```
#[macro_export]
macro_rules! given {
    ($($arg:tt)+) => {
        $crate::given(::std::format!($($arg)+))
    };
}

/// Record a WHEN clause on the active scenario.
#[macro_export]
macro_rules! when {
    ($($arg:tt)+) => {
        $crate::when(::std::format!($($arg)+))
    };
}

/// Record a THEN clause on the active scenario.
#[macro_export]
macro_rules! then {
    ($($arg:tt)+) => {
        $crate::then(::std::format!($($arg)+))
    };
}

/// Record an AND clause on the active scenario.
#[macro_export]
macro_rules! and {
    ($($arg:tt)+) => {
        $crate::and(::std::format!($($arg)+))
    };
}

/// Record a BUT clause on the active scenario.
#[macro_export]
macro_rules! but {
    ($($arg:tt)+) => {
        $crate::but(::std::format!($($arg)+))
    };
}

/// Write the active scenario's buffered clauses.
#[macro_export]
macro_rules! flush_clauses {
    () => {
        $crate::flush()
    };
}

/// Print a FEATURE header on the active scenario, or on the default sink when
/// no scenario is active.
#[macro_export]
macro_rules! describe_feature {
    ($($arg:tt)+) => {
        $crate::announce_feature(::std::format!($($arg)+))
    };
}

/// Start a scenario that lasts until the end of the enclosing block.
///
/// The scenario uses [`ClauseCheck::Lenient`](crate::ClauseCheck::Lenient)
/// unless `check = strict` is given, so a block that never records a clause
/// passes. `output = deferred` buffers THEN clauses.
///
/// # Examples
/// ```
/// use gwt_bdd::{and, given, start_scenario, then, when};
///
/// fn transfer() {
///     start_scenario!("transfer between accounts", check = strict, output = deferred);
///     given!("two accounts");
///     when!("10 is transferred");
///     then!("the balances change by 10");
///     and!("the transfer is logged");
/// }
///
/// transfer();
/// ```
///
/// A scenario that never finishes its narrative fails when the block ends:
///
/// ```should_panic
/// use gwt_bdd::{given, start_scenario};
///
/// start_scenario!("half a story", check = strict);
/// given!("a beginning");
/// ```
#[macro_export]
macro_rules! start_scenario {
    ($description:expr $(, check = $check:ident)? $(, output = $output:ident)? $(,)?) => {
        let __gwt_bdd_inline_scenario = $crate::Scenario::builder($description)
            .check($crate::__clause_check!(lenient $($check)?))
            .output($crate::__output_mode!(immediate $($output)?))
            .location(::std::file!(), ::std::line!())
            .enter();
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __clause_check {
    (strict) => {
        $crate::ClauseCheck::Strict
    };
    (lenient) => {
        $crate::ClauseCheck::Lenient
    };
    ($default:ident $chosen:ident) => {
        $crate::__clause_check!($chosen)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __output_mode {
    (immediate) => {
        $crate::OutputMode::Immediate
    };
    (deferred) => {
        $crate::OutputMode::Deferred
    };
    ($default:ident $chosen:ident) => {
        $crate::__output_mode!($chosen)
    };
}
