//! Attribute macros turning test functions into gwt-bdd scenarios.
//!
//! `#[scenario("description")]` installs a [`Scenario`] guard for the whole
//! function body and registers the function with its host test framework:
//! `#[test]` for functions without parameters, `#[rstest::rstest]` for
//! functions taking fixtures or `#[case]` values. An existing registration
//! attribute such as `#[test]`, `#[rstest]` or `#[tokio::test]` is kept as-is.
//! `#[scenario]` must be the first attribute on the function.
//!
//! `#[bdd_feature("description")]` on an inline module attaches the feature
//! to every `#[scenario]` function inside it.
//!
//! ```ignore
//! use gwt_bdd::{given, then, when};
//! use gwt_bdd_macros::{bdd_feature, scenario};
//!
//! #[bdd_feature("Cash withdrawal")]
//! mod withdrawal {
//!     use super::*;
//!
//!     #[scenario("Account has sufficient funds")]
//!     fn sufficient_funds() {
//!         given!("the account balance is 100");
//!         when!("the customer requests 20");
//!         then!("the balance is 80");
//!     }
//! }
//! ```
//!
//! [`Scenario`]: https://docs.rs/gwt-bdd/latest/gwt_bdd/struct.Scenario.html

mod args;
mod codegen;
mod macros;

use proc_macro::TokenStream;

/// Turn a test function into a scenario.
///
/// Accepted arguments, after the description literal:
///
/// - `feature = "..."`: feature header printed before the scenario.
/// - `check = strict | lenient`: missing-clause policy; defaults to the
///   runtime configuration.
/// - `output = immediate | deferred`: whether THEN clauses are buffered.
/// - `host = libtest | rstest`: registration attribute to add.
#[proc_macro_attribute]
pub fn scenario(attr: TokenStream, item: TokenStream) -> TokenStream {
    macros::scenario(attr, item)
}

/// Attach a feature description to every `#[scenario]` in an inline module.
#[proc_macro_attribute]
pub fn bdd_feature(attr: TokenStream, item: TokenStream) -> TokenStream {
    macros::bdd_feature(attr, item)
}
