//! Attribute macro implementations.

use proc_macro::TokenStream;

mod feature;
mod scenario;

pub(crate) use feature::bdd_feature;
pub(crate) use scenario::scenario;

/// Convert a `syn::Error` into a `TokenStream` for macro errors.
fn error_to_tokens(err: &syn::Error) -> TokenStream {
    err.to_compile_error().into()
}
