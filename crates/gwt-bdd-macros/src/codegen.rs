//! Code generation utilities for the attribute macros.
//!
//! Generated code names the runtime through fully-qualified paths
//! (`::gwt_bdd::…`) so the macros crate does not depend on the runtime crate
//! at compile-time.

use gwt_bdd_policy::{ClauseCheck, HostFramework, OutputMode, is_test_registration_path};
use proc_macro_crate::{FoundCrate, crate_name};
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{format_ident, quote};

use crate::args::ScenarioArgs;

/// Name of the local binding holding the scenario guard in generated bodies.
pub(crate) const GUARD_BINDING: &str = "__gwt_bdd_scenario";

/// Return a token stream pointing to the `gwt_bdd` crate or its renamed form.
pub(crate) fn gwt_bdd_path() -> TokenStream2 {
    resolve_crate_path("gwt-bdd", "gwt_bdd")
}

fn resolve_crate_path(crate_name_str: &str, default_ident: &str) -> TokenStream2 {
    match crate_name(crate_name_str) {
        Ok(found) => {
            let ident = match found {
                FoundCrate::Itself => Ident::new(default_ident, Span::call_site()),
                FoundCrate::Name(name) => Ident::new(&name, Span::call_site()),
            };
            quote! { ::#ident }
        }
        Err(err) => handle_missing_crate(crate_name_str, &err),
    }
}

#[cfg(test)]
fn handle_missing_crate(crate_name_str: &str, _: &proc_macro_crate::Error) -> TokenStream2 {
    // Unit tests expand outside any consumer manifest.
    let ident = Ident::new(&crate_name_str.replace('-', "_"), Span::call_site());
    quote! { ::#ident }
}

#[cfg(not(test))]
fn handle_missing_crate(crate_name_str: &str, err: &proc_macro_crate::Error) -> TokenStream2 {
    panic!("{crate_name_str} crate not found: {err}");
}

/// Tokens for an attribute path given as segments, e.g. `rstest::rstest`.
pub(crate) fn attribute_path(segments: &[&str]) -> TokenStream2 {
    let idents = segments
        .iter()
        .map(|segment| Ident::new(segment, Span::call_site()));
    if segments.len() > 1 {
        quote! { ::#(#idents)::* }
    } else {
        quote! { #(#idents)::* }
    }
}

/// The registration attribute for `host`.
pub(crate) fn registration_attribute(host: HostFramework) -> TokenStream2 {
    let path = attribute_path(host.test_attribute_path());
    quote! { #[#path] }
}

/// Whether `attr` already registers the function with a test framework.
pub(crate) fn registers_test(attr: &syn::Attribute) -> bool {
    let segments: Vec<String> = attr
        .path()
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    is_test_registration_path(&segments)
}

fn clause_check_tokens(runtime: &TokenStream2, check: ClauseCheck) -> TokenStream2 {
    match check {
        ClauseCheck::Strict => quote! { #runtime::ClauseCheck::Strict },
        ClauseCheck::Lenient => quote! { #runtime::ClauseCheck::Lenient },
    }
}

fn output_mode_tokens(runtime: &TokenStream2, mode: OutputMode) -> TokenStream2 {
    match mode {
        OutputMode::Immediate => quote! { #runtime::OutputMode::Immediate },
        OutputMode::Deferred => quote! { #runtime::OutputMode::Deferred },
    }
}

/// The `let` statement entering the scenario guard.
///
/// Unset policies are left to the runtime configuration.
pub(crate) fn guard_statement(args: &ScenarioArgs) -> TokenStream2 {
    let runtime = gwt_bdd_path();
    let binding = format_ident!("{}", GUARD_BINDING);
    let description = &args.description;
    let feature = args
        .feature
        .as_ref()
        .map(|feature| quote! { .feature(#feature) });
    let check = args.check.map(|check| {
        let check = clause_check_tokens(&runtime, check);
        quote! { .check(#check) }
    });
    let output = args.output.map(|mode| {
        let mode = output_mode_tokens(&runtime, mode);
        quote! { .output(#mode) }
    });
    quote! {
        let #binding = #runtime::Scenario::builder(#description)
            #feature
            #check
            #output
            .location(::std::file!(), ::std::line!())
            .enter();
    }
}
