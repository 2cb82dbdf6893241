//! Implementation of the `#[scenario]` macro.

use gwt_bdd_policy::HostFramework;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{FnArg, ItemFn};

use super::error_to_tokens;
use crate::args::ScenarioArgs;
use crate::codegen::{guard_statement, registers_test, registration_attribute};

/// Install a scenario guard in a test function and register the function
/// with its host framework.
pub(crate) fn scenario(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match syn::parse::<ScenarioArgs>(attr) {
        Ok(args) => args,
        Err(err) => return error_to_tokens(&err),
    };
    let func = match syn::parse::<ItemFn>(item) {
        Ok(func) => func,
        Err(err) => return error_to_tokens(&err),
    };
    match expand(&args, func) {
        Ok(tokens) => tokens.into(),
        Err(err) => error_to_tokens(&err),
    }
}

/// Pick the registration attribute to add, if any.
///
/// An attribute already registering the function wins over inference; an
/// explicit `host` alongside one is rejected since the two would disagree.
fn registration(args: &ScenarioArgs, func: &ItemFn) -> syn::Result<Option<TokenStream2>> {
    let existing = func.attrs.iter().find(|attr| registers_test(attr));
    match (existing, &args.host) {
        (Some(attr), Some((_, ident))) => {
            let mut err = syn::Error::new(
                ident.span(),
                "`host` cannot be combined with an explicit test attribute",
            );
            err.combine(syn::Error::new_spanned(
                attr,
                "remove this attribute or the `host` argument",
            ));
            Err(err)
        }
        (Some(_), None) => Ok(None),
        (None, Some((host, _))) => Ok(Some(registration_attribute(*host))),
        (None, None) => Ok(Some(registration_attribute(HostFramework::infer(
            func.sig.inputs.len(),
        )))),
    }
}

pub(super) fn expand(args: &ScenarioArgs, mut func: ItemFn) -> syn::Result<TokenStream2> {
    if let Some(FnArg::Receiver(receiver)) = func.sig.inputs.first() {
        return Err(syn::Error::new_spanned(
            receiver,
            "`#[scenario]` cannot be applied to methods",
        ));
    }
    let registration = registration(args, &func)?;
    let guard: syn::Stmt = syn::parse2(guard_statement(args))?;
    func.block.stmts.insert(0, guard);
    Ok(quote! {
        #registration
        #func
    })
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses infallible unwraps for clarity"
)]
mod tests {
    use super::expand;
    use crate::args::ScenarioArgs;
    use quote::quote;
    use syn::{ItemFn, parse_quote};

    fn expand_to_string(args: proc_macro2::TokenStream, func: ItemFn) -> String {
        let args: ScenarioArgs = syn::parse2(args).expect("arguments parse");
        expand(&args, func).expect("expansion succeeds").to_string()
    }

    fn expand_error(args: proc_macro2::TokenStream, func: ItemFn) -> String {
        let args: ScenarioArgs = syn::parse2(args).expect("arguments parse");
        match expand(&args, func) {
            Ok(tokens) => panic!("expansion should fail, got {tokens}"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn registers_parameterless_functions_with_libtest() {
        let expanded = expand_to_string(
            quote!("withdrawal"),
            parse_quote! {
                fn withdrawal() {
                    given!("an account");
                }
            },
        );
        assert!(expanded.starts_with("# [test] fn withdrawal ()"), "{expanded}");
        assert!(
            expanded.contains(
                "let __gwt_bdd_scenario = :: gwt_bdd :: Scenario :: builder (\"withdrawal\")"
            ),
            "{expanded}"
        );
        assert!(expanded.contains(". location (:: std :: file ! () , :: std :: line ! ()) . enter ()"));
        assert!(!expanded.contains(". check ("), "unset policies stay with the runtime");
    }

    #[test]
    fn guard_precedes_the_function_body() {
        let expanded = expand_to_string(
            quote!("ordering"),
            parse_quote! {
                fn ordering() {
                    first_statement();
                }
            },
        );
        let guard = expanded.find("__gwt_bdd_scenario").expect("guard emitted");
        let body = expanded.find("first_statement").expect("body kept");
        assert!(guard < body);
    }

    #[test]
    fn registers_functions_with_parameters_with_rstest() {
        let expanded = expand_to_string(
            quote!("fixtures"),
            parse_quote! {
                #[case(1)]
                fn fixtures(#[case] amount: u32) {}
            },
        );
        assert!(
            expanded.starts_with("# [:: rstest :: rstest] # [case (1)]"),
            "{expanded}"
        );
    }

    #[test]
    fn keeps_existing_registration_attributes() {
        let expanded = expand_to_string(
            quote!("async"),
            parse_quote! {
                #[tokio::test]
                async fn runs_async() {}
            },
        );
        assert!(expanded.starts_with("# [tokio :: test]"), "{expanded}");
        assert_eq!(expanded.matches("test]").count(), 1);
    }

    #[test]
    fn explicit_host_overrides_inference() {
        let expanded = expand_to_string(
            quote!("explicit", host = rstest),
            parse_quote! {
                fn explicit() {}
            },
        );
        assert!(expanded.starts_with("# [:: rstest :: rstest]"), "{expanded}");
    }

    #[test]
    fn forwards_policies_and_feature() {
        let expanded = expand_to_string(
            quote!("policies", feature = "cash", check = lenient, output = deferred),
            parse_quote! {
                fn policies() {}
            },
        );
        assert!(expanded.contains(". feature (\"cash\")"), "{expanded}");
        assert!(
            expanded.contains(". check (:: gwt_bdd :: ClauseCheck :: Lenient)"),
            "{expanded}"
        );
        assert!(
            expanded.contains(". output (:: gwt_bdd :: OutputMode :: Deferred)"),
            "{expanded}"
        );
    }

    #[test]
    fn rejects_host_alongside_test_attribute() {
        let message = expand_error(
            quote!("conflict", host = libtest),
            parse_quote! {
                #[test]
                fn conflict() {}
            },
        );
        assert!(message.contains("`host` cannot be combined"), "{message}");
    }

    #[test]
    fn rejects_methods() {
        let message = expand_error(
            quote!("method"),
            parse_quote! {
                fn method(&self) {}
            },
        );
        assert!(message.contains("cannot be applied to methods"), "{message}");
    }
}
