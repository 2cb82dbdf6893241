//! Implementation of the `#[bdd_feature]` macro.

use proc_macro::TokenStream;
use proc_macro2::{TokenStream as TokenStream2, TokenTree};
use quote::quote;
use syn::{Attribute, Item, ItemMod, LitStr, Meta};

use super::error_to_tokens;
use crate::args::{FeatureArgs, ScenarioArgs};

/// Attach a feature description to the scenarios of an inline module.
pub(crate) fn bdd_feature(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = match syn::parse::<FeatureArgs>(attr) {
        Ok(args) => args,
        Err(err) => return error_to_tokens(&err),
    };
    let module = match syn::parse::<ItemMod>(item) {
        Ok(module) => module,
        Err(err) => return error_to_tokens(&err),
    };
    match expand(&args, module) {
        Ok(tokens) => tokens.into(),
        Err(err) => error_to_tokens(&err),
    }
}

pub(super) fn expand(args: &FeatureArgs, mut module: ItemMod) -> syn::Result<TokenStream2> {
    let Some((_, items)) = module.content.as_mut() else {
        return Err(syn::Error::new_spanned(
            &module,
            "`bdd_feature` requires an inline module body; \
             attribute macros cannot see the items of `mod name;`",
        ));
    };
    attach_feature(items, &args.description);
    Ok(quote! { #module })
}

fn attach_feature(items: &mut [Item], feature: &LitStr) {
    for item in items {
        match item {
            Item::Fn(func) => {
                for attr in func.attrs.iter_mut().filter(|attr| is_named(attr, "scenario")) {
                    add_feature_argument(attr, feature);
                }
            }
            Item::Mod(nested) if !nested.attrs.iter().any(|attr| is_named(attr, "bdd_feature")) => {
                if let Some((_, nested_items)) = nested.content.as_mut() {
                    attach_feature(nested_items, feature);
                }
            }
            _ => {}
        }
    }
}

/// Whether `attr` is `#[name]` or `#[gwt_bdd_macros::name]`.
///
/// Attributes of the same name from other crates are left alone.
fn is_named(attr: &Attribute, name: &str) -> bool {
    let segments: Vec<String> = attr
        .path()
        .segments
        .iter()
        .map(|segment| segment.ident.to_string())
        .collect();
    match segments.as_slice() {
        [only] => only == name,
        [krate, last] => krate == "gwt_bdd_macros" && last == name,
        _ => false,
    }
}

/// Append `feature = "..."` unless the scenario already names one.
///
/// Arguments that fail to parse are left alone so `#[scenario]` reports
/// them with its own spans.
fn add_feature_argument(attr: &mut Attribute, feature: &LitStr) {
    let Meta::List(list) = &mut attr.meta else {
        return;
    };
    let Ok(args) = list.parse_args::<ScenarioArgs>() else {
        return;
    };
    if args.feature.is_some() {
        return;
    }
    let tokens = &list.tokens;
    let trailing_comma = matches!(
        tokens.clone().into_iter().last(),
        Some(TokenTree::Punct(punct)) if punct.as_char() == ','
    );
    list.tokens = if trailing_comma {
        quote! { #tokens feature = #feature }
    } else {
        quote! { #tokens, feature = #feature }
    };
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses infallible unwraps for clarity"
)]
mod tests {
    use super::expand;
    use crate::args::FeatureArgs;
    use quote::quote;
    use syn::{ItemMod, parse_quote};

    fn expand_module(module: ItemMod) -> syn::Result<String> {
        let args: FeatureArgs = syn::parse2(quote!("Cash withdrawal")).expect("feature parses");
        expand(&args, module).map(|tokens| tokens.to_string())
    }

    #[test]
    fn adds_feature_to_direct_scenarios() {
        let expanded = expand_module(parse_quote! {
            mod withdrawal {
                #[scenario("sufficient funds")]
                fn sufficient_funds() {}

                fn helper() {}
            }
        })
        .expect("expansion succeeds");
        assert!(
            expanded.contains(
                "# [scenario (\"sufficient funds\" , feature = \"Cash withdrawal\")]"
            ),
            "{expanded}"
        );
        assert_eq!(expanded.matches("feature =").count(), 1);
    }

    #[test]
    fn keeps_explicit_features() {
        let expanded = expand_module(parse_quote! {
            mod withdrawal {
                #[gwt_bdd_macros::scenario("own feature", feature = "Refunds")]
                fn own_feature() {}
            }
        })
        .expect("expansion succeeds");
        assert!(expanded.contains("feature = \"Refunds\""), "{expanded}");
        assert!(!expanded.contains("Cash withdrawal"), "{expanded}");
    }

    #[test]
    fn handles_trailing_commas() {
        let expanded = expand_module(parse_quote! {
            mod withdrawal {
                #[scenario("trailing", check = strict,)]
                fn trailing() {}
            }
        })
        .expect("expansion succeeds");
        assert!(
            expanded.contains("check = strict , feature = \"Cash withdrawal\""),
            "{expanded}"
        );
    }

    #[test]
    fn descends_into_nested_modules_without_their_own_feature() {
        let expanded = expand_module(parse_quote! {
            mod outer {
                mod inner {
                    #[scenario("nested")]
                    fn nested() {}
                }

                #[bdd_feature("Other")]
                mod other {
                    #[scenario("separate")]
                    fn separate() {}
                }
            }
        })
        .expect("expansion succeeds");
        assert!(
            expanded.contains("\"nested\" , feature = \"Cash withdrawal\""),
            "{expanded}"
        );
        assert!(expanded.contains("# [scenario (\"separate\")]"), "{expanded}");
    }

    #[test]
    fn ignores_same_named_attributes_from_other_crates() {
        let expanded = expand_module(parse_quote! {
            mod withdrawal {
                #[other_crate::scenario("foreign")]
                fn foreign() {}

                #[other_crate::bdd_feature("Elsewhere")]
                mod tagged {
                    #[scenario("still ours")]
                    fn still_ours() {}
                }
            }
        })
        .expect("expansion succeeds");
        assert!(
            expanded.contains("# [other_crate :: scenario (\"foreign\")]"),
            "{expanded}"
        );
        assert!(
            expanded.contains("\"still ours\" , feature = \"Cash withdrawal\""),
            "{expanded}"
        );
    }

    #[test]
    fn rejects_out_of_line_modules() {
        let err = expand_module(parse_quote! { mod withdrawal; })
            .expect_err("out-of-line modules are rejected");
        assert!(err.to_string().contains("inline module body"));
    }
}
