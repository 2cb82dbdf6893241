//! Argument parsing for `#[scenario]` and `#[bdd_feature]`.
//!
//! `#[scenario]` takes a required description literal followed by optional
//! `feature`, `check`, `output` and `host` arguments. Duplicates are rejected
//! and policy identifiers are validated against the policy crate so typos
//! surface at the call site.

use std::str::FromStr;

use gwt_bdd_policy::{ClauseCheck, HostFramework, OutputMode, PolicyParseError};
use syn::{
    Ident, LitStr,
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    token::Comma,
};

pub(crate) struct ScenarioArgs {
    pub(crate) description: LitStr,
    pub(crate) feature: Option<LitStr>,
    pub(crate) check: Option<ClauseCheck>,
    pub(crate) output: Option<OutputMode>,
    pub(crate) host: Option<(HostFramework, Ident)>,
}

enum ScenarioArg {
    Description(LitStr),
    Feature(LitStr),
    Check(Ident),
    Output(Ident),
    Host(Ident),
}

impl Parse for ScenarioArg {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.peek(LitStr) {
            return Ok(Self::Description(input.parse()?));
        }
        let ident: Ident = input.parse()?;
        input.parse::<syn::token::Eq>()?;
        if ident == "description" {
            Ok(Self::Description(input.parse()?))
        } else if ident == "feature" {
            Ok(Self::Feature(input.parse()?))
        } else if ident == "check" {
            Ok(Self::Check(input.parse()?))
        } else if ident == "output" {
            Ok(Self::Output(input.parse()?))
        } else if ident == "host" {
            Ok(Self::Host(input.parse()?))
        } else {
            Err(syn::Error::new(
                ident.span(),
                "expected `description`, `feature`, `check`, `output`, or `host`",
            ))
        }
    }
}

fn parse_policy<T>(ident: &Ident) -> syn::Result<T>
where
    T: FromStr<Err = PolicyParseError>,
{
    ident
        .to_string()
        .parse()
        .map_err(|err: PolicyParseError| syn::Error::new(ident.span(), err.to_string()))
}

fn duplicate(span: proc_macro2::Span, name: &str) -> syn::Error {
    syn::Error::new(span, format!("duplicate `{name}` argument"))
}

impl Parse for ScenarioArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        let args = Punctuated::<ScenarioArg, Comma>::parse_terminated(input)?;
        let mut description = None;
        let mut feature = None;
        let mut check = None;
        let mut output = None;
        let mut host = None;

        for arg in args {
            match arg {
                ScenarioArg::Description(lit) => {
                    if description.is_some() {
                        return Err(duplicate(lit.span(), "description"));
                    }
                    description = Some(lit);
                }
                ScenarioArg::Feature(lit) => {
                    if feature.is_some() {
                        return Err(duplicate(lit.span(), "feature"));
                    }
                    feature = Some(lit);
                }
                ScenarioArg::Check(ident) => {
                    if check.is_some() {
                        return Err(duplicate(ident.span(), "check"));
                    }
                    check = Some(parse_policy(&ident)?);
                }
                ScenarioArg::Output(ident) => {
                    if output.is_some() {
                        return Err(duplicate(ident.span(), "output"));
                    }
                    output = Some(parse_policy(&ident)?);
                }
                ScenarioArg::Host(ident) => {
                    if host.is_some() {
                        return Err(duplicate(ident.span(), "host"));
                    }
                    host = Some((parse_policy(&ident)?, ident));
                }
            }
        }

        let description =
            description.ok_or_else(|| input.error("a scenario description is required"))?;

        Ok(Self {
            description,
            feature,
            check,
            output,
            host,
        })
    }
}

/// The single description literal accepted by `#[bdd_feature]`.
pub(crate) struct FeatureArgs {
    pub(crate) description: LitStr,
}

impl Parse for FeatureArgs {
    fn parse(input: ParseStream<'_>) -> syn::Result<Self> {
        if input.is_empty() {
            return Err(input.error("a feature description is required"));
        }
        let description = input.parse()?;
        input.parse::<Option<Comma>>()?;
        if !input.is_empty() {
            return Err(input.error("`bdd_feature` takes a single description literal"));
        }
        Ok(Self { description })
    }
}

#[cfg(test)]
#[expect(
    clippy::expect_used,
    reason = "test code uses infallible unwraps for clarity"
)]
mod tests {
    use super::{FeatureArgs, ScenarioArgs};
    use gwt_bdd_policy::{ClauseCheck, HostFramework, OutputMode};
    use quote::quote;
    use rstest::rstest;

    fn parse_error(tokens: proc_macro2::TokenStream) -> String {
        match syn::parse2::<ScenarioArgs>(tokens) {
            Ok(_) => panic!("parsing should fail"),
            Err(err) => err.to_string(),
        }
    }

    #[test]
    fn parses_description_only() {
        let args: ScenarioArgs =
            syn::parse2(quote!("withdrawal")).expect("description parses");
        assert_eq!(args.description.value(), "withdrawal");
        assert!(args.feature.is_none());
        assert!(args.check.is_none());
        assert!(args.output.is_none());
        assert!(args.host.is_none());
    }

    #[test]
    fn parses_every_argument() {
        let args: ScenarioArgs = syn::parse2(quote!(
            "withdrawal",
            feature = "cash",
            check = lenient,
            output = deferred,
            host = rstest,
        ))
        .expect("arguments parse");
        assert_eq!(args.feature.map(|lit| lit.value()).as_deref(), Some("cash"));
        assert_eq!(args.check, Some(ClauseCheck::Lenient));
        assert_eq!(args.output, Some(OutputMode::Deferred));
        assert_eq!(args.host.map(|(host, _)| host), Some(HostFramework::Rstest));
    }

    #[test]
    fn accepts_named_description() {
        let args: ScenarioArgs =
            syn::parse2(quote!(check = strict, description = "named")).expect("named parses");
        assert_eq!(args.description.value(), "named");
        assert_eq!(args.check, Some(ClauseCheck::Strict));
    }

    #[rstest]
    #[case::missing_description(quote!(check = strict), "description is required")]
    #[case::empty(quote!(), "description is required")]
    #[case::duplicate_description(quote!("a", "b"), "duplicate `description`")]
    #[case::duplicate_feature(quote!("a", feature = "x", feature = "y"), "duplicate `feature`")]
    #[case::duplicate_check(quote!("a", check = strict, check = lenient), "duplicate `check`")]
    #[case::duplicate_output(quote!("a", output = deferred, output = deferred), "duplicate `output`")]
    #[case::duplicate_host(quote!("a", host = rstest, host = libtest), "duplicate `host`")]
    #[case::unknown_key(quote!("a", colour = "red"), "expected `description`")]
    #[case::unknown_check(quote!("a", check = loose), "unknown clause check `loose`")]
    #[case::unknown_output(quote!("a", output = later), "unknown output mode `later`")]
    #[case::unknown_host(quote!("a", host = nextest), "unknown host framework `nextest`")]
    fn rejects_invalid_arguments(#[case] tokens: proc_macro2::TokenStream, #[case] expected: &str) {
        let message = parse_error(tokens);
        assert!(
            message.contains(expected),
            "expected `{expected}` in `{message}`"
        );
    }

    #[test]
    fn feature_args_require_a_single_literal() {
        let args: FeatureArgs = syn::parse2(quote!("Cash withdrawal")).expect("feature parses");
        assert_eq!(args.description.value(), "Cash withdrawal");
        assert!(syn::parse2::<FeatureArgs>(quote!()).is_err());
        assert!(syn::parse2::<FeatureArgs>(quote!("a", "b")).is_err());
    }
}
