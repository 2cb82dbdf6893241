//! Localization of the diagnostics raised by scenario guards.
//!
//! Messages live in Fluent files embedded into the crate. A process-wide
//! loader serves every thread; tests may install a thread-local override with
//! [`ScopedLocalization`].

use std::cell::RefCell;
use std::sync::{LazyLock, PoisonError, RwLock};

use fluent::FluentArgs;
use i18n_embed::I18nEmbedError;
use i18n_embed::fluent::{FluentLanguageLoader, fluent_language_loader};
use rust_embed::RustEmbed;
use thiserror::Error;
use unic_langid::LanguageIdentifier;

/// Embedded Fluent resources shipped with the crate.
///
/// # Examples
/// ```
/// # use gwt_bdd::localization::Localizations;
/// # use i18n_embed::fluent::fluent_language_loader;
/// # use unic_langid::langid;
/// let loader = fluent_language_loader!();
/// let selected = i18n_embed::select(&loader, &Localizations, &[langid!("en-US")]).unwrap();
/// assert!(selected.contains(&langid!("en-US")));
/// ```
#[derive(RustEmbed)]
#[folder = "i18n"]
pub struct Localizations;

static LANGUAGE_LOADER: LazyLock<RwLock<FluentLanguageLoader>> = LazyLock::new(|| {
    let loader = fluent_language_loader!();
    i18n_embed::select(&loader, &Localizations, &[unic_langid::langid!("en-US")])
        .unwrap_or_else(|error| panic!("failed to load default English translations: {error}"));
    RwLock::new(loader)
});

thread_local! {
    static OVERRIDE_LOADER: RefCell<Option<FluentLanguageLoader>> = const { RefCell::new(None) };
}

/// Errors from localization setup and queries.
#[derive(Debug, Error)]
pub enum LocalizationError {
    /// The global loader lock was poisoned.
    #[error("localization state is poisoned")]
    Poisoned,
    /// Loading or selecting Fluent resources failed.
    #[error("failed to load localization resources: {0}")]
    Loader(#[from] I18nEmbedError),
}

/// RAII guard that installs a thread-local loader for its lifetime.
///
/// Each test runs on its own thread under libtest, so a guard created inside
/// a test only affects that test.
#[must_use]
pub struct ScopedLocalization {
    previous: Option<FluentLanguageLoader>,
}

impl ScopedLocalization {
    /// Load the requested locales into a dedicated loader and make it the
    /// active loader for the current thread.
    ///
    /// # Errors
    ///
    /// Returns [`LocalizationError::Loader`] if the resources cannot be loaded
    /// for the requested languages.
    pub fn new(requested: &[LanguageIdentifier]) -> Result<Self, LocalizationError> {
        let loader = fluent_language_loader!();
        i18n_embed::select(&loader, &Localizations, requested)?;
        let previous = OVERRIDE_LOADER.with(|cell| cell.replace(Some(loader)));
        Ok(Self { previous })
    }
}

impl Drop for ScopedLocalization {
    fn drop(&mut self) {
        let previous = self.previous.take();
        OVERRIDE_LOADER.with(|cell| {
            *cell.borrow_mut() = previous;
        });
    }
}

/// Replace the global loader with a preconfigured instance.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] when the global loader lock is poisoned.
pub fn install_localization_loader(loader: FluentLanguageLoader) -> Result<(), LocalizationError> {
    let mut guard = LANGUAGE_LOADER
        .write()
        .map_err(|_| LocalizationError::Poisoned)?;
    *guard = loader;
    Ok(())
}

/// Activate the best matching localizations for the provided languages.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] if the global loader lock is
/// poisoned or [`LocalizationError::Loader`] when resource selection fails.
pub fn select_localizations(
    requested: &[LanguageIdentifier],
) -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    OVERRIDE_LOADER.with(|cell| -> Result<_, LocalizationError> {
        if let Some(loader) = cell.borrow_mut().as_mut() {
            return Ok(i18n_embed::select(loader, &Localizations, requested)?);
        }
        let guard = LANGUAGE_LOADER
            .read()
            .map_err(|_| LocalizationError::Poisoned)?;
        Ok(i18n_embed::select(&*guard, &Localizations, requested)?)
    })
}

/// Query the currently active localizations.
///
/// # Errors
///
/// Returns [`LocalizationError::Poisoned`] if the loader lock is poisoned.
pub fn current_languages() -> Result<Vec<LanguageIdentifier>, LocalizationError> {
    OVERRIDE_LOADER.with(|cell| -> Result<_, LocalizationError> {
        if let Some(loader) = cell.borrow().as_ref() {
            return Ok(loader.current_languages());
        }
        let guard = LANGUAGE_LOADER
            .read()
            .map_err(|_| LocalizationError::Poisoned)?;
        Ok(guard.current_languages())
    })
}

/// Retrieve a localized string with Fluent arguments supplied via a closure.
///
/// Directional isolates inserted around placeables are removed so the result
/// can be matched verbatim, for example by `#[should_panic(expected = ..)]`.
///
/// # Examples
/// ```
/// # use gwt_bdd::localization;
/// let rendered = localization::message_with_args("clause-missing", |args| {
///     args.set("missing", "THEN");
///     args.set("count", 1);
/// });
/// assert_eq!(rendered, "THEN clause missing.");
/// ```
#[must_use]
pub fn message_with_args<F>(id: &str, configure: F) -> String
where
    F: FnOnce(&mut FluentArgs<'static>),
{
    with_loader(|loader| {
        let mut args: FluentArgs<'static> = FluentArgs::new();
        configure(&mut args);
        strip_directional_isolates(&loader.get_args_fluent(id, Some(&args)))
    })
}

fn with_loader<R>(callback: impl FnOnce(&FluentLanguageLoader) -> R) -> R {
    OVERRIDE_LOADER.with(|cell| {
        let borrow = cell.borrow();
        if let Some(loader) = borrow.as_ref() {
            return callback(loader);
        }
        drop(borrow);
        let guard = LANGUAGE_LOADER
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        callback(&guard)
    })
}

/// Remove Unicode directional isolates inserted by Fluent during interpolation.
#[must_use]
pub fn strip_directional_isolates(text: &str) -> String {
    text.chars()
        .filter(|c| !matches!(*c, '\u{2066}' | '\u{2067}' | '\u{2068}' | '\u{2069}'))
        .collect()
}

/// Panic with a localized message resolved from a Fluent ID and key-value args.
#[macro_export]
macro_rules! panic_localized {
    ($id:expr $(, $key:ident = $value:expr )* $(,)?) => {{
        let message = $crate::localization::message_with_args($id, |args| {
            $( args.set(stringify!($key), $value.to_string()); )*
        });
        panic!("{message}");
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use unic_langid::langid;

    #[test]
    fn english_is_the_default() {
        let rendered = message_with_args("clause-out-of-order", |args| {
            args.set("clause", "WHEN");
            args.set("required", "GIVEN");
        });
        assert_eq!(rendered, "WHEN clause requires a preceding GIVEN clause.");
    }

    #[test]
    fn scoped_localization_switches_language_for_this_thread() {
        let guard = match ScopedLocalization::new(&[langid!("fr")]) {
            Ok(guard) => guard,
            Err(error) => panic!("french resources should load: {error}"),
        };
        let rendered = message_with_args("clause-missing", |args| {
            args.set("missing", "WHEN");
            args.set("count", 1);
        });
        assert_eq!(rendered, "clause WHEN manquante.");
        drop(guard);
        let rendered = message_with_args("clause-missing", |args| {
            args.set("missing", "WHEN");
            args.set("count", 1);
        });
        assert_eq!(rendered, "WHEN clause missing.");
    }

    #[test]
    fn missing_clause_message_agrees_with_the_count() {
        let single = message_with_args("clause-missing", |args| {
            args.set("missing", "THEN");
            args.set("count", 1);
        });
        assert_eq!(single, "THEN clause missing.");
        let several = message_with_args("clause-missing", |args| {
            args.set("missing", "WHEN, THEN");
            args.set("count", 2);
        });
        assert_eq!(several, "WHEN, THEN clauses missing.");
    }

    #[test]
    fn select_localizations_updates_the_scoped_loader() {
        let _guard = match ScopedLocalization::new(&[langid!("en-US")]) {
            Ok(guard) => guard,
            Err(error) => panic!("english resources should load: {error}"),
        };
        let selected = match select_localizations(&[langid!("fr")]) {
            Ok(selected) => selected,
            Err(error) => panic!("french resources should be selectable: {error}"),
        };
        assert!(selected.contains(&langid!("fr")));
        let current = match current_languages() {
            Ok(current) => current,
            Err(error) => panic!("current languages should be readable: {error}"),
        };
        assert_eq!(current.first(), Some(&langid!("fr")));
        let rendered = message_with_args("clause-dangling", |args| {
            args.set("clause", "AND");
        });
        assert_eq!(rendered, "AND doit suivre GIVEN, WHEN ou THEN.");
    }

    #[test]
    fn installed_loader_serves_threads_without_an_override() {
        let loader = fluent_language_loader!();
        if let Err(error) = i18n_embed::select(&loader, &Localizations, &[langid!("en-US")]) {
            panic!("english resources should load: {error}");
        }
        if let Err(error) = install_localization_loader(loader) {
            panic!("global loader should accept a replacement: {error}");
        }
        let current = match current_languages() {
            Ok(current) => current,
            Err(error) => panic!("current languages should be readable: {error}"),
        };
        assert_eq!(current.first(), Some(&langid!("en-US")));
        let rendered = message_with_args("clause-dangling", |args| {
            args.set("clause", "BUT");
        });
        assert_eq!(rendered, "BUT must follow one of GIVEN, WHEN or THEN.");
    }

    #[test]
    fn strips_isolates() {
        assert_eq!(strip_directional_isolates("\u{2068}GIVEN\u{2069}"), "GIVEN");
    }

    #[test]
    #[should_panic(expected = "THEN clause requires a preceding WHEN clause.")]
    fn panic_localized_renders_arguments() {
        crate::panic_localized!("clause-out-of-order", clause = "THEN", required = "WHEN");
    }
}
