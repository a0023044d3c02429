//! Failure reasons and the localization hook for their messages.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Translation scope every failure message lives under.
pub const MESSAGE_SCOPE: [&str; 3] = ["mainstreet", "errors", "messages"];

/// Locale used by [`MessageTable`] when the caller gives none.
const FALLBACK_LOCALE: &str = "en";

/// Why an address was not confirmed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    /// No usable match.
    Unconfirmed,
    /// Apartment or suite present but not confirmed.
    AptUnconfirmed,
    /// Apartment or suite required but missing.
    AptMissing,
}

impl FailureReason {
    /// Translation key under [`MESSAGE_SCOPE`].
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Unconfirmed => "unconfirmed",
            Self::AptUnconfirmed => "apt_unconfirmed",
            Self::AptMissing => "apt_missing",
        }
    }

    /// Untranslated default message.
    #[must_use]
    pub fn default_message(self) -> &'static str {
        match self {
            Self::Unconfirmed => "can't be confirmed",
            Self::AptUnconfirmed => "Apartment or suite can't be confirmed",
            Self::AptMissing => "Apartment or suite is missing",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A failed verification: the reason and its (possibly localized) message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Reason.
    pub reason: FailureReason,
    /// User-facing message.
    pub message: String,
}

/// Source of translated failure messages.
pub trait MessageCatalog {
    /// Translate `key` under `scope` for `locale`, or `None` if unknown.
    fn translate(&self, key: &str, scope: &[&str], locale: Option<&str>) -> Option<String>;
}

/// Catalog that knows nothing; default messages are used verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCatalog;

impl MessageCatalog for NoCatalog {
    fn translate(&self, _key: &str, _scope: &[&str], _locale: Option<&str>) -> Option<String> {
        None
    }
}

/// Translations keyed by locale, then by reason key.
///
/// ```toml
/// [messages.fr]
/// unconfirmed = "ne peut pas être confirmée"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageTable(pub BTreeMap<String, BTreeMap<String, String>>);

impl MessageTable {
    /// Add one translation.
    pub fn insert(
        &mut self,
        locale: impl Into<String>,
        key: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.0
            .entry(locale.into())
            .or_default()
            .insert(key.into(), message.into());
    }

    /// True if there are no translations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.values().all(BTreeMap::is_empty)
    }
}

impl MessageCatalog for MessageTable {
    fn translate(&self, key: &str, scope: &[&str], locale: Option<&str>) -> Option<String> {
        if scope != MESSAGE_SCOPE.as_slice() {
            return None;
        }
        let lookup = |locale: &str| self.0.get(locale).and_then(|messages| messages.get(key));
        locale
            .and_then(lookup)
            .or_else(|| lookup(FALLBACK_LOCALE))
            .cloned()
    }
}

/// Build a failure, preferring the catalog's translation over `default`.
pub(crate) fn localize(
    catalog: &dyn MessageCatalog,
    reason: FailureReason,
    default: &str,
    locale: Option<&str>,
) -> Failure {
    let message = catalog
        .translate(reason.key(), &MESSAGE_SCOPE, locale)
        .unwrap_or_else(|| default.to_string());
    Failure { reason, message }
}
