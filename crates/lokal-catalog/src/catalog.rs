//! Context-scoped translation catalog with source-string fallback.
//!
//! # Invariants
//!
//! 1. **Lookups are total**: `lookup` and `lookup_plural` always return a
//!    displayable string; no query-time operation can fail.
//!
//! 2. **Miss means identity**: a `(context, source)` pair with no entry
//!    resolves to `source` itself (plus literal `%n` substitution for the
//!    plural path).
//!
//! 3. **Plural selection stays in bounds**: the rule's form index is
//!    clamped to the stored form list, so a short list never panics and a
//!    long list is simply truncated at selection.
//!
//! 4. **Thread safety**: a `Catalog` is `Send + Sync`; all data is owned
//!    strings and nothing mutates after construction.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Missing context | Context never loaded | Falls back to source |
//! | Missing source | String not translated | Falls back to source |
//! | Short form list | Fewer forms than the rule expects | Clamped index |
//! | Empty selected form | Partially translated numerus entry | Falls back to source |
//! | Duplicate source | Same source twice in one context | `Err` at build time |
//! | Empty form list | Numerus entry with no variants | `Err` at build time |

use std::borrow::Cow;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::interp;
use crate::plural::PluralRule;

/// Errors from catalog construction.
///
/// Query operations never produce these; only the build path (resource
/// loading) can observe them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The same source string was inserted twice into one context.
    DuplicateSource(String),
    /// A numerus entry was inserted with no stored forms at all.
    EmptyPluralForms(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateSource(source) => {
                write!(f, "duplicate source string '{source}'")
            }
            Self::EmptyPluralForms(source) => {
                write!(f, "numerus entry '{source}' has no forms")
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// A single translation entry: one template, or ordered numerus forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageEntry {
    /// A plain translation template.
    Simple(String),
    /// Numerus forms in resource order; never empty.
    Plural(Vec<String>),
}

/// Translated strings for a single UI context, keyed by source string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextStrings {
    messages: HashMap<String, MessageEntry>,
}

impl ContextStrings {
    /// Create an empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a plain translation.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSource`] if `source` is already
    /// present in this context.
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        translation: impl Into<String>,
    ) -> Result<(), CatalogError> {
        match self.messages.entry(source.into()) {
            Entry::Occupied(occupied) => {
                Err(CatalogError::DuplicateSource(occupied.key().clone()))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(MessageEntry::Simple(translation.into()));
                Ok(())
            }
        }
    }

    /// Insert a numerus entry with its forms in resource order.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateSource`] on a repeated source and
    /// [`CatalogError::EmptyPluralForms`] if `forms` is empty.
    pub fn insert_plural(
        &mut self,
        source: impl Into<String>,
        forms: Vec<String>,
    ) -> Result<(), CatalogError> {
        let source = source.into();
        if forms.is_empty() {
            return Err(CatalogError::EmptyPluralForms(source));
        }
        match self.messages.entry(source) {
            Entry::Occupied(occupied) => {
                Err(CatalogError::DuplicateSource(occupied.key().clone()))
            }
            Entry::Vacant(vacant) => {
                vacant.insert(MessageEntry::Plural(forms));
                Ok(())
            }
        }
    }

    /// Look up an entry by source string.
    #[must_use]
    pub fn get(&self, source: &str) -> Option<&MessageEntry> {
        self.messages.get(source)
    }

    /// Number of entries in this context.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the context holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Iterate over the source strings in this context.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.messages.keys().map(String::as_str)
    }
}

/// The full set of loaded translation entries for one locale.
///
/// Built once on the startup path, immutable afterwards.
///
/// # Example
///
/// ```
/// use lokal_catalog::{Catalog, ContextStrings};
///
/// # fn main() -> Result<(), lokal_catalog::CatalogError> {
/// let mut page = ContextStrings::new();
/// page.insert("&New", "&Yeni")?;
/// page.insert_plural("%n day(s)", vec!["%n gün".into()])?;
///
/// let mut catalog = Catalog::new("tr");
/// catalog.add_context("AddressBookPage", page);
///
/// assert_eq!(catalog.lookup("AddressBookPage", "&New"), "&Yeni");
/// assert_eq!(catalog.lookup("AddressBookPage", "No"), "No");
/// assert_eq!(catalog.lookup_plural("AddressBookPage", "%n day(s)", 5), "%n gün");
/// # Ok(()) }
/// ```
#[derive(Debug, Clone)]
pub struct Catalog {
    locale: String,
    rule: PluralRule,
    contexts: HashMap<String, ContextStrings>,
}

impl Catalog {
    /// Create an empty catalog for a locale tag (e.g. `"tr"`, `"pt-BR"`).
    ///
    /// The numerus rule is derived from the tag's primary language subtag.
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        let locale = locale.into();
        let rule = PluralRule::for_locale(&locale);
        Self {
            locale,
            rule,
            contexts: HashMap::new(),
        }
    }

    /// The locale tag this catalog was loaded for.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// The numerus rule in effect for this catalog.
    #[must_use]
    pub fn plural_rule(&self) -> PluralRule {
        self.rule
    }

    /// Add (or replace) a context. Empty contexts are legal.
    pub fn add_context(&mut self, name: impl Into<String>, strings: ContextStrings) {
        self.contexts.insert(name.into(), strings);
    }

    /// Look up a context by name.
    #[must_use]
    pub fn context(&self, name: &str) -> Option<&ContextStrings> {
        self.contexts.get(name)
    }

    /// Context names, sorted for deterministic output.
    #[must_use]
    pub fn context_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.contexts.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of contexts, including empty ones.
    #[must_use]
    pub fn context_count(&self) -> usize {
        self.contexts.len()
    }

    /// Total number of entries across all contexts.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.contexts.values().map(ContextStrings::len).sum()
    }

    /// Whether the catalog holds no entries at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.message_count() == 0
    }

    /// Raw entry access, mainly for diagnostics and tests.
    #[must_use]
    pub fn entry(&self, context: &str, source: &str) -> Option<&MessageEntry> {
        self.contexts.get(context).and_then(|ctx| ctx.get(source))
    }

    /// Resolve the display string for `(context, source)`.
    ///
    /// Any miss returns `source` unchanged. A numerus entry resolved
    /// without a count yields its last stored form (the general form), or
    /// `source` when that form is empty.
    #[must_use]
    pub fn lookup<'a>(&'a self, context: &str, source: &'a str) -> &'a str {
        match self.entry(context, source) {
            Some(MessageEntry::Simple(translation)) => translation,
            Some(MessageEntry::Plural(forms)) => forms
                .last()
                .filter(|form| !form.is_empty())
                .map_or(source, String::as_str),
            None => source,
        }
    }

    /// Resolve the display template for a quantity-sensitive string.
    ///
    /// Selects among stored numerus forms via the locale's rule, clamping
    /// the index to the available forms. On a total miss — or when the
    /// selected form is empty, as in a partially translated numerus entry —
    /// the literal count is substituted for `%n` in the untranslated
    /// source.
    ///
    /// The returned template still carries its other placeholder markers;
    /// substitution of those is the caller's step.
    #[must_use]
    pub fn lookup_plural<'a>(&'a self, context: &str, source: &'a str, count: i64) -> Cow<'a, str> {
        match self.entry(context, source) {
            Some(MessageEntry::Simple(translation)) => Cow::Borrowed(translation.as_str()),
            Some(MessageEntry::Plural(forms)) => {
                let index = self
                    .rule
                    .form_index(count)
                    .min(forms.len().saturating_sub(1));
                match forms.get(index) {
                    Some(form) if !form.is_empty() => Cow::Borrowed(form.as_str()),
                    _ => count_fallback(source, count),
                }
            }
            None => count_fallback(source, count),
        }
    }
}

/// Untranslated fallback for the plural path: the literal count spliced
/// into the source string, or the source itself when it has no `%n`.
fn count_fallback(source: &str, count: i64) -> Cow<'_, str> {
    if source.contains("%n") {
        Cow::Owned(interp::substitute_count(source, count))
    } else {
        Cow::Borrowed(source)
    }
}
