#![forbid(unsafe_code)]

//! Translation catalog for context-scoped UI strings.
//!
//! A [`Catalog`] holds the display strings for one locale, grouped by the
//! UI context that uses them (a dialog name, a window, a message domain).
//! It is built once when the host selects its locale and never mutated
//! afterwards, so it can be shared across threads without locking.
//!
//! The central contract: **a missing translation is never an error**.
//! [`Catalog::lookup`] returns the untranslated source string on any miss,
//! and [`Catalog::lookup_plural`] falls back to literal count substitution.
//! Incomplete localization degrades display text, never correctness.
//!
//! Placeholder markers (`%1`, `%2`, `%n`) pass through lookup untouched;
//! callers substitute values afterwards, typically via [`interp`].

pub mod catalog;
pub mod interp;
pub mod plural;

pub use catalog::{Catalog, CatalogError, ContextStrings, MessageEntry};
pub use plural::PluralRule;
