//! Load-time errors. The only fallible surface in the system.

use std::path::PathBuf;

use lokal_catalog::CatalogError;

/// Errors from loading a `.ts` translation resource.
///
/// Query-time operations on a loaded catalog never fail; everything that
/// can go wrong goes wrong here, once, at startup.
#[derive(Debug)]
pub enum LoadError {
    /// The resource file does not exist.
    Missing(PathBuf),
    /// The resource exists but could not be read.
    Io(std::io::Error),
    /// The resource is not well-formed XML.
    Xml(xmltree::ParseError),
    /// The document is well-formed XML but not a valid TS resource.
    Malformed(String),
    /// The locale tag is not a plausible language tag.
    UnsupportedLocale(String),
    /// The resource declares a different language than was requested.
    ///
    /// Compared by primary language subtag only: requesting `tr_CY` and
    /// finding `language="tr"` is not a mismatch, `de` vs `tr` is.
    LocaleMismatch {
        /// Tag the caller asked for.
        requested: String,
        /// Tag the resource declares.
        found: String,
    },
    /// An entry violated a catalog invariant (e.g. a duplicate source).
    Context {
        /// Name of the offending context.
        context: String,
        /// The underlying catalog error.
        error: CatalogError,
    },
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "translation resource not found: {}", path.display()),
            Self::Io(err) => write!(f, "failed to read translation resource: {err}"),
            Self::Xml(err) => write!(f, "translation resource is not well-formed XML: {err}"),
            Self::Malformed(msg) => write!(f, "malformed TS resource: {msg}"),
            Self::UnsupportedLocale(tag) => write!(f, "unsupported locale tag '{tag}'"),
            Self::LocaleMismatch { requested, found } => write!(
                f,
                "locale mismatch: requested '{requested}' but resource declares '{found}'"
            ),
            Self::Context { context, error } => {
                write!(f, "in context '{context}': {error}")
            }
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Xml(err) => Some(err),
            Self::Context { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<xmltree::ParseError> for LoadError {
    fn from(err: xmltree::ParseError) -> Self {
        Self::Xml(err)
    }
}
