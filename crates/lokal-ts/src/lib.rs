#![forbid(unsafe_code)]

//! Loader for Qt Linguist `.ts` translation resources.
//!
//! Parses one `<TS>` XML document per locale into a
//! [`lokal_catalog::Catalog`]. Loading happens once on the startup path;
//! everything after the returned catalog is query-only.
//!
//! Failure is atomic: any structural problem in the resource yields a
//! [`LoadError`] and no catalog. The host is expected to treat that as
//! non-fatal and run with source-language strings.

pub mod error;
pub mod reader;

pub use error::LoadError;
pub use reader::{from_reader, from_str, load_locale, load_path};
