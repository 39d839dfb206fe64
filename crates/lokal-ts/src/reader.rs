//! TS document parsing.
//!
//! A resource is one `<TS language="..">` document holding `<context>`
//! elements; each context has a `<name>` and `<message>` children; each
//! message pairs a `<source>` with a `<translation>`, which for
//! `numerus="yes"` messages holds ordered `<numerusform>` variants
//! instead of plain text.
//!
//! Tolerated irregularities, matching how the upstream toolchain treats
//! them:
//!
//! - repeated `<context>` elements with the same name are merged
//! - `type="obsolete"` / `type="vanished"` translations are skipped
//! - empty translations are skipped (the entry falls back to its source)
//! - `type="unfinished"` translations with text are kept
//!
//! Anything structural — bad XML, a root that is not `<TS>`, a missing
//! language tag, a duplicate source within one context — fails the whole
//! load. There is no partially loaded catalog.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use lokal_catalog::{Catalog, ContextStrings};
use tracing::{debug, warn};
use xmltree::{Element, XMLNode};

use crate::error::LoadError;

/// Load the catalog for `tag` from `dir`, using the conventional
/// `{basename}_{tag}.ts` file naming (e.g. `wallet_tr.ts`).
///
/// # Errors
///
/// Fails with [`LoadError::UnsupportedLocale`] for an implausible tag,
/// [`LoadError::Missing`] when no resource exists for the tag,
/// [`LoadError::LocaleMismatch`] when the resource declares a different
/// language (compared by primary subtag, so a regional file declaring the
/// bare language is accepted), or any of the parse errors from
/// [`load_path`].
pub fn load_locale(dir: &Path, basename: &str, tag: &str) -> Result<Catalog, LoadError> {
    validate_tag(tag)?;
    let path = dir.join(format!("{basename}_{tag}.ts"));
    let catalog = load_path(&path)?;
    if primary_subtag(catalog.locale()) != primary_subtag(tag) {
        return Err(LoadError::LocaleMismatch {
            requested: tag.to_string(),
            found: catalog.locale().to_string(),
        });
    }
    Ok(catalog)
}

/// Load a catalog from a resource file.
///
/// # Errors
///
/// Fails with [`LoadError::Missing`] when the file does not exist,
/// [`LoadError::Io`] on read failures, or any of the parse errors from
/// [`from_reader`].
pub fn load_path(path: &Path) -> Result<Catalog, LoadError> {
    let file = File::open(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            LoadError::Missing(path.to_path_buf())
        } else {
            LoadError::Io(err)
        }
    })?;
    from_reader(BufReader::new(file))
}

/// Parse a catalog from an in-memory TS document.
///
/// # Errors
///
/// See [`from_reader`].
pub fn from_str(xml: &str) -> Result<Catalog, LoadError> {
    from_reader(xml.as_bytes())
}

/// Parse a catalog from a TS document reader.
///
/// # Errors
///
/// Fails with [`LoadError::Xml`] on malformed XML,
/// [`LoadError::Malformed`] on structural problems,
/// [`LoadError::UnsupportedLocale`] for an implausible `language`
/// attribute, or [`LoadError::Context`] when an entry violates a catalog
/// invariant.
pub fn from_reader<R: Read>(reader: R) -> Result<Catalog, LoadError> {
    let root = Element::parse(reader)?;
    if root.name != "TS" {
        return Err(LoadError::Malformed(format!(
            "root element is <{}>, expected <TS>",
            root.name
        )));
    }
    let language = root
        .attributes
        .get("language")
        .ok_or_else(|| LoadError::Malformed("<TS> has no language attribute".to_string()))?
        .clone();
    validate_tag(&language)?;

    let mut contexts: HashMap<String, ContextStrings> = HashMap::new();
    let mut skipped = 0usize;
    for node in &root.children {
        if let XMLNode::Element(child) = node
            && child.name == "context"
        {
            parse_context(child, &mut contexts, &mut skipped)?;
        }
    }

    let mut catalog = Catalog::new(language);
    for (name, strings) in contexts {
        catalog.add_context(name, strings);
    }
    debug!(
        locale = %catalog.locale(),
        contexts = catalog.context_count(),
        messages = catalog.message_count(),
        skipped,
        "loaded TS translation catalog"
    );
    Ok(catalog)
}

enum ParsedTranslation {
    Simple(String),
    Plural(Vec<String>),
}

fn parse_context(
    el: &Element,
    contexts: &mut HashMap<String, ContextStrings>,
    skipped: &mut usize,
) -> Result<(), LoadError> {
    let name = el
        .get_child("name")
        .map(text_of)
        .ok_or_else(|| LoadError::Malformed("context without <name>".to_string()))?;

    // Same-named contexts merge, so translations split across several
    // <context> blocks still share one namespace.
    let strings = contexts.entry(name.clone()).or_default();
    for node in &el.children {
        let XMLNode::Element(message) = node else {
            continue;
        };
        if message.name != "message" {
            continue;
        }
        match parse_message(message, &name)? {
            None => *skipped += 1,
            Some((source, ParsedTranslation::Simple(text))) => strings
                .insert(source, text)
                .map_err(|error| LoadError::Context {
                    context: name.clone(),
                    error,
                })?,
            Some((source, ParsedTranslation::Plural(forms))) => strings
                .insert_plural(source, forms)
                .map_err(|error| LoadError::Context {
                    context: name.clone(),
                    error,
                })?,
        }
    }
    Ok(())
}

fn parse_message(
    el: &Element,
    context: &str,
) -> Result<Option<(String, ParsedTranslation)>, LoadError> {
    let source = el.get_child("source").map(text_of).ok_or_else(|| {
        LoadError::Malformed(format!("message without <source> in context '{context}'"))
    })?;
    let numerus = el.attributes.get("numerus").is_some_and(|v| v == "yes");

    let Some(translation) = el.get_child("translation") else {
        debug!(context = %context, source = %source, "message without translation, skipping");
        return Ok(None);
    };
    if let Some(kind) = translation.attributes.get("type")
        && (kind == "obsolete" || kind == "vanished")
    {
        debug!(context = %context, source = %source, kind = %kind, "skipping retired translation");
        return Ok(None);
    }

    if numerus {
        let forms: Vec<String> = translation
            .children
            .iter()
            .filter_map(|node| match node {
                XMLNode::Element(form) if form.name == "numerusform" => Some(text_of(form)),
                _ => None,
            })
            .collect();
        // Individual empty forms are kept so indices stay aligned with
        // the rule; lookup falls back to the source when it selects an
        // empty form. A fully empty list means "not translated".
        if forms.iter().all(String::is_empty) {
            warn!(context = %context, source = %source, "numerus message has no usable forms, skipping");
            return Ok(None);
        }
        Ok(Some((source, ParsedTranslation::Plural(forms))))
    } else {
        let text = text_of(translation);
        if text.is_empty() {
            debug!(context = %context, source = %source, "empty translation, skipping");
            return Ok(None);
        }
        Ok(Some((source, ParsedTranslation::Simple(text))))
    }
}

/// Concatenated character data of an element, CDATA included.
fn text_of(el: &Element) -> String {
    let mut out = String::new();
    for node in &el.children {
        match node {
            XMLNode::Text(text) | XMLNode::CData(text) => out.push_str(text),
            _ => {}
        }
    }
    out
}

// Every subtag is checked, not just the primary one: the tag is spliced
// into a file name, so a stray separator or dot segment in a later subtag
// must be rejected before any path is built.
fn validate_tag(tag: &str) -> Result<(), LoadError> {
    let mut subtags = tag.split(['-', '_']);
    let primary = subtags.next().unwrap_or("");
    let primary_ok =
        (2..=8).contains(&primary.len()) && primary.bytes().all(|b| b.is_ascii_alphabetic());
    let rest_ok = subtags.all(|subtag| {
        (1..=8).contains(&subtag.len()) && subtag.bytes().all(|b| b.is_ascii_alphanumeric())
    });
    if primary_ok && rest_ok {
        Ok(())
    } else {
        Err(LoadError::UnsupportedLocale(tag.to_string()))
    }
}

fn primary_subtag(tag: &str) -> String {
    tag.split(['-', '_'])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lokal_catalog::{CatalogError, MessageEntry};

    #[test]
    fn minimal_document() {
        let catalog = from_str(
            r#"<TS language="tr" version="2.1">
                <context>
                    <name>AddressBookPage</name>
                    <message>
                        <source>&amp;New</source>
                        <translation>&amp;Yeni</translation>
                    </message>
                </context>
            </TS>"#,
        )
        .unwrap();
        assert_eq!(catalog.locale(), "tr");
        assert_eq!(catalog.lookup("AddressBookPage", "&New"), "&Yeni");
    }

    #[test]
    fn root_must_be_ts() {
        let err = from_str(r#"<QM language="tr"/>"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn language_attribute_required() {
        let err = from_str(r#"<TS version="2.1"/>"#).unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn implausible_language_tag() {
        let err = from_str(r#"<TS language="42!"/>"#).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedLocale(tag) if tag == "42!"));
    }

    #[test]
    fn language_tag_validated_past_primary_subtag() {
        for tag in ["tr_/evil", "tr_TR!", "pt-", "en_latn-verylongsub"] {
            let err = from_str(&format!(r#"<TS language="{tag}"/>"#)).unwrap_err();
            assert!(
                matches!(err, LoadError::UnsupportedLocale(found) if found == tag),
                "tag '{tag}' should be rejected"
            );
        }
        assert!(from_str(r#"<TS language="tr_TR"/>"#).is_ok());
        assert!(from_str(r#"<TS language="zh-Hans-CN"/>"#).is_ok());
    }

    #[test]
    fn not_xml_at_all() {
        let err = from_str("this is not a resource").unwrap_err();
        assert!(matches!(err, LoadError::Xml(_)));
    }

    #[test]
    fn empty_context_is_legal() {
        let catalog = from_str(
            r#"<TS language="tr">
                <context><name>PaymentServer</name></context>
            </TS>"#,
        )
        .unwrap();
        assert_eq!(catalog.context_count(), 1);
        assert!(catalog.context("PaymentServer").unwrap().is_empty());
    }

    #[test]
    fn context_without_name_fails() {
        let err = from_str(
            r#"<TS language="tr"><context>
                <message><source>x</source><translation>y</translation></message>
            </context></TS>"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn message_without_source_fails() {
        let err = from_str(
            r#"<TS language="tr"><context><name>C</name>
                <message><translation>y</translation></message>
            </context></TS>"#,
        )
        .unwrap_err();
        assert!(matches!(err, LoadError::Malformed(_)));
    }

    #[test]
    fn retired_translations_are_skipped() {
        let catalog = from_str(
            r#"<TS language="tr"><context><name>C</name>
                <message><source>a</source><translation type="obsolete">x</translation></message>
                <message><source>b</source><translation type="vanished">y</translation></message>
                <message><source>c</source><translation type="unfinished">z</translation></message>
            </context></TS>"#,
        )
        .unwrap();
        assert_eq!(catalog.lookup("C", "a"), "a");
        assert_eq!(catalog.lookup("C", "b"), "b");
        assert_eq!(catalog.lookup("C", "c"), "z");
    }

    #[test]
    fn empty_translation_is_skipped() {
        let catalog = from_str(
            r#"<TS language="tr"><context><name>C</name>
                <message><source>a</source><translation type="unfinished"></translation></message>
                <message><source>b</source><translation/></message>
            </context></TS>"#,
        )
        .unwrap();
        assert!(catalog.context("C").unwrap().is_empty());
        assert_eq!(catalog.lookup("C", "a"), "a");
    }

    #[test]
    fn numerus_forms_in_order() {
        let catalog = from_str(
            r#"<TS language="en"><context><name>C</name>
                <message numerus="yes">
                    <source>%n block(s)</source>
                    <translation><numerusform>%n block</numerusform><numerusform>%n blocks</numerusform></translation>
                </message>
            </context></TS>"#,
        )
        .unwrap();
        assert_eq!(
            catalog.entry("C", "%n block(s)"),
            Some(&MessageEntry::Plural(vec![
                "%n block".into(),
                "%n blocks".into()
            ]))
        );
    }

    #[test]
    fn untranslated_numerus_is_skipped() {
        let catalog = from_str(
            r#"<TS language="en"><context><name>C</name>
                <message numerus="yes">
                    <source>%n block(s)</source>
                    <translation type="unfinished"><numerusform></numerusform><numerusform></numerusform></translation>
                </message>
            </context></TS>"#,
        )
        .unwrap();
        assert!(catalog.context("C").unwrap().is_empty());
    }

    #[test]
    fn duplicate_source_in_context_fails() {
        let err = from_str(
            r#"<TS language="tr"><context><name>C</name>
                <message><source>a</source><translation>x</translation></message>
                <message><source>a</source><translation>y</translation></message>
            </context></TS>"#,
        )
        .unwrap_err();
        match err {
            LoadError::Context { context, error } => {
                assert_eq!(context, "C");
                assert_eq!(error, CatalogError::DuplicateSource("a".into()));
            }
            other => panic!("expected Context error, got {other:?}"),
        }
    }

    #[test]
    fn same_source_in_different_contexts_is_fine() {
        let catalog = from_str(
            r#"<TS language="tr">
                <context><name>A</name>
                    <message><source>(no label)</source><translation>(etiket yok)</translation></message>
                </context>
                <context><name>B</name>
                    <message><source>(no label)</source><translation>(etiketsiz)</translation></message>
                </context>
            </TS>"#,
        )
        .unwrap();
        assert_eq!(catalog.lookup("A", "(no label)"), "(etiket yok)");
        assert_eq!(catalog.lookup("B", "(no label)"), "(etiketsiz)");
    }

    #[test]
    fn repeated_contexts_merge() {
        let catalog = from_str(
            r#"<TS language="tr">
                <context><name>C</name>
                    <message><source>a</source><translation>x</translation></message>
                </context>
                <context><name>C</name>
                    <message><source>b</source><translation>y</translation></message>
                </context>
            </TS>"#,
        )
        .unwrap();
        assert_eq!(catalog.context_count(), 1);
        assert_eq!(catalog.lookup("C", "a"), "x");
        assert_eq!(catalog.lookup("C", "b"), "y");
    }

    #[test]
    fn cdata_and_entities_decode() {
        let catalog = from_str(
            r#"<TS language="tr"><context><name>C</name>
                <message><source>a &lt; b</source><translation><![CDATA[a < b (tr)]]></translation></message>
            </context></TS>"#,
        )
        .unwrap();
        assert_eq!(catalog.lookup("C", "a < b"), "a < b (tr)");
    }

    #[tracing_test::traced_test]
    #[test]
    fn retired_translations_are_logged() {
        let _ = from_str(
            r#"<TS language="tr"><context><name>C</name>
                <message><source>a</source><translation type="obsolete">x</translation></message>
            </context></TS>"#,
        )
        .unwrap();
        assert!(logs_contain("skipping retired translation"));
    }

    #[test]
    fn primary_subtag_normalizes() {
        assert_eq!(primary_subtag("pt-BR"), "pt");
        assert_eq!(primary_subtag("tr_TR"), "tr");
        assert_eq!(primary_subtag("TR"), "tr");
    }
}
