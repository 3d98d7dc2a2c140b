//! Document stylesheets: `<link rel="stylesheet">` and `<style>`.
//!
//! [§ 4.2.4 The link element](https://html.spec.whatwg.org/multipage/semantics.html#the-link-element)
//! [§ 4.2.6 The style element](https://html.spec.whatwg.org/multipage/semantics.html#the-style-element)

use joey_common::net::DocumentSource;
use joey_common::warning::warn_once;
use joey_css::{Stylesheet, parse_stylesheet};
use joey_dom::{DomTree, NodeId};

/// Where a document stylesheet comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSource {
    /// A `<link rel="stylesheet">`, resolved to an absolute address.
    Link(String),
    /// The text of a `<style>` element.
    Inline(String),
}

/// Find every stylesheet reference in document order.
///
/// [§ 4.6.7.14 Link type "stylesheet"](https://html.spec.whatwg.org/multipage/links.html#link-type-stylesheet)
///
/// "The stylesheet keyword may be used with link elements. This keyword
/// creates an external resource link that contributes to the styling
/// processing model."
///
/// `rel` is a space-separated, case-insensitive token list. Relative `href`s
/// are resolved against `base` when one is known.
#[must_use]
pub fn collect_style_sources<S: DocumentSource + ?Sized>(
    tree: &DomTree,
    base: Option<&str>,
    source: &S,
) -> Vec<StyleSource> {
    tree.iter_all()
        .filter_map(|id| style_source(tree, id, base, source))
        .collect()
}

fn style_source<S: DocumentSource + ?Sized>(
    tree: &DomTree,
    id: NodeId,
    base: Option<&str>,
    source: &S,
) -> Option<StyleSource> {
    let element = tree.as_element(id)?;
    match element.tag_name.as_str() {
        "link" => {
            let is_stylesheet = element.attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("stylesheet"))
            });
            let href = element.attr("href")?;
            if !is_stylesheet || href.trim().is_empty() {
                return None;
            }
            let url = base.map_or_else(|| href.to_string(), |base| source.resolve(base, href));
            Some(StyleSource::Link(url))
        }
        "style" => Some(StyleSource::Inline(tree.text_content(id))),
        _ => None,
    }
}

/// Fetch and parse every document stylesheet, in document order.
///
/// A link that cannot be fetched is logged and skipped; the others still
/// apply.
pub fn load_stylesheets<S: DocumentSource + ?Sized>(
    tree: &DomTree,
    base: Option<&str>,
    source: &S,
) -> Vec<Stylesheet> {
    collect_style_sources(tree, base, source)
        .into_iter()
        .filter_map(|style| match style {
            StyleSource::Inline(text) => Some(parse_stylesheet(&text)),
            StyleSource::Link(url) => match source.fetch(&url) {
                Ok(text) => {
                    log::debug!("loaded stylesheet {url} ({} bytes)", text.len());
                    Some(parse_stylesheet(&text))
                }
                Err(err) => {
                    warn_once("browser", &format!("skipping stylesheet {url}: {err}"));
                    None
                }
            },
        })
        .collect()
}
