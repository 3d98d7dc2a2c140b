//! CSS Layout Engine
//!
//! This module implements a two-mode subset of the CSS Visual Formatting
//! Model: boxes either stack their children vertically (block) or flow their
//! text into wrapped lines (inline).
//!
//! # Relevant Specifications
//!
//! - [CSS Display Module Level 3](https://www.w3.org/TR/css-display-3/)
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual formatting model details](https://www.w3.org/TR/CSS2/visudet.html)
//!
//! # Module Structure
//!
//! - [`font_metrics`] - Font keys, the measuring trait, and the metrics cache
//! - [`layout_box`] - The document box and layout boxes
//! - [`inline`] - Line building for inline content

pub mod font_metrics;
pub mod inline;
pub mod layout_box;

pub use font_metrics::{
    ApproximateFontMetrics, FontCache, FontKey, FontMetrics, FontSlant, FontWeight, LineMetrics,
};
pub use inline::InlineLayout;
pub use layout_box::{DocumentLayout, LayoutBox};

use serde::Deserialize;

use joey_dom::{DomTree, NodeId};

/// [§ 15.3.1 Hidden elements](https://html.spec.whatwg.org/multipage/rendering.html#hidden-elements)
///
/// "The following elements must have their 'display' property set to 'none'."
pub const HIDDEN_ELEMENTS: [&str; 15] = [
    "area", "base", "basefont", "datalist", "head", "link", "meta", "noembed", "noframes",
    "param", "rp", "script", "style", "template", "title",
];

/// [§ 15.3.3 Flow content](https://html.spec.whatwg.org/multipage/rendering.html#flow-content-3)
///
/// "The following elements must have their 'display' property set to 'block'."
///
/// Plus `li`, which is a `list-item` and stacks the same way.
pub const BLOCK_ELEMENTS: [&str; 43] = [
    "address", "article", "aside", "blockquote", "body", "center", "dd", "details", "dialog",
    "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "legend", "li", "listing", "main",
    "menu", "nav", "ol", "p", "plaintext", "pre", "search", "section", "summary", "ul", "xmp",
];

/// Whether `tag` is never rendered.
#[must_use]
pub fn is_hidden(tag: &str) -> bool {
    HIDDEN_ELEMENTS.contains(&tag)
}

/// Whether `tag` is block-level.
#[must_use]
pub fn is_block_level(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

/// How a box arranges its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Children stack vertically, one box each.
    Block,
    /// Text in the subtree is flowed into lines.
    Inline,
}

/// [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
///
/// Pick the layout mode of the box for `id`:
///
/// - text is inline;
/// - an element with a block-level child element is block;
/// - any other element with children is inline;
/// - an element with no children is block if its own tag is block-level,
///   inline otherwise (`<span></span>`, `<br>`, `<img>`).
#[must_use]
pub fn layout_mode(tree: &DomTree, id: NodeId) -> LayoutMode {
    if tree.as_text(id).is_some() {
        return LayoutMode::Inline;
    }

    let children = tree.children(id);
    let block = if children.is_empty() {
        tree.tag_name(id).is_some_and(is_block_level)
    } else {
        children
            .iter()
            .any(|&child| tree.tag_name(child).is_some_and(is_block_level))
    };
    if block {
        LayoutMode::Block
    } else {
        LayoutMode::Inline
    }
}

/// Window geometry the document box is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Space left of (and right of) the content.
    pub h_margin: f32,
    /// Space above (and below) the content.
    pub v_margin: f32,
    /// Width reserved for the scrollbar on the right.
    pub scrollbar_width: f32,
    /// Vertical gap inserted after a block-level element met inside inline
    /// content.
    pub paragraph_step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            h_margin: 13.0,
            v_margin: 18.0,
            scrollbar_width: 15.0,
            paragraph_step: 18.0,
        }
    }
}

impl LayoutConfig {
    /// Width available to content for a viewport of `viewport_width`.
    #[must_use]
    pub fn content_width(&self, viewport_width: f32) -> f32 {
        viewport_width - 2.0 * self.h_margin - self.scrollbar_width
    }
}
