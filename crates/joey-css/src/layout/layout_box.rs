//! Layout box types and layout algorithms.
//!
//! [§ 9.2 Controlling box generation](https://www.w3.org/TR/CSS2/visuren.html#box-gen)
//!
//! The layout tree mirrors the rendered part of the document tree: one box
//! per node, under a single document box. It is rebuilt from scratch on
//! every pass, so a layout is a pure function of the styled tree and the
//! viewport width.

use std::fmt::Write as _;

use joey_common::warning::warn_once;
use joey_dom::{DomTree, NodeId};

use crate::paint::DisplayList;
use crate::values::{AUTO, parse_px};

use super::font_metrics::FontMetrics;
use super::inline::InlineLayout;
use super::{LayoutConfig, LayoutMode, is_hidden, layout_mode};

/// `display` values the engine lays out. Anything else gets no geometry.
const SUPPORTED_DISPLAY: [&str; 4] = ["block", "inline", "inline-block", "list-item"];

/// Everything a layout pass reads but never changes.
struct LayoutContext<'a> {
    tree: &'a DomTree,
    font_metrics: &'a dyn FontMetrics,
    config: &'a LayoutConfig,
}

/// The root of the layout tree: the page inside the window margins.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    /// Left edge of the content (the horizontal margin).
    pub x: f32,
    /// Top edge of the content (the vertical margin).
    pub y: f32,
    /// Content width: viewport minus both margins and the scrollbar.
    pub width: f32,
    /// Total document height, margins included.
    pub height: f32,
    /// The box of the root element. A document box always has exactly one.
    pub root: LayoutBox,
}

impl DocumentLayout {
    /// Lay out the styled tree for a viewport `viewport_width` pixels wide.
    ///
    /// Returns `None` if the tree has no root.
    #[must_use]
    pub fn layout(
        tree: &DomTree,
        viewport_width: f32,
        config: &LayoutConfig,
        font_metrics: &dyn FontMetrics,
    ) -> Option<Self> {
        let root = tree.root()?;
        let ctx = LayoutContext {
            tree,
            font_metrics,
            config,
        };

        let x = config.h_margin;
        let y = config.v_margin;
        let width = config.content_width(viewport_width);

        let mut root = LayoutBox::new(root);
        root.layout(&ctx, x, y, width);
        let height = root.height + 2.0 * config.v_margin;

        log::debug!("layout: width {width}, document height {height}");
        Some(Self {
            x,
            y,
            width,
            height,
            root,
        })
    }

    /// Indented dump of the box tree, one box per line.
    #[must_use]
    pub fn format(&self, tree: &DomTree) -> String {
        let mut out = format!(
            "document x={} y={} w={} h={}\n",
            self.x, self.y, self.width, self.height
        );
        self.root.format_into(tree, 1, &mut out);
        out
    }
}

/// A positioned box for one document node.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    /// The node this box renders.
    pub node: NodeId,
    /// Left edge.
    pub x: f32,
    /// Top edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// How the box arranged its content; `None` for an unsupported
    /// `display`, which leaves the box empty and zero-sized.
    pub mode: Option<LayoutMode>,
    /// Child boxes in document order (block mode only).
    pub children: Vec<LayoutBox>,
    /// Text commands built by inline layout (inline mode only).
    pub display_list: DisplayList,
}

impl LayoutBox {
    fn new(node: NodeId) -> Self {
        Self {
            node,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            mode: None,
            children: Vec::new(),
            display_list: DisplayList::new(),
        }
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// [§ 10.3.3 Block-level, non-replaced elements in normal flow](https://www.w3.org/TR/CSS2/visudet.html#blockwidth)
    ///
    /// Place the box at `(x, y)`, size it, and lay out its content.
    fn layout(&mut self, ctx: &LayoutContext<'_>, x: f32, y: f32, parent_width: f32) {
        let style = ctx.tree.style(self.node);
        self.x = x;
        self.y = y;

        if let Some(display) = style.get("display")
            && !SUPPORTED_DISPLAY.contains(&display.as_str())
        {
            warn_once("layout", &format!("unsupported display '{display}'"));
            return;
        }

        self.width = explicit_size(style.get("width"), "width").unwrap_or(parent_width);
        let explicit_height = explicit_size(style.get("height"), "height");

        let mode = layout_mode(ctx.tree, self.node);
        self.mode = Some(mode);
        let content_height = match mode {
            LayoutMode::Block => self.layout_block(ctx),
            LayoutMode::Inline => {
                let (height, display_list) = InlineLayout::new(
                    ctx.tree,
                    ctx.font_metrics,
                    (self.x, self.y),
                    self.width,
                    ctx.config.paragraph_step,
                )
                .layout(self.node);
                self.display_list = display_list;
                height
            }
        };
        self.height = explicit_height.unwrap_or(content_height);
    }

    /// [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
    ///
    /// "In a block formatting context, boxes are laid out one after the
    /// other, vertically, beginning at the top of a containing block."
    ///
    /// Returns the sum of the children's heights.
    fn layout_block(&mut self, ctx: &LayoutContext<'_>) -> f32 {
        let tree = ctx.tree;

        for &child in tree.children(self.node) {
            if tree.tag_name(child).is_some_and(is_hidden)
                || tree.style(child).get("display").is_some_and(|d| d == "none")
            {
                continue;
            }

            let y = self.children.last().map_or(self.y, Self::bottom);

            let mut child_box = Self::new(child);
            child_box.layout(ctx, self.x, y, self.width);
            self.children.push(child_box);
        }

        self.children.iter().map(|child| child.height).sum()
    }

    fn format_into(&self, tree: &DomTree, depth: usize, out: &mut String) {
        let label = tree
            .tag_name(self.node)
            .map_or_else(|| "#text".to_string(), |tag| format!("<{tag}>"));
        let mode = match self.mode {
            Some(LayoutMode::Block) => "block",
            Some(LayoutMode::Inline) => "inline",
            None => "unsupported",
        };
        let _ = writeln!(
            out,
            "{}{label} {mode} x={} y={} w={} h={} words={}",
            "  ".repeat(depth),
            self.x,
            self.y,
            self.width,
            self.height,
            self.display_list.len()
        );
        for child in &self.children {
            child.format_into(tree, depth + 1, out);
        }
    }
}

/// Read an explicit `width`/`height`. `auto` and absent values are `None`;
/// so is anything unparseable, after a warning.
fn explicit_size(value: Option<&String>, property: &str) -> Option<f32> {
    let value = value?;
    if value == AUTO {
        return None;
    }
    if let Some(px) = parse_px(value) {
        log::debug!("explicit {property} {px}");
        Some(px as f32)
    } else {
        warn_once(
            "layout",
            &format!("cannot parse {property} '{value}', using auto"),
        );
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_size() {
        let px = "300px".to_string();
        let bare = "120".to_string();
        let auto = "auto".to_string();
        let junk = "wide".to_string();
        assert_eq!(explicit_size(Some(&px), "width"), Some(300.0));
        assert_eq!(explicit_size(Some(&bare), "width"), Some(120.0));
        assert_eq!(explicit_size(Some(&auto), "width"), None);
        assert_eq!(explicit_size(Some(&junk), "width"), None);
        assert_eq!(explicit_size(None, "height"), None);
    }
}
