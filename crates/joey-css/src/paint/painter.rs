//! Painter - generates display list from layout tree
//!
//! [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//!
//! The painter walks the layout tree and generates drawing commands in the
//! correct painting order (back to front).

use joey_dom::DomTree;

use crate::layout::{DocumentLayout, LayoutBox};

use super::{DisplayCommand, DisplayList};

/// Background keyword that paints nothing.
const TRANSPARENT: &str = "transparent";

/// Painter that generates a display list from a layout tree.
///
/// [CSS 2.1 Appendix E.2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
pub struct Painter<'a> {
    /// The styled tree the layout was built from, read for background colors.
    tree: &'a DomTree,
}

impl<'a> Painter<'a> {
    /// Create a new painter over the styled tree.
    #[must_use]
    pub const fn new(tree: &'a DomTree) -> Self {
        Self { tree }
    }

    /// Paint a document layout and return the display list.
    #[must_use]
    pub fn paint(&self, document: &DocumentLayout) -> DisplayList {
        let mut display_list = DisplayList::new();
        self.paint_box(&document.root, &mut display_list);
        display_list
    }

    /// Paint a single layout box and its descendants.
    ///
    /// For each box, in order:
    /// 1. Background color
    /// 2. Text laid out by the box itself
    /// 3. Child boxes, in tree order
    ///
    /// A box with an unsupported `display` paints nothing.
    pub fn paint_box(&self, layout_box: &LayoutBox, display_list: &mut DisplayList) {
        if layout_box.mode.is_none() {
            return;
        }

        // [CSS 2.1 Appendix E.2 Step 2](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
        // "the background color of the element"
        if let Some(color) = self.tree.style(layout_box.node).get("background-color")
            && color != TRANSPARENT
        {
            display_list.push(DisplayCommand::Rect {
                top: layout_box.y,
                left: layout_box.x,
                bottom: layout_box.bottom(),
                right: layout_box.x + layout_box.width,
                color: color.clone(),
            });
        }

        // [CSS 2.1 Appendix E.2 Step 7](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
        // "the element's text"
        display_list.extend_from(&layout_box.display_list);

        for child in &layout_box.children {
            self.paint_box(child, display_list);
        }
    }
}
