//! Inline layout: flowing words into lines.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."

use joey_dom::{DomTree, NodeId};

use crate::paint::{DisplayCommand, DisplayList};

use super::font_metrics::{FontKey, FontMetrics};
use super::{is_block_level, is_hidden};

/// Line height as a multiple of the font's ascent and descent.
const LEADING: f32 = 1.25;

/// A word placed on the current line, waiting for the line's baseline.
struct PendingWord {
    x: f32,
    text: String,
    font: FontKey,
    color: String,
}

/// Line builder for one inline-mode box.
///
/// Positions are relative to the box while the line is open; they become
/// absolute when the line is flushed into the box's display list.
pub struct InlineLayout<'a> {
    tree: &'a DomTree,
    font_metrics: &'a dyn FontMetrics,
    /// Left edge of the box.
    x: f32,
    /// Top edge of the box.
    y: f32,
    /// Available line width.
    width: f32,
    /// Extra space after a block-level element inside the flow.
    paragraph_step: f32,
    /// Horizontal position of the next word, relative to `x`.
    cursor_x: f32,
    /// Top of the current line, relative to `y`.
    cursor_y: f32,
    line: Vec<PendingWord>,
    display_list: DisplayList,
}

impl<'a> InlineLayout<'a> {
    /// Start an empty flow for a box at `(x, y)` that is `width` wide.
    #[must_use]
    pub fn new(
        tree: &'a DomTree,
        font_metrics: &'a dyn FontMetrics,
        (x, y): (f32, f32),
        width: f32,
        paragraph_step: f32,
    ) -> Self {
        Self {
            tree,
            font_metrics,
            x,
            y,
            width,
            paragraph_step,
            cursor_x: 0.0,
            cursor_y: 0.0,
            line: Vec::new(),
            display_list: DisplayList::new(),
        }
    }

    /// Flow the subtree rooted at `id` and close the last line.
    ///
    /// Returns the height used and one text command per word.
    #[must_use]
    pub fn layout(mut self, id: NodeId) -> (f32, DisplayList) {
        self.walk(id);
        self.flush();
        (self.cursor_y, self.display_list)
    }

    /// Depth-first walk of the subtree.
    ///
    /// Hidden elements and `display: none` are skipped. `<br>` breaks the
    /// line. A block-level element starts on a fresh line and leaves a
    /// paragraph step after itself.
    fn walk(&mut self, id: NodeId) {
        let tree = self.tree;

        if let Some(text) = tree.as_text(id) {
            let style = tree.style(id);
            let font = FontKey::from_style(style);
            let color = style.get("color").map_or("black", String::as_str);
            for word in text.split_whitespace() {
                self.word(word, &font, color);
            }
            return;
        }

        let Some(tag) = tree.tag_name(id) else {
            return;
        };
        if is_hidden(tag) || tree.style(id).get("display").is_some_and(|d| d == "none") {
            return;
        }

        // [§ 4.5.27 The br element](https://html.spec.whatwg.org/multipage/text-level-semantics.html#the-br-element)
        // "The br element represents a line break."
        if tag == "br" {
            self.flush();
        }

        let block = is_block_level(tag);
        if block {
            self.flush();
        }
        for &child in tree.children(id) {
            self.walk(child);
        }
        if block {
            self.flush();
            self.cursor_y += self.paragraph_step;
        }
    }

    /// [§ 5.5.1 Line Breaking Details](https://www.w3.org/TR/css-text-3/#line-break-details)
    ///
    /// Place one word, breaking the line first if it would overflow.
    fn word(&mut self, word: &str, font: &FontKey, color: &str) {
        let width = self.font_metrics.measure(word, font);
        if self.cursor_x + width > self.width {
            self.flush();
        }

        self.line.push(PendingWord {
            x: self.cursor_x,
            text: word.to_string(),
            font: font.clone(),
            color: color.to_string(),
        });
        self.cursor_x += width + self.font_metrics.measure(" ", font);
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Close the current line: align every word on a shared baseline below
    /// the tallest ascent, emit the words, and move the cursor below the
    /// deepest descent. An empty line is a no-op.
    fn flush(&mut self) {
        if self.line.is_empty() {
            return;
        }

        let line = std::mem::take(&mut self.line);
        let metrics: Vec<_> = line
            .iter()
            .map(|word| self.font_metrics.line_metrics(&word.font))
            .collect();
        let max_ascent = metrics.iter().map(|m| m.ascent).fold(0.0, f32::max);
        let max_descent = metrics.iter().map(|m| m.descent).fold(0.0, f32::max);
        let baseline = LEADING.mul_add(max_ascent, self.cursor_y);

        for (word, metrics) in line.into_iter().zip(metrics) {
            let top = self.y + baseline - metrics.ascent;
            self.display_list.push(DisplayCommand::Text {
                top,
                left: self.x + word.x,
                bottom: top + metrics.linespace(),
                text: word.text,
                font: word.font,
                color: word.color,
            });
        }

        self.cursor_x = 0.0;
        self.cursor_y = LEADING.mul_add(max_descent, baseline);
    }
}

#[cfg(test)]
mod tests {
    use joey_dom::{ElementData, NodeType, StyleMap};

    use super::*;
    use crate::layout::font_metrics::LineMetrics;

    /// Every character is 10px wide; ascent 8, descent 2.
    struct FixedMetrics;

    impl FontMetrics for FixedMetrics {
        fn measure(&self, text: &str, _font: &FontKey) -> f32 {
            text.chars().count() as f32 * 10.0
        }

        fn line_metrics(&self, _font: &FontKey) -> LineMetrics {
            LineMetrics {
                ascent: 8.0,
                descent: 2.0,
            }
        }
    }

    fn styled_text(tree: &mut DomTree, parent: NodeId, text: &str) -> NodeId {
        let id = tree.alloc(NodeType::Text(text.to_string()));
        tree.append_child(parent, id);
        let style: StyleMap = [("color".to_string(), "red".to_string())]
            .into_iter()
            .collect();
        tree.set_style(id, style);
        id
    }

    fn words(list: &DisplayList) -> Vec<(String, f32, f32)> {
        list.iter()
            .filter_map(|c| c.text().map(|t| (t.to_string(), c.left(), c.top())))
            .collect()
    }

    #[test]
    fn test_words_share_a_line_until_full() {
        let mut tree = DomTree::new();
        let span = tree.alloc(NodeType::Element(ElementData::new("span")));
        tree.set_root(span);
        let _ = styled_text(&mut tree, span, "ab cd  ef");

        // "ab" 20 + space 10, "cd" 20 + space 10, "ef" would end at 80.
        let (height, list) = InlineLayout::new(&tree, &FixedMetrics, (5.0, 100.0), 70.0, 18.0)
            .layout(span);

        let placed = words(&list);
        assert_eq!(placed.len(), 3);
        // First baseline at 1.25 * 8 = 10, so tops sit at 10 - 8 below the box.
        assert_eq!(placed[0], ("ab".to_string(), 5.0, 102.0));
        assert_eq!(placed[1], ("cd".to_string(), 35.0, 102.0));
        // Second line starts at 10 + 1.25 * 2 = 12.5; its baseline is 22.5.
        assert_eq!(placed[2], ("ef".to_string(), 5.0, 114.5));
        assert!((height - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_br_breaks_without_blank_line() {
        let mut tree = DomTree::new();
        let span = tree.alloc(NodeType::Element(ElementData::new("span")));
        tree.set_root(span);
        let _ = styled_text(&mut tree, span, "one");
        let br = tree.alloc(NodeType::Element(ElementData::new("br")));
        tree.append_child(span, br);
        let _ = styled_text(&mut tree, span, "two");

        let (height, list) =
            InlineLayout::new(&tree, &FixedMetrics, (0.0, 0.0), 500.0, 18.0).layout(span);
        let placed = words(&list);
        assert_eq!(placed[0].1, placed[1].1);
        assert!((placed[1].2 - 14.5).abs() < 0.01);
        assert!((height - 25.0).abs() < 0.01);
    }

    #[test]
    fn test_hidden_subtree_is_skipped() {
        let mut tree = DomTree::new();
        let span = tree.alloc(NodeType::Element(ElementData::new("span")));
        tree.set_root(span);
        let script = tree.alloc(NodeType::Element(ElementData::new("script")));
        tree.append_child(span, script);
        let _ = styled_text(&mut tree, script, "alert(1)");
        let _ = styled_text(&mut tree, span, "shown");

        let (_, list) =
            InlineLayout::new(&tree, &FixedMetrics, (0.0, 0.0), 500.0, 18.0).layout(span);
        assert_eq!(list.len(), 1);
        assert_eq!(list.commands()[0].text(), Some("shown"));
    }

    #[test]
    fn test_block_inside_flow_adds_paragraph_step() {
        let mut tree = DomTree::new();
        let span = tree.alloc(NodeType::Element(ElementData::new("span")));
        tree.set_root(span);
        let p = tree.alloc(NodeType::Element(ElementData::new("p")));
        tree.append_child(span, p);
        let _ = styled_text(&mut tree, p, "para");
        let _ = styled_text(&mut tree, span, "after");

        let (height, list) =
            InlineLayout::new(&tree, &FixedMetrics, (0.0, 0.0), 500.0, 18.0).layout(span);
        let placed = words(&list);
        // One line (12.5) plus the step (18), then the next line starts.
        assert!((placed[1].2 - 32.5).abs() < 0.01);
        assert!((height - 43.0).abs() < 0.01);
    }

    #[test]
    fn test_empty_flow_has_no_height() {
        let mut tree = DomTree::new();
        let span = tree.alloc(NodeType::Element(ElementData::new("span")));
        tree.set_root(span);
        let layout = InlineLayout::new(&tree, &FixedMetrics, (0.0, 0.0), 500.0, 18.0);
        let (height, list) = layout.layout(span);
        assert!(height.abs() < f32::EPSILON);
        assert!(list.is_empty());
    }
}
