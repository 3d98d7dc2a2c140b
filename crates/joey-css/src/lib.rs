//! Stylesheet parsing, cascade, layout, and painting for the Joey renderer.
//!
//! # Scope
//!
//! This crate implements:
//! - **CSS Parser** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Recursive descent over rules, selectors, and declarations
//!   - Error recovery to the next `;` or `}`
//!   - Comment skipping
//!
//! - **CSS Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type and class selectors, compounds of the two
//!   - The descendant combinator
//!   - Integer priority (1 per type, 10 per class)
//!
//! - **CSS Cascade** ([CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/))
//!   - Stable priority ordering
//!   - Five inherited properties
//!   - Inline `style` attributes
//!   - Percentage font sizes
//!
//! - **Layout** ([CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html))
//!   - Block boxes stacked vertically
//!   - Inline text broken into lines on word boundaries, baseline aligned
//!
//! - **Painting** ([CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html))
//!   - Background rectangles and text commands in painting order
//!
//! # Not Yet Implemented
//!
//! - Selector lists (`a, b`), ID, attribute, and pseudo selectors
//! - Multi-word values (`font-family: "Times New Roman", serif`)
//! - Margins, padding, borders
//! - Flex, grid, and table layout

/// CSS cascade per [CSS Cascading Level 4](https://www.w3.org/TR/css-cascade-4/).
pub mod cascade;
/// Block and inline layout per [CSS 2.1 § 9](https://www.w3.org/TR/CSS2/visuren.html).
pub mod layout;
/// Display list and painting per [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html).
pub mod paint;
/// CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// CSS selector parsing and matching per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// User-agent stylesheet per [WHATWG HTML § 15 Rendering](https://html.spec.whatwg.org/multipage/rendering.html).
pub mod ua_stylesheet;
/// Length and percentage helpers per [CSS Values Level 4](https://www.w3.org/TR/css-values-4/).
pub mod values;

// Re-exports for convenience
pub use cascade::{INHERITED_PROPERTIES, apply_styles, cascade_order, sort_rules};
pub use layout::{
    ApproximateFontMetrics, DocumentLayout, FontCache, FontKey, FontMetrics, FontSlant,
    FontWeight, LayoutBox, LayoutConfig, LayoutMode, LineMetrics,
};
pub use paint::{DisplayCommand, DisplayList, Painter};
pub use parser::{CSSParser, Declaration, Rule, Stylesheet, parse_declarations, parse_stylesheet};
pub use selector::{CSSSelector, parse_selector};
pub use ua_stylesheet::ua_stylesheet;
