//! Display List - a sequence of drawing commands
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html)
//!
//! The display list is the output of the painting phase. It contains all the
//! drawing commands needed to render a page, in the correct z-order.

use serde::Serialize;

use crate::layout::FontKey;

/// A single drawing command, in document coordinates.
///
/// [CSS 2.1 Appendix E.2 Painting order](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
///
/// Commands are added to the display list in painting order (back to front).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DisplayCommand {
    /// Fill a rectangle with a solid color.
    ///
    /// Step 2: "the background color of the element"
    Rect {
        /// Top edge.
        top: f32,
        /// Left edge.
        left: f32,
        /// Bottom edge.
        bottom: f32,
        /// Right edge.
        right: f32,
        /// Fill color as written in the style (`gray`, `#eee`).
        color: String,
    },

    /// Draw one word.
    ///
    /// Step 7: "the element's text"
    Text {
        /// Top of the glyph box (baseline minus ascent).
        top: f32,
        /// Left edge of the word.
        left: f32,
        /// Bottom of the glyph box (top plus ascent plus descent).
        bottom: f32,
        /// The word.
        text: String,
        /// Font to draw it in.
        font: FontKey,
        /// Text color as written in the style.
        color: String,
    },
}

impl DisplayCommand {
    /// Top edge of the area the command paints.
    #[must_use]
    pub const fn top(&self) -> f32 {
        match self {
            Self::Rect { top, .. } | Self::Text { top, .. } => *top,
        }
    }

    /// Bottom edge of the area the command paints.
    #[must_use]
    pub const fn bottom(&self) -> f32 {
        match self {
            Self::Rect { bottom, .. } | Self::Text { bottom, .. } => *bottom,
        }
    }

    /// Left edge of the area the command paints.
    #[must_use]
    pub const fn left(&self) -> f32 {
        match self {
            Self::Rect { left, .. } | Self::Text { left, .. } => *left,
        }
    }

    /// The word drawn, for text commands.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text),
            Self::Rect { .. } => None,
        }
    }
}

/// A list of display commands in painting order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DisplayList {
    commands: Vec<DisplayCommand>,
}

impl DisplayList {
    /// Create an empty display list.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Append a command.
    pub fn push(&mut self, command: DisplayCommand) {
        self.commands.push(command);
    }

    /// Append every command of `other`, keeping its order.
    pub fn extend_from(&mut self, other: &Self) {
        self.commands.extend(other.commands.iter().cloned());
    }

    /// The commands, in painting order.
    #[must_use]
    pub fn commands(&self) -> &[DisplayCommand] {
        &self.commands
    }

    /// Iterate the commands in painting order.
    pub fn iter(&self) -> std::slice::Iter<'_, DisplayCommand> {
        self.commands.iter()
    }

    /// Number of commands.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether the list has no commands.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl<'a> IntoIterator for &'a DisplayList {
    type Item = &'a DisplayCommand;
    type IntoIter = std::slice::Iter<'a, DisplayCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
