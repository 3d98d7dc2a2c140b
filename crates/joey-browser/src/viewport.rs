//! The visible window onto a laid-out document.

use joey_css::DisplayCommand;

/// Viewport size and scroll position, in document pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Visible width.
    pub width: f32,
    /// Visible height.
    pub height: f32,
    /// Document y shown at the top edge.
    pub scroll: f32,
}

impl Viewport {
    /// A viewport scrolled to the top.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll: 0.0,
        }
    }

    /// Largest scroll offset for a document `document_height` tall.
    #[must_use]
    pub fn max_scroll(&self, document_height: f32) -> f32 {
        (document_height - self.height).max(0.0)
    }

    /// Move by `delta`, clamped to `[0, max_scroll]`. Returns the new
    /// offset.
    pub fn scroll_by(&mut self, delta: f32, document_height: f32) -> f32 {
        self.scroll = (self.scroll + delta).clamp(0.0, self.max_scroll(document_height));
        self.scroll
    }

    /// Whether any part of `command` falls inside
    /// `[scroll, scroll + height]`.
    #[must_use]
    pub fn is_visible(&self, command: &DisplayCommand) -> bool {
        command.bottom() >= self.scroll && command.top() <= self.scroll + self.height
    }
}

#[cfg(test)]
mod tests {
    use joey_css::{FontKey, FontSlant, FontWeight};

    use super::*;

    fn word_at(top: f32, bottom: f32) -> DisplayCommand {
        DisplayCommand::Text {
            top,
            left: 0.0,
            bottom,
            text: "w".to_string(),
            font: FontKey::new("Times", 12, FontWeight::Normal, FontSlant::Roman),
            color: "black".to_string(),
        }
    }

    #[test]
    fn test_scroll_is_clamped() {
        let mut viewport = Viewport::new(800.0, 600.0);
        assert!(viewport.scroll_by(-10.0, 2000.0).abs() < f32::EPSILON);
        assert!((viewport.scroll_by(500.0, 2000.0) - 500.0).abs() < f32::EPSILON);
        assert!((viewport.scroll_by(5000.0, 2000.0) - 1400.0).abs() < f32::EPSILON);
        // A document shorter than the window never scrolls.
        assert!(viewport.scroll_by(10.0, 300.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_culling_uses_vertical_extent() {
        let mut viewport = Viewport::new(800.0, 100.0);
        let _ = viewport.scroll_by(50.0, 1000.0);

        assert!(!viewport.is_visible(&word_at(10.0, 40.0)));
        assert!(viewport.is_visible(&word_at(40.0, 60.0)));
        assert!(viewport.is_visible(&word_at(100.0, 120.0)));
        assert!(viewport.is_visible(&word_at(140.0, 170.0)));
        assert!(!viewport.is_visible(&word_at(151.0, 170.0)));

        let tall = DisplayCommand::Rect {
            top: 0.0,
            left: 0.0,
            bottom: 1000.0,
            right: 10.0,
            color: "gray".to_string(),
        };
        assert!(viewport.is_visible(&tall));
    }
}
