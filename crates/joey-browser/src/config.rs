//! Browser configuration.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```json
//! { "viewport_width": 1024, "font_path": "/usr/share/fonts/TTF/DejaVuSans.ttf" }
//! ```

use std::path::PathBuf;

use serde::Deserialize;

use joey_css::LayoutConfig;

/// Window and layout settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Initial viewport width in pixels.
    pub viewport_width: f32,
    /// Initial viewport height in pixels.
    pub viewport_height: f32,
    /// Left and right window margin.
    pub h_margin: f32,
    /// Top and bottom window margin; also the paragraph step.
    pub v_margin: f32,
    /// Width reserved for the scrollbar.
    pub scrollbar_width: f32,
    /// Distance moved by one scroll step.
    pub scroll_step: f32,
    /// Font file to measure text with. `None` searches system locations.
    pub font_path: Option<PathBuf>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            h_margin: layout.h_margin,
            v_margin: layout.v_margin,
            scrollbar_width: layout.scrollbar_width,
            scroll_step: 3.0 * layout.v_margin,
            font_path: None,
        }
    }
}

impl BrowserConfig {
    /// Parse a JSON config.
    ///
    /// # Errors
    ///
    /// Returns the `serde_json` error for malformed JSON or mistyped fields.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// The layout geometry these settings describe.
    #[must_use]
    pub const fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            h_margin: self.h_margin,
            v_margin: self.v_margin,
            scrollbar_width: self.scrollbar_width,
            paragraph_step: self.v_margin,
        }
    }
}
