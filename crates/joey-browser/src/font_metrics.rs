//! Font metrics backed by fontdue for accurate text measurement during layout.
//!
//! [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
//!
//! "CSS assumes that every font has font metrics that specify a
//! characteristic height above the baseline and a depth below it."

use std::path::Path;

use fontdue::{Font, FontSettings};
use thiserror::Error;

use joey_css::{FontKey, FontMetrics, FontSlant, FontWeight, LineMetrics};

/// Common system font paths to search for a default (regular) font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// System font paths for bold variants.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// System font paths for italic variants.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// System font paths for bold-italic variants.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

/// Why a font file could not be used.
#[derive(Debug, Error)]
pub enum FontError {
    /// The file could not be read.
    #[error("failed to read font '{path}': {source}")]
    Io {
        /// Path that was requested.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// fontdue rejected the data.
    #[error("failed to parse font '{path}': {reason}")]
    Parse {
        /// Path that was requested.
        path: String,
        /// fontdue's explanation.
        reason: &'static str,
    },
}

/// Font metrics implementation backed by fontdue's per-glyph metrics.
///
/// Holds up to four faces: regular, bold, italic, and bold-italic. A
/// missing variant falls back to the closest loaded one. Family names are
/// not matched; every family is measured with the loaded faces.
///
/// Uses `Font::metrics()` (not `Font::rasterize()`) to avoid the cost of
/// bitmap generation when only measurements are needed.
pub struct FontdueFontMetrics {
    regular: Font,
    bold: Option<Font>,
    italic: Option<Font>,
    bold_italic: Option<Font>,
}

impl FontdueFontMetrics {
    /// Use one face for every weight and slant.
    #[must_use]
    pub fn new(font: Font) -> Self {
        Self {
            regular: font,
            bold: None,
            italic: None,
            bold_italic: None,
        }
    }

    /// Load a single face from a font file.
    ///
    /// # Errors
    ///
    /// Returns a [`FontError`] if the file is unreadable or not a font.
    pub fn from_path(path: &Path) -> Result<Self, FontError> {
        let display = path.display().to_string();
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: display.clone(),
            source,
        })?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|reason| FontError::Parse {
                path: display,
                reason,
            })?;
        Ok(Self::new(font))
    }

    /// Search well-known system locations for a regular face and its
    /// variants. Returns `None` if no regular face is found.
    #[must_use]
    pub fn system() -> Option<Self> {
        let regular = load_font_from_paths(FONT_SEARCH_PATHS, "regular")?;
        Some(Self {
            regular,
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS, "bold"),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS, "italic"),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS, "bold-italic"),
        })
    }

    fn face(&self, key: &FontKey) -> &Font {
        let bold = key.weight == FontWeight::Bold;
        let italic = key.slant == FontSlant::Italic;
        let variant = match (bold, italic) {
            (true, true) => self
                .bold_italic
                .as_ref()
                .or(self.bold.as_ref())
                .or(self.italic.as_ref()),
            (true, false) => self.bold.as_ref(),
            (false, true) => self.italic.as_ref(),
            (false, false) => None,
        };
        variant.unwrap_or(&self.regular)
    }
}

impl FontMetrics for FontdueFontMetrics {
    fn measure(&self, text: &str, font: &FontKey) -> f32 {
        let face = self.face(font);
        let px = font.px();
        text.chars()
            .filter(|ch| !ch.is_control())
            .map(|ch| face.metrics(ch, px).advance_width)
            .sum()
    }

    fn line_metrics(&self, font: &FontKey) -> LineMetrics {
        let px = font.px();
        // fontdue reports descent as a negative offset below the baseline.
        self.face(font).horizontal_line_metrics(px).map_or(
            LineMetrics {
                ascent: px * 0.8,
                descent: px * 0.2,
            },
            |metrics| LineMetrics {
                ascent: metrics.ascent,
                descent: -metrics.descent,
            },
        )
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str], label: &str) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path)
            && let Ok(font) = Font::from_bytes(data, FontSettings::default())
        {
            log::debug!("loaded {label} font: {path}");
            return Some(font);
        }
    }
    None
}
