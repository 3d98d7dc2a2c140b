//! Fonts as layout sees them: a value key, the measuring interface, and a
//! memoizing cache in front of it.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use strum_macros::{AsRefStr, Display, EnumString};

use joey_dom::StyleMap;

use crate::values::parse_px;

/// Conversion from CSS pixels to typographic points.
pub const POINTS_PER_PX: f64 = 0.75;

/// Pixel size used when a style map's `font-size` cannot be read.
const FALLBACK_FONT_PX: f64 = 16.0;

/// [§ 3.2 'font-weight'](https://www.w3.org/TR/css-fonts-4/#font-weight-prop)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight.
    #[default]
    Normal,
    /// Bold weight.
    Bold,
}

impl FontWeight {
    /// Read a `font-weight` value. Numeric weights of 600 and above are
    /// bold; unknown keywords are normal.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        if let Ok(weight) = value.parse::<Self>() {
            return weight;
        }
        match value.trim() {
            "bolder" => Self::Bold,
            numeric => match numeric.parse::<u16>() {
                Ok(weight) if weight >= 600 => Self::Bold,
                _ => Self::Normal,
            },
        }
    }
}

/// [§ 3.3 'font-style'](https://www.w3.org/TR/css-fonts-4/#font-style-prop)
///
/// Named the way font back-ends name it: `normal` is `roman`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr, Serialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    /// Upright.
    #[default]
    Roman,
    /// Slanted.
    Italic,
}

impl FontSlant {
    /// Read a `font-style` value. `italic` and `oblique` slant; everything
    /// else, including `normal`, is roman.
    #[must_use]
    pub fn from_css(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "italic" | "oblique" => Self::Italic,
            _ => Self::Roman,
        }
    }
}

/// Identity of a font face at a size: what metrics are cached by.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct FontKey {
    /// Family name as written in `font-family`.
    pub family: String,
    /// Size in whole points.
    pub size: u32,
    /// Weight.
    pub weight: FontWeight,
    /// Slant.
    pub slant: FontSlant,
}

impl FontKey {
    /// Create a key for a family at a point size.
    #[must_use]
    pub fn new(family: &str, size: u32, weight: FontWeight, slant: FontSlant) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight,
            slant,
        }
    }

    /// The font a node's text is drawn in, read from its resolved style.
    ///
    /// `font-size` is converted from pixels to whole points, truncating.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_style(style: &StyleMap) -> Self {
        let px = style
            .get("font-size")
            .and_then(|size| parse_px(size))
            .unwrap_or(FALLBACK_FONT_PX);
        Self {
            family: style
                .get("font-family")
                .cloned()
                .unwrap_or_else(|| "Times".to_string()),
            size: (px * POINTS_PER_PX).max(0.0) as u32,
            weight: style
                .get("font-weight")
                .map_or(FontWeight::Normal, |w| FontWeight::from_css(w)),
            slant: style
                .get("font-style")
                .map_or(FontSlant::Roman, |s| FontSlant::from_css(s)),
        }
    }

    /// The size in CSS pixels.
    #[must_use]
    pub fn px(&self) -> f32 {
        (f64::from(self.size) / POINTS_PER_PX) as f32
    }
}

/// Vertical metrics of a font, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LineMetrics {
    /// Height above the baseline.
    pub ascent: f32,
    /// Depth below the baseline, as a positive number.
    pub descent: f32,
}

impl LineMetrics {
    /// Total height of one line: ascent plus descent.
    #[must_use]
    pub fn linespace(&self) -> f32 {
        self.ascent + self.descent
    }
}

/// Font metrics interface for text measurement during layout.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
///
/// Implementations must be deterministic: the same text and key always
/// measure the same.
pub trait FontMetrics {
    /// Advance width of `text` in pixels.
    fn measure(&self, text: &str, font: &FontKey) -> f32;

    /// Ascent and descent in pixels.
    fn line_metrics(&self, font: &FontKey) -> LineMetrics;
}

impl<M: FontMetrics + ?Sized> FontMetrics for &M {
    fn measure(&self, text: &str, font: &FontKey) -> f32 {
        (**self).measure(text, font)
    }

    fn line_metrics(&self, font: &FontKey) -> LineMetrics {
        (**self).line_metrics(font)
    }
}

/// Approximate font metrics using fixed ratios.
///
/// Implementation note: Without access to actual font data, we use fixed
/// ratio approximations. The average advance width of Latin glyphs in a
/// proportional font is approximately 0.6× the font size; ascent and
/// descent split the em box 80/20.
///
/// This is used as a fallback when no font is available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl ApproximateFontMetrics {
    const CHAR_WIDTH_RATIO: f32 = 0.6;
    const ASCENT_RATIO: f32 = 0.8;
    const DESCENT_RATIO: f32 = 0.2;
}

impl FontMetrics for ApproximateFontMetrics {
    fn measure(&self, text: &str, font: &FontKey) -> f32 {
        text.chars().count() as f32 * font.px() * Self::CHAR_WIDTH_RATIO
    }

    fn line_metrics(&self, font: &FontKey) -> LineMetrics {
        LineMetrics {
            ascent: font.px() * Self::ASCENT_RATIO,
            descent: font.px() * Self::DESCENT_RATIO,
        }
    }
}

/// Memoizes another provider by [`FontKey`].
///
/// Layout measures every word and queries line metrics for every word on a
/// line, so the same questions repeat constantly. Interior mutability keeps
/// the cache behind the `&self` signature of [`FontMetrics`].
pub struct FontCache<M> {
    provider: M,
    line_metrics: RefCell<HashMap<FontKey, LineMetrics>>,
    widths: RefCell<HashMap<FontKey, HashMap<String, f32>>>,
}

impl<M: FontMetrics> FontCache<M> {
    /// Wrap `provider`.
    #[must_use]
    pub fn new(provider: M) -> Self {
        Self {
            provider,
            line_metrics: RefCell::new(HashMap::new()),
            widths: RefCell::new(HashMap::new()),
        }
    }

    /// The wrapped provider.
    #[must_use]
    pub const fn provider(&self) -> &M {
        &self.provider
    }

    /// Number of distinct fonts seen so far.
    #[must_use]
    pub fn font_count(&self) -> usize {
        self.line_metrics.borrow().len()
    }
}

impl<M: FontMetrics> FontMetrics for FontCache<M> {
    fn measure(&self, text: &str, font: &FontKey) -> f32 {
        let cached = self
            .widths
            .borrow()
            .get(font)
            .and_then(|words| words.get(text).copied());
        if let Some(width) = cached {
            return width;
        }

        let width = self.provider.measure(text, font);
        let _ = self
            .widths
            .borrow_mut()
            .entry(font.clone())
            .or_default()
            .insert(text.to_string(), width);
        width
    }

    fn line_metrics(&self, font: &FontKey) -> LineMetrics {
        let cached = self.line_metrics.borrow().get(font).copied();
        if let Some(metrics) = cached {
            return metrics;
        }

        let metrics = self.provider.line_metrics(font);
        let _ = self
            .line_metrics
            .borrow_mut()
            .insert(font.clone(), metrics);
        metrics
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts how often the underlying provider is asked.
    struct CountingMetrics {
        calls: Cell<usize>,
    }

    impl FontMetrics for CountingMetrics {
        fn measure(&self, text: &str, _font: &FontKey) -> f32 {
            self.calls.set(self.calls.get() + 1);
            text.len() as f32
        }

        fn line_metrics(&self, _font: &FontKey) -> LineMetrics {
            self.calls.set(self.calls.get() + 1);
            LineMetrics {
                ascent: 10.0,
                descent: 2.0,
            }
        }
    }

    fn times(size: u32) -> FontKey {
        FontKey::new("Times", size, FontWeight::Normal, FontSlant::Roman)
    }

    #[test]
    fn test_cache_queries_provider_once_per_key() {
        let cache = FontCache::new(CountingMetrics {
            calls: Cell::new(0),
        });
        for _ in 0..3 {
            assert_eq!(cache.measure("hello", &times(12)), 5.0);
            assert_eq!(cache.line_metrics(&times(12)).ascent, 10.0);
        }
        assert_eq!(cache.provider().calls.get(), 2);

        let _ = cache.measure("hello", &times(14));
        assert_eq!(cache.provider().calls.get(), 3);
        assert_eq!(cache.font_count(), 1);
    }

    #[test]
    fn test_font_key_from_style() {
        let style: StyleMap = [
            ("font-family", "Helvetica"),
            ("font-size", "16px"),
            ("font-weight", "bold"),
            ("font-style", "normal"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let key = FontKey::from_style(&style);
        assert_eq!(key.family, "Helvetica");
        assert_eq!(key.size, 12);
        assert_eq!(key.weight, FontWeight::Bold);
        assert_eq!(key.slant, FontSlant::Roman);
        assert!((key.px() - 16.0).abs() < 0.01);
    }

    #[test]
    fn test_point_size_truncates() {
        let style: StyleMap = [("font-size".to_string(), "14.4px".to_string())]
            .into_iter()
            .collect();
        assert_eq!(FontKey::from_style(&style).size, 10);
    }

    #[test]
    fn test_weight_and_slant_keywords() {
        assert_eq!(FontWeight::from_css("BOLD"), FontWeight::Bold);
        assert_eq!(FontWeight::from_css("700"), FontWeight::Bold);
        assert_eq!(FontWeight::from_css("400"), FontWeight::Normal);
        assert_eq!(FontWeight::from_css("lighter"), FontWeight::Normal);
        assert_eq!(FontSlant::from_css("italic"), FontSlant::Italic);
        assert_eq!(FontSlant::from_css("oblique"), FontSlant::Italic);
        assert_eq!(FontSlant::from_css("normal"), FontSlant::Roman);
        assert_eq!(FontSlant::Roman.to_string(), "roman");
        assert_eq!(FontWeight::Bold.as_ref(), "bold");
    }
}
