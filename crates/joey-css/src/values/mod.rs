//! CSS value helpers per [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/).
//!
//! Style maps keep values as the strings the author wrote. These helpers
//! read the few numeric forms the cascade and layout need.

/// The keyword that means "no explicit size".
pub const AUTO: &str = "auto";

/// [§ 6.2 Absolute lengths](https://www.w3.org/TR/css-values-4/#absolute-lengths)
///
/// Parse a pixel length: `"16px"` or a bare number `"16"`. Returns `None`
/// for anything else (other units, keywords, percentages).
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value);
    number.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// [§ 4.5 Percentages](https://www.w3.org/TR/css-values-4/#percentages)
///
/// Parse `"50%"` into `50.0`.
#[must_use]
pub fn parse_percentage(value: &str) -> Option<f64> {
    value
        .trim()
        .strip_suffix('%')?
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
}

/// Format a pixel length the way style maps store it: `10px`, `14.4px`.
#[must_use]
pub fn format_px(px: f64) -> String {
    format!("{px}px")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("16px"), Some(16.0));
        assert_eq!(parse_px("300"), Some(300.0));
        assert_eq!(parse_px(" 12.5px "), Some(12.5));
        assert_eq!(parse_px("2em"), None);
        assert_eq!(parse_px("auto"), None);
        assert_eq!(parse_px("50%"), None);
        assert_eq!(parse_px("infpx"), None);
    }

    #[test]
    fn test_parse_percentage() {
        assert_eq!(parse_percentage("50%"), Some(50.0));
        assert_eq!(parse_percentage("110%"), Some(110.0));
        assert_eq!(parse_percentage("50"), None);
        assert_eq!(parse_percentage("%"), None);
    }

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(10.0), "10px");
        assert_eq!(format_px(16.0 * 90.0 / 100.0), "14.4px");
    }
}
