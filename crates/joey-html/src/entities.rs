//! Character reference decoding.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html)
//!
//! The full table defines 2,231 entities; the common ones are listed here.
//! Numeric references (`&#65;`, `&#x41;`) are decoded arithmetically.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Entity names (without `&` and `;`) mapped to their replacement text.
static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        ("shy", "\u{00AD}"),
        // Punctuation
        ("copy", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("trade", "\u{2122}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("hellip", "\u{2026}"),
        ("bull", "\u{2022}"),
        ("middot", "\u{00B7}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("laquo", "\u{00AB}"),
        ("raquo", "\u{00BB}"),
        ("sect", "\u{00A7}"),
        ("para", "\u{00B6}"),
        ("dagger", "\u{2020}"),
        ("iexcl", "\u{00A1}"),
        ("iquest", "\u{00BF}"),
        // Currency
        ("cent", "\u{00A2}"),
        ("pound", "\u{00A3}"),
        ("euro", "\u{20AC}"),
        ("yen", "\u{00A5}"),
        // Math
        ("times", "\u{00D7}"),
        ("divide", "\u{00F7}"),
        ("plusmn", "\u{00B1}"),
        ("minus", "\u{2212}"),
        ("ne", "\u{2260}"),
        ("le", "\u{2264}"),
        ("ge", "\u{2265}"),
        ("deg", "\u{00B0}"),
        ("frac12", "\u{00BD}"),
        ("frac14", "\u{00BC}"),
        ("frac34", "\u{00BE}"),
        ("infin", "\u{221E}"),
        ("sup2", "\u{00B2}"),
        // Arrows
        ("larr", "\u{2190}"),
        ("rarr", "\u{2192}"),
        ("uarr", "\u{2191}"),
        ("darr", "\u{2193}"),
        // Greek
        ("alpha", "\u{03B1}"),
        ("beta", "\u{03B2}"),
        ("gamma", "\u{03B3}"),
        ("delta", "\u{03B4}"),
        ("lambda", "\u{03BB}"),
        ("mu", "\u{03BC}"),
        ("pi", "\u{03C0}"),
        ("sigma", "\u{03C3}"),
        ("omega", "\u{03C9}"),
        // Accented letters
        ("eacute", "\u{00E9}"),
        ("egrave", "\u{00E8}"),
        ("aacute", "\u{00E1}"),
        ("agrave", "\u{00E0}"),
        ("ouml", "\u{00F6}"),
        ("uuml", "\u{00FC}"),
        ("auml", "\u{00E4}"),
        ("ccedil", "\u{00E7}"),
        ("ntilde", "\u{00F1}"),
        ("szlig", "\u{00DF}"),
    ])
});

/// Decode the body of a character reference, i.e. the text between `&` and
/// `;`.
///
/// Returns `None` for unknown names and for numeric references that do not
/// name a scalar value.
///
/// # Example
/// ```ignore
/// decode_reference("amp")   // Some("&")
/// decode_reference("#65")   // Some("A")
/// decode_reference("#x41")  // Some("A")
/// decode_reference("bogus") // None
/// ```
#[must_use]
pub fn decode_reference(name: &str) -> Option<String> {
    if let Some(number) = name.strip_prefix('#') {
        return decode_numeric(number).map(String::from);
    }
    NAMED_ENTITIES.get(name).map(|s| (*s).to_string())
}

/// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// "If the number is 0x00, then this is a null-character-reference parse
/// error. Set the character reference code to 0xFFFD."
fn decode_numeric(number: &str) -> Option<char> {
    let code = match number.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => number.parse::<u32>().ok()?,
    };
    if code == 0 {
        return Some('\u{FFFD}');
    }
    char::from_u32(code)
}

/// Whether `c` may continue the name part of a reference whose body so far
/// is `buffer`.
#[must_use]
pub fn is_reference_char(buffer: &str, c: char) -> bool {
    c.is_ascii_alphanumeric() || (c == '#' && buffer.is_empty())
}

/// Decode every well-formed reference in `text`; anything else is kept
/// literally.
///
/// Used for attribute values, which the scanner captures raw.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let after = &rest[amp + 1..];
        let name_len = after
            .char_indices()
            .find(|&(i, c)| !is_reference_char(&after[..i], c))
            .map_or(after.len(), |(i, _)| i);

        let decoded = after[name_len..]
            .starts_with(';')
            .then(|| decode_reference(&after[..name_len]))
            .flatten();

        if let Some(decoded) = decoded {
            out.push_str(&decoded);
            rest = &after[name_len + 1..];
        } else {
            out.push('&');
            rest = after;
        }
    }
    out.push_str(rest);
    out
}
