//! Splitting the text of a tag into its name and attributes.

use joey_dom::AttributesMap;

use crate::entities::decode_entities;

/// The contents of one `<...>` after the scanner has captured it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagToken {
    /// Lowercased tag name, without the leading `/` of a closing tag.
    pub name: String,
    /// Attributes in first-wins order. Always empty for closing tags.
    pub attrs: AttributesMap,
    /// `</name>`
    pub is_closing: bool,
    /// `<name/>`
    pub self_closing: bool,
}

/// Parse the text between `<` and `>`.
///
/// Returns `None` when the tag has no name (`<>`, `</>`, `< p>`).
///
/// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
///
/// Attributes are separated by whitespace outside quotes. Each is either
/// `key=value` or a bare key with no value. "When the user agent leaves the
/// attribute name state... if there is already an attribute on the token with
/// the exact same name, then this is a duplicate-attribute parse error and
/// the new attribute must be removed from the token."
#[must_use]
pub fn parse_tag(text: &str) -> Option<TagToken> {
    let (is_closing, body) = match text.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    if body.starts_with(|c: char| c.is_ascii_whitespace()) {
        return None;
    }

    let mut parts = split_outside_quotes(body);
    let mut self_closing = false;
    if parts.last().is_some_and(|p| p == "/") {
        let _ = parts.pop();
        self_closing = true;
    }
    let name_only = parts.len() == 1;
    if let Some(last) = parts.last_mut()
        && (name_only || last.ends_with("\"/") || last.ends_with("'/"))
        && last.ends_with('/')
    {
        let _ = last.pop();
        self_closing = true;
    }

    let mut parts = parts.into_iter();
    let name = parts.next()?.to_ascii_lowercase();
    if name.is_empty() || !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return None;
    }

    let mut attrs = AttributesMap::new();
    if !is_closing {
        for part in parts {
            let (key, value) = match part.split_once('=') {
                Some((key, value)) => (key, Some(decode_entities(unquote(value)))),
                None => (part.as_str(), None),
            };
            if key.is_empty() {
                continue;
            }
            let _ = attrs.entry(key.to_ascii_lowercase()).or_insert(value);
        }
    }

    Some(TagToken {
        name,
        attrs,
        is_closing,
        self_closing,
    })
}

/// Split on ASCII whitespace, treating quoted runs as part of the word.
fn split_outside_quotes(text: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in text.chars() {
        match quote {
            Some(q) if c == q => {
                quote = None;
                current.push(c);
            }
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.push(c);
            }
            None if c.is_ascii_whitespace() => {
                if !current.is_empty() {
                    parts.push(std::mem::take(&mut current));
                }
            }
            None => current.push(c),
        }
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

/// Strip one pair of matching single or double quotes.
fn unquote(value: &str) -> &str {
    for q in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(q)
            .and_then(|v| v.strip_suffix(q))
        {
            return inner;
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tag() {
        let tag = parse_tag("P").unwrap();
        assert_eq!(tag.name, "p");
        assert!(!tag.is_closing);
        assert!(tag.attrs.is_empty());
    }

    #[test]
    fn test_closing_tag() {
        let tag = parse_tag("/DIV").unwrap();
        assert_eq!(tag.name, "div");
        assert!(tag.is_closing);
    }

    #[test]
    fn test_quoted_value_with_spaces() {
        let tag = parse_tag(r#"p style="color: red; font-weight: bold" id=main"#).unwrap();
        assert_eq!(
            tag.attrs.get("style").cloned().flatten().as_deref(),
            Some("color: red; font-weight: bold")
        );
        assert_eq!(tag.attrs.get("id").cloned().flatten().as_deref(), Some("main"));
    }

    #[test]
    fn test_boolean_attribute_and_case_folding() {
        let tag = parse_tag("input DISABLED Type='text'").unwrap();
        assert_eq!(tag.attrs.get("disabled"), Some(&None));
        assert_eq!(tag.attrs.get("type"), Some(&Some("text".to_string())));
    }

    #[test]
    fn test_first_duplicate_wins() {
        let tag = parse_tag("a href=one href=two").unwrap();
        assert_eq!(tag.attrs.get("href"), Some(&Some("one".to_string())));
    }

    #[test]
    fn test_self_closing_forms() {
        assert!(parse_tag("br/").unwrap().self_closing);
        assert_eq!(parse_tag("br/").unwrap().name, "br");
        assert!(parse_tag("br /").unwrap().self_closing);

        let img = parse_tag(r#"img src="a.png"/"#).unwrap();
        assert!(img.self_closing);
        assert_eq!(img.attrs.get("src"), Some(&Some("a.png".to_string())));

        let link = parse_tag("a href=/docs/").unwrap();
        assert!(!link.self_closing);
        assert_eq!(link.attrs.get("href"), Some(&Some("/docs/".to_string())));
    }

    #[test]
    fn test_attribute_entities_are_decoded() {
        let tag = parse_tag(r#"a title="Q&amp;A""#).unwrap();
        assert_eq!(tag.attrs.get("title"), Some(&Some("Q&A".to_string())));
    }

    #[test]
    fn test_nameless_tags() {
        assert!(parse_tag("").is_none());
        assert!(parse_tag("/").is_none());
        assert!(parse_tag(" p").is_none());
    }
}
