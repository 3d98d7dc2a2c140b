//! Integration tests for character reference decoding.

use joey_html::entities::{decode_entities, decode_reference};

#[test]
fn test_decode_common_entities() {
    assert_eq!(decode_reference("amp").as_deref(), Some("&"));
    assert_eq!(decode_reference("lt").as_deref(), Some("<"));
    assert_eq!(decode_reference("gt").as_deref(), Some(">"));
    assert_eq!(decode_reference("quot").as_deref(), Some("\""));
    assert_eq!(decode_reference("nbsp").as_deref(), Some("\u{00A0}"));
}

#[test]
fn test_decode_numeric_references() {
    assert_eq!(decode_reference("#65").as_deref(), Some("A"));
    assert_eq!(decode_reference("#x41").as_deref(), Some("A"));
    assert_eq!(decode_reference("#X263a").as_deref(), Some("\u{263A}"));
}

#[test]
fn test_decode_unknown_entity() {
    assert_eq!(decode_reference("notarealentity"), None);
    assert_eq!(decode_reference(""), None);
    assert_eq!(decode_reference("#"), None);
    assert_eq!(decode_reference("#xZZ"), None);
}

#[test]
fn test_decode_entities_in_text() {
    assert_eq!(decode_entities("a &amp; b"), "a & b");
    assert_eq!(decode_entities("&lt;p&gt;"), "<p>");
    assert_eq!(decode_entities("caf&eacute;"), "caf\u{00E9}");
}

#[test]
fn test_malformed_references_are_kept() {
    assert_eq!(decode_entities("AT&T"), "AT&T");
    assert_eq!(decode_entities("a & b"), "a & b");
    assert_eq!(decode_entities("&bogus;"), "&bogus;");
    assert_eq!(decode_entities("trailing &amp"), "trailing &amp");
}
