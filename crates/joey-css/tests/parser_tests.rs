//! Integration tests for the stylesheet parser.

use joey_css::parser::{CSSParser, parse_declarations, parse_stylesheet};
use joey_css::selector::CSSSelector;

fn tag(name: &str) -> CSSSelector {
    CSSSelector::Tag(name.to_string())
}

fn class(name: &str) -> CSSSelector {
    CSSSelector::Class(name.to_string())
}

#[test]
fn test_single_rule() {
    let sheet = parse_stylesheet("p { color: red; }");
    assert_eq!(sheet.rules.len(), 1);
    let rule = &sheet.rules[0];
    assert_eq!(rule.selector, tag("p"));
    assert_eq!(rule.declarations.len(), 1);
    assert_eq!(rule.declarations[0].name, "color");
    assert_eq!(rule.declarations[0].value, "red");
}

#[test]
fn test_rules_keep_source_order() {
    let sheet = parse_stylesheet("h1{font-size:200%}\n.note { color: #333 }\np{width:300px;height:20px;}");
    let selectors: Vec<String> = sheet.rules.iter().map(|r| r.selector.to_string()).collect();
    assert_eq!(selectors, ["h1", ".note", "p"]);
    assert_eq!(sheet.rules[0].declarations[0].value, "200%");
    assert_eq!(sheet.rules[1].declarations[0].value, "#333");
    assert_eq!(sheet.rules[2].declarations.len(), 2);
}

#[test]
fn test_property_names_are_lowercased() {
    let sheet = parse_stylesheet("p { Background-Color: Gray; }");
    assert_eq!(sheet.rules[0].declarations[0].name, "background-color");
    assert_eq!(sheet.rules[0].declarations[0].value, "Gray");
}

#[test]
fn test_compound_and_descendant_selectors() {
    let sheet = parse_stylesheet("div.box p .x { color: red; }");
    let expected = CSSSelector::Descendant(
        Box::new(CSSSelector::Descendant(
            Box::new(CSSSelector::Sequence(vec![tag("div"), class("box")])),
            Box::new(tag("p")),
        )),
        Box::new(class("x")),
    );
    assert_eq!(sheet.rules[0].selector, expected);
    assert_eq!(sheet.rules[0].priority(), 22);
}

#[test]
fn test_bad_declaration_is_skipped() {
    let mut parser = CSSParser::new("p { color red; font-size: 20px; }");
    let sheet = parser.parse_stylesheet();
    assert_eq!(sheet.rules.len(), 1);
    let decls = &sheet.rules[0].declarations;
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].name, "font-size");
    assert_eq!(parser.errors().len(), 1);
    assert_eq!(parser.errors()[0].expected, ":");
}

#[test]
fn test_bad_declaration_at_block_end() {
    let sheet = parse_stylesheet("p { color: red; width: } div { color: blue; }");
    assert_eq!(sheet.rules.len(), 2);
    assert_eq!(sheet.rules[0].declarations.len(), 1);
    assert_eq!(sheet.rules[1].declarations[0].value, "blue");
}

#[test]
fn test_bad_rule_is_skipped() {
    let mut parser = CSSParser::new("@media print { p { color: red; } } div { color: blue; }");
    let sheet = parser.parse_stylesheet();
    assert!(!parser.errors().is_empty());
    let last = sheet.rules.last().map(|rule| rule.selector.clone());
    assert_eq!(last, Some(tag("div")));
}

#[test]
fn test_selector_list_is_dropped_not_fatal() {
    let sheet = parse_stylesheet("h1, h2 { color: red; } p { color: blue; }");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selector, tag("p"));
}

#[test]
fn test_missing_final_semicolon() {
    let sheet = parse_stylesheet("p { color: red }");
    assert_eq!(sheet.rules[0].declarations.len(), 1);
}

#[test]
fn test_unterminated_block_keeps_nothing_half_built() {
    let sheet = parse_stylesheet("p { color: red; } div { color: blue;");
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selector, tag("p"));
}

#[test]
fn test_empty_and_whitespace_sources() {
    for source in ["", "   \n\t", "/* only a comment */"] {
        let mut parser = CSSParser::new(source);
        assert!(parser.parse_stylesheet().rules.is_empty());
        assert!(parser.errors().is_empty(), "{source:?}");
    }
}

#[test]
fn test_inline_declarations() {
    let decls = parse_declarations("color:green; font-size: 50%");
    let pairs: Vec<(&str, &str)> = decls
        .iter()
        .map(|d| (d.name.as_str(), d.value.as_str()))
        .collect();
    assert_eq!(pairs, [("color", "green"), ("font-size", "50%")]);
}

#[test]
fn test_inline_declarations_recover() {
    let decls = parse_declarations("color: ; width: 10px");
    assert_eq!(decls.len(), 1);
    assert_eq!(decls[0].name, "width");
}

#[test]
fn test_error_message_format() {
    let mut parser = CSSParser::new("p { color: ; }");
    let _ = parser.parse_stylesheet();
    assert_eq!(
        parser.errors()[0].to_string(),
        "Expected word at index 11 but found:  { color: "
    );
}
