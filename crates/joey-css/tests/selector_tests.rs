//! Integration tests for selector matching against parsed documents.

use joey_css::selector::{CSSSelector, parse_selector};
use joey_dom::{DomTree, NodeId};

fn parse_html(html: &str) -> DomTree {
    joey_html::parse(html).expect("document should parse")
}

fn first(tree: &DomTree, tag: &str) -> NodeId {
    tree.find_element(tag).expect("element should exist")
}

fn descendant(ancestor: &str, child: &str) -> CSSSelector {
    CSSSelector::Descendant(
        Box::new(parse_selector(ancestor)),
        Box::new(parse_selector(child)),
    )
}

#[test]
fn test_tag_selector() {
    let tree = parse_html("<p>hi</p><div>x</div>");
    assert!(parse_selector("p").matches(&tree, first(&tree, "p")));
    assert!(!parse_selector("p").matches(&tree, first(&tree, "div")));
}

#[test]
fn test_class_selector() {
    let tree = parse_html(r#"<p class="note big">hi</p><p class="notebook">x</p>"#);
    let p = first(&tree, "p");
    assert!(parse_selector(".note").matches(&tree, p));
    assert!(parse_selector(".big").matches(&tree, p));
    assert!(!parse_selector(".Note").matches(&tree, p));

    let second = tree.iter_all().filter(|&id| tree.tag_name(id) == Some("p")).nth(1);
    let second = second.expect("two paragraphs");
    assert!(!parse_selector(".note").matches(&tree, second));
}

#[test]
fn test_sequence_requires_every_part() {
    let tree = parse_html(r#"<p class="x">a</p><div class="x">b</div>"#);
    let selector = parse_selector("p.x");
    assert!(selector.matches(&tree, first(&tree, "p")));
    assert!(!selector.matches(&tree, first(&tree, "div")));
}

#[test]
fn test_descendant_matches_any_ancestor() {
    let tree = parse_html(r#"<div class="outer"><section><p>deep</p></section></div><p>top</p>"#);
    let paragraphs: Vec<NodeId> = tree
        .iter_all()
        .filter(|&id| tree.tag_name(id) == Some("p"))
        .collect();

    let selector = descendant(".outer", "p");
    assert!(selector.matches(&tree, paragraphs[0]));
    assert!(!selector.matches(&tree, paragraphs[1]));

    assert!(descendant("body", "p").matches(&tree, paragraphs[1]));
    assert!(!descendant("p", "p").matches(&tree, paragraphs[0]));
}

#[test]
fn test_text_nodes_never_match() {
    let tree = parse_html("<p>hi</p>");
    let text = tree.children(first(&tree, "p"))[0];
    assert!(!parse_selector("p").matches(&tree, text));
    assert!(!descendant("p", "p").matches(&tree, text));
}
