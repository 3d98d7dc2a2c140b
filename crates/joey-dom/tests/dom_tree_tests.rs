//! Tests for tree construction, traversal, and style storage.

use joey_dom::{DomTree, ElementData, NodeId, NodeType, StyleMap};

/// Helper to create an element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag)))
}

/// html > (head, body > (p > "hi", div))
fn sample_tree() -> (DomTree, [NodeId; 6]) {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.set_root(html);
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, head);
    tree.append_child(html, body);
    let p = alloc_element(&mut tree, "p");
    tree.append_child(body, p);
    let text = tree.alloc(NodeType::Text("hi".to_string()));
    tree.append_child(p, text);
    let div = alloc_element(&mut tree, "div");
    tree.append_child(body, div);
    (tree, [html, head, body, p, text, div])
}

#[test]
fn test_empty_tree_has_no_root() {
    let tree = DomTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.root(), None);
    assert_eq!(tree.iter_all().count(), 0);
    assert_eq!(tree.body(), None);
}

#[test]
fn test_append_child_links_parent_and_children() {
    let (tree, [html, head, body, p, _, div]) = sample_tree();

    assert_eq!(tree.children(html), &[head, body]);
    assert_eq!(tree.children(body), &[p, div]);
    assert_eq!(tree.parent(body), Some(html));
    assert_eq!(tree.parent(div), Some(body));
    assert_eq!(tree.parent(html), None);
}

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    tree.set_root(html);
    let body = alloc_element(&mut tree, "body");
    tree.append_child(html, body);

    let head = alloc_element(&mut tree, "head");
    tree.insert_before(html, head, body);

    assert_eq!(tree.children(html), &[head, body]);
    assert_eq!(tree.parent(head), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
}

#[test]
fn test_preorder_traversal() {
    let (tree, [html, head, body, p, text, div]) = sample_tree();
    let order: Vec<NodeId> = tree.iter_all().collect();
    assert_eq!(order, vec![html, head, body, p, text, div]);
}

#[test]
fn test_every_non_root_node_has_one_parent() {
    let (tree, [html, ..]) = sample_tree();
    for id in tree.iter_all() {
        if id == html {
            assert!(tree.parent(id).is_none());
            continue;
        }
        let parent = tree.parent(id).unwrap();
        let occurrences = tree
            .iter_all()
            .filter(|&candidate| tree.children(candidate).contains(&id))
            .count();
        assert_eq!(occurrences, 1);
        assert!(tree.children(parent).contains(&id));
    }
}

#[test]
fn test_ancestors_walk_to_root() {
    let (tree, [html, _, body, p, text, _]) = sample_tree();
    let ancestors: Vec<NodeId> = tree.ancestors(text).collect();
    assert_eq!(ancestors, vec![p, body, html]);
}

#[test]
fn test_text_content_and_find() {
    let (tree, [_, _, body, p, _, _]) = sample_tree();
    assert_eq!(tree.text_content(body), "hi");
    assert_eq!(tree.find_element("p"), Some(p));
    assert_eq!(tree.find_element("span"), None);
}

#[test]
fn test_style_storage() {
    let (mut tree, [_, _, _, p, _, _]) = sample_tree();
    assert!(tree.style(p).is_empty());

    let mut style = StyleMap::new();
    let _ = style.insert("color".to_string(), "red".to_string());
    tree.set_style(p, style);
    assert_eq!(tree.style(p).get("color").map(String::as_str), Some("red"));
}

#[test]
fn test_classes_and_boolean_attributes() {
    let mut data = ElementData::new("input");
    let _ = data
        .attrs
        .insert("class".to_string(), Some("big  red".to_string()));
    let _ = data.attrs.insert("disabled".to_string(), None);

    let classes = data.classes();
    assert!(classes.contains("big"));
    assert!(classes.contains("red"));
    assert_eq!(classes.len(), 2);
    assert!(data.attrs.contains_key("disabled"));
    assert_eq!(data.attr("disabled"), None);
    assert_eq!(data.attr("class"), Some("big  red"));
}
