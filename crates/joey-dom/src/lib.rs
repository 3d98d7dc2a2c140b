//! Document tree for the Joey renderer.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all
//! relationships. A parent owns its children through the index list in
//! [`Node::children`]; the upward [`Node::parent`] link is a plain index, so
//! there is never a second owner and never a reference cycle.
//!
//! Each node also carries its resolved [`StyleMap`]. The tree is built once
//! by the markup parser; afterwards the cascade is the only writer, and only
//! of the style maps.

use std::collections::{HashMap, HashSet};

/// Map of attribute names to values. Boolean attributes (`<input disabled>`)
/// have no value.
pub type AttributesMap = HashMap<String, Option<String>>;

/// Resolved property values for a node, e.g. `"font-size" -> "16px"`.
pub type StyleMap = HashMap<String, String>;

/// A type-safe index into the document tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A node in the arena with its links to the rest of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    /// Element or text payload.
    pub node_type: NodeType,

    /// Containing element, `None` only for the root.
    pub parent: Option<NodeId>,

    /// Children in document order.
    pub children: Vec<NodeId>,

    /// Resolved style, empty until the cascade has run.
    pub style: StyleMap,
}

/// The two kinds of node a document is made of.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeType {
    /// A tagged element with attributes and children.
    Element(ElementData),
    /// A run of character data. Always inline.
    Text(String),
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercased tag name.
    pub tag_name: String,
    /// Lowercased attribute names mapped to their (optional) values.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data with no attributes.
    #[must_use]
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            attrs: AttributesMap::new(),
        }
    }

    /// Value of an attribute, if present and not a bare boolean attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(|v| v.as_deref())
    }

    /// Returns the set of class names from the class attribute.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The class attribute, if specified, must have a value that is a set of
    /// space-separated tokens representing the various classes that the element belongs to."
    #[must_use]
    pub fn classes(&self) -> HashSet<&str> {
        self.attr("class")
            .map(|list| list.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// Arena-based document tree.
///
/// All nodes live in one vector and refer to each other by [`NodeId`].
/// Nodes are allocated detached; [`DomTree::append_child`] links them in.
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl DomTree {
    /// Create an empty tree with no root.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The root element (normally `<html>`), if one has been set.
    #[must_use]
    pub const fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Make `id` the root of the tree.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node has been allocated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Allocate a new detached node and return its ID.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            style: StyleMap::new(),
        });
        id
    }

    /// Appends `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` into `parent` immediately before `reference`.
    ///
    /// Falls back to appending when `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        let Some(index) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&c| c == reference)
        else {
            self.append_child(parent, child);
            return;
        };

        self.nodes[parent.0].children.insert(index, child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Pre-order traversal of the subtree rooted at `id`, `id` included.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: vec![id],
        }
    }

    /// Pre-order traversal of the whole attached tree.
    #[must_use]
    pub fn iter_all(&self) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.root.into_iter().collect(),
        }
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            NodeType::Element(_) => None,
        })
    }

    /// Tag name of an element node, `None` for text.
    #[must_use]
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.as_element(id).map(|e| e.tag_name.as_str())
    }

    /// First direct child element with the given tag name.
    #[must_use]
    pub fn child_element(&self, parent: NodeId, tag: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&id| self.tag_name(id) == Some(tag))
    }

    /// First element with the given tag name, in document order.
    #[must_use]
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.iter_all().find(|&id| self.tag_name(id) == Some(tag))
    }

    /// Concatenated text of all text nodes under `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        self.descendants(id)
            .filter_map(|n| self.as_text(n))
            .collect()
    }

    /// Resolved style of a node. Empty before the cascade runs.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not allocated by this tree.
    #[must_use]
    pub fn style(&self, id: NodeId) -> &StyleMap {
        &self.nodes[id.0].style
    }

    /// Replace the resolved style of a node.
    pub fn set_style(&mut self, id: NodeId, style: StyleMap) {
        if let Some(node) = self.get_mut(id) {
            node.style = style;
        }
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's
    /// children that is either a body element or a frameset element, or null
    /// if there is no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.child_element(self.root?, "body")
    }

    /// The `<head>` child of the root element.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.child_element(self.root?, "head")
    }
}

/// Iterator over ancestors of a node.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Pre-order iterator over a subtree.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}
