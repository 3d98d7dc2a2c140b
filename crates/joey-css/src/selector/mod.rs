//! CSS Selector parsing and matching
//!
//! This module implements the subset of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) the renderer
//! understands: type selectors, class selectors, compounds of the two, and
//! the descendant combinator.

use std::fmt;

use joey_dom::{DomTree, NodeId};

/// Priority contributed by a type selector.
const TAG_PRIORITY: u32 = 1;

/// Priority contributed by a class selector.
const CLASS_PRIORITY: u32 = 10;

/// A parsed selector ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CSSSelector {
    /// [§ 5.1 Type selector](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// "A type selector is the name of a document language element type,
    /// and represents an instance of that element type in the document tree."
    ///
    /// Examples: `div`, `p`, `body`
    Tag(String),

    /// [§ 6.6 Class selector](https://www.w3.org/TR/selectors-4/#class-html)
    /// "The class selector is given as a full stop (. U+002E) immediately
    /// followed by an identifier."
    ///
    /// Examples: `.highlight`, `.nav-item`
    Class(String),

    /// [§ 3.1 Compound selector](https://www.w3.org/TR/selectors-4/#compound)
    /// "A compound selector is a sequence of simple selectors that are not
    /// separated by a combinator, and represents a set of simultaneous
    /// conditions on a single element."
    ///
    /// Example: `p.note` is `[Tag(p), Class(note)]`
    Sequence(Vec<CSSSelector>),

    /// [§ 16.1 Descendant combinator](https://www.w3.org/TR/selectors-4/#descendant-combinators)
    /// "A selector of the form 'A B' represents an element B that is an
    /// arbitrary descendant of some ancestor element A."
    ///
    /// Stored as (ancestor, descendant). `a b c` nests to the left:
    /// `Descendant(Descendant(a, b), c)`.
    Descendant(Box<CSSSelector>, Box<CSSSelector>),
}

impl CSSSelector {
    /// Cascade weight: 1 per type selector, 10 per class selector, summed
    /// over compounds and combinators.
    #[must_use]
    pub fn priority(&self) -> u32 {
        match self {
            Self::Tag(_) => TAG_PRIORITY,
            Self::Class(_) => CLASS_PRIORITY,
            Self::Sequence(parts) => parts.iter().map(Self::priority).sum(),
            Self::Descendant(ancestor, descendant) => ancestor.priority() + descendant.priority(),
        }
    }

    /// [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
    ///
    /// Whether the node at `id` is matched. Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        let Some(element) = tree.as_element(id) else {
            return false;
        };

        match self {
            Self::Tag(name) => element.tag_name == *name,
            Self::Class(name) => element.classes().contains(name.as_str()),
            Self::Sequence(parts) => {
                !parts.is_empty() && parts.iter().all(|part| part.matches(tree, id))
            }
            Self::Descendant(ancestor, descendant) => {
                descendant.matches(tree, id)
                    && tree
                        .ancestors(id)
                        .any(|ancestor_id| ancestor.matches(tree, ancestor_id))
            }
        }
    }
}

impl fmt::Display for CSSSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(name) => write!(f, "{name}"),
            Self::Class(name) => write!(f, ".{name}"),
            Self::Sequence(parts) => parts.iter().try_for_each(|part| write!(f, "{part}")),
            Self::Descendant(ancestor, descendant) => write!(f, "{ancestor} {descendant}"),
        }
    }
}

/// Interpret one selector word.
///
/// `.note` is a class, `p.note` a tag+class compound, anything else a type
/// selector. Type names are lowercased; class names keep their case.
#[must_use]
pub fn parse_selector(word: &str) -> CSSSelector {
    let mut pieces = word.split('.');
    let tag = pieces.next().unwrap_or_default();

    let mut parts: Vec<CSSSelector> = Vec::new();
    if !tag.is_empty() {
        parts.push(CSSSelector::Tag(tag.to_ascii_lowercase()));
    }
    parts.extend(
        pieces
            .filter(|class| !class.is_empty())
            .map(|class| CSSSelector::Class(class.to_string())),
    );

    if parts.len() == 1
        && let Some(only) = parts.pop()
    {
        return only;
    }
    CSSSelector::Sequence(parts)
}
