//! CSS Cascading and Style Computation
//!
//! This module implements style resolution per
//! [CSS Cascading and Inheritance Level 4](https://www.w3.org/TR/css-cascade-4/),
//! reduced to what the layout engine reads: string-valued style maps with a
//! fixed set of inherited properties, priority-ordered rules, inline styles,
//! and percentage font sizes.

use joey_common::warning::warn_once;
use joey_dom::{DomTree, NodeId, StyleMap};

use crate::parser::{Rule, Stylesheet, parse_declarations};
use crate::values::{format_px, parse_percentage, parse_px};

/// [§ 7 Inheritance](https://www.w3.org/TR/css-cascade-4/#inheriting)
///
/// "Inheritance propagates property values from parent elements to their
/// children."
///
/// The inherited properties and their initial values, used at the root.
pub const INHERITED_PROPERTIES: [(&str, &str); 5] = [
    ("font-family", "Times"),
    ("font-size", "16px"),
    ("font-style", "normal"),
    ("font-weight", "normal"),
    ("color", "black"),
];

/// Initial value of an inherited property, `None` for any other property.
#[must_use]
pub fn initial_value(property: &str) -> Option<&'static str> {
    INHERITED_PROPERTIES
        .iter()
        .find(|(name, _)| *name == property)
        .map(|(_, value)| *value)
}

/// [§ 6.4.3 Specificity](https://www.w3.org/TR/css-cascade-4/#cascade-specificity)
///
/// Order rules for [`apply_styles`]: ascending priority, so more specific
/// rules overlay last. The sort is stable; rules of equal priority keep
/// their source order.
pub fn sort_rules(rules: &mut [Rule]) {
    rules.sort_by_key(Rule::priority);
}

/// Concatenate sheets in order and sort the result with [`sort_rules`].
///
/// Pass the default stylesheet first so that, at equal priority, document
/// rules win over it.
#[must_use]
pub fn cascade_order<'a>(sheets: impl IntoIterator<Item = &'a Stylesheet>) -> Vec<Rule> {
    let mut rules: Vec<Rule> = sheets
        .into_iter()
        .flat_map(|sheet| sheet.rules.iter().cloned())
        .collect();
    sort_rules(&mut rules);
    rules
}

/// [§ 6 Cascading](https://www.w3.org/TR/css-cascade-4/#cascading)
/// "The cascade takes an unordered list of declared values for a given property
/// on a given element, sorts them by their declaration's precedence..."
///
/// Resolve the style map of every node in the tree, in pre-order, so each
/// parent is resolved before its children read it.
///
/// `rules` must already be in cascade order (see [`sort_rules`]). For each
/// node:
///
/// 1. Inherited properties come from the parent, or their initial values at
///    the root.
/// 2. Each matching rule's declarations overlay the map in order.
/// 3. The element's `style` attribute overlays last.
/// 4. A percentage `font-size` is resolved against the parent's size.
pub fn apply_styles(tree: &mut DomTree, rules: &[Rule]) {
    let order: Vec<NodeId> = tree.iter_all().collect();

    for &id in &order {
        let style = resolve_node(tree, id, rules);
        tree.set_style(id, style);
    }

    log::debug!(
        "cascade: {} rules applied to {} nodes",
        rules.len(),
        order.len()
    );
}

fn resolve_node(tree: &DomTree, id: NodeId, rules: &[Rule]) -> StyleMap {
    let parent_style = tree.parent(id).map(|parent| tree.style(parent));

    // [§ 7.2 Inherited Properties](https://www.w3.org/TR/css-cascade-4/#inherited-property)
    let mut style: StyleMap = INHERITED_PROPERTIES
        .iter()
        .map(|&(name, initial)| {
            let value = parent_style
                .and_then(|parent| parent.get(name))
                .map_or(initial, String::as_str);
            (name.to_string(), value.to_string())
        })
        .collect();

    if let Some(element) = tree.as_element(id) {
        for rule in rules.iter().filter(|rule| rule.selector.matches(tree, id)) {
            for declaration in &rule.declarations {
                let _ = style.insert(declaration.name.clone(), declaration.value.clone());
            }
        }

        // [§ 6.1 Cascade Origins](https://www.w3.org/TR/css-cascade-4/#cascade-origin)
        // Declarations in a `style` attribute beat every rule.
        if let Some(inline) = element.attr("style") {
            for declaration in parse_declarations(inline) {
                let _ = style.insert(declaration.name, declaration.value);
            }
        }
    }

    resolve_font_size(&mut style, parent_style);
    style
}

/// [CSS Fonts § 2.5 'font-size'](https://www.w3.org/TR/css-fonts-4/#font-size-prop)
///
/// "Percentages: refer to parent element's font size"
fn resolve_font_size(style: &mut StyleMap, parent_style: Option<&StyleMap>) {
    let Some(size) = style.get("font-size") else {
        return;
    };
    if !size.trim_end().ends_with('%') {
        return;
    }

    let parent_size = parent_style
        .and_then(|parent| parent.get("font-size"))
        .map_or("16px", String::as_str);
    let parent_px = parse_px(parent_size).unwrap_or(16.0);

    let resolved = if let Some(percent) = parse_percentage(size) {
        format_px(parent_px * percent / 100.0)
    } else {
        warn_once("css", &format!("invalid font-size '{size}', using parent size"));
        format_px(parent_px)
    };
    let _ = style.insert("font-size".to_string(), resolved);
}
