//! Cascade resolution: computes every node's style map from the rules, the
//! node's inline `style` attribute and its parent's resolved style.

use bramble_dom::{DomTree, NodeId, StyleMap};

use crate::parser::{DeclarationMap, Rule, parse_declaration_block};
use crate::properties::{DEFAULT_FONT_SIZE, InheritedProperty, MONOSPACE_FAMILY};
use strum::IntoEnumIterator;

/// Resolve the style map of every node reachable from the root.
///
/// # Algorithm
///
/// The rules are stable-sorted by specificity once, so rules of equal
/// specificity keep their source order. Nodes are then visited depth-first in
/// pre-order, parents before children:
///
/// STEP 1: Seed each inherited property from the parent's resolved map, or
///         from the fixed default at the root.
///
/// STEP 2: Apply the declarations of every matching rule, lowest specificity
///         first.
///
/// STEP 3: Apply the declarations of the element's `style` attribute.
///
/// STEP 4: Force the monospace family on `pre` elements.
///
/// A declaration whose value does not compute (see [`compute_value`]) leaves
/// the previous entry in place. Every pass replaces each node's map
/// wholesale; nothing from an earlier pass survives.
pub fn resolve(tree: &mut DomTree, rules: &[Rule]) {
    let mut ordered: Vec<&Rule> = rules.iter().collect();
    ordered.sort_by_key(|rule| rule.specificity());

    if tree.is_empty() {
        return;
    }

    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let style = compute_node_style(tree, id, &ordered);

        #[cfg(feature = "cascade-trace")]
        trace_style(tree, id, &style);

        tree.set_style(id, style);
        stack.extend(tree.children(id).iter().rev().copied());
    }
}

fn compute_node_style(tree: &DomTree, id: NodeId, rules: &[&Rule]) -> StyleMap {
    let parent_style = tree.parent(id).and_then(|parent| tree.style(parent));

    // STEP 1
    let mut style: StyleMap = InheritedProperty::iter()
        .map(|property| {
            let value = parent_style
                .and_then(|s| s.get(property.name()))
                .map_or(property.default_value(), String::as_str);
            (property.name().to_string(), value.to_string())
        })
        .collect();

    let parent_font_size = parent_style
        .and_then(|s| s.get(InheritedProperty::FontSize.name()))
        .map_or(DEFAULT_FONT_SIZE, String::as_str);

    // STEP 2
    for rule in rules.iter().filter(|rule| rule.selector.matches(tree, id)) {
        apply_declarations(&mut style, &rule.declarations, parent_font_size);
    }

    let Some(element) = tree.as_element(id) else {
        return style;
    };

    // STEP 3
    if let Some(inline) = element.get_attribute("style") {
        let declarations = parse_declaration_block(inline);
        apply_declarations(&mut style, &declarations, parent_font_size);
    }

    // STEP 4
    if element.tag_name == "pre" {
        let _ = style.insert(
            InheritedProperty::FontFamily.name().to_string(),
            MONOSPACE_FAMILY.to_string(),
        );
    }

    style
}

fn apply_declarations(style: &mut StyleMap, declarations: &DeclarationMap, parent_font_size: &str) {
    for (property, value) in declarations {
        if let Some(computed) = compute_value(property, value, parent_font_size) {
            let _ = style.insert(property.clone(), computed);
        }
    }
}

/// Compute the value a declaration contributes to a style map.
///
/// Only `font-size` is interpreted; every other property passes through
/// unchanged. For `font-size`:
/// - a value ending in `px` is used as written
/// - a percentage scales `parent_font_size` (e.g. `50%` of `20px` is `10.0px`)
/// - anything else, including a percentage that is not a number, computes to
///   `None`
#[must_use]
pub fn compute_value(property: &str, value: &str, parent_font_size: &str) -> Option<String> {
    if property != InheritedProperty::FontSize.name() || value.ends_with("px") {
        return Some(value.to_string());
    }
    let percent: f64 = value.strip_suffix('%')?.parse().ok()?;
    let parent_px: f64 = parent_font_size.strip_suffix("px")?.parse().ok()?;
    Some(format!("{:?}px", percent / 100.0 * parent_px))
}

#[cfg(feature = "cascade-trace")]
fn trace_style(tree: &DomTree, id: NodeId, style: &StyleMap) {
    let label = tree
        .tag_name(id)
        .map_or_else(|| "#text".to_string(), |tag| format!("<{tag}>"));
    let mut entries: Vec<_> = style.iter().collect();
    entries.sort();
    eprintln!("[CASCADE] {} {label} {entries:?}", id.0);
}
