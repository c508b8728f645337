//! Stylesheet parsing, selector matching and cascade resolution for the
//! Bramble engine.
//!
//! # Scope
//!
//! This crate implements:
//! - **Stylesheet parser**: `selector { property: value; }` rules with tag,
//!   class and descendant selectors and single-word values. Parsing never
//!   fails; malformed declarations and rules are skipped.
//! - **Selectors**: matching against a [`DomTree`] and specificity (tag 1,
//!   class 10, descendant the sum of both sides).
//! - **Cascade**: inherited defaults, specificity-ordered rules, inline
//!   `style` attributes, percentage font sizes and the `pre` monospace
//!   override.
//! - **User-agent stylesheet**: a small built-in sheet applied first.
//!
//! # Not Implemented
//!
//! - Multi-word values, functions, comments and at-rules
//! - ID, attribute and pseudo-class selectors; child and sibling combinators
//! - Units other than `px` and `%`; `!important`

/// Cascade resolution over a [`DomTree`].
pub mod cascade;
/// Stylesheet and declaration block parser.
pub mod parser;
/// Inherited properties and their defaults.
pub mod properties;
/// Selector representation, matching and specificity.
pub mod selector;
/// Built-in user-agent stylesheet.
pub mod ua_stylesheet;

use bramble_dom::{DomTree, NodeId};

pub use cascade::{compute_value, resolve};
pub use parser::{
    CSSParser, DeclarationMap, Rule, SyntaxError, parse_declaration_block, parse_stylesheet,
};
pub use properties::{DEFAULT_FONT_SIZE, InheritedProperty, MONOSPACE_FAMILY};
pub use selector::{Selector, Specificity};
pub use ua_stylesheet::ua_stylesheet;

/// Extract CSS text from all `<style>` elements in the tree, in document
/// order. The text of each element is followed by a newline.
#[must_use]
pub fn extract_style_content(tree: &DomTree) -> String {
    let mut css = String::new();
    for id in tree.iter_all() {
        if tree.tag_name(id) == Some("style") {
            collect_text_children(tree, id, &mut css);
        }
    }
    css
}

fn collect_text_children(tree: &DomTree, id: NodeId, css: &mut String) {
    for &child_id in tree.children(id) {
        if let Some(text) = tree.as_text(child_id) {
            css.push_str(text);
            css.push('\n');
        }
    }
}
