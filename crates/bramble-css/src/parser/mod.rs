//! Stylesheet and declaration-block parser.

/// Recursive-descent parser over the stylesheet characters.
pub mod css_parser;

pub use css_parser::{
    CSSParser, DeclarationMap, Rule, SyntaxError, parse_declaration_block, parse_stylesheet,
};
