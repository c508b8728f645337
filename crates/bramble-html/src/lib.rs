//! Tag-soup HTML tokenizer and tree builder for the Bramble engine.
//!
//! # Scope
//!
//! This crate implements a forgiving two-stage parser:
//! - **Tokenizer**: splits markup at `<` and `>` into text runs, start tags
//!   with attributes, end tags and `<!...>` declarations. It never fails;
//!   malformed markup degrades into text or is dropped.
//! - **Tree builder**: consumes the tokens with a stack of open elements and
//!   synthesizes the root, head and body elements the markup leaves out.
//!
//! Every document parses to a tree whose root element has a head child
//! followed by a body child.
//!
//! # Not Implemented
//!
//! - Character references (`&amp;` stays as written)
//! - Comments, raw text elements and script data
//! - Insertion modes, foster parenting and the adoption agency algorithm

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

use bramble_dom::DomTree;

pub use parser::{
    DEFAULT_ROOT_TAG, HEAD_TAGS, HTMLParser, IssueKind, ParseIssue, SELF_CLOSING_TAGS,
    format_tree, print_tree,
};
pub use tokenizer::{HTMLTokenizer, Token};

/// Tokenize and build `markup` with the default root tag.
#[must_use]
pub fn parse_html(markup: &str) -> DomTree {
    parse_html_with_root(markup, DEFAULT_ROOT_TAG).0
}

/// Tokenize and build `markup`, naming the synthesized root `root_tag`, and
/// return the recoveries the builder performed.
#[must_use]
pub fn parse_html_with_root(markup: &str, root_tag: &str) -> (DomTree, Vec<ParseIssue>) {
    let mut tokenizer = HTMLTokenizer::new(markup);
    tokenizer.run();
    HTMLParser::new(tokenizer.into_tokens())
        .with_root_tag(root_tag)
        .run_with_issues()
}
