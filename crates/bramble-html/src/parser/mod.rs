//! Tree construction from the token stream.

/// Implicit-structure tree builder.
pub mod builder;

pub use builder::{
    DEFAULT_ROOT_TAG, HEAD_TAGS, HTMLParser, IssueKind, ParseIssue, SELF_CLOSING_TAGS, format_tree,
    print_tree,
};
