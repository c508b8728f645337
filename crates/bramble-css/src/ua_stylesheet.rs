//! User-agent stylesheet.
//!
//! Built-in rules placed before any author stylesheet. They take part in the
//! cascade like every other rule, so an author rule of equal specificity
//! overrides them.

use std::sync::OnceLock;

use crate::parser::{Rule, parse_stylesheet};

/// Default rules for the elements that have a conventional presentation.
/// Values are single words, as the stylesheet grammar requires.
pub const UA_CSS: &str = "
pre { background-color: gray; }
a { color: blue; }
i { font-style: italic; }
b { font-weight: bold; }
small { font-size: 90%; }
big { font-size: 110%; }
input { font-size: 16px; }
button { font-size: 16px; }
";

/// Return the parsed UA stylesheet, parsing only once.
///
/// The rules are cached in a process-wide `OnceLock` and never change.
#[must_use]
pub fn ua_stylesheet() -> &'static [Rule] {
    static STYLESHEET: OnceLock<Vec<Rule>> = OnceLock::new();
    STYLESHEET.get_or_init(|| parse_stylesheet(UA_CSS))
}
