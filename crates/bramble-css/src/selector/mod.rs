//! Selectors and their specificity.
//!
//! Three forms exist: a tag selector (`p`), a class selector (`.title`) and a
//! descendant combination of two selectors (`div .note`). Matching a
//! descendant selector checks the right-hand side against the node first and
//! then walks the ancestors looking for a match of the left-hand side.

use std::fmt;

use bramble_dom::{DomTree, NodeId};
use serde::Serialize;

/// Priority of a selector in the cascade. Higher wins; rules of equal
/// specificity apply in source order.
///
/// A tag selector counts 1, a class selector 10, and a descendant selector
/// the sum of its two sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Specificity(pub u32);

impl Specificity {
    /// Specificity of a tag selector.
    pub const TAG: Self = Self(1);
    /// Specificity of a class selector.
    pub const CLASS: Self = Self(10);
}

impl std::ops::Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

/// A parsed selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Selector {
    /// Matches elements whose tag name equals the string.
    Tag(String),

    /// Matches elements whose extracted class token equals the string.
    /// The string keeps its leading `.`, e.g. `.title`.
    Class(String),

    /// Matches nodes matched by `descendant` that have an ancestor matched by
    /// `ancestor`.
    Descendant {
        /// Left-hand side, checked against ancestors.
        ancestor: Box<Selector>,
        /// Right-hand side, checked against the node itself.
        descendant: Box<Selector>,
    },
}

impl Selector {
    /// Build a base selector from one selector word: words starting with `.`
    /// are class selectors, everything else is a tag selector.
    #[must_use]
    pub fn from_word(word: &str) -> Self {
        let word = word.to_lowercase();
        if word.starts_with('.') {
            Self::Class(word)
        } else {
            Self::Tag(word)
        }
    }

    /// Combine `self` with `descendant` into a descendant selector.
    #[must_use]
    pub fn descendant(self, descendant: Self) -> Self {
        Self::Descendant {
            ancestor: Box::new(self),
            descendant: Box::new(descendant),
        }
    }

    /// Specificity of this selector.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        match self {
            Self::Tag(_) => Specificity::TAG,
            Self::Class(_) => Specificity::CLASS,
            Self::Descendant {
                ancestor,
                descendant,
            } => ancestor.specificity() + descendant.specificity(),
        }
    }

    /// Whether this selector matches the node `id`. Text nodes never match.
    #[must_use]
    pub fn matches(&self, tree: &DomTree, id: NodeId) -> bool {
        match self {
            Self::Tag(tag) => tree.tag_name(id) == Some(tag.as_str()),
            Self::Class(class) => tree
                .as_element(id)
                .and_then(|element| element.class())
                .is_some_and(|c| c == class),
            Self::Descendant {
                ancestor,
                descendant,
            } => {
                descendant.matches(tree, id)
                    && tree
                        .ancestors(id)
                        .any(|candidate| ancestor.matches(tree, candidate))
            }
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tag(text) | Self::Class(text) => f.write_str(text),
            Self::Descendant {
                ancestor,
                descendant,
            } => write!(f, "{ancestor} {descendant}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_word() {
        assert_eq!(Selector::from_word("DIV"), Selector::Tag("div".to_string()));
        assert_eq!(
            Selector::from_word(".Note"),
            Selector::Class(".note".to_string())
        );
    }

    #[test]
    fn test_specificity_order() {
        let tag = Selector::from_word("p");
        let class = Selector::from_word(".title");
        let both = Selector::from_word("div").descendant(Selector::from_word(".title"));
        assert!(tag.specificity() < class.specificity());
        assert!(class.specificity() < both.specificity());
        assert_eq!(both.specificity(), Specificity(11));
    }

    #[test]
    fn test_display_nests_left() {
        let selector = Selector::from_word("a")
            .descendant(Selector::from_word("b"))
            .descendant(Selector::from_word(".c"));
        assert_eq!(selector.to_string(), "a b .c");
        assert_eq!(selector.specificity(), Specificity(12));
    }
}
