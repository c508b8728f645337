//! Properties whose values flow from parent to child.

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, IntoStaticStr};

/// The inherited properties. Every node's style map starts with one entry per
/// variant, copied from the parent or, at the root, taken from
/// [`InheritedProperty::default_value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, IntoStaticStr)]
pub enum InheritedProperty {
    /// `font-size`
    #[strum(serialize = "font-size")]
    FontSize,
    /// `font-style`
    #[strum(serialize = "font-style")]
    FontStyle,
    /// `font-weight`
    #[strum(serialize = "font-weight")]
    FontWeight,
    /// `font-family`
    #[strum(serialize = "font-family")]
    FontFamily,
    /// `color`
    #[strum(serialize = "color")]
    Color,
}

impl InheritedProperty {
    /// The property name as written in stylesheets.
    #[must_use]
    pub fn name(self) -> &'static str {
        self.into()
    }

    /// Value used when there is no parent to inherit from.
    #[must_use]
    pub const fn default_value(self) -> &'static str {
        match self {
            Self::FontSize => DEFAULT_FONT_SIZE,
            Self::FontStyle | Self::FontWeight => "normal",
            Self::FontFamily => "roman",
            Self::Color => "black",
        }
    }

    /// Look up an inherited property by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|property| property.name() == name)
    }
}

/// Root font size, also the base for percentage sizes at the root.
pub const DEFAULT_FONT_SIZE: &str = "16px";

/// Family forced onto `pre` elements.
pub const MONOSPACE_FAMILY: &str = "Courier";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for property in InheritedProperty::iter() {
            assert_eq!(InheritedProperty::from_name(property.name()), Some(property));
            assert_eq!(property.to_string(), property.name());
        }
        assert_eq!(InheritedProperty::from_name("margin"), None);
    }

    #[test]
    fn test_defaults() {
        let defaults: Vec<(&str, &str)> = InheritedProperty::iter()
            .map(|p| (p.name(), p.default_value()))
            .collect();
        assert_eq!(
            defaults,
            vec![
                ("font-size", "16px"),
                ("font-style", "normal"),
                ("font-weight", "normal"),
                ("font-family", "roman"),
                ("color", "black"),
            ]
        );
    }
}
