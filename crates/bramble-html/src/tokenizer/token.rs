use bramble_dom::AttributesMap;

/// The tokenizer emits tokens of these types to the tree builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of character data between tags. Whitespace-only runs are never
    /// emitted.
    Text(String),

    /// An opening tag such as `<p class="title">`.
    StartTag {
        /// Lowercased tag name.
        name: String,
        /// Lowercased attribute names mapped to quote-stripped values.
        /// Attributes without `=` map to the empty string.
        attributes: AttributesMap,
    },

    /// A closing tag such as `</p>`. Only the name is kept.
    EndTag {
        /// Lowercased tag name, without the leading `/`.
        name: String,
    },

    /// A tag whose name starts with `!` (doctype, comment). Carries the raw
    /// tag content; the tree builder ignores it.
    Declaration(String),

    /// Marks the end of the input.
    EndOfFile,
}

impl Token {
    /// Build a token from the text found between `<` and `>`.
    ///
    /// The content is split on whitespace. The first part is the tag name,
    /// every following part is an attribute: `name=value` pairs have a single
    /// surrounding quote pair stripped from the value, bare names become
    /// attributes with an empty value.
    ///
    /// Returns `None` when the content is blank (`<>`).
    #[must_use]
    pub fn from_tag_content(content: &str) -> Option<Self> {
        let mut parts = content.split_whitespace();
        let tag = parts.next()?.to_lowercase();

        if tag.starts_with('!') {
            return Some(Self::Declaration(content.trim().to_string()));
        }

        if let Some(name) = tag.strip_prefix('/') {
            return Some(Self::EndTag {
                name: name.to_string(),
            });
        }

        let mut attributes = AttributesMap::new();
        for part in parts {
            let (name, value) = match part.split_once('=') {
                Some((name, value)) => (name, strip_quotes(value)),
                None => (part, ""),
            };
            let _ = attributes.insert(name.to_lowercase(), value.to_string());
        }

        Some(Self::StartTag {
            name: tag,
            attributes,
        })
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }
}

/// Unwrap `"value"` or `'value'`. Values of two characters or fewer are kept
/// as written, so `""` stays a two-character value.
fn strip_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(first @ ('"' | '\'')), Some(last)) if first == last && value.chars().count() > 2 => {
            &value[1..value.len() - 1]
        }
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quotes() {
        assert_eq!(strip_quotes("\"title\""), "title");
        assert_eq!(strip_quotes("'title'"), "title");
        assert_eq!(strip_quotes("title"), "title");
        assert_eq!(strip_quotes("\"\""), "\"\"");
        assert_eq!(strip_quotes("\"a'"), "\"a'");
        assert_eq!(strip_quotes("\"ab"), "\"ab");
    }

    #[test]
    fn test_blank_tag_is_dropped() {
        assert_eq!(Token::from_tag_content(""), None);
        assert_eq!(Token::from_tag_content("   "), None);
    }

    #[test]
    fn test_bang_tag_is_declaration() {
        assert_eq!(
            Token::from_tag_content("!DOCTYPE html"),
            Some(Token::Declaration("!DOCTYPE html".to_string()))
        );
    }
}
