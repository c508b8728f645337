//! A small recursive-descent parser for `selector { property: value; ... }`
//! stylesheets.
//!
//! The grammar is intentionally narrow: a value is a single word (letters,
//! digits and `# - . %`), so `1px solid red` or `rgb(...)` do not parse.
//! Every failure is recovered locally. A broken declaration is skipped up to
//! the next `;` or `}`, and a broken rule is skipped up to the next `}`.
//! Reaching the end of input while recovering ends the parse with the rules
//! collected so far.

use std::collections::BTreeMap;

use bramble_common::warning::warn_once;
use serde::Serialize;
use thiserror::Error;

use crate::selector::{Selector, Specificity};

/// Property names (lowercased) mapped to their raw values.
pub type DeclarationMap = BTreeMap<String, String>;

/// A selector and the declarations it applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rule {
    /// Which nodes the rule applies to.
    pub selector: Selector,
    /// The declarations in the rule body.
    pub declarations: DeclarationMap,
}

impl Rule {
    /// Specificity of the rule's selector.
    #[must_use]
    pub fn specificity(&self) -> Specificity {
        self.selector.specificity()
    }
}

/// A failure inside one declaration or rule. These never escape the public
/// parse functions; [`CSSParser::parse_with_issues`] reports the ones that
/// were recovered from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// No word characters at the current position.
    #[error("expected a word at position {position}")]
    ExpectedWord {
        /// Character offset of the failure.
        position: usize,
    },

    /// A required punctuation character was missing.
    #[error("expected '{expected}' but found '{found}' at position {position}")]
    ExpectedLiteral {
        /// The character the grammar required.
        expected: char,
        /// The character actually present.
        found: char,
        /// Character offset of the failure.
        position: usize,
    },

    /// The input ended in the middle of a construct.
    #[error("unexpected end of input at position {position}")]
    UnexpectedEof {
        /// Character offset of the failure (the input length).
        position: usize,
    },
}

/// Parser over the characters of one stylesheet or declaration block.
pub struct CSSParser {
    chars: Vec<char>,
    position: usize,
    issues: Vec<SyntaxError>,
}

impl CSSParser {
    /// Create a parser over `text`.
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            position: 0,
            issues: Vec::new(),
        }
    }

    /// Parse the whole input as a stylesheet.
    pub fn parse_stylesheet(&mut self) -> Vec<Rule> {
        let mut rules = Vec::new();
        while !self.at_end() {
            self.whitespace();
            if self.at_end() {
                break;
            }
            match self.rule() {
                Ok(rule) => rules.push(rule),
                Err(error) => {
                    self.recovered("rule", error);
                    if self.ignore_until(&['}']).is_none() {
                        break;
                    }
                    self.position += 1;
                    self.whitespace();
                }
            }
        }
        rules
    }

    /// Parse the whole input as the inside of a `{ ... }` block, such as the
    /// value of a `style` attribute.
    pub fn parse_declarations(&mut self) -> DeclarationMap {
        self.whitespace();
        self.body()
    }

    /// Parse the input as a stylesheet and also return every error that was
    /// recovered from, in the order they occurred.
    #[must_use]
    pub fn parse_with_issues(mut self) -> (Vec<Rule>, Vec<SyntaxError>) {
        let rules = self.parse_stylesheet();
        (rules, self.issues)
    }

    /// Errors recovered from so far.
    #[must_use]
    pub fn issues(&self) -> &[SyntaxError] {
        &self.issues
    }

    /// Report a skipped `construct` and keep the error as an issue.
    fn recovered(&mut self, construct: &str, error: SyntaxError) {
        warn_once("CSS", &format!("skipping malformed {construct}: {error}"));
        self.issues.push(error);
    }

    fn at_end(&self) -> bool {
        self.position >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
    }

    fn is_word_char(c: char) -> bool {
        c.is_alphanumeric() || matches!(c, '#' | '-' | '.' | '%')
    }

    /// Consume a maximal run of word characters.
    fn word(&mut self) -> Result<String, SyntaxError> {
        let start = self.position;
        while self.peek().is_some_and(Self::is_word_char) {
            self.position += 1;
        }
        if self.position > start {
            return Ok(self.chars[start..self.position].iter().collect());
        }
        if self.at_end() {
            Err(SyntaxError::UnexpectedEof {
                position: self.position,
            })
        } else {
            Err(SyntaxError::ExpectedWord {
                position: self.position,
            })
        }
    }

    /// Consume exactly the character `expected`.
    fn literal(&mut self, expected: char) -> Result<(), SyntaxError> {
        match self.peek() {
            Some(found) if found == expected => {
                self.position += 1;
                Ok(())
            }
            Some(found) => Err(SyntaxError::ExpectedLiteral {
                expected,
                found,
                position: self.position,
            }),
            None => Err(SyntaxError::UnexpectedEof {
                position: self.position,
            }),
        }
    }

    /// Advance to the next character in `stops` without consuming it.
    /// Returns `None` (at end of input) if there is none.
    fn ignore_until(&mut self, stops: &[char]) -> Option<char> {
        while let Some(c) = self.peek() {
            if stops.contains(&c) {
                return Some(c);
            }
            self.position += 1;
        }
        None
    }

    /// `property : value`, with the property lowercased.
    fn pair(&mut self) -> Result<(String, String), SyntaxError> {
        let property = self.word()?.to_lowercase();
        self.whitespace();
        self.literal(':')?;
        self.whitespace();
        let value = self.word()?;
        Ok((property, value))
    }

    /// One declaration and its terminating `;`. The `;` may be left out
    /// before the closing `}`.
    fn declaration(&mut self, declarations: &mut DeclarationMap) -> Result<(), SyntaxError> {
        let (property, value) = self.pair()?;
        let _ = declarations.insert(property, value);
        self.whitespace();
        if self.peek() == Some('}') {
            return Ok(());
        }
        self.literal(';')?;
        self.whitespace();
        Ok(())
    }

    /// Declarations up to (not including) the closing `}` or end of input.
    fn body(&mut self) -> DeclarationMap {
        let mut declarations = DeclarationMap::new();
        while self.peek().is_some_and(|c| c != '}') {
            if let Err(error) = self.declaration(&mut declarations) {
                self.recovered("declaration", error);
                if self.ignore_until(&[';', '}']) != Some(';') {
                    break;
                }
                self.position += 1;
                self.whitespace();
            }
        }
        declarations
    }

    /// A base selector followed by any number of descendant selector words.
    fn selector(&mut self) -> Result<Selector, SyntaxError> {
        let mut selector = Selector::from_word(&self.word()?);
        self.whitespace();
        while self.peek().is_some_and(|c| c != '{') {
            let word = self.word()?;
            selector = selector.descendant(Selector::from_word(&word));
            self.whitespace();
        }
        Ok(selector)
    }

    fn rule(&mut self) -> Result<Rule, SyntaxError> {
        self.whitespace();
        let selector = self.selector()?;
        self.literal('{')?;
        self.whitespace();
        let declarations = self.body();
        self.literal('}')?;
        Ok(Rule {
            selector,
            declarations,
        })
    }
}

/// Parse stylesheet text into rules in source order. Never fails; malformed
/// parts are skipped.
#[must_use]
pub fn parse_stylesheet(text: &str) -> Vec<Rule> {
    CSSParser::new(text).parse_stylesheet()
}

/// Parse the inside of a declaration block (e.g. a `style` attribute value).
/// Never fails; malformed declarations are skipped.
#[must_use]
pub fn parse_declaration_block(text: &str) -> DeclarationMap {
    CSSParser::new(text).parse_declarations()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bramble_common::warning::has_warned;

    #[test]
    fn test_word_stops_at_punctuation() {
        let mut parser = CSSParser::new("font-size:12px");
        assert_eq!(parser.word().unwrap(), "font-size");
        assert_eq!(parser.peek(), Some(':'));
    }

    #[test]
    fn test_word_errors() {
        let mut parser = CSSParser::new(":");
        assert_eq!(
            parser.word(),
            Err(SyntaxError::ExpectedWord { position: 0 })
        );
        let mut parser = CSSParser::new("");
        assert_eq!(
            parser.word(),
            Err(SyntaxError::UnexpectedEof { position: 0 })
        );
    }

    #[test]
    fn test_literal_mismatch() {
        let mut parser = CSSParser::new("a");
        assert_eq!(
            parser.literal('{'),
            Err(SyntaxError::ExpectedLiteral {
                expected: '{',
                found: 'a',
                position: 0
            })
        );
    }

    #[test]
    fn test_error_messages() {
        let error = SyntaxError::ExpectedLiteral {
            expected: ':',
            found: ';',
            position: 7,
        };
        assert_eq!(error.to_string(), "expected ':' but found ';' at position 7");
    }

    #[test]
    fn test_ignore_until_does_not_consume_stop() {
        let mut parser = CSSParser::new("abc;def");
        assert_eq!(parser.ignore_until(&[';', '}']), Some(';'));
        assert_eq!(parser.position, 3);
        assert_eq!(parser.ignore_until(&['}']), None);
        assert!(parser.at_end());
    }

    #[test]
    fn test_trailing_whitespace_is_not_an_issue() {
        let (rules, issues) = CSSParser::new("p{color:red;}\n\n").parse_with_issues();
        assert_eq!(rules.len(), 1);
        assert!(issues.is_empty());
    }

    #[test]
    fn test_skipped_declarations_and_rules_are_both_reported() {
        let (rules, issues) =
            CSSParser::new("a{color:;font-size:12px;} {b}").parse_with_issues();
        assert_eq!(rules.len(), 1);
        assert_eq!(issues.len(), 2);
        assert!(has_warned(
            "CSS",
            "skipping malformed declaration: expected a word at position 8"
        ));
        assert!(has_warned(
            "CSS",
            "skipping malformed rule: expected a word at position 26"
        ));
    }
}
