use bramble_common::warning::warn_once;
use strum_macros::Display;

use super::token::Token;

/// The two lexical modes of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// Accumulating character data.
    Data,
    /// Accumulating tag content after a `<`.
    Tag,
}

/// Character-by-character scanner that turns markup into [`Token`]s.
///
/// `<` flushes whatever has been buffered as text and switches to the tag
/// state; `>` in the tag state flushes the buffer as a tag and switches back.
/// A `>` seen in the data state is ordinary text.
pub struct HTMLTokenizer {
    input: String,
    state: TokenizerState,
    buffer: String,
    tokens: Vec<Token>,
}

impl HTMLTokenizer {
    /// Create a new tokenizer over the given markup.
    #[must_use]
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            state: TokenizerState::Data,
            buffer: String::new(),
            tokens: Vec::new(),
        }
    }

    /// Current lexical state.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Scan the whole input. Always ends the stream with [`Token::EndOfFile`].
    pub fn run(&mut self) {
        let input = std::mem::take(&mut self.input);
        for c in input.chars() {
            match (self.state, c) {
                (_, '<') => {
                    self.flush_text();
                    self.state = TokenizerState::Tag;
                }
                (TokenizerState::Tag, '>') => {
                    self.flush_tag();
                    self.state = TokenizerState::Data;
                }
                _ => self.buffer.push(c),
            }
        }

        match self.state {
            TokenizerState::Data => self.flush_text(),
            TokenizerState::Tag => {
                if !self.buffer.trim().is_empty() {
                    warn_once(
                        "HTML Tokenizer",
                        &format!("discarding unterminated tag '<{}'", self.buffer.trim()),
                    );
                }
                self.buffer.clear();
            }
        }
        self.state = TokenizerState::Data;
        self.tokens.push(Token::EndOfFile);
    }

    /// Consume the tokenizer and return the produced tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Emit the buffer as a text token unless it is empty or whitespace-only.
    fn flush_text(&mut self) {
        let text = std::mem::take(&mut self.buffer);
        if text.chars().all(char::is_whitespace) {
            return;
        }
        self.tokens.push(Token::Text(text));
    }

    /// Emit the buffer as a tag token. Blank tags (`<>`) produce nothing.
    fn flush_tag(&mut self) {
        let content = std::mem::take(&mut self.buffer);
        if let Some(token) = Token::from_tag_content(&content) {
            self.tokens.push(token);
        }
    }
}
