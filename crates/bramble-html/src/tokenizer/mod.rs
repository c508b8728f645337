//! HTML tokenizer module.
//!
//! Splits markup into text runs and tags. This is not the WHATWG
//! tokenizer: a tag is everything between `<` and the next `>`, split on
//! whitespace into a name and attributes.

/// Token types produced by the tokenizer.
pub mod token;
/// Character scanner that produces the token stream.
pub mod scanner;

pub use token::Token;
pub use scanner::{HTMLTokenizer, TokenizerState};
