//! Template syntax: source cursor, tokenizer, and AST builder.
//!
//! The pipeline is `&str` → [`source::Source`] → [`tokenizer::Tokenizer`] →
//! token stream → [`parser::parse`] → `Vec<OpenTag>`. All failures surface as
//! [`crate::PatternSyntaxError`] with the position at failure time.

pub mod parser;
pub mod source;
pub mod tokenizer;

pub use parser::parse;
pub use source::Source;
pub use tokenizer::{Token, TokenKind, Tokenizer};

// Character classes, after the XML spec's `S`, `NameStartChar` and `NameChar`
// productions, narrowed to the ASCII subset the template grammar accepts.

pub fn is_ws(c: char) -> bool {
    c.is_whitespace()
}

pub fn is_name_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_name_char(c: char) -> bool {
    is_name_start(c) || c == '-' || c == '_'
}
