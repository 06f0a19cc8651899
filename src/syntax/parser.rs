//! AST builder: drains the token stream into a sequence of [`OpenTag`] nodes.
//!
//! Tokens are consumed as they are produced and never retained. The builder
//! enforces the grammar invariant that only self-closing tag patterns exist;
//! a bare `>` close token is rejected here with the position the tokenizer
//! recorded for it.

use crate::ast::{Attribute, Identifier, OpenTag};
use crate::diagnostics::{PatternSyntaxError, Position, Span};
use crate::syntax::tokenizer::{Token, TokenKind, Tokenizer};
use crate::trace::SyntaxTracer;

/// Parses a template into its tag patterns. An empty (or all-whitespace)
/// template is valid and yields an empty sequence.
pub fn parse(text: &str) -> Result<Vec<OpenTag>, PatternSyntaxError> {
    build(Tokenizer::new(text))
}

/// Same as [`parse`], with an observer receiving cursor reads and tokens.
pub fn parse_with_tracer<'a>(
    text: &'a str,
    tracer: &'a dyn SyntaxTracer,
) -> Result<Vec<OpenTag>, PatternSyntaxError> {
    build(Tokenizer::with_tracer(text, tracer))
}

fn build(mut tokenizer: Tokenizer<'_>) -> Result<Vec<OpenTag>, PatternSyntaxError> {
    let mut tags = Vec::new();
    while let Some(token) = tokenizer.next_token()? {
        match token.kind {
            TokenKind::OpenTagStart { name, .. } => {
                tags.push(build_tag(&mut tokenizer, token.pos, token.span, name)?);
            }
            _ => return Err(stray_token(&token)),
        }
    }
    Ok(tags)
}

fn build_tag(
    tokenizer: &mut Tokenizer<'_>,
    pos: Position,
    start_span: Span,
    name: Option<Identifier>,
) -> Result<OpenTag, PatternSyntaxError> {
    let mut attributes: Vec<Attribute> = Vec::new();

    loop {
        let Some(token) = tokenizer.next_token()? else {
            // The tokenizer only ends cleanly in its terminal anchor, so a
            // missing close token cannot normally reach this point.
            return Err(PatternSyntaxError::new(
                "tag pattern is never closed",
                pos,
                start_span,
            ));
        };
        match token.kind {
            TokenKind::AttributeName(attr_name) => {
                attributes.push(Attribute {
                    name: attr_name,
                    capture: None,
                    value: None,
                    pos: token.pos,
                    span: token.span,
                });
            }
            TokenKind::AttributeCapture(ref path) => match attributes.last_mut() {
                Some(attr) => attr.capture = Some(path.clone()),
                None => return Err(stray_token(&token)),
            },
            TokenKind::AttributeValue(ref value) => match attributes.last_mut() {
                Some(attr) => attr.value = Some(value.clone()),
                None => return Err(stray_token(&token)),
            },
            TokenKind::CloseAutoclosingTag => {
                return Ok(OpenTag {
                    name,
                    attributes,
                    auto_close: true,
                    pos,
                    span: Span::new(start_span.start, token.span.end),
                });
            }
            TokenKind::CloseOpenTag => {
                return Err(PatternSyntaxError::new(
                    "only self-closing tag patterns are supported",
                    token.pos,
                    token.span,
                ));
            }
            TokenKind::OpenTagStart { .. } => return Err(stray_token(&token)),
        }
    }
}

fn stray_token(token: &Token) -> PatternSyntaxError {
    PatternSyntaxError::new(
        format!("unexpected {:?} here", token.kind),
        token.pos,
        token.span,
    )
}
