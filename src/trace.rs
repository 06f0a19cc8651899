//! Observer seam for the tokenizer.
//!
//! The tokenizer reports every cursor read and every emitted token to a
//! [`SyntaxTracer`]. The default is a no-op; tests and debugging tools can
//! plug in a collecting tracer without the core carrying a logging dependency.

use crate::diagnostics::Position;
use crate::syntax::tokenizer::Token;

pub trait SyntaxTracer {
    /// Called after each cursor advance. `was_frozen` is true when the read
    /// re-delivered the current character instead of pulling a new one.
    fn read(&self, _pos: Position, _c: Option<char>, _was_frozen: bool) {}

    /// Called for each emitted token.
    fn token(&self, _token: &Token) {}
}

#[derive(Debug, Default)]
pub struct NoopTracer;

impl SyntaxTracer for NoopTracer {}
