//! Positioned syntax diagnostics for the template language.
//!
//! Every failure raised while compiling a template is a [`PatternSyntaxError`]:
//! one error taxonomy for tokenizer, AST builder, and compiler alike. The
//! structured `(line, column)` position and the message text are plain public
//! fields so tests can assert on them directly; the miette integration is
//! layered on top for rendered reports.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Zero-based `(line, column)` of a consumed character.
///
/// A newline increments the line and resets the column. Positions are used
/// only for diagnostics; they never feed back into parsing decisions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Byte range into the template source, for labeled reports.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn point(at: usize) -> Self {
        Self { start: at, end: at }
    }
}

/// The single error kind raised at the compile boundary.
///
/// Carries a human-readable message, the `(line, column)` position at failure
/// time, and a byte span into the template text. Fatal and non-recoverable:
/// a syntax error means the template is rejected in full.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct PatternSyntaxError {
    pub message: String,
    pub pos: Position,
    pub span: Span,
    source_code: Option<Arc<NamedSource<String>>>,
}

impl PatternSyntaxError {
    pub fn new(message: impl Into<String>, pos: Position, span: Span) -> Self {
        Self {
            message: message.into(),
            pos,
            span,
            source_code: None,
        }
    }

    /// Attaches the template text so miette can render a labeled snippet.
    pub fn with_source(mut self, name: impl AsRef<str>, text: impl Into<String>) -> Self {
        self.source_code = Some(Arc::new(NamedSource::new(name.as_ref(), text.into())));
        self
    }
}

impl Diagnostic for PatternSyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("tmst::syntax"))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        self.source_code
            .as_ref()
            .map(|s| s.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let len = if self.span.end > self.span.start {
            self.span.end - self.span.start
        } else {
            1
        };
        let label = LabeledSpan::new(Some(self.message.clone()), self.span.start, len);
        Some(Box::new(std::iter::once(label)))
    }
}
