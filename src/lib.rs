pub use crate::diagnostics::{PatternSyntaxError, Position, Span};

pub mod ast;
pub mod capture;
pub mod cli;
pub mod compiler;
pub mod diagnostics;
pub mod document;
pub mod engine;
pub mod syntax;
pub mod trace;

pub use crate::capture::{CaptureMap, CaptureRecord};
pub use crate::compiler::compile;
pub use crate::engine::{Matcher, TraversalPolicy};
