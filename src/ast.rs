//! Template AST: the tag patterns a template compiles into before lowering.
//!
//! Names are modeled so that "absent" is distinguishable from "empty": an
//! [`Identifier`] that failed the naming rules reports `is_valid() == false`
//! and presence checks never compare against `""`. An [`IdentifierPath`] with
//! a trailing separator keeps its trailing invalid part, so the compiler can
//! reject it instead of silently truncating.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::diagnostics::{Position, Span};
use crate::syntax::{is_name_char, is_name_start};

/// A name in the template grammar: `[A-Za-z][A-Za-z_-]*`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Identifier {
    name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The distinct "absent" identifier.
    pub fn absent() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn is_valid(&self) -> bool {
        let mut chars = self.name.chars();
        match chars.next() {
            Some(first) if is_name_start(first) => chars.all(is_name_char),
            _ => false,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A dotted sequence of identifiers, optionally relative (leading `.`).
///
/// Valid iff non-empty and every part is a valid [`Identifier`]. A path read
/// from source text ending in `.` carries a trailing absent part and is
/// therefore invalid; rejecting it is the compiler's job.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IdentifierPath {
    pub parts: Vec<Identifier>,
    pub is_relative: bool,
}

impl IdentifierPath {
    pub fn new(parts: Vec<Identifier>, is_relative: bool) -> Self {
        Self { parts, is_relative }
    }

    pub fn is_valid(&self) -> bool {
        !self.parts.is_empty() && self.parts.iter().all(Identifier::is_valid)
    }
}

impl fmt::Display for IdentifierPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_relative {
            write!(f, ".")?;
        }
        let mut first = true;
        for part in &self.parts {
            if !first {
                write!(f, ".")?;
            }
            write!(f, "{}", part)?;
            first = false;
        }
        Ok(())
    }
}

/// One attribute of a tag pattern.
///
/// `capture` and `value` are independent; an attribute with neither is inert
/// and contributes nothing at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: Identifier,
    pub capture: Option<IdentifierPath>,
    pub value: Option<String>,
    pub pos: Position,
    pub span: Span,
}

/// One self-closing tag pattern. `name == None` is the wildcard `<# ...>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenTag {
    pub name: Option<Identifier>,
    pub attributes: Vec<Attribute>,
    pub auto_close: bool,
    pub pos: Position,
    pub span: Span,
}
