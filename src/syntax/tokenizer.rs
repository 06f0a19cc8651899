//! Tokenizer for the template language: a finite-state automaton over named
//! anchors, each an ordered table of guarded transitions keyed on the current
//! character.
//!
//! The automaton is data-driven: an [`Anchor`] names a state, and each state
//! owns a static list of `(guard, action)` rules plus a default action. The
//! first rule whose guard accepts the current character runs; actions consume
//! characters from the [`Source`], emit [`Token`]s, and pick the next anchor.
//! Only `Initial` is terminal, so end of input anywhere else is a hard error.

use std::collections::VecDeque;

use crate::ast::{Identifier, IdentifierPath};
use crate::diagnostics::{PatternSyntaxError, Position, Span};
use crate::syntax::source::Source;
use crate::syntax::{is_name_char, is_name_start, is_ws};
use crate::trace::{NoopTracer, SyntaxTracer};

/// One syntax token. Tokens are transient: the AST builder consumes them
/// immediately and never retains them.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    OpenTagStart {
        name: Option<Identifier>,
        wildcard: bool,
    },
    AttributeName(Identifier),
    AttributeCapture(IdentifierPath),
    AttributeValue(String),
    CloseOpenTag,
    CloseAutoclosingTag,
}

/// The automaton's states.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Anchor {
    Initial,
    TagInterval,
    AnyAttribute,
    PostAttributeName,
    PostAttributeCapture,
    PostAttributeValue,
}

type Guard = fn(Option<char>) -> bool;
type Action = fn(&mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError>;

struct Rule {
    guard: Guard,
    action: Action,
}

fn g_ws(c: Option<char>) -> bool {
    matches!(c, Some(c) if is_ws(c))
}

fn g_open(c: Option<char>) -> bool {
    c == Some('<')
}

fn g_slash(c: Option<char>) -> bool {
    c == Some('/')
}

fn g_close(c: Option<char>) -> bool {
    c == Some('>')
}

fn g_colon(c: Option<char>) -> bool {
    c == Some(':')
}

fn g_equals(c: Option<char>) -> bool {
    c == Some('=')
}

const INITIAL_RULES: &[Rule] = &[
    Rule { guard: g_ws, action: Tokenizer::act_skip_ws },
    Rule { guard: g_open, action: Tokenizer::act_begin_tag },
];

const TAG_INTERVAL_RULES: &[Rule] = &[Rule {
    guard: g_ws,
    action: Tokenizer::act_enter_attributes,
}];

const ANY_ATTRIBUTE_RULES: &[Rule] = &[
    Rule { guard: g_slash, action: Tokenizer::act_close_autoclosing },
    Rule { guard: g_close, action: Tokenizer::act_close_open },
    Rule { guard: g_ws, action: Tokenizer::act_ws_between_attributes },
];

const POST_NAME_RULES: &[Rule] = &[
    Rule { guard: g_ws, action: Tokenizer::act_ws_between_attributes },
    Rule { guard: g_colon, action: Tokenizer::act_read_capture },
    Rule { guard: g_equals, action: Tokenizer::act_read_value },
    Rule { guard: g_slash, action: Tokenizer::act_close_autoclosing },
    Rule { guard: g_close, action: Tokenizer::act_close_open },
];

const POST_CAPTURE_RULES: &[Rule] = &[
    Rule { guard: g_ws, action: Tokenizer::act_ws_between_attributes },
    Rule { guard: g_equals, action: Tokenizer::act_read_value },
    Rule { guard: g_slash, action: Tokenizer::act_close_autoclosing },
    Rule { guard: g_close, action: Tokenizer::act_close_open },
];

const POST_VALUE_RULES: &[Rule] = &[
    Rule { guard: g_ws, action: Tokenizer::act_ws_between_attributes },
    Rule { guard: g_slash, action: Tokenizer::act_close_autoclosing },
    Rule { guard: g_close, action: Tokenizer::act_close_open },
];

impl Anchor {
    fn rules(self) -> &'static [Rule] {
        match self {
            Anchor::Initial => INITIAL_RULES,
            Anchor::TagInterval => TAG_INTERVAL_RULES,
            Anchor::AnyAttribute => ANY_ATTRIBUTE_RULES,
            Anchor::PostAttributeName => POST_NAME_RULES,
            Anchor::PostAttributeCapture => POST_CAPTURE_RULES,
            Anchor::PostAttributeValue => POST_VALUE_RULES,
        }
    }

    fn default_action(self) -> Action {
        match self {
            Anchor::Initial => Tokenizer::act_unexpected_outside_tag,
            Anchor::TagInterval => Tokenizer::act_missing_ws_after_name,
            Anchor::AnyAttribute => Tokenizer::act_read_attribute_name,
            Anchor::PostAttributeName
            | Anchor::PostAttributeCapture
            | Anchor::PostAttributeValue => Tokenizer::act_missing_ws_after_attribute,
        }
    }

    /// Parsing may legally end only here.
    fn is_terminal(self) -> bool {
        self == Anchor::Initial
    }
}

/// Renders the offending character for an error message.
fn describe(c: Option<char>) -> String {
    match c {
        Some(c) => format!("'{}'", c),
        None => "end of input".to_string(),
    }
}

static NOOP: NoopTracer = NoopTracer;

pub struct Tokenizer<'a> {
    source: Source<'a>,
    anchor: Anchor,
    out: VecDeque<Token>,
    tracer: &'a dyn SyntaxTracer,
    primed: bool,
    // Attribute bookkeeping for the whitespace-disambiguation errors.
    seen_attribute: bool,
    last_attr_had_capture: bool,
    ws_run_start: Option<(Position, Span)>,
}

impl<'a> Tokenizer<'a> {
    pub fn new(text: &'a str) -> Self {
        Self::with_tracer(text, &NOOP)
    }

    pub fn with_tracer(text: &'a str, tracer: &'a dyn SyntaxTracer) -> Self {
        Self {
            source: Source::new(text),
            anchor: Anchor::Initial,
            out: VecDeque::new(),
            tracer,
            primed: false,
            seen_attribute: false,
            last_attr_had_capture: false,
            ws_run_start: None,
        }
    }

    pub fn anchor(&self) -> Anchor {
        self.anchor
    }

    /// Advances the automaton until a token is available, or until the source
    /// legally ends in the terminal anchor.
    pub fn next_token(&mut self) -> Result<Option<Token>, PatternSyntaxError> {
        loop {
            if let Some(token) = self.out.pop_front() {
                return Ok(Some(token));
            }
            if !self.primed {
                self.pull();
                self.primed = true;
            }
            if self.source.current().is_none() && self.anchor.is_terminal() {
                return Ok(None);
            }

            let current = self.source.current();
            let action = self
                .anchor
                .rules()
                .iter()
                .find(|rule| (rule.guard)(current))
                .map(|rule| rule.action)
                .unwrap_or_else(|| self.anchor.default_action());
            self.anchor = action(self)?;
        }
    }

    // ------------------------------------------------------------------
    // cursor plumbing
    // ------------------------------------------------------------------

    fn pull(&mut self) -> Option<char> {
        let was_frozen = self.source.frozen();
        let c = self.source.advance();
        self.tracer.read(self.source.pos(), c, was_frozen);
        c
    }

    fn emit(&mut self, kind: TokenKind, pos: Position, span: Span) {
        let token = Token { kind, pos, span };
        self.tracer.token(&token);
        self.out.push_back(token);
    }

    fn fail(&self, message: impl Into<String>) -> PatternSyntaxError {
        PatternSyntaxError::new(message, self.source.pos(), self.source.span_here())
    }

    fn fail_at(
        &self,
        message: impl Into<String>,
        pos: Position,
        span: Span,
    ) -> PatternSyntaxError {
        PatternSyntaxError::new(message, pos, span)
    }

    /// Consumes the current character after checking it against `expected`.
    /// `context` may reference `{curr}` to name the offending character.
    fn expect(&mut self, expected: char, context: &str) -> Result<(), PatternSyntaxError> {
        self.source.freeze_once();
        let got = self.pull();
        if got != Some(expected) {
            let mut message = format!("expected '{}'", expected);
            if !context.is_empty() {
                message.push(' ');
                message.push_str(&context.replace("{curr}", &describe(got)));
            }
            return Err(self.fail(message));
        }
        self.pull();
        Ok(())
    }

    /// Consumes a whitespace run; afterwards the current character is the
    /// first non-whitespace one (or the stream has ended).
    fn skip_ws(&mut self) {
        if self.source.done() {
            return;
        }
        self.source.freeze_once();
        while let Some(c) = self.pull() {
            if !is_ws(c) {
                break;
            }
        }
    }

    /// Reads `[A-Za-z][A-Za-z_-]*` starting at the current character, leaving
    /// the cursor on the first character past the identifier. Returns the
    /// absent identifier when the current character cannot start a name.
    fn read_identifier(&mut self) -> Identifier {
        let first = match self.source.current() {
            Some(c) if is_name_start(c) => c,
            _ => return Identifier::absent(),
        };
        let mut name = String::new();
        name.push(first);
        while let Some(c) = self.pull() {
            if !is_name_char(c) {
                break;
            }
            name.push(c);
        }
        Identifier::new(name)
    }

    /// Reads a dotted capture path. A trailing separator records a trailing
    /// absent part, producing an invalid path for the compiler to reject.
    fn read_capture_path(&mut self) -> IdentifierPath {
        let mut is_relative = false;
        if self.source.current() == Some('.') {
            is_relative = true;
            self.pull();
        }

        let mut parts = Vec::new();
        loop {
            let part = self.read_identifier();
            if !part.is_valid() {
                break;
            }
            parts.push(part);
            if self.source.current() != Some('.') {
                break;
            }
            self.pull();
            if !matches!(self.source.current(), Some(c) if is_name_start(c)) {
                parts.push(Identifier::absent());
                break;
            }
        }
        IdentifierPath::new(parts, is_relative)
    }

    /// Reads a quoted string delimited by `'` or `"`. A backslash escapes the
    /// following character (and is retained in the value); the string ends at
    /// the first unescaped delimiter. Running out of input first is fatal.
    fn read_quoted(&mut self, context: &str) -> Result<String, PatternSyntaxError> {
        let portal = match self.source.current() {
            Some(c @ ('\'' | '"')) => c,
            other => {
                return Err(self.fail(format!(
                    "expected ''' or '\"' {}, not {}",
                    context,
                    describe(other)
                )))
            }
        };

        let mut value = String::new();
        let mut escaping = false;
        loop {
            match self.pull() {
                None => {
                    return Err(self.fail(format!(
                        "expected '{}' to end the quoted string {}, not end of input",
                        portal, context
                    )))
                }
                Some(c) if c == portal && !escaping => break,
                Some(c) => {
                    value.push(c);
                    if escaping {
                        escaping = false;
                    } else if c == '\\' {
                        escaping = true;
                    }
                }
            }
        }
        self.pull();
        Ok(value)
    }

    fn note_ws_run(&mut self) {
        if self.ws_run_start.is_none() {
            self.ws_run_start = Some((self.source.pos(), self.source.span_here()));
        }
    }

    fn reset_attribute_state(&mut self) {
        self.seen_attribute = false;
        self.last_attr_had_capture = false;
        self.ws_run_start = None;
    }

    // ------------------------------------------------------------------
    // anchor actions
    // ------------------------------------------------------------------

    fn act_skip_ws(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        t.skip_ws();
        Ok(Anchor::Initial)
    }

    fn act_begin_tag(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        let pos = t.source.pos();
        let start = t.source.offset();
        t.expect('<', "")?;
        t.reset_attribute_state();

        let (name, wildcard) = if t.source.current() == Some('#') {
            t.pull();
            (None, true)
        } else {
            let name = t.read_identifier();
            if !name.is_valid() {
                return Err(t.fail(format!(
                    "expected tag name, not {}",
                    describe(t.source.current())
                )));
            }
            (Some(name), false)
        };

        let span = Span::new(start, t.source.offset());
        t.emit(TokenKind::OpenTagStart { name, wildcard }, pos, span);
        Ok(Anchor::TagInterval)
    }

    fn act_enter_attributes(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        t.skip_ws();
        Ok(Anchor::AnyAttribute)
    }

    fn act_missing_ws_after_name(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        Err(t.fail(format!(
            "expected whitespace after tag name, not {}",
            describe(t.source.current())
        )))
    }

    fn act_ws_between_attributes(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        t.note_ws_run();
        t.skip_ws();
        Ok(Anchor::AnyAttribute)
    }

    fn act_missing_ws_after_attribute(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        Err(t.fail(format!(
            "expected whitespace after attribute, not {}",
            describe(t.source.current())
        )))
    }

    fn act_read_attribute_name(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        let pos = t.source.pos();
        let start = t.source.offset();
        let name = t.read_identifier();

        if !name.is_valid() {
            // After a complete attribute, a stray `:` or `=` means the author
            // put whitespace inside an attribute clause; point at the space.
            if t.seen_attribute {
                if let Some((ws_pos, ws_span)) = t.ws_run_start {
                    match t.source.current() {
                        Some(':') => {
                            return Err(t.fail_at(
                                "unexpected whitespace between attribute identifier \
                                 and capture identifier",
                                ws_pos,
                                ws_span,
                            ))
                        }
                        Some('=') if !t.last_attr_had_capture => {
                            return Err(t.fail_at(
                                "unexpected whitespace between attribute identifier \
                                 and attribute value",
                                ws_pos,
                                ws_span,
                            ))
                        }
                        Some('=') => {
                            return Err(t.fail_at(
                                "unexpected whitespace between capture identifier \
                                 and attribute value",
                                ws_pos,
                                ws_span,
                            ))
                        }
                        _ => {}
                    }
                }
            }
            return Err(t.fail(format!(
                "expected attribute id, not {}",
                describe(t.source.current())
            )));
        }

        t.seen_attribute = true;
        t.last_attr_had_capture = false;
        t.ws_run_start = None;
        let span = Span::new(start, t.source.offset());
        t.emit(TokenKind::AttributeName(name), pos, span);
        Ok(Anchor::PostAttributeName)
    }

    fn act_read_capture(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        let pos = t.source.pos();
        let start = t.source.offset();
        t.pull();
        t.expect('{', "and not {curr} to capture attribute")?;

        let path = t.read_capture_path();
        if path.parts.is_empty() {
            if t.source.current() == Some('}') {
                return Err(t.fail("capture must have an identifier"));
            }
            return Err(t.fail(format!(
                "expected capture identifier, not {}",
                describe(t.source.current())
            )));
        }
        t.expect('}', "and not {curr} after capture definition")?;

        t.last_attr_had_capture = true;
        let span = Span::new(start, t.source.offset());
        t.emit(TokenKind::AttributeCapture(path), pos, span);
        Ok(Anchor::PostAttributeCapture)
    }

    fn act_read_value(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        let pos = t.source.pos();
        let start = t.source.offset();
        t.pull();
        let value = t.read_quoted("for attribute value")?;
        let span = Span::new(start, t.source.offset());
        t.emit(TokenKind::AttributeValue(value), pos, span);
        Ok(Anchor::PostAttributeValue)
    }

    fn act_close_autoclosing(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        let pos = t.source.pos();
        let start = t.source.offset();
        t.pull();
        t.expect('>', "after '/'")?;
        t.reset_attribute_state();
        let span = Span::new(start, t.source.offset());
        t.emit(TokenKind::CloseAutoclosingTag, pos, span);
        Ok(Anchor::Initial)
    }

    fn act_close_open(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        let pos = t.source.pos();
        let start = t.source.offset();
        t.pull();
        t.reset_attribute_state();
        let span = Span::new(start, t.source.offset());
        t.emit(TokenKind::CloseOpenTag, pos, span);
        Ok(Anchor::Initial)
    }

    fn act_unexpected_outside_tag(t: &mut Tokenizer<'_>) -> Result<Anchor, PatternSyntaxError> {
        Err(t.fail(format!(
            "expected '<' to begin a tag pattern, not {}",
            describe(t.source.current())
        )))
    }
}
