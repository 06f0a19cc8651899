//! Character cursor over the template text.
//!
//! One character of lookahead with an explicit "freeze" primitive: after
//! [`Source::freeze_once`], the next [`Source::advance`] returns the current
//! character again instead of pulling a new one. This lets lookahead-driven
//! decisions re-consume the character they inspected without a pushback
//! buffer. The cursor also tracks `(line, column)` for diagnostics and the
//! byte offset for labeled spans.

use crate::diagnostics::{Position, Span};

pub struct Source<'a> {
    chars: std::str::Chars<'a>,
    curr: Option<char>,
    frozen: bool,
    done: bool,
    started: bool,
    line: usize,
    column: usize,
    offset: usize,
    next_offset: usize,
}

impl<'a> Source<'a> {
    /// Creates a cursor positioned before the first character; callers must
    /// [`advance`](Source::advance) once before inspecting `current`.
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.chars(),
            curr: None,
            frozen: false,
            done: false,
            started: false,
            line: 0,
            column: 0,
            offset: 0,
            next_offset: 0,
        }
    }

    /// The current character, or `None` when the stream has ended (or has not
    /// been advanced yet).
    pub fn current(&self) -> Option<char> {
        self.curr
    }

    /// True once the underlying text is exhausted. One-way latch.
    pub fn done(&self) -> bool {
        self.done
    }

    /// Whether the next [`advance`](Source::advance) will re-return the
    /// current character.
    pub fn frozen(&self) -> bool {
        self.frozen
    }

    /// Defers the next pull: the following `advance` yields the current
    /// character again.
    pub fn freeze_once(&mut self) {
        self.frozen = true;
    }

    /// Pulls the next character, honoring a pending freeze.
    pub fn advance(&mut self) -> Option<char> {
        if self.frozen {
            self.frozen = false;
            return self.curr;
        }
        if self.done {
            return None;
        }
        match self.chars.next() {
            Some(c) => {
                self.offset = self.next_offset;
                self.next_offset += c.len_utf8();
                if self.started {
                    self.column += 1;
                } else {
                    self.started = true;
                }
                if c == '\n' {
                    self.line += 1;
                    self.column = 0;
                }
                self.curr = Some(c);
                Some(c)
            }
            None => {
                self.curr = None;
                self.done = true;
                self.offset = self.next_offset;
                None
            }
        }
    }

    /// Position of the current character (of the end, once done).
    pub fn pos(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Byte offset of the current character.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Byte span covering the current character, or a point span at the end.
    pub fn span_here(&self) -> Span {
        match self.curr {
            Some(c) => Span::new(self.offset, self.offset + c.len_utf8()),
            None => Span::point(self.offset),
        }
    }
}
