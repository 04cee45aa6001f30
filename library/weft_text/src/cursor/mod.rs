//! Code-point cursor over the parsed input.
//!
//! Provides low-level character access, lookahead, consumption and
//! rollback. Every parser reads the input through a `Cursor` and restores
//! it to where it started when it fails.

use crate::Span;

/// Cursor over a UTF-8 input.
///
/// The position is a byte offset that always sits on a character
/// boundary. Parsers move it forward with [`bump`](Self::bump) and roll it
/// back with [`set_position`](Self::set_position) or
/// [`restore`](Self::restore).
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'i> {
    input: &'i str,
    pos: usize,
}

/// A saved cursor position for speculative parsing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorSnapshot {
    pos: usize,
}

impl CursorSnapshot {
    /// The byte offset captured by this snapshot.
    #[inline]
    pub fn position(self) -> usize {
        self.pos
    }
}

impl<'i> Cursor<'i> {
    /// Create a new cursor at the start of `input`.
    pub fn new(input: &'i str) -> Self {
        Cursor { input, pos: 0 }
    }

    /// Create a cursor at `pos` inside `input`.
    pub fn at(input: &'i str, pos: usize) -> Self {
        let mut cursor = Cursor::new(input);
        cursor.set_position(pos);
        cursor
    }

    /// The whole input, independent of the current position.
    #[inline]
    pub fn input(&self) -> &'i str {
        self.input
    }

    /// Get the current byte offset.
    ///
    /// Used for progress tracking: compare positions before and after
    /// parsing to determine if input was consumed.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Set the cursor position directly.
    ///
    /// # Panics
    ///
    /// Debug builds panic if `pos` is past the end or not on a character
    /// boundary.
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(
            self.input.is_char_boundary(pos),
            "cursor position {} is not a character boundary (len {})",
            pos,
            self.input.len()
        );
        self.pos = pos;
    }

    /// Check if the cursor reached the end sentinel.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The unconsumed rest of the input.
    #[inline]
    pub fn rest(&self) -> &'i str {
        &self.input[self.pos..]
    }

    /// Peek at the current character without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Peek at the character after the current one.
    #[inline]
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest().chars();
        chars.next();
        chars.next()
    }

    /// Consume and return the current character.
    #[inline]
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the current character if `pred` accepts it.
    #[inline]
    pub fn bump_if(&mut self, pred: impl FnOnce(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(c) if pred(c) => {
                self.pos += c.len_utf8();
                Some(c)
            }
            _ => None,
        }
    }

    /// Consume `prefix` if the rest of the input starts with it.
    #[inline]
    pub fn eat_str(&mut self, prefix: &str) -> bool {
        if self.rest().starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Skip `bytes` bytes of input.
    ///
    /// The caller guarantees that the new position is a character boundary.
    #[inline]
    pub fn advance_bytes(&mut self, bytes: usize) {
        self.set_position(self.pos + bytes);
    }

    /// The input between `start` and the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'i str {
        &self.input[start..self.pos]
    }

    /// The span between `start` and the current position.
    #[inline]
    pub fn span_from(&self, start: usize) -> Span {
        Span::new(start, self.pos)
    }

    /// Capture the current position.
    #[inline]
    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot { pos: self.pos }
    }

    /// Roll back to a previously captured position.
    #[inline]
    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.pos = snapshot.pos;
    }
}
