//! Position-tracking cursor over a validated [`SourceBuffer`].
//!
//! The cursor reads the buffer one Unicode scalar value at a time and keeps
//! a full [`Position`] (line, character, byte offset) for its current
//! location, so every match can be reported at the exact place it began.
//!
//! # Rollback
//!
//! Advancing operations (`match_literal`, `skip_spaces`, `take`,
//! `take_until`, `take_line`, `take_rest`) remember the position they
//! started from. [`Cursor::rollback`] returns to that position. Only one
//! level is kept: after two advances, a rollback undoes the second one and
//! a further rollback is a no-op. Callers that need to return further back
//! take a [`Checkpoint`] first and [`restore`](Cursor::restore) it.
//!
//! # Totality
//!
//! All operations are total. At the end of the buffer they return an empty
//! slice, `false` or `None` instead of failing.
//!
//! [`SourceBuffer`]: crate::SourceBuffer

use crate::Position;

/// Opaque snapshot of a cursor location, see [`Cursor::checkpoint`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Checkpoint(Position);

impl Checkpoint {
    /// Document position captured by this checkpoint.
    pub fn position(&self) -> Position {
        self.0
    }
}

/// Reader over the text of one [`SourceBuffer`](crate::SourceBuffer).
///
/// Created via [`SourceBuffer::cursor()`](crate::SourceBuffer::cursor).
/// The cursor is [`Copy`]; copying it is another way to snapshot state.
#[derive(Copy, Clone, Debug)]
pub struct Cursor<'a> {
    /// Validated buffer text.
    text: &'a str,
    /// Document byte offset of `text[0]`.
    base: u32,
    /// Current location.
    current: Position,
    /// Location before the last advancing operation, if rollback is valid.
    prev: Option<Position>,
}

impl<'a> Cursor<'a> {
    pub(crate) fn new(text: &'a str, start: Position) -> Self {
        Cursor {
            text,
            base: start.byte_offset,
            current: start,
            prev: None,
        }
    }

    /// Index into `text` of a document position.
    #[inline]
    fn index_of(&self, position: Position) -> usize {
        (position.byte_offset - self.base) as usize
    }

    /// Unread text from the current position.
    #[inline]
    pub fn rest(&self) -> &'a str {
        &self.text[self.index_of(self.current)..]
    }

    /// Returns `true` once every character has been consumed.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.index_of(self.current) >= self.text.len()
    }

    /// Current document position.
    #[inline]
    pub fn position(&self) -> Position {
        self.current
    }

    /// Returns `true` when the cursor sits at column 0 of a line.
    #[inline]
    pub fn at_line_start(&self) -> bool {
        self.current.character == 0
    }

    /// Next character, without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume `len` bytes of `rest()` (which must end on a char boundary),
    /// recording the start for rollback.
    fn consume(&mut self, len: usize) -> &'a str {
        let rest = self.rest();
        let taken = &rest[..len];
        self.prev = Some(self.current);
        self.current = self.current.advance_str(taken);
        taken
    }

    /// If the next characters equal `word`, advance past them and return
    /// `true`. Otherwise leave the cursor where it is and return `false`.
    ///
    /// An empty `word` never matches.
    pub fn match_literal(&mut self, word: &str) -> bool {
        if word.is_empty() || !self.rest().starts_with(word) {
            return false;
        }
        self.consume(word.len());
        true
    }

    /// Consume horizontal whitespace and return it.
    ///
    /// Stops before a line feed, before `exclude` (when given) and before
    /// the first non-whitespace character.
    pub fn skip_spaces(&mut self, exclude: Option<char>) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, ch)| ch == '\n' || Some(ch) == exclude || !ch.is_whitespace())
            .map_or(rest.len(), |(idx, _)| idx);
        self.consume(len)
    }

    /// Consume up to `n` characters and return them.
    pub fn take(&mut self, n: usize) -> &'a str {
        let rest = self.rest();
        let len = rest.char_indices().nth(n).map_or(rest.len(), |(idx, _)| idx);
        self.consume(len)
    }

    /// Consume everything up to the next occurrence of `delimiter`.
    ///
    /// With `inclusive` the delimiter is consumed and returned as well;
    /// otherwise it stays in the input. When the delimiter does not occur
    /// (or is empty) the cursor is left untouched and `None` is returned.
    pub fn take_until(&mut self, delimiter: &str, inclusive: bool) -> Option<&'a str> {
        if delimiter.is_empty() {
            return None;
        }
        let rest = self.rest();
        let found = memchr::memmem::find(rest.as_bytes(), delimiter.as_bytes())?;
        let len = if inclusive {
            found + delimiter.len()
        } else {
            found
        };
        Some(self.consume(len))
    }

    /// Consume the rest of the current line including its line feed, or
    /// the rest of the buffer when no line feed follows.
    pub fn take_line(&mut self) -> &'a str {
        let rest = self.rest();
        let len = memchr::memchr(b'\n', rest.as_bytes()).map_or(rest.len(), |idx| idx + 1);
        self.consume(len)
    }

    /// Consume the remainder of the buffer.
    pub fn take_rest(&mut self) -> &'a str {
        let len = self.rest().len();
        self.consume(len)
    }

    /// Undo the most recent advancing operation.
    ///
    /// Only one level of undo is kept: a second `rollback` without an
    /// advance in between does nothing.
    pub fn rollback(&mut self) {
        if let Some(prev) = self.prev.take() {
            self.current = prev;
        }
    }

    /// Snapshot the current location.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.current)
    }

    /// Return to a snapshot taken from this cursor. Invalidates rollback.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.move_to(checkpoint.0);
    }

    /// Reposition the cursor at `position`. Invalidates rollback.
    ///
    /// `position` must have been produced by this cursor (or a copy of it),
    /// so that it lies on a character boundary inside the buffer.
    pub fn move_to(&mut self, position: Position) {
        debug_assert!(
            position.byte_offset >= self.base
                && self.text.is_char_boundary(self.index_of(position)),
            "position {position:?} is not a character boundary of this buffer"
        );
        self.current = position;
        self.prev = None;
    }

    /// Text between two positions of this buffer.
    pub fn slice(&self, from: Position, to: Position) -> &'a str {
        &self.text[self.index_of(from)..self.index_of(to)]
    }

    /// Text from `from` up to the current position.
    pub fn slice_from(&self, from: Position) -> &'a str {
        self.slice(from, self.current)
    }
}
