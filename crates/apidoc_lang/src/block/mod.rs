//! Lexical block matchers.
//!
//! A [`LexicalBlock`] recognises one kind of lexically delimited region:
//! a string literal, a single-line comment chain or a multi-line comment.
//! Matching happens in two phases:
//!
//! 1. [`LexicalBlock::begins_here`] checks whether the block starts at the
//!    cursor. On success it has consumed the begin token and returns an
//!    [`OpenBlock`] holding any state captured from the source (a heredoc
//!    terminator, a nesting depth). On failure the cursor is untouched.
//! 2. [`OpenBlock::consume_to_end`] reads up to and including the end of
//!    the block and returns its physical content lines.
//!
//! Blocks themselves are immutable: every per-instance value lives in the
//! `OpenBlock`, so a profile can be shared by any number of scanning
//! threads.

mod anchored;
mod fence;
mod heredoc;
mod nested;
mod quoted;
mod standard;

use apidoc_lexer_core::Cursor;

pub use heredoc::HeredocFlavor;

/// What a block is, as far as extraction is concerned.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlockKind {
    /// Scanned only so its content is never mistaken for a comment.
    String,
    SingleLineComment,
    MultiLineComment,
}

impl BlockKind {
    /// Comment kinds produce extracted content; strings never do.
    #[inline]
    pub fn is_comment(self) -> bool {
        matches!(self, BlockKind::SingleLineComment | BlockKind::MultiLineComment)
    }
}

/// One lexical construct of a language.
///
/// Tokens are `'static` because every block is declared in the built-in
/// language table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LexicalBlock {
    /// String literal. After `escape` the next character is skipped, so an
    /// escaped `end` does not terminate the string.
    String {
        begin: &'static str,
        end: &'static str,
        escape: Option<&'static str>,
    },

    /// Comment running to the end of the line. Consecutive lines starting
    /// with the same `begin` (after indentation) form one block.
    SingleLineComment { begin: &'static str },

    /// Comment between `begin` and `end`. Any character of `prefix` that
    /// opens a line and is followed by whitespace is removed with that
    /// whitespace.
    MultiLineComment {
        begin: &'static str,
        end: &'static str,
        prefix: Option<&'static str>,
    },

    /// String where the quote written twice stands for one quote (Pascal).
    DoubledQuoteString { quote: &'static str },

    /// Block whose delimiters must fill a whole line starting at column 0
    /// (Ruby `=begin`/`=end`, Perl `=pod`/`=cut`).
    LineAnchored {
        begin: &'static str,
        end: &'static str,
    },

    /// Comment whose delimiters nest (Swift `/* /* */ */`).
    NestedComment {
        begin: &'static str,
        end: &'static str,
        prefix: Option<&'static str>,
    },

    /// PHP heredoc or nowdoc. The terminator is read from the source.
    Heredoc,

    /// Triple-quoted string closed only by a fence that ends its line (Nim).
    TripleQuoteFence { fence: &'static str },

    /// Raw string with several possible openers and a doubled-quote escape
    /// (Nim `r"..."`).
    RawString {
        begins: &'static [&'static str],
        quote: &'static str,
    },
}

impl LexicalBlock {
    pub const fn string(begin: &'static str, end: &'static str, escape: &'static str) -> Self {
        LexicalBlock::String {
            begin,
            end,
            escape: Some(escape),
        }
    }

    /// String literal without escapes (Go raw strings, Python triple quotes).
    pub const fn raw_string(begin: &'static str, end: &'static str) -> Self {
        LexicalBlock::String {
            begin,
            end,
            escape: None,
        }
    }

    pub const fn single_line(begin: &'static str) -> Self {
        LexicalBlock::SingleLineComment { begin }
    }

    pub const fn multi_line(begin: &'static str, end: &'static str) -> Self {
        LexicalBlock::MultiLineComment {
            begin,
            end,
            prefix: None,
        }
    }

    pub const fn multi_line_with_prefix(
        begin: &'static str,
        end: &'static str,
        prefix: &'static str,
    ) -> Self {
        LexicalBlock::MultiLineComment {
            begin,
            end,
            prefix: Some(prefix),
        }
    }

    pub fn kind(&self) -> BlockKind {
        match self {
            LexicalBlock::SingleLineComment { .. } => BlockKind::SingleLineComment,
            LexicalBlock::MultiLineComment { .. }
            | LexicalBlock::LineAnchored { .. }
            | LexicalBlock::NestedComment { .. } => BlockKind::MultiLineComment,
            LexicalBlock::String { .. }
            | LexicalBlock::DoubledQuoteString { .. }
            | LexicalBlock::Heredoc
            | LexicalBlock::TripleQuoteFence { .. }
            | LexicalBlock::RawString { .. } => BlockKind::String,
        }
    }

    /// Check whether this block starts at the cursor.
    ///
    /// On a match the begin token has been consumed. Otherwise the cursor
    /// is exactly where it was.
    pub fn begins_here<'s>(&self, cursor: &mut Cursor<'s>) -> Option<OpenBlock<'_, 's>> {
        let state = match self {
            LexicalBlock::String { begin, .. }
            | LexicalBlock::SingleLineComment { begin }
            | LexicalBlock::MultiLineComment { begin, .. } => {
                cursor.match_literal(begin).then_some(OpenState::Plain)?
            }
            LexicalBlock::DoubledQuoteString { quote } => {
                cursor.match_literal(quote).then_some(OpenState::Plain)?
            }
            LexicalBlock::RawString { begins, .. } => begins
                .iter()
                .any(|begin| cursor.match_literal(begin))
                .then_some(OpenState::Plain)?,
            LexicalBlock::TripleQuoteFence { fence } => {
                cursor.match_literal(fence).then_some(OpenState::Plain)?
            }
            LexicalBlock::LineAnchored { begin, .. } => anchored::begin(cursor, begin)?,
            LexicalBlock::NestedComment { begin, .. } => nested::begin(cursor, begin)?,
            LexicalBlock::Heredoc => heredoc::begin(cursor)?,
        };
        Some(OpenBlock { block: self, state })
    }
}

/// Per-instance state captured when a block begins.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum OpenState<'s> {
    Plain,
    Nested { depth: u32 },
    Heredoc {
        terminator: &'s str,
        flavor: HeredocFlavor,
    },
}

/// A block whose begin token has been consumed.
///
/// `'b` borrows the block definition, `'s` the source text (heredoc
/// terminators are slices of it).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct OpenBlock<'b, 's> {
    block: &'b LexicalBlock,
    state: OpenState<'s>,
}

impl<'b, 's> OpenBlock<'b, 's> {
    pub fn block(&self) -> &'b LexicalBlock {
        self.block
    }

    pub fn kind(&self) -> BlockKind {
        self.block.kind()
    }

    /// Identifier that closes a heredoc or nowdoc.
    pub fn heredoc_terminator(&self) -> Option<&'s str> {
        match self.state {
            OpenState::Heredoc { terminator, .. } => Some(terminator),
            _ => None,
        }
    }

    pub fn heredoc_flavor(&self) -> Option<HeredocFlavor> {
        match self.state {
            OpenState::Heredoc { flavor, .. } => Some(flavor),
            _ => None,
        }
    }

    /// Read through the end of the block.
    ///
    /// When the buffer ends first, `well_terminated` is `false` and the
    /// cursor is at the end of the buffer.
    pub fn consume_to_end(self, cursor: &mut Cursor<'s>) -> BlockEnd<'s> {
        match (self.block, self.state) {
            (LexicalBlock::String { end, escape, .. }, _) => {
                standard::consume_string(cursor, end, *escape)
            }
            (LexicalBlock::SingleLineComment { begin }, _) => {
                standard::consume_single_line(cursor, begin)
            }
            (LexicalBlock::MultiLineComment { end, prefix, .. }, _) => {
                standard::consume_multi_line(cursor, end, *prefix)
            }
            (LexicalBlock::DoubledQuoteString { quote }, _) => {
                quoted::consume_doubled(cursor, quote)
            }
            (LexicalBlock::RawString { quote, .. }, _) => quoted::consume_doubled(cursor, quote),
            (LexicalBlock::LineAnchored { end, .. }, _) => anchored::consume(cursor, end),
            (LexicalBlock::NestedComment { begin, end, prefix }, OpenState::Nested { depth }) => {
                nested::consume(cursor, begin, end, *prefix, depth)
            }
            (LexicalBlock::NestedComment { begin, end, prefix }, _) => {
                nested::consume(cursor, begin, end, *prefix, 1)
            }
            (LexicalBlock::Heredoc, OpenState::Heredoc { terminator, .. }) => {
                heredoc::consume(cursor, terminator)
            }
            (LexicalBlock::Heredoc, _) => BlockEnd::unterminated(cursor),
            (LexicalBlock::TripleQuoteFence { fence }, _) => fence::consume(cursor, fence),
        }
    }
}

/// Result of [`OpenBlock::consume_to_end`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockEnd<'s> {
    /// Physical content lines, each keeping its line feed. Empty for
    /// string kinds that discard their content.
    pub lines: Vec<&'s str>,
    /// `false` when the buffer ended before the block did.
    pub well_terminated: bool,
}

impl<'s> BlockEnd<'s> {
    fn terminated(lines: Vec<&'s str>) -> Self {
        BlockEnd {
            lines,
            well_terminated: true,
        }
    }

    /// Give up on the block: skip to the end of the buffer.
    fn unterminated(cursor: &mut Cursor<'s>) -> Self {
        cursor.take_rest();
        BlockEnd {
            lines: Vec::new(),
            well_terminated: false,
        }
    }
}

/// Strip comment-marker noise from the start of a line.
///
/// Leading horizontal whitespace is skipped. If the first other character
/// belongs to `charset` and is followed by whitespace, everything up to and
/// including that whitespace is dropped; when the whitespace is the line
/// feed only `"\n"` is left. Any other line is returned unchanged.
pub(crate) fn filter_symbols<'s>(line: &'s str, charset: &str) -> &'s str {
    let Some(idx) = line.find(|ch: char| ch == '\n' || !ch.is_whitespace()) else {
        return line;
    };
    let rest = &line[idx..];
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(symbol), Some('\n')) if charset.contains(symbol) => "\n",
        (Some(symbol), Some(space)) if charset.contains(symbol) && space.is_whitespace() => {
            &rest[symbol.len_utf8() + space.len_utf8()..]
        }
        _ => line,
    }
}

/// Consume a `"\n"` or `"\r\n"` line break at the cursor.
pub(crate) fn eat_line_break(cursor: &mut Cursor<'_>) -> bool {
    cursor.match_literal("\n") || cursor.match_literal("\r\n")
}

/// [`filter_symbols`] for blocks whose prefix charset is optional.
pub(crate) fn filter_prefix<'s>(line: &'s str, prefix: Option<&str>) -> &'s str {
    prefix.map_or(line, |charset| filter_symbols(line, charset))
}

#[cfg(test)]
mod tests;
