//! The three plain constructs most languages share.

use apidoc_lexer_core::Cursor;

use super::{filter_prefix, filter_symbols, BlockEnd};

pub(super) fn consume_string<'s>(
    cursor: &mut Cursor<'s>,
    end: &str,
    escape: Option<&str>,
) -> BlockEnd<'s> {
    loop {
        if cursor.at_end() {
            return BlockEnd::unterminated(cursor);
        }
        if escape.is_some_and(|escape| cursor.match_literal(escape)) {
            // Escaped character, whatever it is.
            cursor.take(1);
        } else if cursor.match_literal(end) {
            return BlockEnd::terminated(Vec::new());
        } else {
            cursor.take(1);
        }
    }
}

/// Read a chain of single-line comments.
///
/// A comment at the very end of the buffer (no line feed) still counts as
/// terminated: the line feed is optional for the last line of a file.
pub(super) fn consume_single_line<'s>(cursor: &mut Cursor<'s>, begin: &str) -> BlockEnd<'s> {
    let mut lines = Vec::new();
    loop {
        let line = cursor.take_line();
        lines.push(filter_symbols(line, begin));
        if cursor.at_end() {
            break;
        }

        let next_line = cursor.checkpoint();
        cursor.skip_spaces(None);
        if !cursor.match_literal(begin) {
            cursor.restore(next_line);
            break;
        }
    }
    BlockEnd::terminated(lines)
}

pub(super) fn consume_multi_line<'s>(
    cursor: &mut Cursor<'s>,
    end: &str,
    prefix: Option<&str>,
) -> BlockEnd<'s> {
    let mut lines = Vec::new();
    let mut line_start = cursor.position();
    loop {
        if cursor.at_end() {
            return BlockEnd::unterminated(cursor);
        }

        let before = cursor.position();
        if cursor.match_literal(end) {
            let last = cursor.slice(line_start, before);
            if !last.is_empty() {
                lines.push(filter_prefix(last, prefix));
            }
            return BlockEnd::terminated(lines);
        }

        if cursor.take(1) == "\n" {
            lines.push(filter_prefix(cursor.slice_from(line_start), prefix));
            line_start = cursor.position();
        }
    }
}
