//! Triple-quoted strings that close only at the end of a line (Nim).
//!
//! A `"""` followed by anything other than horizontal whitespace before the
//! line break is part of the string: the scan steps over one quote and
//! carries on, so `""""` closes on its last three quotes.

use apidoc_lexer_core::Cursor;

use super::BlockEnd;

pub(super) fn consume<'s>(cursor: &mut Cursor<'s>, fence: &str) -> BlockEnd<'s> {
    loop {
        if cursor.at_end() {
            return BlockEnd::unterminated(cursor);
        }

        let fence_start = cursor.position();
        if !cursor.match_literal(fence) {
            cursor.take(1);
            continue;
        }

        let rest = cursor.rest();
        let line_end = rest.find('\n').unwrap_or(rest.len());
        if rest[..line_end].chars().all(char::is_whitespace) {
            cursor.take_line();
            return BlockEnd::terminated(Vec::new());
        }
        cursor.move_to(fence_start);
        cursor.take(1);
    }
}
