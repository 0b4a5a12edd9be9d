//! Blocks delimited by whole lines at column 0.
//!
//! ```text
//! =begin
//! content
//! =end
//! ```
//!
//! A delimiter only counts when it starts the line and nothing but the line
//! break (`\n` or `\r\n`) follows it. The closing delimiter may also end the buffer.

use apidoc_lexer_core::Cursor;

use super::{eat_line_break, BlockEnd, OpenState};

pub(super) fn begin<'s>(cursor: &mut Cursor<'s>, token: &str) -> Option<OpenState<'s>> {
    if !cursor.at_line_start() {
        return None;
    }
    let start = cursor.checkpoint();
    if cursor.match_literal(token) && eat_line_break(cursor) {
        return Some(OpenState::Plain);
    }
    cursor.restore(start);
    None
}

pub(super) fn consume<'s>(cursor: &mut Cursor<'s>, end: &str) -> BlockEnd<'s> {
    let mut lines = Vec::new();
    loop {
        if cursor.at_end() {
            return BlockEnd::unterminated(cursor);
        }

        let line_start = cursor.checkpoint();
        if cursor.match_literal(end) && (cursor.at_end() || eat_line_break(cursor)) {
            return BlockEnd::terminated(lines);
        }
        cursor.restore(line_start);
        lines.push(cursor.take_line());
    }
}
