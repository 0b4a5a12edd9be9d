//! Comments whose delimiters nest.
//!
//! `/* a /* b */ c */` is one comment: every inner `/*` raises the depth,
//! every `*/` lowers it, and only the `*/` that brings it back to zero
//! closes the block. Inner delimiters are kept as content.

use apidoc_lexer_core::Cursor;

use super::{filter_prefix, BlockEnd, OpenState};

pub(super) fn begin<'s>(cursor: &mut Cursor<'s>, token: &str) -> Option<OpenState<'s>> {
    cursor
        .match_literal(token)
        .then_some(OpenState::Nested { depth: 1 })
}

pub(super) fn consume<'s>(
    cursor: &mut Cursor<'s>,
    begin: &str,
    end: &str,
    prefix: Option<&str>,
    mut depth: u32,
) -> BlockEnd<'s> {
    let mut lines = Vec::new();
    let mut line_start = cursor.position();
    loop {
        if cursor.at_end() {
            return BlockEnd::unterminated(cursor);
        }

        let before = cursor.position();
        if cursor.match_literal(end) {
            depth -= 1;
            if depth == 0 {
                let last = cursor.slice(line_start, before);
                if !last.is_empty() {
                    lines.push(filter_prefix(last, prefix));
                }
                return BlockEnd::terminated(lines);
            }
        } else if cursor.match_literal(begin) {
            depth += 1;
        } else if cursor.take(1) == "\n" {
            lines.push(filter_prefix(cursor.slice_from(line_start), prefix));
            line_start = cursor.position();
        }
    }
}
