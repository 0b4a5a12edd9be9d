//! Strings escaped by doubling the quote (Pascal literals, Nim raw strings).

use apidoc_lexer_core::Cursor;

use super::BlockEnd;

/// Read to the closing `quote`. Two quotes in a row are one escaped quote.
pub(super) fn consume_doubled<'s>(cursor: &mut Cursor<'s>, quote: &str) -> BlockEnd<'s> {
    loop {
        if cursor.at_end() {
            return BlockEnd::unterminated(cursor);
        }
        if cursor.match_literal(quote) {
            if cursor.match_literal(quote) {
                continue;
            }
            return BlockEnd::terminated(Vec::new());
        }
        cursor.take(1);
    }
}
