//! PHP heredoc and nowdoc strings.
//!
//! ```text
//! <<<EOT        <<<"EOT"       <<<'EOT'
//! body          body           body
//! EOT;          EOT            EOT
//! ```
//!
//! The identifier after `<<<` is read from the source and becomes the
//! terminator of this one instance. The terminator must start a line and
//! may be followed by `;`, then the line break or the end of the buffer.

use apidoc_lexer_core::Cursor;

use super::{eat_line_break, BlockEnd, OpenState};

const OPENER: &str = "<<<";

/// Whether the body is subject to escapes and interpolation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum HeredocFlavor {
    /// `<<<EOT` or `<<<"EOT"`.
    Heredoc,
    /// `<<<'EOT'`: the body is taken literally.
    Nowdoc,
}

pub(super) fn begin<'s>(cursor: &mut Cursor<'s>) -> Option<OpenState<'s>> {
    let start = cursor.checkpoint();
    if !cursor.match_literal(OPENER) {
        return None;
    }
    cursor.skip_spaces(None);

    let line = cursor.take_line();
    let state = line
        .strip_suffix('\n')
        .and_then(|label| parse_label(label.trim_end()))
        .map(|(terminator, flavor)| OpenState::Heredoc { terminator, flavor });
    if state.is_none() {
        cursor.restore(start);
    }
    state
}

/// Split an opening label into its identifier and flavor.
fn parse_label(label: &str) -> Option<(&str, HeredocFlavor)> {
    let (ident, flavor) = if let Some(inner) = unquote(label, '\'') {
        (inner, HeredocFlavor::Nowdoc)
    } else if let Some(inner) = unquote(label, '"') {
        (inner, HeredocFlavor::Heredoc)
    } else {
        (label, HeredocFlavor::Heredoc)
    };
    is_identifier(ident).then_some((ident, flavor))
}

fn unquote(label: &str, quote: char) -> Option<&str> {
    label.strip_prefix(quote)?.strip_suffix(quote)
}

fn is_identifier(ident: &str) -> bool {
    let mut chars = ident.chars();
    chars
        .next()
        .is_some_and(|first| first == '_' || first.is_alphabetic())
        && chars.all(|ch| ch == '_' || ch.is_alphanumeric())
}

pub(super) fn consume<'s>(cursor: &mut Cursor<'s>, terminator: &str) -> BlockEnd<'s> {
    let mut lines = Vec::new();
    loop {
        if cursor.at_end() {
            return BlockEnd::unterminated(cursor);
        }

        let line_start = cursor.checkpoint();
        if cursor.match_literal(terminator) {
            cursor.match_literal(";");
            if cursor.at_end() || eat_line_break(cursor) {
                return BlockEnd::terminated(lines);
            }
        }
        cursor.restore(line_start);
        lines.push(cursor.take_line());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels() {
        assert_eq!(parse_label("EOT"), Some(("EOT", HeredocFlavor::Heredoc)));
        assert_eq!(parse_label("\"EOT\""), Some(("EOT", HeredocFlavor::Heredoc)));
        assert_eq!(parse_label("'EOT'"), Some(("EOT", HeredocFlavor::Nowdoc)));
        assert_eq!(parse_label("_x1"), Some(("_x1", HeredocFlavor::Heredoc)));
        assert_eq!(parse_label(""), None);
        assert_eq!(parse_label("'EOT"), None);
        assert_eq!(parse_label("1EOT"), None);
        assert_eq!(parse_label("EOT x"), None);
    }
}
