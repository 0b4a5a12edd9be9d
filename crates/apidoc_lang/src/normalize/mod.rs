//! Block content normalization.
//!
//! A block's physical lines carry indentation from the surrounding code.
//! [`normalize`] merges them into one string and removes that incidental
//! indentation, leaving the text as the author laid it out relative to
//! the first line.

/// Merge `lines` into one string with incidental indentation removed.
///
/// - Leading and trailing blank lines are dropped; if nothing is left the
///   result is `None`.
/// - The first line loses all its leading whitespace.
/// - Every later non-blank line loses the indentation common to all later
///   non-blank lines. Blank lines are copied byte for byte.
///
/// Widths are measured in bytes, and only whole characters are removed,
/// so a wide space is never split.
pub fn normalize(lines: &[&str]) -> Option<String> {
    let first = lines.iter().position(|line| !is_blank(line))?;
    let last = lines.iter().rposition(|line| !is_blank(line))?;
    let (head, rest) = lines[first..=last].split_first()?;
    let head = head.trim_start();

    if rest.is_empty() {
        return Some(head.to_owned());
    }

    let indent = rest
        .iter()
        .filter(|line| !is_blank(line))
        .map(|line| indent_width(line))
        .min()
        .unwrap_or(0);

    let capacity = head.len() + rest.iter().map(|line| line.len()).sum::<usize>();
    let mut merged = String::with_capacity(capacity);
    merged.push_str(head);
    for line in rest {
        if is_blank(line) {
            merged.push_str(line);
        } else {
            merged.push_str(strip_indent(line, indent));
        }
    }
    Some(merged)
}

#[inline]
fn is_blank(line: &str) -> bool {
    line.chars().all(char::is_whitespace)
}

/// Bytes of leading whitespace.
fn indent_width(line: &str) -> usize {
    line.len() - line.trim_start().len()
}

/// Remove leading whitespace characters whose total width fits in `width`.
fn strip_indent(line: &str, width: usize) -> &str {
    let mut cut = 0;
    for (idx, ch) in line.char_indices() {
        let next = idx + ch.len_utf8();
        if !ch.is_whitespace() || next > width {
            break;
        }
        cut = next;
    }
    &line[cut..]
}
