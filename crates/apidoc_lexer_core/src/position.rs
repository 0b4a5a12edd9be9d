//! Source positions and document origins.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// A location inside a document.
///
/// `line` and `character` are 0-based; `character` counts Unicode scalar
/// values, `byte_offset` counts UTF-8 bytes from the start of the document
/// (not of the buffer, which may be a sub-range of the document).
///
/// Positions are only comparable when they belong to the same document.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: u32,
    pub character: u32,
    pub byte_offset: u32,
}

impl Position {
    /// The first position of a document.
    pub const ZERO: Position = Position {
        line: 0,
        character: 0,
        byte_offset: 0,
    };

    pub const fn new(line: u32, character: u32, byte_offset: u32) -> Self {
        Position {
            line,
            character,
            byte_offset,
        }
    }

    /// The position immediately after `ch`, when `ch` starts at `self`.
    #[inline]
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        reason = "len_utf8() is at most 4"
    )]
    pub fn advance(self, ch: char) -> Self {
        let byte_offset = self.byte_offset + ch.len_utf8() as u32;
        if ch == '\n' {
            Position {
                line: self.line + 1,
                character: 0,
                byte_offset,
            }
        } else {
            Position {
                line: self.line,
                character: self.character + 1,
                byte_offset,
            }
        }
    }

    /// The position after every character of `text`, starting at `self`.
    #[must_use]
    pub fn advance_str(self, text: &str) -> Self {
        text.chars().fold(self, Position::advance)
    }

    /// 1-based line number, as shown to users.
    pub fn display_line(&self) -> u32 {
        self.line + 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// Identifier of the document a buffer was read from (path or URI).
///
/// Cloning is a reference-count bump, so every extracted block and
/// diagnostic can carry its own copy.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Origin(Arc<str>);

impl Origin {
    pub fn new(name: impl AsRef<str>) -> Self {
        Origin(Arc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased file extension including the leading dot, if any.
    pub fn extension(&self) -> Option<String> {
        Path::new(self.as_str())
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{}", ext.to_ascii_lowercase()))
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Origin {
    fn from(name: &str) -> Self {
        Origin::new(name)
    }
}

impl From<String> for Origin {
    fn from(name: String) -> Self {
        Origin(Arc::from(name))
    }
}

impl From<&Path> for Origin {
    fn from(path: &Path) -> Self {
        Origin::new(path.to_string_lossy())
    }
}
