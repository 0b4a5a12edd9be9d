//! Validated source text with its origin and starting position.
//!
//! A [`SourceBuffer`] is validated exactly once, at construction. Every
//! [`Cursor`] created from it can then decode characters without checking
//! for malformed UTF-8 again.
//!
//! # Sub-buffers
//!
//! A buffer may hold only part of a larger document, for example a region
//! an editor reported as changed. The `start` position places the first
//! byte of the buffer inside that document, so positions reported by the
//! cursor are document positions, not buffer positions.

use thiserror::Error;

use crate::{Cursor, Origin, Position};

/// Errors raised while building a [`SourceBuffer`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SourceError {
    /// The bytes are not well-formed UTF-8.
    ///
    /// `position` locates the first byte of the offending sequence and
    /// `len` is the number of bytes that form the invalid sequence
    /// (0 when the input ends in the middle of a character).
    #[error("{origin}:{position}: invalid UTF-8 sequence")]
    InvalidUtf8 {
        origin: Origin,
        position: Position,
        len: u32,
    },

    /// The document does not fit the 32-bit offsets used by [`Position`].
    #[error("{origin}: source is {len} bytes, larger than the supported 4 GiB")]
    TooLarge { origin: Origin, len: usize },
}

impl SourceError {
    pub fn origin(&self) -> &Origin {
        match self {
            SourceError::InvalidUtf8 { origin, .. } | SourceError::TooLarge { origin, .. } => {
                origin
            }
        }
    }

    /// Document position the error refers to.
    pub fn position(&self) -> Position {
        match self {
            SourceError::InvalidUtf8 { position, .. } => *position,
            SourceError::TooLarge { .. } => Position::ZERO,
        }
    }
}

/// Immutable, UTF-8 validated source text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceBuffer {
    text: String,
    origin: Origin,
    start: Position,
}

impl SourceBuffer {
    /// Validate `bytes` and wrap them as a buffer starting at the top of
    /// the document.
    pub fn new(bytes: Vec<u8>, origin: impl Into<Origin>) -> Result<Self, SourceError> {
        Self::with_start(bytes, origin, Position::ZERO)
    }

    /// Validate `bytes` as a region of a larger document beginning at `start`.
    pub fn with_start(
        bytes: Vec<u8>,
        origin: impl Into<Origin>,
        start: Position,
    ) -> Result<Self, SourceError> {
        let origin = origin.into();
        check_len(&origin, bytes.len(), start)?;

        match String::from_utf8(bytes) {
            Ok(text) => Ok(SourceBuffer {
                text,
                origin,
                start,
            }),
            Err(err) => {
                let utf8 = err.utf8_error();
                let valid_up_to = utf8.valid_up_to();
                let bytes = err.into_bytes();
                let position = locate(&bytes[..valid_up_to], start);
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "error_len() is at most 3"
                )]
                let len = utf8.error_len().map_or(0, |n| n as u32);
                Err(SourceError::InvalidUtf8 {
                    origin,
                    position,
                    len,
                })
            }
        }
    }

    /// Wrap text that is already known to be valid.
    pub fn from_text(text: impl Into<String>, origin: impl Into<Origin>) -> Result<Self, SourceError> {
        let text = text.into();
        let origin = origin.into();
        check_len(&origin, text.len(), Position::ZERO)?;
        Ok(SourceBuffer {
            text,
            origin,
            start: Position::ZERO,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Document position of the first byte of this buffer.
    pub fn start(&self) -> Position {
        self.start
    }

    /// Length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Create a [`Cursor`] positioned at the start of the buffer.
    pub fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.text, self.start)
    }
}

/// Reject buffers whose end offset would not fit in a `u32`.
fn check_len(origin: &Origin, len: usize, start: Position) -> Result<(), SourceError> {
    let fits = u32::try_from(len)
        .ok()
        .and_then(|len| start.byte_offset.checked_add(len))
        .is_some();
    if fits {
        Ok(())
    } else {
        Err(SourceError::TooLarge {
            origin: origin.clone(),
            len,
        })
    }
}

/// Position reached after reading the valid prefix `valid` from `start`.
///
/// Lines are counted with `memchr`; only the tail after the last line feed
/// has to be decoded to count characters.
#[allow(
    clippy::cast_possible_truncation,
    reason = "buffer length was checked against u32::MAX"
)]
fn locate(valid: &[u8], start: Position) -> Position {
    let newlines = memchr::memchr_iter(b'\n', valid).count() as u32;
    let byte_offset = start.byte_offset + valid.len() as u32;
    match memchr::memrchr(b'\n', valid) {
        Some(last) => {
            let tail = &valid[last + 1..];
            Position {
                line: start.line + newlines,
                character: count_chars(tail),
                byte_offset,
            }
        }
        None => Position {
            line: start.line,
            character: start.character + count_chars(valid),
            byte_offset,
        },
    }
}

/// Number of characters in a valid UTF-8 byte run (counts non-continuation bytes).
#[allow(
    clippy::cast_possible_truncation,
    reason = "buffer length was checked against u32::MAX"
)]
fn count_chars(valid: &[u8]) -> u32 {
    valid.iter().filter(|&&b| (b & 0xC0) != 0x80).count() as u32
}
