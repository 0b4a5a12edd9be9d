//! Source text decoding.
//!
//! Scanning works on UTF-8 only. Jobs in another encoding are converted
//! here first; the result is still validated by `SourceBuffer`, which
//! reports the exact position of any malformed sequence left over.
//!
//! Without an explicit label, a leading byte-order mark picks the encoding
//! and is removed. With a label, a byte-order mark of that same encoding is
//! removed and any other leading bytes are decoded as text.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16BE_BOM: &[u8] = &[0xFE, 0xFF];

/// Encodings a job may declare.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl TextEncoding {
    /// Look up an encoding label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        match label.as_str() {
            "utf-8" | "utf8" => Some(TextEncoding::Utf8),
            "utf-16le" => Some(TextEncoding::Utf16Le),
            "utf-16be" => Some(TextEncoding::Utf16Be),
            "iso-8859-1" | "latin1" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }

    /// Canonical label.
    pub fn label(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Latin1 => "iso-8859-1",
        }
    }

    /// Encoding announced by a leading byte-order mark, with the mark's
    /// length in bytes.
    pub fn sniff(bytes: &[u8]) -> Option<(Self, usize)> {
        if bytes.starts_with(UTF8_BOM) {
            Some((TextEncoding::Utf8, UTF8_BOM.len()))
        } else if bytes.starts_with(UTF16LE_BOM) {
            Some((TextEncoding::Utf16Le, UTF16LE_BOM.len()))
        } else if bytes.starts_with(UTF16BE_BOM) {
            Some((TextEncoding::Utf16Be, UTF16BE_BOM.len()))
        } else {
            None
        }
    }

    /// Convert `bytes` to UTF-8.
    ///
    /// UTF-8 input is returned untouched; validating it is left to
    /// `SourceBuffer`. Offsets in errors are relative to `bytes`.
    pub fn decode(self, bytes: Vec<u8>) -> Result<Vec<u8>, DecodeError> {
        match self {
            TextEncoding::Utf8 => Ok(bytes),
            TextEncoding::Latin1 => Ok(decode_latin1(bytes)),
            TextEncoding::Utf16Le => decode_utf16(&bytes, self, u16::from_le_bytes),
            TextEncoding::Utf16Be => decode_utf16(&bytes, self, u16::from_be_bytes),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a job's bytes could not be turned into UTF-8.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("unknown text encoding `{0}`")]
    UnknownLabel(String),

    #[error("input is not valid {encoding} at byte {offset}")]
    Malformed {
        encoding: TextEncoding,
        offset: usize,
    },
}

/// Decode a job's bytes according to its optional encoding label.
///
/// Returns the encoding that was applied and the UTF-8 bytes, with any
/// byte-order mark removed.
pub fn decode_source(
    mut bytes: Vec<u8>,
    label: Option<&str>,
) -> Result<(TextEncoding, Vec<u8>), DecodeError> {
    let (encoding, bom) = match label {
        Some(label) => {
            let encoding = TextEncoding::from_label(label)
                .ok_or_else(|| DecodeError::UnknownLabel(label.to_owned()))?;
            let bom = match TextEncoding::sniff(&bytes) {
                Some((sniffed, len)) if sniffed == encoding => len,
                _ => 0,
            };
            (encoding, bom)
        }
        None => TextEncoding::sniff(&bytes).unwrap_or((TextEncoding::Utf8, 0)),
    };

    bytes.drain(..bom);
    match encoding.decode(bytes) {
        Ok(text) => Ok((encoding, text)),
        Err(DecodeError::Malformed { encoding, offset }) => Err(DecodeError::Malformed {
            encoding,
            offset: offset + bom,
        }),
        Err(err) => Err(err),
    }
}

fn decode_latin1(bytes: Vec<u8>) -> Vec<u8> {
    if bytes.is_ascii() {
        return bytes;
    }
    bytes
        .into_iter()
        .map(char::from)
        .collect::<String>()
        .into_bytes()
}

fn decode_utf16(
    bytes: &[u8],
    encoding: TextEncoding,
    unit: fn([u8; 2]) -> u16,
) -> Result<Vec<u8>, DecodeError> {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    let mut text = String::with_capacity(bytes.len());
    let mut offset = 0;
    for decoded in char::decode_utf16(units) {
        match decoded {
            Ok(ch) => {
                text.push(ch);
                offset += ch.len_utf16() * 2;
            }
            Err(_) => return Err(DecodeError::Malformed { encoding, offset }),
        }
    }
    if bytes.len() % 2 != 0 {
        return Err(DecodeError::Malformed {
            encoding,
            offset: bytes.len() - 1,
        });
    }
    Ok(text.into_bytes())
}
