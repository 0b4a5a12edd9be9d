//! Block scanner: finds and extracts comment blocks in one buffer.
//!
//! The scanner alternates between two states. While *seeking* it asks each
//! block of the profile, in order, whether it begins at the cursor; the
//! first match wins, and when nothing matches the cursor moves on by one
//! character. *Inside* a block it reads to the block's end. Comment blocks
//! are normalized and kept when long enough to hold a marker; strings are
//! only skipped over so their contents are never read as comments.
//!
//! A block that runs off the end of the buffer stops the scan. Lexical
//! state after it cannot be trusted, so only the blocks found before it
//! are returned, together with an [`UnterminatedBlock`] record.

use std::collections::BTreeMap;

use apidoc_diagnostic::{Diagnostic, ErrorCode};
use apidoc_lexer_core::{Origin, Position, SourceBuffer};
use serde::{Deserialize, Serialize};

use crate::{normalize, BlockKind, LanguageProfile};

/// Shortest content worth extracting: the length of `@api`, the shortest
/// marker the document parser recognises.
pub const MIN_CONTENT_LEN: usize = "@api".len();

/// Scanner settings.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Normalized content shorter than this many bytes is dropped.
    pub min_content_len: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        ScanConfig {
            min_content_len: MIN_CONTENT_LEN,
        }
    }
}

/// One comment block, ready for the document parser.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExtractedBlock {
    pub origin: Origin,
    /// 1-based line of the block's begin token.
    pub start_line: u32,
    /// Normalized content.
    pub content: String,
}

/// A block that was still open when the buffer ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnterminatedBlock {
    /// Position of the begin token.
    pub position: Position,
    pub kind: BlockKind,
}

/// Result of scanning one buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileScan {
    pub origin: Origin,
    /// Extracted blocks, ordered by start line.
    pub blocks: Vec<ExtractedBlock>,
    pub unterminated: Option<UnterminatedBlock>,
}

impl FileScan {
    /// Warning to report for this scan, if it stopped early.
    pub fn diagnostic(&self) -> Option<Diagnostic> {
        let block = self.unterminated?;
        let what = match block.kind {
            BlockKind::String => "string",
            BlockKind::SingleLineComment | BlockKind::MultiLineComment => "comment",
        };
        Some(
            Diagnostic::warning(ErrorCode::E0002)
                .with_message(format!("unterminated {what} block"))
                .at(self.origin.clone(), block.position)
                .with_note("the rest of the file was not scanned"),
        )
    }

    pub fn is_complete(&self) -> bool {
        self.unterminated.is_none()
    }
}

/// Drives a cursor over a buffer with one language's blocks.
#[derive(Copy, Clone, Debug)]
pub struct BlockScanner<'p> {
    profile: &'p LanguageProfile,
    config: ScanConfig,
}

impl<'p> BlockScanner<'p> {
    pub fn new(profile: &'p LanguageProfile) -> Self {
        Self::with_config(profile, ScanConfig::default())
    }

    pub fn with_config(profile: &'p LanguageProfile, config: ScanConfig) -> Self {
        BlockScanner { profile, config }
    }

    pub fn profile(&self) -> &'p LanguageProfile {
        self.profile
    }

    /// Scan `buffer` to its end or to the first unterminated block.
    #[tracing::instrument(level = "debug", skip_all, fields(origin = %buffer.origin(), language = self.profile.id))]
    pub fn scan(&self, buffer: &SourceBuffer) -> FileScan {
        let mut cursor = buffer.cursor();
        let mut found: BTreeMap<u32, String> = BTreeMap::new();
        let mut unterminated = None;

        while !cursor.at_end() {
            let start = cursor.position();
            let Some(open) = self
                .profile
                .blocks
                .iter()
                .find_map(|block| block.begins_here(&mut cursor))
            else {
                cursor.take(1);
                continue;
            };

            let kind = open.kind();
            let end = open.consume_to_end(&mut cursor);
            if !end.well_terminated {
                tracing::debug!(%start, ?kind, "unterminated block");
                unterminated = Some(UnterminatedBlock {
                    position: start,
                    kind,
                });
                break;
            }

            if !kind.is_comment() {
                continue;
            }
            match normalize(&end.lines) {
                Some(content) if content.len() >= self.config.min_content_len => {
                    found.insert(start.display_line(), content);
                }
                _ => tracing::trace!(line = start.display_line(), "block below length threshold"),
            }
        }

        let origin = buffer.origin().clone();
        let blocks: Vec<_> = found
            .into_iter()
            .map(|(start_line, content)| ExtractedBlock {
                origin: origin.clone(),
                start_line,
                content,
            })
            .collect();
        tracing::debug!(blocks = blocks.len(), "scan complete");

        FileScan {
            origin,
            blocks,
            unterminated,
        }
    }
}
