//! Language-aware block extraction for apidoc.
//!
//! - [`LexicalBlock`]: matchers for strings and comments, including the
//!   quirky ones (nested comments, heredocs, line-anchored blocks, Nim
//!   fences)
//! - [`LanguageProfile`] / [`Registry`]: the ordered block list of each
//!   supported language, indexed by id and file extension
//! - [`BlockScanner`]: walks one buffer and extracts its comment blocks
//! - [`normalize`]: strips incidental indentation from a block's lines
//!
//! # Example
//!
//! ```text
//! let registry = build_registry();
//! let profile = registry.for_path("api.go")?;
//! let scan = BlockScanner::new(profile).scan(&buffer);
//! for block in scan.blocks { ... }
//! ```

mod block;
mod normalize;
mod registry;
mod scanner;

pub use block::{BlockEnd, BlockKind, HeredocFlavor, LexicalBlock, OpenBlock};
pub use normalize::normalize;
pub use registry::{build_registry, LanguageProfile, Registry};
pub use scanner::{
    BlockScanner, ExtractedBlock, FileScan, ScanConfig, UnterminatedBlock, MIN_CONTENT_LEN,
};
