//! Low-level text access for apidoc block extraction.
//!
//! This crate has no knowledge of programming languages. It provides:
//!
//! - [`Position`]: line / character / byte-offset triple tracked while reading
//! - [`Origin`]: cheap shared identifier of the document a buffer came from
//! - [`SourceBuffer`]: UTF-8 validated text plus its origin and start position
//! - [`Cursor`]: a position-tracking reader with one-level rollback
//!
//! Language-aware matching lives in `apidoc_lang`, which builds on the
//! cursor operations exposed here.

mod cursor;
mod position;
mod source_buffer;

pub use cursor::{Checkpoint, Cursor};
pub use position::{Origin, Position};
pub use source_buffer::{SourceBuffer, SourceError};
