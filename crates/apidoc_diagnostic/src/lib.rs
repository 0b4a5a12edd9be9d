//! Diagnostics for apidoc block extraction.
//!
//! Every problem found while reading or scanning a document is reported
//! as a [`Diagnostic`]:
//! - Error codes for searchability
//! - A message saying what went wrong
//! - A document location saying where
//!
//! Diagnostics flow into a [`DiagnosticSink`] shared by all workers. The
//! [`CollectingSink`] gathers them into a [`DiagnosticQueue`] that sorts by
//! document and position on flush.

mod diagnostic;
mod error_code;
pub mod queue;
pub mod sink;

pub use diagnostic::{Diagnostic, Location, Severity};
pub use error_code::ErrorCode;
pub use queue::DiagnosticQueue;
pub use sink::{CollectingSink, DiagnosticSink, DiscardSink, TracingSink};
