//! Diagnostic queue for collecting and sorting diagnostics.
//!
//! Workers report diagnostics in whatever order files finish. The queue
//! keeps them until the caller flushes, then hands them back ordered by
//! document and position so output is stable across runs.

use std::cmp::Ordering;

use rustc_hash::FxHashSet;

use crate::{Diagnostic, Severity};

/// Queue for collecting and sorting diagnostics.
///
/// # Example
///
/// ```text
/// let mut queue = DiagnosticQueue::new();
/// queue.push(diagnostic);
/// // ... push more diagnostics
/// let sorted = queue.flush();
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DiagnosticQueue {
    /// Collected diagnostics, in arrival order.
    diagnostics: Vec<Diagnostic>,
    /// Everything queued since the last flush, for duplicate checks.
    seen: FxHashSet<Diagnostic>,
    /// Count of errors (not warnings/notes).
    error_count: usize,
    /// Count of warnings.
    warning_count: usize,
}

impl DiagnosticQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a diagnostic. Exact duplicates of an already queued diagnostic
    /// are dropped.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if !self.seen.insert(diagnostic.clone()) {
            return;
        }
        match diagnostic.severity {
            Severity::Error => self.error_count += 1,
            Severity::Warning => self.warning_count += 1,
            Severity::Note => {}
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn error_count(&self) -> usize {
        self.error_count
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Queued diagnostics in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    /// Take every queued diagnostic, sorted by origin then position.
    ///
    /// Diagnostics without a location sort first. The sort is stable, so
    /// diagnostics at the same place keep their arrival order.
    pub fn flush(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = std::mem::take(&mut self.diagnostics);
        self.seen.clear();
        self.error_count = 0;
        self.warning_count = 0;
        diagnostics.sort_by(compare_locations);
        diagnostics
    }
}

fn compare_locations(a: &Diagnostic, b: &Diagnostic) -> Ordering {
    match (&a.location, &b.location) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(la), Some(lb)) => la
            .origin
            .cmp(&lb.origin)
            .then(la.position.line.cmp(&lb.position.line))
            .then(la.position.character.cmp(&lb.position.character)),
    }
}

impl Extend<Diagnostic> for DiagnosticQueue {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        for diagnostic in iter {
            self.push(diagnostic);
        }
    }
}

#[cfg(test)]
mod tests;
