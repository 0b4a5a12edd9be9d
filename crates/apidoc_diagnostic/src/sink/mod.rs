//! Destinations for diagnostics.
//!
//! Scanning and extraction report through a [`DiagnosticSink`] instead of
//! returning diagnostics inline, so a worker pool can share one sink and
//! the caller decides whether messages are collected, logged or dropped.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{Diagnostic, DiagnosticQueue, Severity};

/// Receiver for diagnostics. Implementations must tolerate concurrent
/// calls from several worker threads.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, diagnostic: Diagnostic) {
        (**self).emit(diagnostic);
    }
}

/// Sink that keeps every diagnostic in a [`DiagnosticQueue`].
#[derive(Debug, Default)]
pub struct CollectingSink {
    queue: Mutex<DiagnosticQueue>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error_count(&self) -> usize {
        self.queue.lock().error_count()
    }

    pub fn warning_count(&self) -> usize {
        self.queue.lock().warning_count()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.lock().is_empty()
    }

    /// Take the collected diagnostics, sorted by origin and position.
    pub fn take(&self) -> Vec<Diagnostic> {
        self.queue.lock().flush()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.queue.lock().push(diagnostic);
    }
}

/// Sink that writes each diagnostic as a `tracing` event.
#[derive(Copy, Clone, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let code = diagnostic.code.as_str();
        let location = diagnostic
            .location
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => {
                tracing::error!(code, location = %location, "{}", diagnostic.message);
            }
            Severity::Warning => {
                tracing::warn!(code, location = %location, "{}", diagnostic.message);
            }
            Severity::Note => {
                tracing::info!(code, location = %location, "{}", diagnostic.message);
            }
        }
    }
}

/// Sink that drops everything.
#[derive(Copy, Clone, Debug, Default)]
pub struct DiscardSink;

impl DiagnosticSink for DiscardSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

#[cfg(test)]
mod tests;
