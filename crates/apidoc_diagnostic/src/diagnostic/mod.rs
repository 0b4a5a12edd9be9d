//! Core diagnostic types.
//!
//! Defines [`Diagnostic`], [`Location`] and [`Severity`], the values every
//! extraction stage uses to report problems to the caller's sink.

use std::fmt;

use apidoc_lexer_core::{Origin, Position};

use crate::ErrorCode;

/// Severity level for diagnostics.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Note,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Where a diagnostic points: a document and a position inside it.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Location {
    pub origin: Origin,
    pub position: Position,
}

impl Location {
    pub fn new(origin: Origin, position: Position) -> Self {
        Location { origin, position }
    }

    /// A location naming only the document (start of file).
    pub fn file(origin: Origin) -> Self {
        Location {
            origin,
            position: Position::ZERO,
        }
    }

    /// 1-based line number.
    pub fn line(&self) -> u32 {
        self.position.display_line()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.origin, self.position)
    }
}

/// A diagnostic reported while extracting blocks.
///
/// ```text
/// warning[E0002]: unterminated block comment
///   --> src/api.go:12:1
///   = note: the rest of the file was not scanned
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[must_use = "diagnostics should be reported or returned, not silently dropped"]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Severity level.
    pub severity: Severity,
    /// Main message.
    pub message: String,
    /// Where the problem is. `None` for problems that have no document.
    pub location: Option<Location>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    fn new_with_severity(code: ErrorCode, severity: Severity) -> Self {
        Diagnostic {
            code,
            severity,
            message: code.description().to_owned(),
            location: None,
            notes: Vec::new(),
        }
    }

    /// Create a new error diagnostic.
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Error)
    }

    /// Create a new warning diagnostic.
    #[cold]
    pub fn warning(code: ErrorCode) -> Self {
        Self::new_with_severity(code, Severity::Warning)
    }

    /// Set the main message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Point the diagnostic at a document position.
    pub fn at(mut self, origin: Origin, position: Position) -> Self {
        self.location = Some(Location::new(origin, position));
        self
    }

    /// Point the diagnostic at a whole document.
    pub fn in_file(mut self, origin: Origin) -> Self {
        self.location = Some(Location::file(origin));
        self
    }

    /// Add a note providing additional context.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }

    /// Origin of the document this diagnostic refers to, if any.
    pub fn origin(&self) -> Option<&Origin> {
        self.location.as_ref().map(|loc| &loc.origin)
    }

    /// 1-based line, if the diagnostic has a location.
    pub fn line(&self) -> Option<u32> {
        self.location.as_ref().map(Location::line)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(location) = &self.location {
            write!(f, "\n  --> {location}")?;
        }
        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }
        Ok(())
    }
}
