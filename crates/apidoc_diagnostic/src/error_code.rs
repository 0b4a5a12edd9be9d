use std::fmt;

/// Error codes for all extraction diagnostics.
///
/// Format: E#### where the first digit indicates the stage:
/// - E0xxx: source text and lexical scanning
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, PartialOrd, Ord)]
pub enum ErrorCode {
    /// Source is not valid text (malformed UTF-8, undecodable bytes)
    E0001,
    /// Block reaches end of file without its terminator
    E0002,
    /// No language profile for the requested id or file extension
    E0003,
    /// Unknown text encoding label
    E0004,
}

impl ErrorCode {
    /// Get the code as a string (e.g., "E0002").
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "E0001",
            ErrorCode::E0002 => "E0002",
            ErrorCode::E0003 => "E0003",
            ErrorCode::E0004 => "E0004",
        }
    }

    /// One-line description used when a diagnostic has no message of its own.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E0001 => "invalid source text",
            ErrorCode::E0002 => "unterminated block",
            ErrorCode::E0003 => "unsupported language",
            ErrorCode::E0004 => "unknown text encoding",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_render_as_strings() {
        assert_eq!(ErrorCode::E0002.to_string(), "E0002");
        assert_eq!(ErrorCode::E0003.description(), "unsupported language");
    }
}
