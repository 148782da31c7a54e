//! Error types for reading and writing CBF documents.

use thiserror::Error;

use cbfkit_ast::{BoundsViolation, UnknownToken};

/// Result type for CBF operations
pub type Result<T> = std::result::Result<T, CbfError>;

/// Errors that can occur while decoding or encoding
#[derive(Debug, Error)]
pub enum CbfError {
    /// The source or sink could not be acquired
    #[error("Failed to open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Read or write failure after the transport was opened
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input violates the format; `line` is 1-based
    #[error("line {line}: {kind}")]
    Parse { line: u64, kind: ParseErrorKind },

    /// Invalid settings file
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// What went wrong during a decode
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// Input ended while a section still expected lines
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: &'static str },

    /// Wrong number of columns or a column that does not parse
    #[error("malformed {section} line {text:?}: {reason}")]
    MalformedLine {
        section: &'static str,
        text: String,
        reason: String,
    },

    /// Not a section keyword, or `VER` was not the first keyword
    #[error("unknown keyword {keyword:?}{hint}")]
    UnknownKeyword { keyword: String, hint: &'static str },

    /// Declared version is newer than this reader supports
    #[error("unsupported format version {found} (maximum supported is {max})")]
    UnsupportedVersion { found: u32, max: u32 },

    /// Sum of the stack block sizes differs from the declared total
    #[error("{section}: declared {declared} entries but cone blocks sum to {sum}")]
    CountMismatch {
        section: &'static str,
        declared: i64,
        sum: i64,
    },

    /// A coordinate index outside the range declared by an earlier section
    #[error("{section}: {violation}")]
    IndexOutOfRange {
        section: &'static str,
        violation: BoundsViolation,
    },

    /// A mandatory section never appeared
    #[error("missing required section {0}")]
    MissingRequiredSection(&'static str),

    /// Cone or objective-sense token without a mapping
    #[error(transparent)]
    UnrecognizedToken(#[from] UnknownToken),
}

impl CbfError {
    pub(crate) fn parse(line: u64, kind: ParseErrorKind) -> Self {
        CbfError::Parse { line, kind }
    }

    pub(crate) fn open(path: &std::path::Path, source: std::io::Error) -> Self {
        CbfError::Open {
            path: path.display().to_string(),
            source,
        }
    }

    /// Line at which decoding stopped, for parse errors
    pub fn line(&self) -> Option<u64> {
        match self {
            CbfError::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The parse error kind, if this is a parse error
    pub fn kind(&self) -> Option<&ParseErrorKind> {
        match self {
            CbfError::Parse { kind, .. } => Some(kind),
            _ => None,
        }
    }
}

impl ParseErrorKind {
    /// Stable short code used in diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::UnexpectedEndOfInput { .. } => "E0002",
            ParseErrorKind::MalformedLine { .. } => "E0003",
            ParseErrorKind::UnknownKeyword { .. } => "E0004",
            ParseErrorKind::UnsupportedVersion { .. } => "E0005",
            ParseErrorKind::CountMismatch { .. } => "E0006",
            ParseErrorKind::IndexOutOfRange { .. } => "E0007",
            ParseErrorKind::MissingRequiredSection(_) => "E0008",
            ParseErrorKind::UnrecognizedToken(_) => "E0009",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display_has_line() {
        let err = CbfError::parse(
            12,
            ParseErrorKind::UnsupportedVersion { found: 9, max: 2 },
        );
        assert_eq!(err.line(), Some(12));
        assert_eq!(
            err.to_string(),
            "line 12: unsupported format version 9 (maximum supported is 2)"
        );
    }

    #[test]
    fn test_io_error_has_no_line() {
        let err = CbfError::from(std::io::Error::other("disk full"));
        assert_eq!(err.line(), None);
        assert!(err.kind().is_none());
    }

    #[test]
    fn test_token_error_is_transparent() {
        let token_err = "XYZ".parse::<cbfkit_ast::Cone>().unwrap_err();
        let kind = ParseErrorKind::from(token_err);
        assert_eq!(kind.to_string(), "unrecognized cone token: \"XYZ\"");
        assert_eq!(kind.code(), "E0009");
    }
}
