//! Error types for the codec crate.

use std::fmt;

/// Errors that can occur while encoding or decoding.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The encoded stream does not follow the record grammar.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The configured indent unit cannot be used.
    #[error("invalid indent unit {0:?}: must be non-empty and contain no line breaks")]
    InvalidIndent(String),
}

/// Convenience alias for codec results.
pub type CodecResult<T> = Result<T, CodecError>;

/// Which part of the encoded grammar was violated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// Expected `t: <signed integer>`, or the delta drove the depth below zero.
    InvalidDelta,
    /// Expected `c: <content>`, including a missing trailing content line.
    InvalidContent,
    /// A conflict delimiter appeared out of order or a block was left open.
    InvalidConflict,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDelta => f.write_str("invalid delta record"),
            Self::InvalidContent => f.write_str("invalid content record"),
            Self::InvalidConflict => f.write_str("invalid conflict block"),
        }
    }
}

/// A malformed encoded stream.
///
/// `line` is 1-based within the encoded stream. For errors detected at end
/// of input it is one past the last line.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}: {detail}")]
pub struct FormatError {
    pub kind: FormatErrorKind,
    pub line: usize,
    pub detail: String,
}

impl FormatError {
    pub(crate) fn new(kind: FormatErrorKind, line: usize, detail: impl Into<String>) -> Self {
        Self {
            kind,
            line,
            detail: detail.into(),
        }
    }

    /// A line that failed to parse; the detail is the quoted text.
    pub(crate) fn unparsed(kind: FormatErrorKind, line: usize, text: &str) -> Self {
        Self::new(kind, line, format!("{text:?}"))
    }
}
