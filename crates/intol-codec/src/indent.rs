//! Indentation grammar: a line is a run of indent units followed by the rest.

use serde::{Deserialize, Serialize};

use crate::error::{CodecError, CodecResult};

/// The string that stands for one level of indentation.
///
/// Exactly one unit is in effect for a document. The default is a single
/// tab.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IndentUnit(String);

impl IndentUnit {
    /// Create an indent unit, rejecting empty strings and line breaks.
    pub fn new(unit: impl Into<String>) -> CodecResult<Self> {
        let unit = unit.into();
        if unit.is_empty() || unit.contains(['\n', '\r']) {
            return Err(CodecError::InvalidIndent(unit));
        }
        Ok(Self(unit))
    }

    /// One tab per level.
    pub fn tab() -> Self {
        Self("\t".into())
    }

    /// `width` spaces per level.
    pub fn spaces(width: usize) -> CodecResult<Self> {
        Self::new(" ".repeat(width))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Split a line into its leading indent run and the remainder.
    ///
    /// Only whole units count towards the depth: with a four-space unit,
    /// six leading spaces give depth 1 and a remainder starting with two
    /// spaces.
    pub fn split<'a>(&self, text: &'a str) -> Line<'a> {
        let mut depth = 0;
        let mut rest = text;
        while let Some(stripped) = rest.strip_prefix(self.0.as_str()) {
            depth += 1;
            rest = stripped;
        }
        Line {
            depth,
            remainder: rest,
        }
    }

    /// Render `depth` units.
    pub fn indentation(&self, depth: usize) -> String {
        self.0.repeat(depth)
    }
}

impl Default for IndentUnit {
    fn default() -> Self {
        Self::tab()
    }
}

impl TryFrom<String> for IndentUnit {
    type Error = CodecError;

    fn try_from(value: String) -> CodecResult<Self> {
        Self::new(value)
    }
}

impl From<IndentUnit> for String {
    fn from(unit: IndentUnit) -> Self {
        unit.0
    }
}

/// One source line decomposed by an [`IndentUnit`].
///
/// `remainder` never starts with the indent unit. It may be empty for blank
/// or indentation-only lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Line<'a> {
    pub depth: usize,
    pub remainder: &'a str,
}

impl Line<'_> {
    /// Reassemble the line text.
    pub fn render(&self, unit: &IndentUnit) -> String {
        let mut text = unit.indentation(self.depth);
        text.push_str(self.remainder);
        text
    }
}
