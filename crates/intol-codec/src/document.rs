//! Plain-text documents.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// An ordered sequence of text lines without their terminators.
///
/// Text is split on `\n` only. A `\r` before the newline stays part of the
/// line, so CRLF input comes back out unchanged. A missing final newline is
/// not remembered: every line is written back with a trailing `\n`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Document {
    lines: Vec<String>,
}

impl Document {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(split_lines(text))
    }

    /// Read a UTF-8 text file.
    pub fn read(path: &Path) -> io::Result<Self> {
        Ok(Self::from_text(&fs::read_to_string(path)?))
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for line in &self.lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()
    }
}

impl<S: Into<String>> FromIterator<S> for Document {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

/// Split text into lines on `\n`, dropping the terminators.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split_terminator('\n').map(str::to_owned).collect()
}

/// Read a text file as lines.
pub fn read_lines(path: &Path) -> io::Result<Vec<String>> {
    Ok(split_lines(&fs::read_to_string(path)?))
}
