//! The encoded record format.
//!
//! On disk a record is two lines:
//!
//! ```text
//! t: -1
//! c: return x;
//! ```
//!
//! There is no header, footer or escaping. A merge engine may interleave
//! its own conflict delimiters; those are recognized by [`ConflictMarker`]
//! and can never be mistaken for a record line because every record line
//! starts with `t: ` or `c: `.

use std::fmt;
use std::io::{self, Write};

/// Prefix of the delta line of a record.
pub const DELTA_PREFIX: &str = "t: ";
/// Prefix of the content line of a record.
pub const CONTENT_PREFIX: &str = "c: ";

/// One encoded line: depth change relative to the previous line, plus the
/// unindented content.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedRecord {
    pub delta: i64,
    pub remainder: String,
}

impl EncodedRecord {
    pub fn new(delta: i64, remainder: impl Into<String>) -> Self {
        Self {
            delta,
            remainder: remainder.into(),
        }
    }

    pub fn delta_line(&self) -> String {
        format!("{DELTA_PREFIX}{}", self.delta)
    }

    pub fn content_line(&self) -> String {
        format!("{CONTENT_PREFIX}{}", self.remainder)
    }
}

impl fmt::Display for EncodedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{DELTA_PREFIX}{}\n{CONTENT_PREFIX}{}",
            self.delta, self.remainder
        )
    }
}

/// An encoded document: one record per source line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EncodedDocument {
    records: Vec<EncodedRecord>,
}

impl EncodedDocument {
    pub fn new(records: Vec<EncodedRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[EncodedRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The flat line sequence: delta, content, delta, content, ...
    pub fn to_lines(&self) -> Vec<String> {
        self.records
            .iter()
            .flat_map(|r| [r.delta_line(), r.content_line()])
            .collect()
    }

    /// Write every record, each line terminated by `\n`.
    pub fn write_to<W: Write>(&self, mut writer: W) -> io::Result<()> {
        for record in &self.records {
            writeln!(writer, "{record}")?;
        }
        writer.flush()
    }
}

/// Delimiter lines emitted by a three-way merge engine in `diff3 -m`
/// layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictMarker {
    /// `<<<<<<<`: start of a block, the "ours" (left) variant follows.
    Start,
    /// `|||||||`: the common ancestor variant follows.
    Base,
    /// `=======`: the "theirs" (right) variant follows.
    Separator,
    /// `>>>>>>>`: end of the block.
    End,
}

impl ConflictMarker {
    pub const fn delimiter(self) -> &'static str {
        match self {
            Self::Start => "<<<<<<<",
            Self::Base => "|||||||",
            Self::Separator => "=======",
            Self::End => ">>>>>>>",
        }
    }

    /// Recognize a delimiter, optionally followed by a space and a label.
    pub fn parse(line: &str) -> Option<Self> {
        let marker = match line.as_bytes().first()? {
            b'<' => Self::Start,
            b'|' => Self::Base,
            b'=' => Self::Separator,
            b'>' => Self::End,
            _ => return None,
        };
        let rest = line.strip_prefix(marker.delimiter())?;
        (rest.is_empty() || rest.starts_with(' ')).then_some(marker)
    }

    /// Render the delimiter with an optional label.
    pub fn render(self, label: Option<&str>) -> String {
        match label {
            Some(label) if !label.is_empty() => format!("{} {label}", self.delimiter()),
            _ => self.delimiter().to_string(),
        }
    }
}

/// Classification of one line of an encoded (possibly merged) stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EncodedLine<'a> {
    Delta(i64),
    Content(&'a str),
    Marker(ConflictMarker),
    Unrecognized(&'a str),
}

impl<'a> EncodedLine<'a> {
    pub fn parse(line: &'a str) -> Self {
        if let Some(delta) = parse_delta(line) {
            Self::Delta(delta)
        } else if let Some(content) = parse_content(line) {
            Self::Content(content)
        } else if let Some(marker) = ConflictMarker::parse(line) {
            Self::Marker(marker)
        } else {
            Self::Unrecognized(line)
        }
    }
}

/// Parse `t: <signed integer>`.
///
/// The payload is an optional `-` followed by ASCII digits and nothing
/// else; `+5`, ` 5` and values outside `i64` are rejected.
pub fn parse_delta(line: &str) -> Option<i64> {
    let payload = line.strip_prefix(DELTA_PREFIX)?;
    let digits = payload.strip_prefix('-').unwrap_or(payload);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    payload.parse().ok()
}

/// Parse `c: <content>`. The content is everything after the prefix.
pub fn parse_content(line: &str) -> Option<&str> {
    line.strip_prefix(CONTENT_PREFIX)
}
