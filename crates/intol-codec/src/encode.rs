//! Document -> encoded records.

use crate::document::Document;
use crate::indent::IndentUnit;
use crate::record::{EncodedDocument, EncodedRecord};

/// Encode every line as `(depth - previous depth, remainder)`.
///
/// The depth before the first line is 0. The output has exactly one record
/// per input line, in order. Remainders are not escaped, so content that
/// itself looks like `t: 1` is carried as-is.
pub fn encode(document: &Document, indent: &IndentUnit) -> EncodedDocument {
    let (records, _) = document.lines().iter().fold(
        (Vec::with_capacity(document.len()), 0usize),
        |(mut records, previous_depth), text| {
            let line = indent.split(text);
            let delta = line.depth as i64 - previous_depth as i64;
            records.push(EncodedRecord::new(delta, line.remainder));
            (records, line.depth)
        },
    );
    EncodedDocument::new(records)
}
