//! Indentation-delta line codec.
//!
//! Splits every line of a document into two records so that a plain
//! line-based three-way merge sees indentation and content as independent
//! lines:
//!
//! ```text
//! t: <signed depth delta>
//! c: <line content without leading indentation>
//! ```
//!
//! The delta is relative to the previous line, so re-indenting a line only
//! touches its own `t:` record and editing its text only touches its `c:`
//! record.
//!
//! # Key Types
//!
//! - [`IndentUnit`] / [`Line`] -- Indentation grammar (one unit per depth level)
//! - [`Document`] -- Plain text, one entry per line
//! - [`EncodedRecord`] / [`EncodedDocument`] -- The two-line record form
//! - [`encode`] / [`decode`] -- The transform in both directions
//! - [`ConflictMarker`] -- Merge-engine delimiter lines carried through decoding

pub mod decode;
pub mod document;
pub mod encode;
pub mod error;
pub mod indent;
pub mod record;

pub use decode::{decode, Decoded, MAX_INDENT_BYTES};
pub use document::Document;
pub use encode::encode;
pub use error::{CodecError, CodecResult, FormatError, FormatErrorKind};
pub use indent::{IndentUnit, Line};
pub use record::{ConflictMarker, EncodedDocument, EncodedLine, EncodedRecord};
