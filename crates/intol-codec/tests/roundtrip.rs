//! Property tests for the encode/decode pair.

use intol_codec::{decode, encode, Document, IndentUnit};
use proptest::prelude::*;

/// A line as (depth, remainder); the remainder never starts with a tab.
fn line() -> impl Strategy<Value = (usize, String)> {
    (0usize..6, "([^\t\n][^\n]{0,12})?")
}

fn document(lines: &[(usize, String)]) -> Document {
    lines
        .iter()
        .map(|(depth, rest)| format!("{}{rest}", "\t".repeat(*depth)))
        .collect()
}

proptest! {
    #[test]
    fn decode_inverts_encode(lines in prop::collection::vec(line(), 0..40)) {
        let unit = IndentUnit::tab();
        let original = document(&lines);
        let encoded = encode(&original, &unit);
        prop_assert_eq!(encoded.len(), original.len());

        let decoded = decode(encoded.to_lines(), &unit).unwrap();
        prop_assert_eq!(decoded.document, original);
        prop_assert_eq!(decoded.conflicts, 0);
    }

    #[test]
    fn depth_equals_prefix_sum_of_deltas(lines in prop::collection::vec(line(), 1..40)) {
        let unit = IndentUnit::tab();
        let encoded = encode(&document(&lines), &unit);

        let mut sum = 0i64;
        for (record, (depth, _)) in encoded.records().iter().zip(&lines) {
            sum += record.delta;
            prop_assert_eq!(sum, *depth as i64);
        }
    }

    #[test]
    fn round_trip_with_space_unit(lines in prop::collection::vec((0usize..4, "([^ \n][^\n]{0,8})?"), 0..20)) {
        let unit = IndentUnit::spaces(4).unwrap();
        let original: Document = lines
            .iter()
            .map(|(depth, rest)| format!("{}{rest}", unit.indentation(*depth)))
            .collect();
        let decoded = decode(encode(&original, &unit).to_lines(), &unit).unwrap();
        prop_assert_eq!(decoded.document, original);
    }
}

#[test]
fn round_trip_keeps_blank_and_indent_only_lines() {
    let unit = IndentUnit::tab();
    let original = Document::from_text("a\n\n\t\t\n\tb\r\n");
    let decoded = decode(encode(&original, &unit).to_lines(), &unit).unwrap();
    assert_eq!(decoded.document, original);
}

#[test]
fn encoded_text_matches_reference_format() {
    let unit = IndentUnit::tab();
    let mut out = Vec::new();
    encode(&Document::from_text("a\n\tb\n\t\tc\nd\n"), &unit)
        .write_to(&mut out)
        .unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "t: 0\nc: a\nt: 1\nc: b\nt: 1\nc: c\nt: -2\nc: d\n"
    );
}
