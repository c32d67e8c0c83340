//! In-process three-way line merge.
//!
//! Uses the `similar` crate (Myers diff algorithm) to align base with each
//! side, then walks the base looking for stable lines (matched on both
//! sides) and resolves the unstable chunks between them.

use intol_codec::ConflictMarker;
use similar::{capture_diff_slices, Algorithm, DiffOp};

use crate::error::MergeResult;
use crate::merger::{LineMerger, MergeInput, MergedLines};

/// diff3-style merge without an external process.
///
/// A chunk changed on one side only takes that side. A chunk changed
/// identically on both sides is taken once. Anything else becomes a
/// conflict block in `diff3 -m` layout, base section included.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuiltinMerger;

impl LineMerger for BuiltinMerger {
    fn name(&self) -> &str {
        "builtin"
    }

    fn merge(
        &self,
        left: &MergeInput<'_>,
        base: &MergeInput<'_>,
        right: &MergeInput<'_>,
    ) -> MergeResult<MergedLines> {
        Ok(merge_lines(left, base, right))
    }
}

/// For each base line, the index of the line it is aligned with in `side`.
fn alignment(base: &[String], side: &[String]) -> Vec<Option<usize>> {
    let mut aligned = vec![None; base.len()];
    for op in capture_diff_slices(Algorithm::Myers, base, side) {
        if let DiffOp::Equal {
            old_index,
            new_index,
            len,
        } = op
        {
            for k in 0..len {
                aligned[old_index + k] = Some(new_index + k);
            }
        }
    }
    aligned
}

fn merge_lines(left: &MergeInput<'_>, base: &MergeInput<'_>, right: &MergeInput<'_>) -> MergedLines {
    let to_left = alignment(base.lines, left.lines);
    let to_right = alignment(base.lines, right.lines);

    let mut merged = MergedLines::default();
    let (mut b, mut l, mut r) = (0, 0, 0);
    loop {
        let stable = (b..base.lines.len())
            .find_map(|i| Some((i, to_left[i]?, to_right[i]?)));
        match stable {
            Some((i, li, ri)) if (i, li, ri) == (b, l, r) => {
                merged.lines.push(base.lines[i].clone());
                (b, l, r) = (b + 1, l + 1, r + 1);
            }
            Some((i, li, ri)) => {
                resolve(
                    &mut merged,
                    (left.label, &left.lines[l..li]),
                    (base.label, &base.lines[b..i]),
                    (right.label, &right.lines[r..ri]),
                );
                (b, l, r) = (i, li, ri);
            }
            None => {
                resolve(
                    &mut merged,
                    (left.label, &left.lines[l..]),
                    (base.label, &base.lines[b..]),
                    (right.label, &right.lines[r..]),
                );
                return merged;
            }
        }
    }
}

type Chunk<'a> = (&'a str, &'a [String]);

fn resolve(merged: &mut MergedLines, left: Chunk<'_>, base: Chunk<'_>, right: Chunk<'_>) {
    let ((left_label, ours), (base_label, ancestor), (right_label, theirs)) = (left, base, right);
    if ours == theirs || theirs == ancestor {
        merged.lines.extend_from_slice(ours);
    } else if ours == ancestor {
        merged.lines.extend_from_slice(theirs);
    } else {
        merged.conflicted = true;
        merged.lines.push(ConflictMarker::Start.render(Some(left_label)));
        merged.lines.extend_from_slice(ours);
        merged.lines.push(ConflictMarker::Base.render(Some(base_label)));
        merged.lines.extend_from_slice(ancestor);
        merged.lines.push(ConflictMarker::Separator.render(None));
        merged.lines.extend_from_slice(theirs);
        merged.lines.push(ConflictMarker::End.render(Some(right_label)));
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn lines(text: &[&str]) -> Vec<String> {
        text.iter().map(|s| s.to_string()).collect()
    }

    fn input<'a>(label: &'a str, lines: &'a [String]) -> MergeInput<'a> {
        MergeInput {
            label,
            path: Path::new("/unused"),
            lines,
        }
    }

    fn run(left: &[&str], base: &[&str], right: &[&str]) -> MergedLines {
        let (left, base, right) = (lines(left), lines(base), lines(right));
        BuiltinMerger
            .merge(&input("L", &left), &input("B", &base), &input("R", &right))
            .unwrap()
    }

    #[test]
    fn identical_inputs_merge_to_themselves() {
        let merged = run(&["a", "b"], &["a", "b"], &["a", "b"]);
        assert_eq!(merged.lines, vec!["a", "b"]);
        assert!(!merged.conflicted);
    }

    #[test]
    fn one_sided_changes_are_taken() {
        let merged = run(&["a", "B", "c"], &["a", "b", "c"], &["a", "b", "c", "d"]);
        assert_eq!(merged.lines, vec!["a", "B", "c", "d"]);
        assert!(!merged.conflicted);
    }

    #[test]
    fn deletion_on_one_side() {
        let merged = run(&["a", "c"], &["a", "b", "c"], &["a", "b", "c"]);
        assert_eq!(merged.lines, vec!["a", "c"]);
    }

    #[test]
    fn identical_change_on_both_sides_is_taken_once() {
        let merged = run(&["a", "x"], &["a", "b"], &["a", "x"]);
        assert_eq!(merged.lines, vec!["a", "x"]);
        assert!(!merged.conflicted);
    }

    #[test]
    fn overlapping_changes_conflict() {
        let merged = run(&["y"], &["x"], &["z"]);
        assert!(merged.conflicted);
        assert_eq!(
            merged.lines,
            vec!["<<<<<<< L", "y", "||||||| B", "x", "=======", "z", ">>>>>>> R"]
        );
    }

    #[test]
    fn conflict_is_confined_to_the_changed_region() {
        let merged = run(&["a", "y", "c"], &["a", "x", "c"], &["a", "z", "c"]);
        assert_eq!(
            merged.lines,
            vec!["a", "<<<<<<< L", "y", "||||||| B", "x", "=======", "z", ">>>>>>> R", "c"]
        );
    }

    #[test]
    fn empty_base() {
        let merged = run(&["a"], &[], &[]);
        assert_eq!(merged.lines, vec!["a"]);
        let merged = run(&["a"], &[], &["b"]);
        assert!(merged.conflicted);
    }
}
