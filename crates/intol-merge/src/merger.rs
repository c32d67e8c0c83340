use std::path::Path;

use crate::error::MergeResult;

/// One side of a three-way merge, already encoded.
///
/// Engines that work in memory read `lines`; engines that run an external
/// program read `path`, which holds the same lines on disk.
#[derive(Clone, Copy, Debug)]
pub struct MergeInput<'a> {
    /// Name shown next to this side's conflict delimiters.
    pub label: &'a str,
    pub path: &'a Path,
    pub lines: &'a [String],
}

/// Output of a three-way line merge.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MergedLines {
    pub lines: Vec<String>,
    /// Whether the engine left conflict blocks in `lines`.
    pub conflicted: bool,
}

/// Three-way line merge capability.
///
/// Implementations must:
/// - Treat `left` and `right` as the divergent variants and `base` as their
///   common ancestor.
/// - Emit every conflict inline in `diff3 -m` layout (`<<<<<<<`, optional
///   `|||||||`, `=======`, `>>>>>>>`), never fail because of a conflict.
/// - Return `Err` only when the merge itself could not be carried out.
pub trait LineMerger: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    fn merge(
        &self,
        left: &MergeInput<'_>,
        base: &MergeInput<'_>,
        right: &MergeInput<'_>,
    ) -> MergeResult<MergedLines>;
}

impl<M: LineMerger + ?Sized> LineMerger for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn merge(
        &self,
        left: &MergeInput<'_>,
        base: &MergeInput<'_>,
        right: &MergeInput<'_>,
    ) -> MergeResult<MergedLines> {
        (**self).merge(left, base, right)
    }
}
