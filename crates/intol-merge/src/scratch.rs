//! Scoped temporary storage for one merge.

use std::io;
use std::path::Path;

use tempfile::{Builder, NamedTempFile, TempDir};

/// A private temp directory holding the five working files of a merge.
///
/// Dropping the value removes the files and the directory, whichever way
/// the merge ends. Fields drop in declaration order, so the files go before
/// the directory that contains them.
#[derive(Debug)]
pub struct ScratchSpace {
    pub encoded_base: NamedTempFile,
    pub encoded_left: NamedTempFile,
    pub encoded_right: NamedTempFile,
    /// Raw merge engine output.
    pub encoded_result: NamedTempFile,
    /// Decoded merge result, streamed to the caller.
    pub result: NamedTempFile,
    dir: TempDir,
}

impl ScratchSpace {
    /// Create the directory and files. Every file name ends with
    /// `extension` (for example `".rb"`, or `""`).
    pub fn new(extension: &str) -> io::Result<Self> {
        let dir = Builder::new().prefix("intolmerge").tempdir()?;
        let file = |prefix: &str| {
            Builder::new()
                .prefix(prefix)
                .suffix(extension)
                .tempfile_in(dir.path())
        };
        Ok(Self {
            encoded_base: file("parsed_base")?,
            encoded_left: file("parsed_left")?,
            encoded_right: file("parsed_right")?,
            encoded_result: file("parsed_output")?,
            result: file("output")?,
            dir,
        })
    }

    /// Create files named after the extension of `path`.
    pub fn for_input(path: &Path) -> io::Result<Self> {
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        Self::new(&extension)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}
