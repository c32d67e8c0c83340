//! End-to-end merge: validate, encode, merge, decode, stream.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{self, Path, PathBuf};
use std::thread;

use intol_codec::document::read_lines;
use intol_codec::{decode, encode, Document, IndentUnit};
use tracing::{debug, warn};

use crate::config::MergeConfig;
use crate::error::{MergeError, MergeResult};
use crate::merger::{LineMerger, MergeInput};
use crate::scratch::ScratchSpace;

/// Summary of a finished merge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Lines written to the output.
    pub lines: usize,
    /// Conflict blocks in the output.
    pub conflicts: usize,
}

impl MergeReport {
    pub fn is_clean(&self) -> bool {
        self.conflicts == 0
    }
}

/// Runs indentation-transparent merges with one [`LineMerger`].
pub struct Orchestrator<M> {
    merger: M,
    indent: IndentUnit,
}

impl Orchestrator<Box<dyn LineMerger>> {
    pub fn from_config(config: &MergeConfig) -> Self {
        Self::new(config.merger(), config.indent.clone())
    }
}

impl<M: LineMerger> Orchestrator<M> {
    pub fn new(merger: M, indent: IndentUnit) -> Self {
        Self { merger, indent }
    }

    pub fn merger(&self) -> &M {
        &self.merger
    }

    pub fn indent(&self) -> &IndentUnit {
        &self.indent
    }

    /// Merge `left` and `right` against their common ancestor `base` and
    /// write the result to `output`.
    ///
    /// Nothing is written to `output` unless the whole merge, decoding
    /// included, succeeded. Missing inputs are detected before any
    /// temporary file is created. The scratch space is removed before this
    /// returns, on success and on error.
    pub fn merge<W: Write>(
        &self,
        base: &Path,
        left: &Path,
        right: &Path,
        output: W,
    ) -> MergeResult<MergeReport> {
        let [base_path, left_path, right_path] = resolve_inputs([base, left, right])?;
        let scratch = ScratchSpace::for_input(&base_path)?;
        debug!(dir = %scratch.path().display(), "created scratch space");

        let indent = &self.indent;
        thread::scope(|scope| {
            let jobs = [
                (&base_path, scratch.encoded_base.path()),
                (&left_path, scratch.encoded_left.path()),
                (&right_path, scratch.encoded_right.path()),
            ]
            .map(|(source, destination)| {
                scope.spawn(move || encode_file(source, destination, indent))
            });
            jobs.into_iter().try_for_each(|job| {
                job.join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
        })?;

        let labels = [base, left, right].map(|path| path.display().to_string());
        self.run_engine(&scratch, &labels)?;

        let conflicts = self.decode_result(&scratch)?;
        let lines = stream(scratch.result.path(), output)?;
        if conflicts > 0 {
            warn!(conflicts, "merge left conflicts");
        }
        Ok(MergeReport { lines, conflicts })
    }

    /// `labels` is base, left, right.
    fn run_engine(&self, scratch: &ScratchSpace, labels: &[String; 3]) -> MergeResult<()> {
        let [base_label, left_label, right_label] = labels;
        let base_lines = read_lines(scratch.encoded_base.path())?;
        let left_lines = read_lines(scratch.encoded_left.path())?;
        let right_lines = read_lines(scratch.encoded_right.path())?;
        let base = MergeInput {
            label: base_label,
            path: scratch.encoded_base.path(),
            lines: &base_lines,
        };
        let left = MergeInput {
            label: left_label,
            path: scratch.encoded_left.path(),
            lines: &left_lines,
        };
        let right = MergeInput {
            label: right_label,
            path: scratch.encoded_right.path(),
            lines: &right_lines,
        };

        debug!(engine = self.merger.name(), "running merge engine");
        let merged = self.merger.merge(&left, &base, &right)?;

        let mut writer = BufWriter::new(File::create(scratch.encoded_result.path())?);
        for line in &merged.lines {
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        debug!(
            lines = merged.lines.len(),
            conflicted = merged.conflicted,
            "captured merge engine output"
        );
        Ok(())
    }

    fn decode_result(&self, scratch: &ScratchSpace) -> MergeResult<usize> {
        let path = scratch.encoded_result.path();
        let decoded = decode(read_lines(path)?, &self.indent).map_err(|source| {
            MergeError::Decode {
                path: path.to_path_buf(),
                source,
            }
        })?;
        write_document(&decoded.document, scratch.result.path())?;
        debug!(
            lines = decoded.document.len(),
            conflicts = decoded.conflicts,
            "decoded merge result"
        );
        Ok(decoded.conflicts)
    }
}

/// Make the three paths absolute and check that each names a regular file.
///
/// Every offending path is reported, not just the first.
pub fn resolve_inputs<const N: usize>(paths: [&Path; N]) -> MergeResult<[PathBuf; N]> {
    let resolved = paths.map(|p| path::absolute(p).unwrap_or_else(|_| p.to_path_buf()));
    let missing: Vec<PathBuf> = resolved
        .iter()
        .filter(|p| !fs::metadata(p).map(|m| m.is_file()).unwrap_or(false))
        .cloned()
        .collect();
    if !missing.is_empty() {
        for path in &missing {
            warn!(path = %path.display(), "input is missing or not a regular file");
        }
        return Err(MergeError::MissingFiles(missing));
    }
    Ok(resolved)
}

fn encode_file(source: &Path, destination: &Path, indent: &IndentUnit) -> MergeResult<()> {
    let document = Document::read(source).map_err(|e| MergeError::Read {
        path: source.to_path_buf(),
        source: e,
    })?;
    let encoded = encode(&document, indent);
    encoded.write_to(BufWriter::new(File::create(destination)?))?;
    debug!(
        source = %source.display(),
        records = encoded.len(),
        "encoded input"
    );
    Ok(())
}

fn write_document(document: &Document, destination: &Path) -> MergeResult<()> {
    document.write_to(BufWriter::new(File::create(destination)?))?;
    Ok(())
}

/// Copy the lines of `path` to `output`, returning how many were written.
fn stream<W: Write>(path: &Path, mut output: W) -> MergeResult<usize> {
    let lines = read_lines(path)?;
    for line in &lines {
        writeln!(output, "{line}")?;
    }
    output.flush()?;
    Ok(lines.len())
}
