//! External `diff3` merge engine.

use std::io;
use std::path::PathBuf;
use std::process::Command;

use intol_codec::document::split_lines;
use tracing::debug;

use crate::error::{MergeError, MergeResult};
use crate::merger::{LineMerger, MergeInput, MergedLines};

/// Runs `diff3 -m` on the encoded files and captures its standard output.
///
/// GNU `diff3` exits with 0 for a clean merge, 1 when conflicts were
/// written, and 2 on trouble. Anything but 0 or 1 is an error.
#[derive(Clone, Debug)]
pub struct Diff3Merger {
    program: PathBuf,
}

impl Diff3Merger {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, left: &MergeInput<'_>, base: &MergeInput<'_>, right: &MergeInput<'_>) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("-m")
            .args(["-L", left.label, "-L", base.label, "-L", right.label])
            .arg("--")
            .arg(left.path)
            .arg(base.path)
            .arg(right.path);
        command
    }
}

impl Default for Diff3Merger {
    fn default() -> Self {
        Self::new("diff3")
    }
}

impl LineMerger for Diff3Merger {
    fn name(&self) -> &str {
        "diff3"
    }

    fn merge(
        &self,
        left: &MergeInput<'_>,
        base: &MergeInput<'_>,
        right: &MergeInput<'_>,
    ) -> MergeResult<MergedLines> {
        let output = self
            .command(left, base, right)
            .output()
            .map_err(|source| MergeError::EngineSpawn {
                program: self.program.clone(),
                source,
            })?;

        let conflicted = match output.status.code() {
            Some(0) => false,
            Some(1) => true,
            _ => {
                return Err(MergeError::EngineFailed {
                    program: self.program.clone(),
                    status: output.status.to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
                })
            }
        };
        debug!(program = %self.program.display(), conflicted, "merge engine finished");

        let stdout = String::from_utf8(output.stdout)
            .map_err(|e| MergeError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        Ok(MergedLines {
            lines: split_lines(&stdout),
            conflicted,
        })
    }
}
