//! Error types for the merge crate.

use std::io;
use std::path::PathBuf;

use intol_codec::FormatError;

/// Errors that can occur during a merge. All of them end the merge.
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    /// One or more inputs do not exist or are not regular files.
    #[error("{}", missing_message(.0))]
    MissingFiles(Vec<PathBuf>),

    /// An input could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    /// The merged encoding is malformed.
    #[error("{}: {source}", path.display())]
    Decode { path: PathBuf, source: FormatError },

    /// The merge engine could not be started.
    #[error("failed to run merge engine {}: {source}", program.display())]
    EngineSpawn { program: PathBuf, source: io::Error },

    /// The merge engine exited with a status other than clean or conflicted.
    #[error("merge engine {} failed ({status}): {stderr}", program.display())]
    EngineFailed {
        program: PathBuf,
        status: String,
        stderr: String,
    },

    /// I/O on the scratch files or the output failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience alias for merge results.
pub type MergeResult<T> = Result<T, MergeError>;

/// Errors loading a [`MergeConfig`](crate::MergeConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

fn missing_message(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("could not find {}", path.display()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_files_lists_every_path() {
        let err = MergeError::MissingFiles(vec!["/a/base.rb".into(), "/a/right.rb".into()]);
        assert_eq!(
            err.to_string(),
            "could not find /a/base.rb\ncould not find /a/right.rb"
        );
    }

    #[test]
    fn decode_error_names_the_file() {
        let source = intol_codec::decode(["t: x"], &intol_codec::IndentUnit::tab()).unwrap_err();
        let err = MergeError::Decode {
            path: "/tmp/merged.rb".into(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "/tmp/merged.rb: line 1: invalid delta record: \"t: x\""
        );
    }
}
