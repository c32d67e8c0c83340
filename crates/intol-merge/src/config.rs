use std::fs;
use std::path::{Path, PathBuf};

use intol_codec::IndentUnit;
use serde::{Deserialize, Serialize};

use crate::builtin::BuiltinMerger;
use crate::diff3::Diff3Merger;
use crate::error::ConfigError;
use crate::merger::LineMerger;

/// Which three-way line merger to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// External `diff3 -m` process.
    #[default]
    Diff3,
    /// In-process merge, no external program needed.
    Builtin,
}

/// Settings for a merge run.
///
/// Every key is optional in TOML; missing keys keep their defaults and
/// unknown keys are rejected:
///
/// ```toml
/// indent = "    "
/// engine = "builtin"
/// diff3_program = "/usr/local/bin/diff3"
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MergeConfig {
    /// One level of indentation.
    pub indent: IndentUnit,
    pub engine: EngineKind,
    /// Program run for [`EngineKind::Diff3`]. Looked up on `PATH` when not
    /// absolute.
    pub diff3_program: PathBuf,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            indent: IndentUnit::tab(),
            engine: EngineKind::default(),
            diff3_program: PathBuf::from("diff3"),
        }
    }
}

impl MergeConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Build the configured merger.
    pub fn merger(&self) -> Box<dyn LineMerger> {
        match self.engine {
            EngineKind::Diff3 => Box::new(Diff3Merger::new(&self.diff3_program)),
            EngineKind::Builtin => Box::new(BuiltinMerger),
        }
    }
}
