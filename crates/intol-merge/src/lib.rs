//! Indentation-transparent three-way merge.
//!
//! Encodes base, left and right with [`intol_codec`], hands the encoded
//! lines to a [`LineMerger`], and decodes the merged output back into text
//! so that indentation changes and content changes on the same line merge
//! independently.
//!
//! # Key Types
//!
//! - [`Orchestrator`] -- Runs one merge end to end and streams the result
//! - [`LineMerger`] -- Three-way line merge capability
//! - [`Diff3Merger`] -- External `diff3 -m` process
//! - [`BuiltinMerger`] -- In-process diff3 built on `similar`
//! - [`MergeConfig`] -- Indent unit and engine selection, loadable from TOML
//! - [`ScratchSpace`] -- Private temp directory and the five working files

pub mod builtin;
pub mod config;
pub mod diff3;
pub mod error;
pub mod merger;
pub mod orchestrator;
pub mod scratch;

pub use builtin::BuiltinMerger;
pub use config::{EngineKind, MergeConfig};
pub use diff3::Diff3Merger;
pub use error::{ConfigError, MergeError, MergeResult};
pub use merger::{LineMerger, MergeInput, MergedLines};
pub use orchestrator::{resolve_inputs, MergeReport, Orchestrator};
pub use scratch::ScratchSpace;
