use std::io::{self, BufWriter};

use anyhow::Context;
use intol_codec::IndentUnit;
use intol_merge::{MergeConfig, Orchestrator};
use tracing::{debug, info};

use crate::cli::Cli;

pub fn run(cli: Cli) -> anyhow::Result<()> {
    let config = resolve_config(&cli)?;
    let orchestrator = Orchestrator::from_config(&config);
    debug!(
        engine = orchestrator.merger().name(),
        indent = ?orchestrator.indent().as_str(),
        "resolved configuration"
    );

    let stdout = io::stdout();
    let report = orchestrator.merge(
        &cli.base,
        &cli.left,
        &cli.right,
        BufWriter::new(stdout.lock()),
    )?;
    info!(
        lines = report.lines,
        conflicts = report.conflicts,
        "merge complete"
    );
    Ok(())
}

/// Defaults, then the config file, then command-line flags.
pub fn resolve_config(cli: &Cli) -> anyhow::Result<MergeConfig> {
    let mut config = match &cli.config {
        Some(path) => MergeConfig::load(path)
            .with_context(|| format!("while loading {}", path.display()))?,
        None => MergeConfig::default(),
    };
    if let Some(engine) = cli.engine {
        config.engine = engine.into();
    }
    if let Some(program) = &cli.diff3_program {
        config.diff3_program = program.clone();
    }
    if let Some(width) = cli.indent_spaces {
        config.indent = IndentUnit::spaces(usize::from(width))?;
    } else if cli.indent_tabs {
        config.indent = IndentUnit::tab();
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use clap::Parser;
    use intol_merge::EngineKind;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(["intolmerge"].iter().chain(args).chain(&["b", "l", "r"])).unwrap()
    }

    #[test]
    fn defaults_without_flags() {
        assert_eq!(resolve_config(&parse(&[])).unwrap(), MergeConfig::default());
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve_config(&parse(&[
            "--engine",
            "builtin",
            "--diff3",
            "/opt/diff3",
            "--indent-spaces",
            "2",
        ]))
        .unwrap();
        assert_eq!(config.engine, EngineKind::Builtin);
        assert_eq!(config.diff3_program, PathBuf::from("/opt/diff3"));
        assert_eq!(config.indent.as_str(), "  ");
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("intolmerge.toml");
        fs::write(&path, "indent = \"    \"\nengine = \"builtin\"\n").unwrap();
        let path = path.to_str().unwrap();

        let config = resolve_config(&parse(&["--config", path])).unwrap();
        assert_eq!(config.indent.as_str(), "    ");
        assert_eq!(config.engine, EngineKind::Builtin);

        let config = resolve_config(&parse(&["--config", path, "--indent-tabs"])).unwrap();
        assert_eq!(config.indent, IndentUnit::tab());
        assert_eq!(config.engine, EngineKind::Builtin);
    }

    #[test]
    fn unreadable_config_is_an_error() {
        let err = resolve_config(&parse(&["--config", "/nonexistent/intolmerge.toml"])).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/intolmerge.toml"));
    }
}
