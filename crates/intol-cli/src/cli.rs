use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use intol_merge::EngineKind;

#[derive(Parser)]
#[command(
    name = "intolmerge",
    about = "Three-way merge that treats indentation and content as separate changes",
    version,
)]
pub struct Cli {
    /// Common ancestor of LEFT and RIGHT
    pub base: PathBuf,
    /// Our version
    pub left: PathBuf,
    /// Their version
    pub right: PathBuf,

    #[arg(short, long)]
    pub verbose: bool,

    /// TOML file with `indent`, `engine` and `diff3_program`
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub engine: Option<EngineArg>,

    /// diff3 executable
    #[arg(long = "diff3", value_name = "PROGRAM")]
    pub diff3_program: Option<PathBuf>,

    /// Indent with N spaces per level
    #[arg(
        long,
        value_name = "N",
        conflicts_with = "indent_tabs",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub indent_spaces: Option<u16>,

    /// Indent with one tab per level
    #[arg(long)]
    pub indent_tabs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EngineArg {
    /// External `diff3 -m`
    Diff3,
    /// In-process merge
    Builtin,
}

impl From<EngineArg> for EngineKind {
    fn from(arg: EngineArg) -> Self {
        match arg {
            EngineArg::Diff3 => EngineKind::Diff3,
            EngineArg::Builtin => EngineKind::Builtin,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_positionals() {
        let cli = Cli::try_parse_from(["intolmerge", "base.rb", "ours.rb", "theirs.rb"]).unwrap();
        assert_eq!(cli.base, PathBuf::from("base.rb"));
        assert_eq!(cli.left, PathBuf::from("ours.rb"));
        assert_eq!(cli.right, PathBuf::from("theirs.rb"));
        assert!(!cli.verbose);
        assert!(cli.engine.is_none());
    }

    #[test]
    fn missing_positional_is_rejected() {
        assert!(Cli::try_parse_from(["intolmerge", "base", "ours"]).is_err());
    }

    #[test]
    fn parse_engine() {
        let cli = Cli::try_parse_from(["intolmerge", "--engine", "builtin", "b", "l", "r"]).unwrap();
        assert_eq!(cli.engine, Some(EngineArg::Builtin));
        assert_eq!(EngineKind::from(EngineArg::Builtin), EngineKind::Builtin);
    }

    #[test]
    fn parse_diff3_program() {
        let cli = Cli::try_parse_from(["intolmerge", "--diff3", "/opt/diff3", "b", "l", "r"]).unwrap();
        assert_eq!(cli.diff3_program, Some(PathBuf::from("/opt/diff3")));
    }

    #[test]
    fn parse_indent_spaces() {
        let cli = Cli::try_parse_from(["intolmerge", "--indent-spaces", "4", "b", "l", "r"]).unwrap();
        assert_eq!(cli.indent_spaces, Some(4));
    }

    #[test]
    fn zero_indent_spaces_is_rejected() {
        assert!(Cli::try_parse_from(["intolmerge", "--indent-spaces", "0", "b", "l", "r"]).is_err());
    }

    #[test]
    fn indent_options_conflict() {
        assert!(Cli::try_parse_from([
            "intolmerge",
            "--indent-spaces",
            "2",
            "--indent-tabs",
            "b",
            "l",
            "r"
        ])
        .is_err());
    }

    #[test]
    fn parse_verbose_and_config() {
        let cli = Cli::try_parse_from(["intolmerge", "-v", "--config", "m.toml", "b", "l", "r"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.config, Some(PathBuf::from("m.toml")));
    }
}
