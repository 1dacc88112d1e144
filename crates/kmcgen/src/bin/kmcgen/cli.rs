use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "kmcgen",
    about = "Compile lattice kinetic Monte Carlo models into Fortran kernels",
    version,
    propagate_version = true
)]
pub struct Cli {
    /// Log filter, e.g. `info` or `kmcgen_compiler=debug` (default: RUST_LOG, then `warn`)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compile a model and write the lattice and process-list sources
    #[command(visible_alias = "b")]
    Build(BuildArgs),

    /// Load, validate and compile a model without writing anything
    Check(ModelArgs),

    /// Print per-procedure statistics of a compiled model
    Inspect(ModelArgs),
}

/// The model every command reads.
#[derive(Args)]
pub struct ModelArgs {
    /// Model file (JSON)
    #[arg(value_name = "MODEL")]
    pub model: PathBuf,
}

#[derive(Args)]
pub struct BuildArgs {
    #[command(flatten)]
    pub input: ModelArgs,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,

    /// Overwrite existing files without asking
    #[arg(short, long)]
    pub force: bool,

    /// File name of the lattice source
    #[arg(long, value_name = "NAME", default_value = "lattice.f90")]
    pub lattice_file: String,

    /// File name of the process-list source
    #[arg(long, value_name = "NAME", default_value = "proclist.f90")]
    pub proclist_file: String,

    /// Spaces per indentation level
    #[arg(long, value_name = "N", default_value_t = 4)]
    pub indent: usize,
}

pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn build_defaults() {
        let cli = Cli::try_parse_from(["kmcgen", "build", "model.json"]).unwrap();
        let Command::Build(args) = cli.command else {
            panic!("expected build");
        };
        assert_eq!(args.input.model, PathBuf::from("model.json"));
        assert_eq!(args.output, PathBuf::from("."));
        assert!(!args.force);
        assert_eq!(args.lattice_file, "lattice.f90");
        assert_eq!(args.proclist_file, "proclist.f90");
        assert_eq!(args.indent, 4);
    }

    #[test]
    fn log_level_is_global() {
        let cli =
            Cli::try_parse_from(["kmcgen", "inspect", "m.json", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Command::Inspect(_)));
    }
}
