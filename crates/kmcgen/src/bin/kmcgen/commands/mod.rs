mod build;
mod check;
mod inspect;

use anyhow::Result;

use crate::cli::Command;

pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Build(args) => build::run_build(args),
        Command::Check(args) => check::run_check(args),
        Command::Inspect(args) => inspect::run_inspect(args),
    }
}
