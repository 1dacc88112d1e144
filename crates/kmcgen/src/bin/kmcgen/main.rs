use std::process::ExitCode;

mod cli;
mod commands;
mod error;
mod io;
mod logging;

fn main() -> ExitCode {
    let cli = cli::parse();

    if let Err(e) = logging::init(cli.log_level.as_deref()) {
        error::print_error(&e);
        return ExitCode::FAILURE;
    }

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error::print_error(&e);
            ExitCode::FAILURE
        }
    }
}
