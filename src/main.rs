//! Music collection indexer CLI entry point.

use band_keeper::presentation::cli::{Cli, handle_command};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.version {
        println!("bandkeeperctl {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    match handle_command(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => ExitCode::from(code as u8),
    }
}
