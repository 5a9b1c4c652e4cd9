use std::process::ExitCode;

use clap::Parser;
use getargv::cli::{self, Cli};

fn main() -> ExitCode {
    if !getargv::logging::init_tracing() {
        eprintln!("Warning: tracing subscriber already installed");
    }
    let args = Cli::parse();

    match cli::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "getargv failed");
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
