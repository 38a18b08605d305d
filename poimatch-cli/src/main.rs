//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use poimatch_cli::CliError;

fn main() {
    match poimatch_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("poimatch: {err}");
            std::process::exit(1);
        }
    }
}
