//! Command-line interface for checking POIs against OpenStreetMap.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod error;
mod resolve;

pub use error::CliError;

const ARG_LAT: &str = "lat";
const ARG_LON: &str = "lon";
const ARG_NAME: &str = "name";
const ARG_FILTER: &str = "filter";
const ARG_RADIUS: &str = "radius";
const ARG_ENDPOINT: &str = "endpoint";
const ARG_ATTEMPTS: &str = "attempts";
const ENV_LAT: &str = "POIMATCH_CMDS_RESOLVE_LAT";
const ENV_LON: &str = "POIMATCH_CMDS_RESOLVE_LON";
const ENV_FILTER: &str = "POIMATCH_CMDS_RESOLVE_FILTER";

/// Run the poimatch CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when arguments or configuration are invalid, the
/// lookup fails or the result cannot be written to stdout.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Resolve(args) => resolve::run_resolve(args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "poimatch",
    about = "Check whether points of interest already exist in OpenStreetMap",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Look up one reference POI and report the matching map element.
    Resolve(resolve::ResolveArgs),
}

#[cfg(test)]
mod tests;
