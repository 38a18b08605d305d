//! Error types emitted by the poimatch CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>`.

use std::sync::Arc;

use poimatch_data::overpass::{ClientBuildError, FetchError};
use thiserror::Error;

/// Errors emitted by the poimatch CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A `--filter` value was not of the form `key=value`.
    #[error("invalid filter {raw:?}: expected key=value")]
    InvalidFilter { raw: String },
    /// The search radius was not a positive, finite number of metres.
    #[error("invalid radius {radius}: expected a positive number of metres")]
    InvalidRadius { radius: f64 },
    /// Constructing the Overpass client failed.
    #[error("failed to build Overpass client: {0}")]
    BuildClient(#[source] ClientBuildError),
    /// Constructing the async runtime failed.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Fetching candidates failed.
    #[error("failed to fetch candidates: {0}")]
    Fetch(#[from] FetchError),
    /// Serialising the resolution outcome failed.
    #[error("failed to serialise resolution output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing the resolution outcome failed.
    #[error("failed to write resolution output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
