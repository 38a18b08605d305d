//! Resolve command implementation for the poimatch CLI.

use std::io::Write;

use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use poimatch_core::{MatchTier, Name, Poi, QueryFilter, Queryable, Resolver, Tags};
use poimatch_data::overpass::{
    DEFAULT_ENDPOINTS, OverpassClient, OverpassConfig, OverpassElement, RetryPolicy,
};
use poimatch_data::{CandidateSource, ElementMatch, load_matching};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_ATTEMPTS, ARG_ENDPOINT, ARG_FILTER, ARG_LAT, ARG_LON, ARG_NAME, ARG_RADIUS, CliError,
    ENV_FILTER, ENV_LAT, ENV_LON,
};

/// CLI arguments for the `resolve` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "resolve",
    long_about = "Query Overpass around a reference position and report \
                 which element, if any, already represents it. Values can \
                 come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Find the map element matching a reference POI"
)]
#[ortho_config(prefix = "POIMATCH")]
pub(crate) struct ResolveArgs {
    /// Latitude of the reference POI in degrees.
    #[arg(long = ARG_LAT, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lat: Option<f64>,
    /// Longitude of the reference POI in degrees.
    #[arg(long = ARG_LON, value_name = "degrees", allow_negative_numbers = true)]
    #[serde(default)]
    pub(crate) lon: Option<f64>,
    /// Name of the reference POI; repeat for alternative names.
    #[arg(long = ARG_NAME, value_name = "text")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) name: Vec<String>,
    /// Tag filter selecting candidates, e.g. `natural=peak`; repeatable.
    #[arg(long = ARG_FILTER, value_name = "key=value")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) filter: Vec<String>,
    /// Search radius in metres.
    #[arg(long = ARG_RADIUS, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius: Option<f64>,
    /// Overpass interpreter URL; repeat to set fallbacks in order.
    #[arg(long = ARG_ENDPOINT, value_name = "url")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) endpoint: Vec<String>,
    /// Number of passes over the endpoint list before giving up.
    #[arg(long = ARG_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) attempts: Option<u32>,
}

impl ResolveArgs {
    pub(crate) fn into_config(self) -> Result<ResolveConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ResolveConfig::try_from(merged)
    }
}

/// Resolved `resolve` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ResolveConfig {
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    pub(crate) names: Vec<String>,
    pub(crate) filters: Vec<QueryFilter>,
    pub(crate) radius: f64,
    pub(crate) endpoints: Vec<String>,
    pub(crate) attempts: u32,
}

impl ResolveConfig {
    fn overpass_config(&self) -> OverpassConfig {
        let retry = RetryPolicy {
            max_attempts: self.attempts,
            ..RetryPolicy::default()
        };
        OverpassConfig::default()
            .with_endpoints(self.endpoints.clone())
            .with_retry(retry)
    }

    fn reference(&self) -> Reference {
        Reference {
            lat: self.lat,
            lon: self.lon,
            names: self.names.iter().map(Name::default_name).collect(),
            filters: self.filters.clone(),
        }
    }
}

pub(crate) fn parse_filter(raw: &str) -> Result<QueryFilter, CliError> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok(QueryFilter::new(key.trim(), value.trim()))
        }
        _ => Err(CliError::InvalidFilter {
            raw: raw.to_owned(),
        }),
    }
}

impl TryFrom<ResolveArgs> for ResolveConfig {
    type Error = CliError;

    fn try_from(args: ResolveArgs) -> Result<Self, Self::Error> {
        let lat = args.lat.ok_or(CliError::MissingArgument {
            field: ARG_LAT,
            env: ENV_LAT,
        })?;
        let lon = args.lon.ok_or(CliError::MissingArgument {
            field: ARG_LON,
            env: ENV_LON,
        })?;
        if args.filter.is_empty() {
            return Err(CliError::MissingArgument {
                field: ARG_FILTER,
                env: ENV_FILTER,
            });
        }
        let filters = args
            .filter
            .iter()
            .map(|raw| parse_filter(raw))
            .collect::<Result<Vec<_>, _>>()?;

        let radius = args.radius.unwrap_or(Resolver::DEFAULT_RADIUS);
        if !(radius.is_finite() && radius > 0.0) {
            return Err(CliError::InvalidRadius { radius });
        }

        let endpoints = if args.endpoint.is_empty() {
            DEFAULT_ENDPOINTS.iter().map(|url| (*url).to_owned()).collect()
        } else {
            args.endpoint
        };

        Ok(Self {
            lat,
            lon,
            names: args.name,
            filters,
            radius,
            endpoints,
            attempts: args.attempts.unwrap_or(1),
        })
    }
}

/// The reference POI described on the command line.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Reference {
    lat: f64,
    lon: f64,
    names: Vec<Name>,
    filters: Vec<QueryFilter>,
}

impl Poi for Reference {
    fn latitude(&self) -> f64 {
        self.lat
    }

    fn longitude(&self) -> f64 {
        self.lon
    }

    fn names(&self) -> &[Name] {
        &self.names
    }

    fn tags(&self) -> Tags {
        self.names
            .iter()
            .map(|name| (name.key.as_tag_key().to_owned(), name.value.clone()))
            .collect()
    }
}

impl Queryable for Reference {
    fn query_filters(&self) -> Vec<QueryFilter> {
        self.filters.clone()
    }
}

/// JSON document written to stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ResolveOutput {
    pub(crate) matched: bool,
    pub(crate) tier: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) ratio: Option<f64>,
    pub(crate) element: Option<OverpassElement>,
}

impl From<Option<ElementMatch>> for ResolveOutput {
    fn from(found: Option<ElementMatch>) -> Self {
        let Some(found) = found else {
            return Self {
                matched: false,
                tier: None,
                ratio: None,
                element: None,
            };
        };
        let (tier, ratio) = match found.tier {
            MatchTier::Exact => ("exact", None),
            MatchTier::Contains => ("contains", None),
            MatchTier::Fuzzy { ratio } => ("fuzzy", Some(ratio)),
            MatchTier::Nearest => ("nearest", None),
        };
        Self {
            matched: true,
            tier: Some(tier),
            ratio,
            element: Some(found.element),
        }
    }
}

/// Builds the candidate source for the current invocation.
pub(crate) trait SourceBuilder {
    fn build(
        &self,
        config: &ResolveConfig,
    ) -> Result<Box<dyn CandidateSource + Send + Sync>, CliError>;
}

pub(crate) struct OverpassSourceBuilder;

impl SourceBuilder for OverpassSourceBuilder {
    fn build(
        &self,
        config: &ResolveConfig,
    ) -> Result<Box<dyn CandidateSource + Send + Sync>, CliError> {
        let client = OverpassClient::with_config(config.overpass_config())
            .map_err(CliError::BuildClient)?;
        Ok(Box::new(client))
    }
}

pub(crate) fn run_resolve(args: ResolveArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let mut stdout = std::io::stdout().lock();
    run_resolve_with(&config, &OverpassSourceBuilder, &mut stdout)
}

pub(crate) fn run_resolve_with(
    config: &ResolveConfig,
    builder: &dyn SourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let source = builder.build(config)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::Runtime)?;
    let reference = config.reference();
    let found = runtime.block_on(load_matching(source.as_ref(), &reference, config.radius))?;
    if found.is_none() {
        info!("no element within {} m of ({}, {})", config.radius, config.lat, config.lon);
    }
    write_output(writer, &ResolveOutput::from(found))
}

fn write_output(writer: &mut dyn Write, output: &ResolveOutput) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(output).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ResolveConfig, CliError> {
    let merged = ResolveArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ResolveConfig::try_from(merged)
}
