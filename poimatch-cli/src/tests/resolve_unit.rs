//! Focused unit tests covering resolve CLI configuration and output.

use super::*;
use crate::resolve::{
    ResolveArgs, ResolveConfig, SourceBuilder, config_from_layers_for_test, parse_filter,
    run_resolve_with,
};
use clap::CommandFactory;
use ortho_config::MergeComposer;
use poimatch_core::{QueryFilter, Resolver, Tags};
use poimatch_data::CandidateSource;
use poimatch_data::overpass::{DEFAULT_ENDPOINTS, FetchError, OverpassElement};
use poimatch_data::test_support::StubCandidateSource;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

fn lions_head_args() -> ResolveArgs {
    ResolveArgs {
        lat: Some(-33.9628),
        lon: Some(18.4036),
        name: vec!["Lion's Head".to_owned()],
        filter: vec!["natural=peak".to_owned()],
        ..ResolveArgs::default()
    }
}

#[fixture]
fn peak_args() -> ResolveArgs {
    lions_head_args()
}

#[fixture]
fn peak_config(peak_args: ResolveArgs) -> ResolveConfig {
    ResolveConfig::try_from(peak_args).expect("config should build")
}

#[rstest]
#[case::lat(ResolveArgs { lat: None, ..lions_head_args() }, ARG_LAT, ENV_LAT)]
#[case::lon(ResolveArgs { lon: None, ..lions_head_args() }, ARG_LON, ENV_LON)]
#[case::filter(ResolveArgs { filter: Vec::new(), ..lions_head_args() }, ARG_FILTER, ENV_FILTER)]
fn converting_without_required_fields_errors(
    #[case] args: ResolveArgs,
    #[case] expected_field: &'static str,
    #[case] expected_env: &'static str,
) {
    let err = ResolveConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, expected_field);
            assert_eq!(env, expected_env);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn config_applies_defaults(peak_config: ResolveConfig) {
    assert!((peak_config.radius - Resolver::DEFAULT_RADIUS).abs() < f64::EPSILON);
    assert_eq!(peak_config.attempts, 1);
    let defaults: Vec<String> = DEFAULT_ENDPOINTS.iter().map(|url| (*url).to_owned()).collect();
    assert_eq!(peak_config.endpoints, defaults);
    assert_eq!(peak_config.filters, vec![QueryFilter::new("natural", "peak")]);
    assert_eq!(peak_config.names, vec!["Lion's Head".to_owned()]);
}

#[rstest]
#[case("ref=124-37", "ref", "124-37")]
#[case(" natural = peak ", "natural", "peak")]
#[case("note=a=b", "note", "a=b")]
#[case("fixme=", "fixme", "")]
fn parses_key_value_filters(#[case] raw: &str, #[case] key: &str, #[case] value: &str) {
    let filter = parse_filter(raw).expect("filter should parse");
    assert_eq!(filter, QueryFilter::new(key, value));
}

#[rstest]
#[case("natural")]
#[case("=peak")]
#[case("")]
fn rejects_malformed_filters(#[case] raw: &str) {
    match parse_filter(raw) {
        Err(CliError::InvalidFilter { raw: reported }) => assert_eq!(reported, raw),
        other => panic!("expected InvalidFilter, found {other:?}"),
    }
}

#[rstest]
#[case(0.0)]
#[case(-5.0)]
#[case(f64::NAN)]
#[case(f64::INFINITY)]
fn rejects_unusable_radius(peak_args: ResolveArgs, #[case] radius: f64) {
    let args = ResolveArgs {
        radius: Some(radius),
        ..peak_args
    };
    let err = ResolveConfig::try_from(args).expect_err("radius should be rejected");
    assert!(matches!(err, CliError::InvalidRadius { .. }), "got {err:?}");
}

#[rstest]
fn merge_layers_maps_configuration_errors() {
    let mut composer = MergeComposer::new();
    composer.push_cli(json!({ "lat": "north" }));

    let err = config_from_layers_for_test(composer.layers())
        .expect_err("invalid config layer should map to CliError::Configuration");
    match err {
        CliError::Configuration(_) => {}
        other => panic!("expected CliError::Configuration, found {other:?}"),
    }
}

#[rstest]
fn merge_layers_honours_precedence() {
    let mut composer = MergeComposer::new();
    composer.push_file(
        json!({
            "lat": -34.0,
            "lon": 18.0,
            "radius": 250.0,
            "endpoint": ["https://file.example/api/interpreter"],
        }),
        None,
    );
    composer.push_environment(json!({
        "lat": -33.5,
        "filter": ["ref=124-37"],
        "attempts": 3,
    }));
    composer.push_cli(json!({ "lat": -33.9628 }));

    let config =
        config_from_layers_for_test(composer.layers()).expect("merged config should build");
    assert!((config.lat - -33.9628).abs() < f64::EPSILON);
    assert!((config.lon - 18.0).abs() < f64::EPSILON);
    assert!((config.radius - 250.0).abs() < f64::EPSILON);
    assert_eq!(config.attempts, 3);
    assert_eq!(config.filters, vec![QueryFilter::new("ref", "124-37")]);
    assert_eq!(
        config.endpoints,
        vec!["https://file.example/api/interpreter".to_owned()]
    );
}

struct StubBuilder {
    elements: Option<Vec<OverpassElement>>,
}

impl SourceBuilder for StubBuilder {
    fn build(
        &self,
        _config: &ResolveConfig,
    ) -> Result<Box<dyn CandidateSource + Send + Sync>, CliError> {
        let source = match &self.elements {
            Some(elements) => StubCandidateSource::with_elements(elements.clone()),
            None => StubCandidateSource::with_error(FetchError::NoEndpoints),
        };
        Ok(Box::new(source))
    }
}

fn peak(id: u64, lat: f64, lon: f64, name: &str) -> OverpassElement {
    let tags = Tags::from([
        ("natural".to_owned(), "peak".to_owned()),
        ("name".to_owned(), name.to_owned()),
    ]);
    OverpassElement::node(id, lat, lon, tags)
}

fn render(config: &ResolveConfig, builder: &StubBuilder) -> Result<Value, CliError> {
    let mut buffer = Vec::new();
    run_resolve_with(config, builder, &mut buffer)?;
    let text = String::from_utf8(buffer).expect("utf-8 output");
    assert!(text.ends_with('\n'));
    Ok(serde_json::from_str(&text).expect("output should be JSON"))
}

#[rstest]
fn writes_exact_match_as_json(peak_config: ResolveConfig) {
    let builder = StubBuilder {
        elements: Some(vec![
            peak(10, -33.9630, 18.4036, "Signal Hill"),
            peak(11, -33.9629, 18.4037, "Lion's Head"),
        ]),
    };
    let output = render(&peak_config, &builder).expect("resolve should succeed");
    assert_eq!(output["matched"], json!(true));
    assert_eq!(output["tier"], json!("exact"));
    assert_eq!(output["element"]["id"], json!(11));
    assert_eq!(output["element"]["type"], json!("node"));
    assert!(output.get("ratio").is_none());
}

#[rstest]
fn writes_fuzzy_ratio(peak_config: ResolveConfig) {
    let builder = StubBuilder {
        elements: Some(vec![peak(12, -33.9629, 18.4036, "Lions Hd")]),
    };
    let output = render(&peak_config, &builder).expect("resolve should succeed");
    assert_eq!(output["tier"], json!("fuzzy"));
    // "lionshd" is three edits from "lion'shead".
    let ratio = output["ratio"].as_f64().expect("ratio should be a number");
    assert!((ratio - 0.3).abs() < 1e-9, "ratio {ratio}");
}

#[rstest]
fn writes_unmatched_outcome(peak_config: ResolveConfig) {
    let builder = StubBuilder {
        elements: Some(Vec::new()),
    };
    let output = render(&peak_config, &builder).expect("resolve should succeed");
    assert_eq!(
        output,
        json!({ "matched": false, "tier": null, "element": null })
    );
}

#[rstest]
fn surfaces_fetch_failures(peak_config: ResolveConfig) {
    let builder = StubBuilder { elements: None };
    let err = render(&peak_config, &builder).expect_err("fetch failure should surface");
    assert!(
        matches!(err, CliError::Fetch(FetchError::NoEndpoints)),
        "got {err:?}"
    );
}

#[rstest]
fn parses_resolve_subcommand() {
    let cli = Cli::try_parse_from([
        "poimatch",
        "resolve",
        "--lat",
        "-33.9628",
        "--lon",
        "18.4036",
        "--name",
        "Lion's Head",
        "--filter",
        "natural=peak",
        "--filter",
        "ref=124-37",
    ])
    .expect("arguments should parse");
    let Command::Resolve(args) = cli.command;
    assert_eq!(args.lat, Some(-33.9628));
    assert_eq!(args.filter, vec!["natural=peak".to_owned(), "ref=124-37".to_owned()]);
}

#[rstest]
fn resolve_args_use_the_subcommand_namespace() {
    // ortho_config derives env keys and `cmds.<name>` file sections from this.
    assert_eq!(ResolveArgs::command().get_name(), "resolve");
    assert!(ENV_LAT.starts_with("POIMATCH_CMDS_RESOLVE_"));
    assert!(ENV_LON.starts_with("POIMATCH_CMDS_RESOLVE_"));
    assert!(ENV_FILTER.starts_with("POIMATCH_CMDS_RESOLVE_"));
}
