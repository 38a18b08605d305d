//! Error types produced by the Overpass client.

use thiserror::Error;

/// Errors returned while fetching candidates from the query service.
///
/// Messages are captured as strings so the error stays `Clone` and can be
/// reported once per reference in batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum FetchError {
    /// The client was configured without any endpoint.
    #[error("no Overpass endpoints configured")]
    NoEndpoints,
    /// The request could not be sent or the connection failed.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Endpoint URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The request exceeded the configured timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Endpoint URL.
        url: String,
        /// Configured request timeout in seconds.
        timeout_secs: u64,
    },
    /// The endpoint answered with a non-success status.
    #[error("{url} returned HTTP status {status}")]
    HttpStatus {
        /// Endpoint URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// The response body was not a valid Overpass JSON document.
    #[error("failed to decode Overpass response: {message}")]
    Decode {
        /// Decoder error description.
        message: String,
    },
    /// The query could not be built for the reference POI.
    #[error("cannot build Overpass query: {message}")]
    Query {
        /// Why the query was rejected.
        message: String,
    },
}

/// Errors returned when constructing an [`OverpassClient`](super::OverpassClient).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// An endpoint was not a valid absolute URL.
    #[error("invalid Overpass endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        /// The rejected endpoint text.
        endpoint: String,
        /// URL parse failure.
        #[source]
        source: url::ParseError,
    },
}
