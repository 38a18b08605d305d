//! HTTP client for the Overpass API with endpoint fallback and retries.

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use poimatch_core::QueryFilter;
use reqwest::Client;
use url::Url;

use super::{ClientBuildError, FetchError, OverpassElement, OverpassResponse, build_query};
use crate::source::CandidateSource;

/// Public Overpass instances tried in order by default.
pub const DEFAULT_ENDPOINTS: [&str; 3] = [
    "https://lz4.overpass-api.de/api/interpreter",
    "https://z.overpass-api.de/api/interpreter",
    "https://overpass.kumi.systems/api/interpreter",
];

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "poimatch/0.1";

/// Default HTTP request timeout in seconds.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 180;

/// Default server-side query timeout in seconds.
const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 20;

/// Default pause between endpoint passes.
const DEFAULT_BACKOFF_SECS: u64 = 5;

/// How often a full pass over the endpoints is repeated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Number of endpoint passes. Zero is treated as one.
    pub max_attempts: u32,
    /// Pause after a failed pass before the next one starts.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::from_secs(DEFAULT_BACKOFF_SECS),
        }
    }
}

/// Configuration for [`OverpassClient`].
#[derive(Debug, Clone, PartialEq)]
pub struct OverpassConfig {
    /// Interpreter URLs, tried in order.
    pub endpoints: Vec<String>,
    /// HTTP request timeout.
    pub request_timeout: Duration,
    /// Server-side timeout written into each query.
    pub query_timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
    /// Retry behaviour across endpoint passes.
    pub retry: RetryPolicy,
    /// Honour `HTTP_PROXY`-style environment variables.
    pub system_proxy: bool,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            endpoints: DEFAULT_ENDPOINTS.iter().map(|url| (*url).to_owned()).collect(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            query_timeout: Duration::from_secs(DEFAULT_QUERY_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            retry: RetryPolicy::default(),
            system_proxy: true,
        }
    }
}

impl OverpassConfig {
    /// Replace the endpoint list.
    #[must_use]
    pub fn with_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.endpoints = endpoints.into_iter().map(Into::into).collect();
        self
    }

    /// Set the HTTP request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the server-side query timeout.
    #[must_use]
    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Enable or disable proxies taken from the environment.
    #[must_use]
    pub fn with_system_proxy(mut self, enabled: bool) -> Self {
        self.system_proxy = enabled;
        self
    }
}

/// Async Overpass client.
///
/// Each request walks the endpoint list in order and returns the first
/// successful response. Transport failures and non-success statuses move on
/// to the next endpoint; a body that fails to decode is returned at once.
/// When a whole pass fails the client sleeps for the retry backoff and
/// starts again, up to [`RetryPolicy::max_attempts`] passes, then reports
/// the last error.
///
/// # Example
///
/// ```no_run
/// use poimatch_data::overpass::{OverpassClient, OverpassConfig, RetryPolicy};
/// use std::time::Duration;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = OverpassConfig::default().with_retry(RetryPolicy {
///     max_attempts: 3,
///     backoff: Duration::from_secs(10),
/// });
/// let client = OverpassClient::with_config(config)?;
/// let response = client.run_query("[out:json];node(1);out;").await?;
/// println!("{} elements", response.elements.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct OverpassClient {
    client: Client,
    endpoints: Vec<Url>,
    config: OverpassConfig,
}

impl OverpassClient {
    /// Create a client with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new() -> Result<Self, ClientBuildError> {
        Self::with_config(OverpassConfig::default())
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an endpoint is not an absolute URL or the HTTP
    /// client fails to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, ClientBuildError> {
        let endpoints = config
            .endpoints
            .iter()
            .map(|endpoint| {
                Url::parse(endpoint).map_err(|source| ClientBuildError::InvalidEndpoint {
                    endpoint: endpoint.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let mut builder = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.request_timeout)
            .timeout(config.request_timeout);
        if !config.system_proxy {
            builder = builder.no_proxy();
        }
        let client = builder.build().map_err(ClientBuildError::HttpClient)?;
        Ok(Self {
            client,
            endpoints,
            config,
        })
    }

    /// The configuration this client was built from.
    #[must_use]
    pub fn config(&self) -> &OverpassConfig {
        &self.config
    }

    /// Run a raw Overpass QL query.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NoEndpoints`] when no endpoint is configured,
    /// [`FetchError::Decode`] for an undecodable body, or the last transport
    /// error once every pass has failed.
    pub async fn run_query(&self, query: &str) -> Result<OverpassResponse, FetchError> {
        if self.endpoints.is_empty() {
            return Err(FetchError::NoEndpoints);
        }
        let passes = self.config.retry.max_attempts.max(1);
        let mut last_error = FetchError::NoEndpoints;
        for pass in 1..=passes {
            for endpoint in &self.endpoints {
                match self.fetch_body(endpoint, query).await {
                    Ok(body) => return decode(&body),
                    Err(err) => {
                        warn!("Overpass request failed (pass {pass}/{passes}): {err}");
                        last_error = err;
                    }
                }
            }
            if pass < passes {
                tokio::time::sleep(self.config.retry.backoff).await;
            }
        }
        Err(last_error)
    }

    /// Post `query` and read the whole body. Any transport failure, including
    /// one while reading the body, counts against this endpoint.
    async fn fetch_body(&self, endpoint: &Url, query: &str) -> Result<Vec<u8>, FetchError> {
        let response = self
            .client
            .post(endpoint.clone())
            .form(&[("data", query)])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, endpoint))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        response
            .bytes()
            .await
            .map(|body| body.to_vec())
            .map_err(|err| self.convert_reqwest_error(&err, endpoint))
    }

    /// Convert a reqwest error to a `FetchError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, endpoint: &Url) -> FetchError {
        if error.is_timeout() {
            return FetchError::Timeout {
                url: endpoint.to_string(),
                timeout_secs: self.config.request_timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return FetchError::HttpStatus {
                url: endpoint.to_string(),
                status: status.as_u16(),
            };
        }
        FetchError::Network {
            url: endpoint.to_string(),
            message: error.to_string(),
        }
    }
}

fn decode(body: &[u8]) -> Result<OverpassResponse, FetchError> {
    serde_json::from_slice(body).map_err(|err| FetchError::Decode {
        message: err.to_string(),
    })
}

#[async_trait]
impl CandidateSource for OverpassClient {
    async fn fetch_candidates(
        &self,
        filters: &[QueryFilter],
        radius: f64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<OverpassElement>, FetchError> {
        let query = build_query(
            filters,
            radius,
            latitude,
            longitude,
            self.config.query_timeout.as_secs(),
        );
        debug!("running Overpass query: {query}");
        Ok(self.run_query(&query).await?.elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_public_instances() {
        let config = OverpassConfig::default();
        assert_eq!(config.endpoints.len(), 3);
        assert_eq!(config.endpoints[0], "https://lz4.overpass-api.de/api/interpreter");
        assert_eq!(config.request_timeout, Duration::from_secs(180));
        assert_eq!(config.query_timeout, Duration::from_secs(20));
        assert_eq!(config.retry, RetryPolicy::default());
        assert_eq!(config.retry.max_attempts, 1);
        assert_eq!(config.retry.backoff, Duration::from_secs(5));
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = OverpassConfig::default()
            .with_endpoints(["http://localhost:12345/api/interpreter"])
            .with_request_timeout(Duration::from_secs(60))
            .with_query_timeout(Duration::from_secs(5))
            .with_user_agent("test-agent/1.0")
            .with_retry(RetryPolicy {
                max_attempts: 4,
                backoff: Duration::ZERO,
            });

        assert_eq!(config.endpoints, vec!["http://localhost:12345/api/interpreter"]);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.query_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "test-agent/1.0");
        assert_eq!(config.retry.max_attempts, 4);
    }

    #[rstest]
    fn rejects_relative_endpoints() {
        let config = OverpassConfig::default().with_endpoints(["overpass.example.com"]);
        let err = OverpassClient::with_config(config).expect_err("relative URL");
        assert!(matches!(err, ClientBuildError::InvalidEndpoint { .. }), "got {err:?}");
    }

    #[rstest]
    #[tokio::test]
    async fn empty_endpoint_list_is_an_error() {
        let config = OverpassConfig::default().with_endpoints(Vec::<String>::new());
        let client = OverpassClient::with_config(config).expect("client should build");
        let err = client.run_query("[out:json];out;").await.expect_err("no endpoints");
        assert_eq!(err, FetchError::NoEndpoints);
    }
}
