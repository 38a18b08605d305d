//! Test utilities for candidate sources.
//!
//! This module provides [`StubCandidateSource`], a deterministic test double
//! for [`CandidateSource`] that returns pre-configured responses without
//! making HTTP requests.

use std::sync::Mutex;

use async_trait::async_trait;
use poimatch_core::QueryFilter;

use crate::overpass::{FetchError, OverpassElement};
use crate::source::CandidateSource;

/// Stub `CandidateSource` for testing.
///
/// Every lookup receives the same canned elements or error. The filters of
/// each lookup are recorded for later inspection.
#[derive(Debug)]
pub struct StubCandidateSource {
    response: Result<Vec<OverpassElement>, FetchError>,
    requests: Mutex<Vec<Vec<QueryFilter>>>,
}

impl StubCandidateSource {
    /// Create a source that returns `elements` for every lookup.
    #[must_use]
    pub fn with_elements(elements: Vec<OverpassElement>) -> Self {
        Self {
            response: Ok(elements),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Create a source that fails every lookup with `error`.
    #[must_use]
    pub fn with_error(error: FetchError) -> Self {
        Self {
            response: Err(error),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Filters of every lookup so far, in call order.
    #[must_use]
    pub fn requests(&self) -> Vec<Vec<QueryFilter>> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl CandidateSource for StubCandidateSource {
    async fn fetch_candidates(
        &self,
        filters: &[QueryFilter],
        _radius: f64,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<Vec<OverpassElement>, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(filters.to_vec());
        }
        self.response.clone()
    }
}
