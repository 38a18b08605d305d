//! Candidate lookups around a reference POI.

use async_trait::async_trait;
use log::{debug, info};
use poimatch_core::{MatchTier, Poi, QueryFilter, Queryable, Resolver, select_nearest};
use serde::Serialize;

use crate::overpass::{FetchError, OverpassElement};

/// Anything that can fetch match candidates around a position.
#[async_trait]
pub trait CandidateSource {
    /// Elements within `radius` metres of `(latitude, longitude)` matching
    /// any of `filters`, in the source's own order.
    async fn fetch_candidates(
        &self,
        filters: &[QueryFilter],
        radius: f64,
        latitude: f64,
        longitude: f64,
    ) -> Result<Vec<OverpassElement>, FetchError>;
}

/// A resolved candidate and the tier that selected it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementMatch {
    /// The matching element.
    pub element: OverpassElement,
    /// How it was chosen.
    pub tier: MatchTier,
}

fn label<R: Poi + ?Sized>(reference: &R) -> &str {
    reference
        .names()
        .first()
        .map_or("<unnamed>", |name| name.value.as_str())
}

async fn candidates_for<S, R>(
    source: &S,
    reference: &R,
    radius: f64,
) -> Result<Vec<OverpassElement>, FetchError>
where
    S: CandidateSource + ?Sized,
    R: Queryable + ?Sized,
{
    let filters = reference.query_filters();
    if filters.is_empty() {
        return Err(FetchError::Query {
            message: format!("{} has no query filters", label(reference)),
        });
    }
    debug!("loading candidates for {} within {radius} m", label(reference));
    source
        .fetch_candidates(&filters, radius, reference.latitude(), reference.longitude())
        .await
}

/// The element nearest to `reference` within `radius` metres.
///
/// A lone candidate is returned regardless of its distance.
///
/// # Errors
///
/// Returns the source's [`FetchError`], or [`FetchError::Query`] when the
/// reference has no query filters.
pub async fn load_nearest<S, R>(
    source: &S,
    reference: &R,
    radius: f64,
) -> Result<Option<OverpassElement>, FetchError>
where
    S: CandidateSource + ?Sized,
    R: Queryable + ?Sized,
{
    let elements = candidates_for(source, reference, radius).await?;
    Ok(select_nearest(&elements, reference, radius).cloned())
}

/// The element that represents `reference`, if any.
///
/// Candidates are radius filtered, ordered by distance and resolved by name.
///
/// # Errors
///
/// Returns the source's [`FetchError`], or [`FetchError::Query`] when the
/// reference has no query filters.
pub async fn load_matching<S, R>(
    source: &S,
    reference: &R,
    radius: f64,
) -> Result<Option<ElementMatch>, FetchError>
where
    S: CandidateSource + ?Sized,
    R: Queryable + ?Sized,
{
    let elements = candidates_for(source, reference, radius).await?;
    let found = Resolver::new(radius)
        .resolve(reference, &elements)
        .map(|found| ElementMatch {
            element: found.candidate.clone(),
            tier: found.tier,
        });
    if let Some(found) = &found {
        info!(
            "matched {} to {:?} {} ({:?})",
            label(reference),
            found.element.element_type,
            found.element.id,
            found.tier
        );
    }
    Ok(found)
}

/// Whether some element already represents `reference`.
///
/// # Errors
///
/// Fetch failures are returned as errors and never reported as "no match".
pub async fn has_match<S, R>(source: &S, reference: &R, radius: f64) -> Result<bool, FetchError>
where
    S: CandidateSource + ?Sized,
    R: Queryable + ?Sized,
{
    Ok(load_matching(source, reference, radius).await?.is_some())
}
