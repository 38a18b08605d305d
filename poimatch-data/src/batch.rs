//! Concurrent resolution of many reference POIs.

use futures_util::stream::{self, StreamExt};
use log::info;
use poimatch_core::Queryable;

use crate::overpass::FetchError;
use crate::source::{CandidateSource, ElementMatch, load_matching};

/// Resolve every reference against `source`, running up to `concurrency`
/// lookups at once.
///
/// Returns one result per reference, in input order. A failed lookup only
/// affects its own slot. A `concurrency` of zero is treated as one.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{BeaconNumber, SurveyBeacon, Tags};
/// use poimatch_data::overpass::OverpassElement;
/// use poimatch_data::resolve_all;
/// use poimatch_data::test_support::StubCandidateSource;
///
/// let beacon = SurveyBeacon::new(
///     BeaconNumber { area: 124, number: 37 },
///     Coord { x: 18.3894, y: -33.9350 },
///     "Lion's Head",
/// );
/// let source = StubCandidateSource::with_elements(vec![OverpassElement::node(
///     7,
///     -33.9350,
///     18.3894,
///     Tags::from([("name".into(), "Lion's Head".into())]),
/// )]);
///
/// let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
/// let results = runtime.block_on(resolve_all(&source, &[beacon], 1000.0, 4));
/// assert!(matches!(&results[0], Ok(Some(found)) if found.element.id == 7));
/// # Ok::<(), std::io::Error>(())
/// ```
pub async fn resolve_all<S, R>(
    source: &S,
    references: &[R],
    radius: f64,
    concurrency: usize,
) -> Vec<Result<Option<ElementMatch>, FetchError>>
where
    S: CandidateSource + ?Sized,
    R: Queryable,
{
    info!(
        "resolving {} reference POIs with up to {} concurrent lookups",
        references.len(),
        concurrency.max(1)
    );
    let mut results: Vec<(usize, Result<Option<ElementMatch>, FetchError>)> =
        stream::iter(references.iter().enumerate())
            .map(|(index, reference)| async move {
                (index, load_matching(source, reference, radius).await)
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await;
    results.sort_unstable_by_key(|(index, _)| *index);
    results.into_iter().map(|(_, result)| result).collect()
}
