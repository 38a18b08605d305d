//! Core matching engine for cross-referencing POIs against map data.
//!
//! Given a reference POI and the candidates a spatial lookup returned around
//! it, the crate decides whether any candidate already represents the same
//! real-world feature:
//!
//! - [`distance`] computes haversine distances;
//! - [`nearest_candidates`] and [`select_nearest`] apply the search radius;
//! - [`resolve_detailed`] runs the exact, contains and fuzzy name tiers;
//! - [`SpatialPartition`] buckets large local datasets for batch jobs.
//!
//! Everything here is synchronous, allocation-light and free of shared
//! state. No function returns an error: "no match" is `None`.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod bbox;
mod beacon;
mod candidates;
mod distance;
mod normalize;
mod partition;
pub mod poi;
mod resolver;
mod similarity;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bbox::BoundingBox;
pub use beacon::{BeaconNumber, BeaconNumberError, SurveyBeacon};
pub use candidates::{Ranked, nearest_candidates, select_nearest};
pub use distance::{EARTH_RADIUS_METRES, distance, distance_between};
pub use normalize::{normalize, normalize_name};
pub use partition::{Buckets, CellKey, SpatialPartition, cell_index, cell_of};
pub use poi::{Name, NameKey, Poi, PointOfInterest, QueryFilter, Queryable, Tags};
pub use resolver::{Match, MatchTier, Resolver, resolve, resolve_candidates, resolve_detailed};
pub use similarity::{EditDistance, levenshtein_distance, levenshtein_ratio};
