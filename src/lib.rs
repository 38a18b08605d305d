//! Facade crate for the poimatch POI matcher.
//!
//! This crate re-exports the core matching types and, behind the `overpass`
//! feature, the Overpass-backed candidate lookups.

#![forbid(unsafe_code)]

pub use poimatch_core::{
    BoundingBox, EARTH_RADIUS_METRES, Match, MatchTier, Name, NameKey, Poi, PointOfInterest,
    QueryFilter, Queryable, Resolver, SpatialPartition, SurveyBeacon, distance, levenshtein_ratio,
    nearest_candidates, normalize, resolve, select_nearest,
};

#[cfg(feature = "overpass")]
pub use poimatch_data::{
    CandidateSource, ElementMatch, has_match, load_matching, load_nearest, overpass, resolve_all,
};
