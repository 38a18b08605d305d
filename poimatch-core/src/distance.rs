//! Great-circle distances between coordinates.

use geo::{Distance, HaversineMeasure, Point};

use crate::Poi;

/// Earth radius in metres used by every distance in the crate.
///
/// Radius filters downstream are calibrated against this value, not the
/// mean radius `geo` defaults to.
pub const EARTH_RADIUS_METRES: f64 = 6_378_100.0;

/// Haversine distance in metres between two latitude/longitude pairs.
///
/// Symmetric, zero for coincident points and never negative for finite input.
///
/// # Examples
/// ```
/// use poimatch_core::distance;
///
/// let metres = distance(0.0, 0.0, 1.0, 0.0);
/// assert!((metres - 111_319.5).abs() < 1.0);
/// assert_eq!(distance(-33.9, 18.4, -33.9, 18.4), 0.0);
/// ```
#[must_use]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    HaversineMeasure::new(EARTH_RADIUS_METRES)
        .distance(Point::new(lon1, lat1), Point::new(lon2, lat2))
}

/// Distance in metres between two POIs.
#[must_use]
pub fn distance_between<A, B>(a: &A, b: &B) -> f64
where
    A: Poi + ?Sized,
    B: Poi + ?Sized,
{
    distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}
