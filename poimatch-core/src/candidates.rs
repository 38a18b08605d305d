//! Radius filtering and distance ordering of candidates.

use crate::{Poi, distance_between};

/// A candidate paired with its distance from the reference POI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ranked<'a, C> {
    /// The candidate itself.
    pub candidate: &'a C,
    /// Distance from the reference in metres.
    pub distance: f64,
}

/// Candidates strictly closer than `radius` metres, nearest first.
///
/// The sort is stable: candidates at equal distance keep their input order.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{PointOfInterest, nearest_candidates};
///
/// let reference = PointOfInterest::unnamed(0, Coord { x: 18.40, y: -33.96 });
/// let candidates = vec![
///     PointOfInterest::unnamed(1, Coord { x: 18.41, y: -33.96 }),
///     PointOfInterest::unnamed(2, Coord { x: 18.40, y: -33.96 }),
///     PointOfInterest::unnamed(3, Coord { x: 19.40, y: -33.96 }),
/// ];
///
/// let ranked = nearest_candidates(&candidates, &reference, 5_000.0);
/// let ids: Vec<u64> = ranked.iter().map(|r| r.candidate.id).collect();
/// assert_eq!(ids, vec![2, 1]);
/// ```
#[must_use]
pub fn nearest_candidates<'a, C, R>(
    candidates: &'a [C],
    reference: &R,
    radius: f64,
) -> Vec<Ranked<'a, C>>
where
    C: Poi,
    R: Poi + ?Sized,
{
    let mut ranked: Vec<Ranked<'a, C>> = candidates
        .iter()
        .map(|candidate| Ranked {
            candidate,
            distance: distance_between(candidate, reference),
        })
        .filter(|ranked| ranked.distance < radius)
        .collect();
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    ranked
}

/// The nearest candidate within `radius` metres.
///
/// A lone candidate is returned without checking its distance at all; the
/// radius only applies once there is more than one to choose from.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{PointOfInterest, select_nearest};
///
/// let reference = PointOfInterest::unnamed(0, Coord { x: 18.0, y: -33.0 });
/// let far_away = vec![PointOfInterest::unnamed(1, Coord { x: 25.0, y: -29.0 })];
///
/// assert!(select_nearest(&far_away, &reference, 100.0).is_some());
/// assert!(select_nearest(&[] as &[PointOfInterest], &reference, 100.0).is_none());
/// ```
#[must_use]
pub fn select_nearest<'a, C, R>(candidates: &'a [C], reference: &R, radius: f64) -> Option<&'a C>
where
    C: Poi,
    R: Poi + ?Sized,
{
    if let [only] = candidates {
        return Some(only);
    }
    nearest_candidates(candidates, reference, radius)
        .first()
        .map(|ranked| ranked.candidate)
}
