//! Decide whether any candidate already represents a reference POI.
//!
//! Candidates are expected nearest first (see
//! [`nearest_candidates`](crate::nearest_candidates)). The scan is nested:
//! candidates in order on the outside, each candidate's names in order
//! inside, every reference name innermost. For each name pair, after
//! [`normalize`](crate::normalize):
//!
//! 1. equal names return that candidate at once (**exact**);
//! 2. otherwise, if either name contains the other, that candidate is kept
//!    and the whole scan stops (**contains**);
//! 3. otherwise the [`levenshtein_ratio`] is compared with the best so far
//!    and the candidate kept on strict improvement (**fuzzy**).
//!
//! Exact beats contains, which beats fuzzy. A reference without names, or
//! candidates without names, fall back to the nearest candidate.

use log::{debug, info};

use crate::{Poi, Ranked, levenshtein_ratio, nearest_candidates, normalize_name};

/// Starting bound for the best fuzzy ratio. Any real ratio is at most 1.0.
const FUZZY_RATIO_SEED: f64 = 50.0;

/// How a candidate was selected.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "tier", rename_all = "snake_case"))]
pub enum MatchTier {
    /// A normalised name matched exactly.
    Exact,
    /// One normalised name contained the other.
    Contains,
    /// Closest name by edit-distance ratio.
    Fuzzy {
        /// Ratio of the winning name pair.
        ratio: f64,
    },
    /// Chosen by position alone because names could not be compared.
    Nearest,
}

/// A selected candidate and the tier that selected it.
#[derive(Debug, PartialEq)]
pub struct Match<'a, C> {
    /// The chosen candidate.
    pub candidate: &'a C,
    /// Why it was chosen.
    pub tier: MatchTier,
}

// Manual impls: derives would require `C: Clone`.
impl<C> Clone for Match<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for Match<'_, C> {}

fn eq_fold(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Pick the candidate that represents `reference`, reporting the tier.
///
/// `candidates` must already be radius filtered and ordered nearest first.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{MatchTier, Name, PointOfInterest, resolve_detailed};
///
/// let at = |id, name: &str| {
///     PointOfInterest::new(
///         id,
///         Coord { x: 18.49, y: -34.35 },
///         vec![Name::default_name(name)],
///         Default::default(),
///     )
/// };
/// let reference = at(0, "Cape Point");
/// let candidates = [at(1, "Lighthouse"), at(2, "cape point")];
///
/// let found = resolve_detailed(&reference, &candidates).expect("match");
/// assert_eq!(found.candidate.id, 2);
/// assert_eq!(found.tier, MatchTier::Exact);
/// ```
#[must_use]
pub fn resolve_detailed<'a, C, R, I>(reference: &R, candidates: I) -> Option<Match<'a, C>>
where
    C: Poi + 'a,
    R: Poi + ?Sized,
    I: IntoIterator<Item = &'a C>,
{
    let ordered: Vec<&'a C> = candidates.into_iter().collect();
    debug!("selecting a match among {} candidates", ordered.len());

    let nearest = ordered.first().copied().map(|candidate| Match {
        candidate,
        tier: MatchTier::Nearest,
    });
    if reference.names().is_empty() {
        return nearest;
    }

    let wanted: Vec<String> = reference.names().iter().map(normalize_name).collect();
    let mut contains = None;
    let mut fuzzy: Option<Match<'a, C>> = None;
    let mut best_ratio = FUZZY_RATIO_SEED;

    'candidates: for candidate in ordered.iter().copied() {
        for name in candidate.names() {
            let offered = normalize_name(name);
            for target in &wanted {
                if eq_fold(&offered, target) {
                    return Some(Match {
                        candidate,
                        tier: MatchTier::Exact,
                    });
                }
                if offered.contains(target.as_str()) || target.contains(offered.as_str()) {
                    contains = Some(Match {
                        candidate,
                        tier: MatchTier::Contains,
                    });
                    break 'candidates;
                }
                let ratio = levenshtein_ratio(&offered, target);
                if ratio < best_ratio {
                    best_ratio = ratio;
                    fuzzy = Some(Match {
                        candidate,
                        tier: MatchTier::Fuzzy { ratio },
                    });
                }
            }
        }
    }

    let named_candidate = ordered.iter().any(|candidate| !candidate.names().is_empty());
    let outcome = contains.or(fuzzy).or(if named_candidate { None } else { nearest });
    if outcome.is_none() {
        let label = reference
            .names()
            .first()
            .map_or("<unnamed>", |name| name.value.as_str());
        info!("no match found for {label}");
    }
    outcome
}

/// Pick the candidate that represents `reference`.
///
/// Shorthand for [`resolve_detailed`] without the tier.
#[must_use]
pub fn resolve<'a, C, R, I>(reference: &R, candidates: I) -> Option<&'a C>
where
    C: Poi + 'a,
    R: Poi + ?Sized,
    I: IntoIterator<Item = &'a C>,
{
    resolve_detailed(reference, candidates).map(|found| found.candidate)
}

/// Filter raw candidates by radius, then resolve among the survivors.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{Name, PointOfInterest, resolve_candidates};
///
/// let reference = PointOfInterest::new(
///     0,
///     Coord { x: 18.39, y: -33.96 },
///     vec![Name::default_name("Lion's Head")],
///     Default::default(),
/// );
/// let candidates = vec![PointOfInterest::new(
///     7,
///     Coord { x: 18.39, y: -33.9601 },
///     vec![Name::default_name("Lion's Head")],
///     Default::default(),
/// )];
///
/// let matched = resolve_candidates(&reference, &candidates, 1_000.0);
/// assert_eq!(matched.map(|poi| poi.id), Some(7));
/// ```
#[must_use]
pub fn resolve_candidates<'a, C, R>(
    reference: &R,
    candidates: &'a [C],
    radius: f64,
) -> Option<&'a C>
where
    C: Poi,
    R: Poi + ?Sized,
{
    Resolver::new(radius)
        .resolve(reference, candidates)
        .map(|found| found.candidate)
}

/// Radius filter and match resolution bundled together.
///
/// Holds no state besides the radius, so one value can be shared freely
/// between threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolver {
    radius: f64,
}

impl Resolver {
    /// Default search radius in metres.
    pub const DEFAULT_RADIUS: f64 = 1_000.0;

    /// Build a resolver admitting candidates closer than `radius` metres.
    #[must_use]
    pub const fn new(radius: f64) -> Self {
        Self { radius }
    }

    /// Search radius in metres.
    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    /// Candidates inside the radius, nearest first.
    #[must_use]
    pub fn filter<'a, C, R>(&self, reference: &R, candidates: &'a [C]) -> Vec<Ranked<'a, C>>
    where
        C: Poi,
        R: Poi + ?Sized,
    {
        nearest_candidates(candidates, reference, self.radius)
    }

    /// Filter `candidates` and resolve the reference among them.
    #[must_use]
    pub fn resolve<'a, C, R>(&self, reference: &R, candidates: &'a [C]) -> Option<Match<'a, C>>
    where
        C: Poi,
        R: Poi + ?Sized,
    {
        let ranked = self.filter(reference, candidates);
        resolve_detailed(reference, ranked.iter().map(|r| r.candidate))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(Self::DEFAULT_RADIUS)
    }
}
