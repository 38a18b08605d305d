//! Coarse one-degree grid bucketing for batch jobs.
//!
//! Cells are keyed by latitude then longitude, each rounded to the nearest
//! integer degree with ties rounded away from zero (`f64::round`). A POI at
//! latitude `-33.5` therefore lands in row `-34` and one at longitude `18.5`
//! in column `19`. Cells span roughly 111 km north-south and
//! `111 km * cos(lat)` east-west.
//!
//! The partition offers no spatial query. Batch jobs enumerate buckets and
//! compare POIs within (or next to) a bucket instead of across the whole set.

use std::collections::BTreeMap;
use std::collections::btree_map;

use crate::Poi;

/// Integer-degree cell key: `(latitude, longitude)`.
pub type CellKey = (i32, i32);

/// Round a coordinate to its cell index, ties away from zero.
///
/// # Examples
/// ```
/// use poimatch_core::cell_index;
///
/// assert_eq!(cell_index(-33.91), -34);
/// assert_eq!(cell_index(-33.49), -33);
/// assert_eq!(cell_index(18.5), 19);
/// assert_eq!(cell_index(-18.5), -19);
/// ```
#[must_use]
pub fn cell_index(degrees: f64) -> i32 {
    // Saturating cast: NaN maps to 0, infinities to the i32 bounds.
    degrees.round() as i32
}

/// Cell key for a POI.
#[must_use]
pub fn cell_of<P: Poi + ?Sized>(poi: &P) -> CellKey {
    (cell_index(poi.latitude()), cell_index(poi.longitude()))
}

/// POIs grouped by one-degree cells.
///
/// Buckets keep insertion order and there is no removal.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{PointOfInterest, SpatialPartition};
///
/// let mut partition = SpatialPartition::new();
/// partition.add(PointOfInterest::unnamed(1, Coord { x: 18.42, y: -33.91 }));
/// partition.add(PointOfInterest::unnamed(2, Coord { x: 18.60, y: -33.49 }));
///
/// assert_eq!(partition.bucket(-34, 18).map(<[_]>::len), Some(1));
/// assert_eq!(partition.bucket(-33, 19).map(<[_]>::len), Some(1));
/// assert_eq!(partition.bucket_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct SpatialPartition<P> {
    rows: BTreeMap<i32, BTreeMap<i32, Vec<P>>>,
    len: usize,
}

impl<P> Default for SpatialPartition<P> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            len: 0,
        }
    }
}

impl<P: Poi> SpatialPartition<P> {
    /// Insert `poi` at the end of its bucket.
    pub fn add(&mut self, poi: P) {
        let (lat, lon) = cell_of(&poi);
        self.rows
            .entry(lat)
            .or_default()
            .entry(lon)
            .or_default()
            .push(poi);
        self.len += 1;
    }
}

impl<P> SpatialPartition<P> {
    /// Create an empty partition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// POIs in the given cell, in insertion order.
    #[must_use]
    pub fn bucket(&self, lat: i32, lon: i32) -> Option<&[P]> {
        self.rows
            .get(&lat)
            .and_then(|row| row.get(&lon))
            .map(Vec::as_slice)
    }

    /// Iterate non-empty buckets in ascending `(lat, lon)` order.
    pub fn buckets(&self) -> Buckets<'_, P> {
        Buckets {
            rows: self.rows.iter(),
            current: None,
        }
    }

    /// Number of POIs across all buckets.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no POI has been added.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of non-empty buckets.
    #[must_use]
    pub fn bucket_count(&self) -> usize {
        self.rows.values().map(BTreeMap::len).sum()
    }
}

impl<P: Poi> Extend<P> for SpatialPartition<P> {
    fn extend<I: IntoIterator<Item = P>>(&mut self, iter: I) {
        for poi in iter {
            self.add(poi);
        }
    }
}

impl<P: Poi> FromIterator<P> for SpatialPartition<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        let mut partition = Self::new();
        partition.extend(iter);
        partition
    }
}

/// Iterator returned by [`SpatialPartition::buckets`].
#[derive(Debug)]
pub struct Buckets<'a, P> {
    rows: btree_map::Iter<'a, i32, BTreeMap<i32, Vec<P>>>,
    current: Option<(i32, btree_map::Iter<'a, i32, Vec<P>>)>,
}

impl<'a, P> Iterator for Buckets<'a, P> {
    type Item = (CellKey, &'a [P]);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some((lat, columns)) = self.current.as_mut() {
                if let Some((lon, pois)) = columns.next() {
                    return Some(((*lat, *lon), pois.as_slice()));
                }
            }
            let (lat, row) = self.rows.next()?;
            self.current = Some((*lat, row.iter()));
        }
    }
}
