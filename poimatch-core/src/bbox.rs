//! Inclusive latitude/longitude rectangles for restricting batch runs.

use geo::{Coord, Intersects, Rect};

use crate::Poi;

/// Axis-aligned rectangle in degrees.
///
/// The all-zero box is treated as "no restriction" so that an unset
/// configuration value admits every POI.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{BoundingBox, PointOfInterest};
///
/// let overberg = BoundingBox::new(-33.9, -33.6, 19.0, 19.229);
/// let inside = PointOfInterest::unnamed(1, Coord { x: 19.1, y: -33.7 });
/// let outside = PointOfInterest::unnamed(2, Coord { x: 18.4, y: -33.9 });
///
/// assert!(overberg.contains(&inside));
/// assert!(!overberg.contains(&outside));
/// assert!(BoundingBox::default().contains(&outside));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
}

impl BoundingBox {
    /// Build a box from its edges.
    #[must_use]
    pub const fn new(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        }
    }

    /// Whether every edge is zero, i.e. the box admits everything.
    #[must_use]
    pub fn is_unbounded(&self) -> bool {
        self.min_lat == 0.0 && self.max_lat == 0.0 && self.min_lon == 0.0 && self.max_lon == 0.0
    }

    /// Whether `poi` lies inside the box. Edges count as inside.
    #[must_use]
    pub fn contains<P: Poi + ?Sized>(&self, poi: &P) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let point = Coord {
            x: poi.longitude(),
            y: poi.latitude(),
        };
        // `Intersects` treats boundary points as inside the rectangle.
        self.as_rect().intersects(&point)
    }

    /// The box as a `geo` rectangle with `x = longitude`, `y = latitude`.
    #[must_use]
    pub fn as_rect(&self) -> Rect<f64> {
        Rect::new(
            Coord {
                x: self.min_lon,
                y: self.min_lat,
            },
            Coord {
                x: self.max_lon,
                y: self.max_lat,
            },
        )
    }
}
