//! Test-only builders for named POIs used by unit and behaviour tests.

use geo::Coord;

use crate::{Name, NameKey, PointOfInterest, Tags};

/// A POI at `(lat, lon)` carrying one default-class name per entry.
#[must_use]
pub fn named_poi(id: u64, lat: f64, lon: f64, names: &[&str]) -> PointOfInterest {
    PointOfInterest::new(
        id,
        Coord { x: lon, y: lat },
        names.iter().map(|value| Name::default_name(*value)).collect(),
        Tags::new(),
    )
}

/// A POI with names of explicit classes, given as `(tag key, value)` pairs.
#[must_use]
pub fn keyed_poi(id: u64, lat: f64, lon: f64, names: &[(&str, &str)]) -> PointOfInterest {
    PointOfInterest::new(
        id,
        Coord { x: lon, y: lat },
        names
            .iter()
            .map(|(key, value)| Name::new(NameKey::from_tag_key(key), *value))
            .collect(),
        Tags::new(),
    )
}

/// Peaks around Table Mountain, all within two kilometres of each other.
///
/// Ids: 1 Lion's Head, 2 Signal Hill, 3 an unnamed survey pillar.
#[must_use]
pub fn table_mountain_peaks() -> Vec<PointOfInterest> {
    vec![
        named_poi(1, -33.9350, 18.3894, &["Lion's Head"]),
        named_poi(2, -33.9220, 18.4020, &["Signal Hill"]),
        PointOfInterest::unnamed(3, Coord { x: 18.3920, y: -33.9330 }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Poi;
    use rstest::rstest;

    #[rstest]
    fn keyed_names_keep_their_class() {
        let poi = keyed_poi(1, 0.0, 0.0, &[("name:af", "Leeukop"), ("name", "Lion's Head")]);
        assert_eq!(poi.names()[0].key, NameKey::Afrikaans);
        assert_eq!(poi.tags().get("name:af").map(String::as_str), Some("Leeukop"));
    }
}
