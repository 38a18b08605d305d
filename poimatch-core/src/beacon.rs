//! Trigonometric survey beacons as POIs.

use std::fmt;
use std::str::FromStr;

use geo::Coord;
use thiserror::Error;

use crate::{Name, Poi, QueryFilter, Queryable, Tags};

/// Registry number of a beacon, written `<area>-<number>`.
///
/// # Examples
/// ```
/// use poimatch_core::BeaconNumber;
///
/// let number: BeaconNumber = "124-37".parse()?;
/// assert_eq!(number, BeaconNumber { area: 124, number: 37 });
/// assert_eq!(number.to_string(), "124-37");
/// # Ok::<(), poimatch_core::BeaconNumberError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BeaconNumber {
    /// Survey area.
    pub area: u32,
    /// Beacon number within the area.
    pub number: u32,
}

/// Errors returned when parsing a [`BeaconNumber`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BeaconNumberError {
    /// The text did not have exactly two `-`-separated parts.
    #[error("cannot parse beacon number {raw:?}: expected <area>-<number>")]
    Shape {
        /// Input text.
        raw: String,
    },
    /// One of the parts was not a non-negative integer.
    #[error("cannot parse beacon number {raw:?}: {source}")]
    Digits {
        /// Input text.
        raw: String,
        /// Integer parse failure.
        #[source]
        source: std::num::ParseIntError,
    },
}

impl FromStr for BeaconNumber {
    type Err = BeaconNumberError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let shape = || BeaconNumberError::Shape { raw: raw.to_owned() };
        let mut parts = raw.split('-');
        let (Some(area), Some(number), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(shape());
        };
        let digits = |part: &str| {
            part.trim().parse::<u32>().map_err(|source| BeaconNumberError::Digits {
                raw: raw.to_owned(),
                source,
            })
        };
        Ok(Self {
            area: digits(area)?,
            number: digits(number)?,
        })
    }
}

impl fmt::Display for BeaconNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.area, self.number)
    }
}

/// A beacon from the national survey registry.
///
/// Tags are synthesised from the record: `man_made=survey_point`,
/// `ref=<area>-<number>` and `source=ngi`, plus `name`, `ele` and
/// `description` when known. Added tags override the three fixed tags but
/// not the name, elevation or description.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{BeaconNumber, Poi, Queryable, SurveyBeacon};
///
/// let beacon = SurveyBeacon::new(
///     BeaconNumber { area: 124, number: 37 },
///     Coord { x: 18.4036, y: -33.9628 },
///     "Lion's Head",
/// )
/// .with_elevation(669.0);
///
/// let tags = beacon.tags();
/// assert_eq!(tags.get("ref"), Some(&"124-37".to_string()));
/// assert_eq!(tags.get("ele"), Some(&"669".to_string()));
/// assert_eq!(beacon.query_filters()[0].value, "124-37");
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SurveyBeacon {
    number: BeaconNumber,
    location: Coord<f64>,
    names: Vec<Name>,
    elevation: f64,
    description: String,
    extra_tags: Tags,
}

impl SurveyBeacon {
    /// Build a beacon with a default-class name. An empty name is dropped.
    pub fn new(number: BeaconNumber, location: Coord<f64>, name: impl Into<String>) -> Self {
        let name = name.into();
        let names = if name.is_empty() {
            Vec::new()
        } else {
            vec![Name::default_name(name)]
        };
        Self {
            number,
            location,
            names,
            elevation: 0.0,
            description: String::new(),
            extra_tags: Tags::new(),
        }
    }

    /// Set the elevation in metres. Zero means unknown.
    #[must_use]
    pub fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }

    /// Set the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Registry number.
    #[must_use]
    pub const fn number(&self) -> BeaconNumber {
        self.number
    }

    /// Attach a tag after resolution, e.g. `fixme=needs review`.
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.extra_tags.insert(key.into(), value.into());
    }
}

impl Poi for SurveyBeacon {
    fn latitude(&self) -> f64 {
        self.location.y
    }

    fn longitude(&self) -> f64 {
        self.location.x
    }

    fn names(&self) -> &[Name] {
        &self.names
    }

    fn tags(&self) -> Tags {
        let mut tags = Tags::from([
            ("man_made".to_owned(), "survey_point".to_owned()),
            ("ref".to_owned(), self.number.to_string()),
            ("source".to_owned(), "ngi".to_owned()),
        ]);
        tags.extend(self.extra_tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        for name in &self.names {
            tags.insert(name.key.as_tag_key().to_owned(), name.value.clone());
        }
        if self.elevation != 0.0 {
            tags.insert("ele".to_owned(), self.elevation.to_string());
        }
        if !self.description.is_empty() {
            tags.insert("description".to_owned(), self.description.clone());
        }
        tags
    }
}

impl Queryable for SurveyBeacon {
    fn query_filters(&self) -> Vec<QueryFilter> {
        vec![QueryFilter::new("ref", self.number.to_string())]
    }
}
