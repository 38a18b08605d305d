//! The POI capability and the generic point-of-interest record.
//!
//! Matching never cares what a POI *is*, only what it exposes: a position, an
//! ordered list of names and a tag map. Every source record implements
//! [`Poi`] on its own; there is no shared base type.

use std::collections::HashMap;
use std::fmt;

use geo::Coord;

/// OpenStreetMap-style key/value tags.
pub type Tags = HashMap<String, String>;

/// Class of a name, identified by the OpenStreetMap tag key that carries it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "String", from = "String"))]
pub enum NameKey {
    /// `name`
    Default,
    /// `int_name`
    International,
    /// `nat_name`
    National,
    /// `loc_name`
    Local,
    /// `old_name`
    Old,
    /// `alt_name`
    Alternative,
    /// `name:en`
    English,
    /// `name:af`
    Afrikaans,
    /// Any other name-bearing tag key, kept verbatim.
    Other(String),
}

impl NameKey {
    /// Tag key carrying names of this class.
    ///
    /// # Examples
    /// ```
    /// use poimatch_core::NameKey;
    ///
    /// assert_eq!(NameKey::English.as_tag_key(), "name:en");
    /// assert_eq!(NameKey::Other("short_name".into()).as_tag_key(), "short_name");
    /// ```
    #[must_use]
    pub fn as_tag_key(&self) -> &str {
        match self {
            Self::Default => "name",
            Self::International => "int_name",
            Self::National => "nat_name",
            Self::Local => "loc_name",
            Self::Old => "old_name",
            Self::Alternative => "alt_name",
            Self::English => "name:en",
            Self::Afrikaans => "name:af",
            Self::Other(key) => key,
        }
    }

    /// Map a tag key back to its name class.
    #[must_use]
    pub fn from_tag_key(key: &str) -> Self {
        match key {
            "name" => Self::Default,
            "int_name" => Self::International,
            "nat_name" => Self::National,
            "loc_name" => Self::Local,
            "old_name" => Self::Old,
            "alt_name" => Self::Alternative,
            "name:en" => Self::English,
            "name:af" => Self::Afrikaans,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag_key())
    }
}

impl From<String> for NameKey {
    fn from(key: String) -> Self {
        Self::from_tag_key(&key)
    }
}

impl From<NameKey> for String {
    fn from(key: NameKey) -> Self {
        key.as_tag_key().to_owned()
    }
}

/// A single name of a POI together with its class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Name {
    /// Class of the name.
    pub key: NameKey,
    /// The name text as supplied by the source.
    pub value: String,
}

impl Name {
    /// Build a name of the given class.
    pub fn new(key: NameKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }

    /// Build a default-class (`name`) name.
    pub fn default_name(value: impl Into<String>) -> Self {
        Self::new(NameKey::Default, value)
    }
}

/// Anything that can take part in matching.
///
/// Latitude and longitude are WGS84 degrees. They are not validated: NaN or
/// out-of-range values propagate into distances unchanged.
///
/// # Examples
/// ```
/// use poimatch_core::{Name, Poi, Tags};
///
/// struct Peak {
///     lat: f64,
///     lon: f64,
///     names: Vec<Name>,
///     tags: Tags,
/// }
///
/// impl Poi for Peak {
///     fn latitude(&self) -> f64 { self.lat }
///     fn longitude(&self) -> f64 { self.lon }
///     fn names(&self) -> &[Name] { &self.names }
///     fn tags(&self) -> Tags { self.tags.clone() }
/// }
///
/// let peak = Peak {
///     lat: -33.96,
///     lon: 18.40,
///     names: vec![Name::default_name("Table Mountain")],
///     tags: Tags::new(),
/// };
/// assert_eq!(peak.names().len(), 1);
/// ```
pub trait Poi {
    /// Latitude in degrees.
    fn latitude(&self) -> f64;

    /// Longitude in degrees.
    fn longitude(&self) -> f64;

    /// Names in source order. May be empty.
    fn names(&self) -> &[Name];

    /// Tags describing the POI.
    ///
    /// Returned by value because several sources synthesise their tags from
    /// structured fields rather than storing a map.
    fn tags(&self) -> Tags;
}

impl<P: Poi + ?Sized> Poi for &P {
    fn latitude(&self) -> f64 {
        (**self).latitude()
    }

    fn longitude(&self) -> f64 {
        (**self).longitude()
    }

    fn names(&self) -> &[Name] {
        (**self).names()
    }

    fn tags(&self) -> Tags {
        (**self).tags()
    }
}

/// A key/value attribute used to look a POI up in the spatial query service.
///
/// Filters are OR-combined: an element matching any one of them is a
/// candidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueryFilter {
    /// Tag key.
    pub key: String,
    /// Required tag value.
    pub value: String,
}

impl QueryFilter {
    /// Build a filter requiring `key=value`.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A reference POI that knows how to find its candidates.
pub trait Queryable: Poi {
    /// Attribute filters selecting plausible candidates. Should not be empty.
    fn query_filters(&self) -> Vec<QueryFilter>;
}

/// A generic point of interest.
///
/// Coordinates are WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use poimatch_core::{Name, Poi, PointOfInterest, Tags};
///
/// let poi = PointOfInterest::new(
///     1,
///     Coord { x: 18.42, y: -33.91 },
///     vec![Name::default_name("Signal Hill")],
///     Tags::from([("natural".into(), "peak".into())]),
/// );
///
/// assert_eq!(poi.latitude(), -33.91);
/// assert_eq!(poi.tags().get("name"), Some(&"Signal Hill".to_string()));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PointOfInterest {
    pub id: u64,
    pub location: Coord<f64>,
    pub names: Vec<Name>,
    pub tags: Tags,
}

impl PointOfInterest {
    /// Construct a `PointOfInterest` with the provided names and tags.
    pub fn new(id: u64, location: Coord<f64>, names: Vec<Name>, tags: Tags) -> Self {
        Self {
            id,
            location,
            names,
            tags,
        }
    }

    /// Construct a `PointOfInterest` with neither names nor tags.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use poimatch_core::{Poi, PointOfInterest};
    ///
    /// let poi = PointOfInterest::unnamed(1, Coord { x: 0.0, y: 0.0 });
    /// assert!(poi.names().is_empty());
    /// ```
    pub fn unnamed(id: u64, location: Coord<f64>) -> Self {
        Self::new(id, location, Vec::new(), Tags::new())
    }

    /// Attach a tag after resolution, e.g. a `fixme` review marker.
    ///
    /// This is the only mutation a caller performs on a reference POI;
    /// existing values under `key` are replaced.
    pub fn add_tag(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.tags.insert(key.into(), value.into());
    }
}

impl Poi for PointOfInterest {
    fn latitude(&self) -> f64 {
        self.location.y
    }

    fn longitude(&self) -> f64 {
        self.location.x
    }

    fn names(&self) -> &[Name] {
        &self.names
    }

    /// Stored tags merged with one tag per name; explicit tags win.
    fn tags(&self) -> Tags {
        let mut tags: Tags = self
            .names
            .iter()
            .map(|name| (name.key.as_tag_key().to_owned(), name.value.clone()))
            .collect();
        tags.extend(self.tags.iter().map(|(k, v)| (k.clone(), v.clone())));
        tags
    }
}
