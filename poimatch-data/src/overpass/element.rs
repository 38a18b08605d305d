//! Overpass JSON response types.
//!
//! Only the fields the matcher and downstream edit tooling need are kept.
//! See <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL#JSON>.

use poimatch_core::{Name, NameKey, Poi, Tags};
use serde::{Deserialize, Serialize};

/// Top-level Overpass response.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct OverpassResponse {
    /// Matching elements, in service order.
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// OpenStreetMap object kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    /// A single point.
    Node,
    /// An ordered list of nodes.
    Way,
    /// A group of members.
    Relation,
}

/// An element returned by the query service, usable as a match candidate.
///
/// Ways and relations carry no coordinates under `out meta` and sit at
/// `(0, 0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawElement")]
pub struct OverpassElement {
    /// Object kind.
    #[serde(rename = "type")]
    pub element_type: ElementType,
    /// OpenStreetMap id, unique per kind.
    pub id: u64,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lon: f64,
    /// Last edit timestamp.
    pub timestamp: String,
    /// Object version.
    pub version: u32,
    /// Changeset of the last edit.
    pub changeset: u64,
    /// Last editor.
    pub user: String,
    /// Last editor's id.
    pub uid: u64,
    /// Raw tags.
    pub tags: Tags,
    /// Member node ids of a way.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<u64>,
    #[serde(skip)]
    names: Vec<Name>,
}

#[derive(Deserialize)]
struct RawElement {
    #[serde(rename = "type")]
    element_type: ElementType,
    id: u64,
    #[serde(default)]
    lat: f64,
    #[serde(default)]
    lon: f64,
    #[serde(default)]
    timestamp: String,
    #[serde(default)]
    version: u32,
    #[serde(default)]
    changeset: u64,
    #[serde(default)]
    user: String,
    #[serde(default)]
    uid: u64,
    #[serde(default)]
    tags: Tags,
    #[serde(default)]
    nodes: Vec<u64>,
}

impl From<RawElement> for OverpassElement {
    fn from(raw: RawElement) -> Self {
        let names = names_from_tags(&raw.tags);
        Self {
            element_type: raw.element_type,
            id: raw.id,
            lat: raw.lat,
            lon: raw.lon,
            timestamp: raw.timestamp,
            version: raw.version,
            changeset: raw.changeset,
            user: raw.user,
            uid: raw.uid,
            tags: raw.tags,
            nodes: raw.nodes,
            names,
        }
    }
}

/// Every tag whose key mentions `name`, ordered by key.
fn names_from_tags(tags: &Tags) -> Vec<Name> {
    let mut named: Vec<(&String, &String)> =
        tags.iter().filter(|(key, _)| key.contains("name")).collect();
    named.sort_unstable_by(|a, b| a.0.cmp(b.0));
    named
        .into_iter()
        .map(|(key, value)| Name::new(NameKey::from_tag_key(key), value.clone()))
        .collect()
}

impl OverpassElement {
    /// Build a node element, deriving names from `tags`.
    ///
    /// # Examples
    /// ```
    /// use poimatch_core::{Poi, Tags};
    /// use poimatch_data::overpass::OverpassElement;
    ///
    /// let node = OverpassElement::node(
    ///     42,
    ///     -33.96,
    ///     18.40,
    ///     Tags::from([("name".into(), "Lion's Head".into()), ("natural".into(), "peak".into())]),
    /// );
    /// assert_eq!(node.names().len(), 1);
    /// ```
    #[must_use]
    pub fn node(id: u64, lat: f64, lon: f64, tags: Tags) -> Self {
        Self::from(RawElement {
            element_type: ElementType::Node,
            id,
            lat,
            lon,
            timestamp: String::new(),
            version: 0,
            changeset: 0,
            user: String::new(),
            uid: 0,
            tags,
            nodes: Vec::new(),
        })
    }
}

impl Poi for OverpassElement {
    fn latitude(&self) -> f64 {
        self.lat
    }

    fn longitude(&self) -> f64 {
        self.lon
    }

    fn names(&self) -> &[Name] {
        &self.names
    }

    fn tags(&self) -> Tags {
        self.tags.clone()
    }
}
