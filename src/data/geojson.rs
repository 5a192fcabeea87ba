use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Free-form feature properties, kept in document order
pub type Properties = serde_json::Map<String, serde_json::Value>;

/// GeoJSON position: longitude, latitude and optional further elements
/// such as altitude, which are carried through unchanged.
pub type Position = Vec<f64>;

/// Extra top-level members of a feature or collection, kept verbatim
pub type ForeignMembers = serde_json::Map<String, serde_json::Value>;

/// GeoJSON geometry types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point {
        coordinates: Position,
    },
    LineString {
        coordinates: Vec<Position>,
    },
    Polygon {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPoint {
        coordinates: Vec<Position>,
    },
    MultiLineString {
        coordinates: Vec<Vec<Position>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Position>>>,
    },
    GeometryCollection {
        geometries: Vec<Geometry>,
    },
}

impl Geometry {
    pub fn point(position: LatLng) -> Self {
        Geometry::Point {
            coordinates: position.to_position(),
        }
    }

    /// Single-ring polygon. The ring is written as drawn, without repeating
    /// the first vertex.
    pub fn polygon(ring: &[LatLng]) -> Self {
        Geometry::Polygon {
            coordinates: vec![ring.iter().map(|p| p.to_position()).collect()],
        }
    }

    /// `None` for other geometry types and for positions with fewer than
    /// two elements.
    pub fn as_point(&self) -> Option<LatLng> {
        match self {
            Geometry::Point { coordinates } => LatLng::from_position(coordinates),
            _ => None,
        }
    }

    /// Outer ring of a polygon, skipping short positions
    pub fn exterior_ring(&self) -> Option<Vec<LatLng>> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.first().map(|ring| {
                ring.iter()
                    .filter_map(|position| LatLng::from_position(position))
                    .collect()
            }),
            _ => None,
        }
    }
}

/// Marker for the `"type": "Feature"` member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FeatureType {
    #[default]
    Feature,
}

/// Marker for the `"type": "FeatureCollection"` member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollectionType {
    #[default]
    FeatureCollection,
}

/// GeoJSON feature with geometry and properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    #[serde(flatten)]
    pub foreign_members: ForeignMembers,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            kind: FeatureType::Feature,
            id: None,
            geometry: Some(geometry),
            properties: Some(properties),
            bbox: None,
            foreign_members: ForeignMembers::new(),
        }
    }

    pub fn position(&self) -> Option<LatLng> {
        self.geometry.as_ref().and_then(Geometry::as_point)
    }

    /// String property, if present and a string
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|props| props.get(key))
            .and_then(|value| value.as_str())
    }
}

/// The exchange and storage container for POIs and polygons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,
    #[serde(flatten)]
    pub foreign_members: ForeignMembers,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionType::FeatureCollection,
            features,
            bbox: None,
            foreign_members: ForeignMembers::new(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Parses a collection, reporting anything that is not a well-formed
    /// FeatureCollection as [`crate::Error::InvalidGeoJson`]
    pub fn from_json(raw: &str) -> crate::Result<Self> {
        serde_json::from_str(raw).map_err(|e| crate::Error::InvalidGeoJson(e.to_string()))
    }

    /// Pretty-printed, two-space indented, non-ASCII kept literal
    pub fn to_pretty_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::empty()
    }
}
