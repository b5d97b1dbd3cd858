//! Minimal GeoJSON feature types shared by events and places.
//!
//! Only what the engine consumes is modelled: a feature collection of features
//! with a typed property bag and a geometry that may or may not be a point.

use super::geo::Coordinates;
use serde::{Deserialize, Serialize};

/// A GeoJSON geometry. Non-point geometries are carried but never positioned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl Geometry {
    #[must_use]
    pub fn point(at: Coordinates) -> Self {
        Self {
            kind: "Point".to_string(),
            coordinates: serde_json::json!(at.to_position()),
        }
    }

    /// Coordinates of a `Point` geometry; `None` for every other shape.
    #[must_use]
    pub fn as_point(&self) -> Option<Coordinates> {
        if self.kind != "Point" {
            return None;
        }
        let position: Vec<f64> = serde_json::from_value(self.coordinates.clone()).ok()?;
        Coordinates::from_position(&position)
    }
}

/// A GeoJSON feature with properties of type `P`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature<P> {
    #[serde(rename = "type", default = "feature_tag")]
    pub kind: String,
    pub geometry: Geometry,
    pub properties: P,
}

/// A GeoJSON feature collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection<P> {
    #[serde(rename = "type", default = "collection_tag")]
    pub kind: String,
    #[serde(default = "Vec::new")]
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    #[must_use]
    pub fn new(features: Vec<Feature<P>>) -> Self {
        Self {
            kind: collection_tag(),
            features,
        }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }
}

fn feature_tag() -> String {
    "Feature".to_string()
}

fn collection_tag() -> String {
    "FeatureCollection".to_string()
}
