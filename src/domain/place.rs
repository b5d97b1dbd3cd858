//! Places returned by the geocoding collaborator.

use super::event::FeatureId;
use super::geo::Coordinates;
use super::geojson::{Feature, FeatureCollection};
use serde::{Deserialize, Serialize};

/// Properties of a geocoded place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceProperties {
    #[serde(default)]
    pub place_id: Option<FeatureId>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A named place feature.
pub type Place = Feature<PlaceProperties>;

/// Geocoding result set.
pub type PlaceCollection = FeatureCollection<PlaceProperties>;

impl Place {
    /// Identity used to deduplicate recent searches: the `place_id` when the
    /// geocoder supplies one, otherwise the display name.
    #[must_use]
    pub fn key(&self) -> String {
        self.properties
            .place_id
            .as_ref()
            .map_or_else(|| self.properties.display_name.clone(), ToString::to_string)
    }

    /// Best human-readable label.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.properties.display_name.is_empty() {
            self.properties.name.as_deref().unwrap_or("")
        } else {
            &self.properties.display_name
        }
    }

    #[must_use]
    pub fn point(&self) -> Option<Coordinates> {
        self.geometry.as_point()
    }
}
