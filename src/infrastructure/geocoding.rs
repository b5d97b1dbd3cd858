//! Place geocoding collaborators.

use crate::domain::error::{EventMapError, Result};
use crate::domain::{Place, PlaceCollection, Viewbox};
use std::path::Path;

/// Small offline gazetteer of German cities compiled into the binary.
const BUNDLED_PLACES: &str = include_str!("../../assets/places.json");

/// Resolves free text to named places.
pub trait Geocoder: Send {
    /// Searches for places matching `query`, preferring those inside
    /// `viewbox` when one is given.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Geocoding`] when the lookup fails. Callers
    /// treat that as an empty result.
    fn search_places(&mut self, query: &str, viewbox: Option<Viewbox>) -> Result<PlaceCollection>;
}

/// Offline geocoder over a fixed list of places.
///
/// Matches are case-insensitive substrings of the place label. A viewbox
/// biases rather than bounds the result: places inside it come first.
#[derive(Debug, Clone, Default)]
pub struct GazetteerGeocoder {
    places: Vec<Place>,
}

impl GazetteerGeocoder {
    #[must_use]
    pub const fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    /// Gazetteer over the compiled-in place list.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled asset is malformed.
    pub fn bundled() -> Result<Self> {
        let collection: PlaceCollection = serde_json::from_str(BUNDLED_PLACES)?;
        Ok(Self::new(collection.features))
    }

    /// Loads a GeoJSON `FeatureCollection` of places.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a feature collection.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let collection: PlaceCollection = serde_json::from_str(&text)
            .map_err(|e| EventMapError::Geocoding(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = ?path, place_count = collection.features.len(), "gazetteer loaded");
        Ok(Self::new(collection.features))
    }
}

impl Geocoder for GazetteerGeocoder {
    fn search_places(&mut self, query: &str, viewbox: Option<Viewbox>) -> Result<PlaceCollection> {
        let _span = tracing::debug_span!("gazetteer_search", query, has_viewbox = viewbox.is_some()).entered();

        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(PlaceCollection::empty());
        }

        let mut matches: Vec<&Place> = self
            .places
            .iter()
            .filter(|p| p.label().to_lowercase().contains(&needle))
            .collect();
        if let Some(viewbox) = viewbox {
            matches.sort_by_key(|p| !p.point().is_some_and(|pt| viewbox.contains(pt)));
        }

        tracing::debug!(result_count = matches.len(), "places matched");
        Ok(PlaceCollection::new(matches.into_iter().cloned().collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geojson::Geometry;
    use crate::domain::{Coordinates, FeatureId, PlaceProperties};

    fn place(id: i64, name: &str, lon: f64, lat: f64) -> Place {
        Place {
            kind: "Feature".into(),
            geometry: Geometry::point(Coordinates::new(lon, lat)),
            properties: PlaceProperties {
                place_id: Some(FeatureId::Number(id)),
                display_name: name.into(),
                name: None,
            },
        }
    }

    #[test]
    fn viewbox_moves_nearby_places_first() {
        let mut geocoder = GazetteerGeocoder::new(vec![
            place(1, "Frankfurt am Main", 8.68, 50.11),
            place(2, "Frankfurt (Oder)", 14.55, 52.34),
        ]);

        let all = geocoder.search_places("frankfurt", None).unwrap();
        assert_eq!(all.features.len(), 2);

        let oder = Viewbox::around(Coordinates::new(14.5, 52.3), 0.1);
        let biased = geocoder.search_places("FRANKFURT", Some(oder)).unwrap();
        assert_eq!(biased.features[0].label(), "Frankfurt (Oder)");
        assert_eq!(biased.features.len(), 2);
    }

    #[test]
    fn bundled_gazetteer_knows_berlin() {
        let mut geocoder = GazetteerGeocoder::bundled().unwrap();
        let found = geocoder.search_places("berl", None).unwrap();
        assert_eq!(found.features[0].key(), "1");
    }

    #[test]
    fn blank_queries_find_nothing() {
        let mut geocoder = GazetteerGeocoder::new(vec![place(1, "Bonn", 7.1, 50.7)]);
        assert!(geocoder.search_places("  ", None).unwrap().features.is_empty());
    }
}
