//! Recently accepted places, newest first.

use crate::domain::Place;

/// Storage key the list is persisted under.
pub const RECENT_PLACES_KEY: &str = "last-searched";

#[derive(Debug, Clone)]
pub struct RecentPlaces {
    places: Vec<Place>,
    limit: usize,
}

impl RecentPlaces {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            places: Vec::new(),
            limit,
        }
    }

    #[must_use]
    pub fn places(&self) -> &[Place] {
        &self.places
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Moves `place` to the front, dropping older entries with the same key
    /// and anything beyond the limit.
    pub fn remember(&mut self, place: Place) {
        let key = place.key();
        self.places.retain(|p| p.key() != key);
        self.places.insert(0, place);
        self.places.truncate(self.limit);
    }

    /// Replaces the list with a persisted one, enforcing the same rules.
    pub fn restore(&mut self, places: Vec<Place>) {
        self.places.clear();
        for place in places.into_iter().rev() {
            self.remember(place);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::geojson::Geometry;
    use crate::domain::{Coordinates, FeatureId, PlaceProperties};

    fn place(id: i64, name: &str) -> Place {
        Place {
            kind: "Feature".into(),
            geometry: Geometry::point(Coordinates::new(0.0, 0.0)),
            properties: PlaceProperties {
                place_id: Some(FeatureId::Number(id)),
                display_name: name.into(),
                name: None,
            },
        }
    }

    #[test]
    fn remembers_newest_first_without_duplicates() {
        let mut recent = RecentPlaces::new(10);
        recent.remember(place(1, "Berlin"));
        recent.remember(place(2, "Hamburg"));
        recent.remember(place(1, "Berlin"));

        let labels: Vec<_> = recent.places().iter().map(Place::label).collect();
        assert_eq!(labels, vec!["Berlin", "Hamburg"]);
    }

    #[test]
    fn keeps_at_most_the_limit() {
        let mut recent = RecentPlaces::new(3);
        for i in 0..5 {
            recent.remember(place(i, &format!("P{i}")));
        }
        let labels: Vec<_> = recent.places().iter().map(Place::label).collect();
        assert_eq!(labels, vec!["P4", "P3", "P2"]);
    }

    #[test]
    fn restore_preserves_persisted_order() {
        let mut recent = RecentPlaces::new(10);
        recent.restore(vec![place(3, "C"), place(2, "B"), place(3, "C again")]);
        let labels: Vec<_> = recent.places().iter().map(Place::label).collect();
        assert_eq!(labels, vec!["C", "B"]);
    }
}
