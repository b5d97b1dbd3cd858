//! Event domain model and the immutable event collection.
//!
//! A [`MapEvent`] is a geolocated happening shown as a marker and a list row.
//! Events are loaded wholesale into an [`EventCollection`], which keeps source
//! order and guarantees unique ids. Collections are never patched in place; a
//! reload builds a new one.

use super::error::{EventMapError, Result};
use super::geo::Coordinates;
use super::geojson::{Feature, FeatureCollection, Geometry};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A geolocated event.
///
/// `date` is kept as the ISO-8601 string delivered by the source; parsing
/// happens on demand via [`MapEvent::parsed_date`] so that malformed dates
/// survive loading and only affect filtering and sorting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEvent {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub description: String,
    pub date: String,
    pub link: String,
    pub photo: String,
    pub coordinates: Coordinates,
}

impl MapEvent {
    /// Parses `date` as an instant.
    ///
    /// Accepts RFC 3339 timestamps, offset-less `YYYY-MM-DDTHH:MM:SS[.fff]`
    /// (read as UTC) and bare `YYYY-MM-DD` dates (midnight UTC). Anything else
    /// yields `None`.
    ///
    /// ```
    /// use eventmap::domain::{Coordinates, MapEvent};
    ///
    /// let mut event = MapEvent {
    ///     id: "1".into(),
    ///     name: "Jazz night".into(),
    ///     event_type: "music".into(),
    ///     description: String::new(),
    ///     date: "2024-06-01".into(),
    ///     link: String::new(),
    ///     photo: String::new(),
    ///     coordinates: Coordinates::new(10.0, 50.0),
    /// };
    /// assert!(event.parsed_date().is_some());
    /// event.date = "next friday".into();
    /// assert!(event.parsed_date().is_none());
    /// ```
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<Utc>> {
        parse_event_date(&self.date)
    }
}

/// Parses an event date string; see [`MapEvent::parsed_date`].
#[must_use]
pub fn parse_event_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Event properties as they appear in a GeoJSON event feature.
///
/// Ids may be numeric in backend exports, so both forms are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventProperties {
    pub id: FeatureId,
    pub name: String,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub description: String,
    pub date: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub photo: String,
}

/// A feature id that is either a string or a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// GeoJSON feature collection of events.
pub type EventFeatureCollection = FeatureCollection<EventProperties>;

impl TryFrom<Feature<EventProperties>> for MapEvent {
    type Error = EventMapError;

    fn try_from(feature: Feature<EventProperties>) -> Result<Self> {
        let coordinates = feature.geometry.as_point().ok_or_else(|| {
            EventMapError::Geometry(format!(
                "event {} has no point geometry",
                feature.properties.id
            ))
        })?;
        let p = feature.properties;
        Ok(Self {
            id: p.id.to_string(),
            name: p.name,
            event_type: p.event_type,
            description: p.description,
            date: p.date,
            link: p.link,
            photo: p.photo,
            coordinates,
        })
    }
}

impl From<&MapEvent> for Feature<EventProperties> {
    fn from(event: &MapEvent) -> Self {
        Self {
            kind: "Feature".to_string(),
            geometry: Geometry::point(event.coordinates),
            properties: EventProperties {
                id: FeatureId::Text(event.id.clone()),
                name: event.name.clone(),
                event_type: event.event_type.clone(),
                description: event.description.clone(),
                date: event.date.clone(),
                link: event.link.clone(),
                photo: event.photo.clone(),
            },
        }
    }
}

/// Ordered, id-unique set of events shared by reference with derived views.
#[derive(Debug, Clone, Default)]
pub struct EventCollection {
    events: Vec<Arc<MapEvent>>,
    by_id: HashMap<String, usize>,
}

impl EventCollection {
    /// Builds a collection, keeping source order.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::DuplicateEventId`] if two events share an id.
    pub fn new(events: Vec<MapEvent>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(events.len());
        for (index, event) in events.iter().enumerate() {
            if by_id.insert(event.id.clone(), index).is_some() {
                return Err(EventMapError::DuplicateEventId(event.id.clone()));
            }
        }
        Ok(Self {
            events: events.into_iter().map(Arc::new).collect(),
            by_id,
        })
    }

    /// Converts a GeoJSON event collection.
    ///
    /// # Errors
    ///
    /// Fails on non-point geometries and duplicate ids.
    pub fn from_features(collection: EventFeatureCollection) -> Result<Self> {
        let events = collection
            .features
            .into_iter()
            .map(MapEvent::try_from)
            .collect::<Result<Vec<_>>>()?;
        Self::new(events)
    }

    #[must_use]
    pub fn events(&self) -> &[Arc<MapEvent>] {
        &self.events
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Arc<MapEvent>> {
        self.by_id.get(id).and_then(|&i| self.events.get(i))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct event types in first-seen order. This is the "universe" the
    /// type filter is measured against.
    #[must_use]
    pub fn types(&self) -> Vec<String> {
        let mut seen = std::collections::HashSet::new();
        self.events
            .iter()
            .filter(|e| seen.insert(e.event_type.as_str()))
            .map(|e| e.event_type.clone())
            .collect()
    }

    /// Plain copies of the events, e.g. for handing to the worker.
    #[must_use]
    pub fn to_vec(&self) -> Vec<MapEvent> {
        self.events.iter().map(|e| MapEvent::clone(e)).collect()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn event(id: &str, name: &str, event_type: &str, date: &str, lon: f64, lat: f64) -> MapEvent {
        MapEvent {
            id: id.to_string(),
            name: name.to_string(),
            event_type: event_type.to_string(),
            description: String::new(),
            date: date.to_string(),
            link: String::new(),
            photo: String::new(),
            coordinates: Coordinates::new(lon, lat),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let events = vec![
            event("a", "One", "music", "2024-01-01", 0.0, 0.0),
            event("a", "Two", "art", "2024-01-02", 1.0, 1.0),
        ];
        assert!(matches!(
            EventCollection::new(events),
            Err(EventMapError::DuplicateEventId(id)) if id == "a"
        ));
    }

    #[test]
    fn types_are_distinct_in_source_order() {
        let collection = EventCollection::new(vec![
            event("1", "A", "sport", "2024-01-01", 0.0, 0.0),
            event("2", "B", "music", "2024-01-01", 0.0, 0.0),
            event("3", "C", "sport", "2024-01-01", 0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(collection.types(), vec!["sport", "music"]);
        assert_eq!(collection.get("2").map(|e| e.name.as_str()), Some("B"));
    }

    #[test]
    fn parses_the_supported_date_shapes() {
        assert!(parse_event_date("2024-06-01T18:30:00Z").is_some());
        assert!(parse_event_date("2024-06-01T18:30:00.000+02:00").is_some());
        assert!(parse_event_date("2024-06-01T18:30:00").is_some());
        assert!(parse_event_date("2024-06-01").is_some());
        assert!(parse_event_date("01/06/2024").is_none());
        assert!(parse_event_date("").is_none());
    }

    #[test]
    fn converts_geojson_features_with_numeric_ids() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": { "type": "Point", "coordinates": [13.4, 52.5] },
                "properties": { "id": 7, "name": "Open air", "type": "festival", "date": "2024-07-01" }
            }]
        }"#;
        let parsed: EventFeatureCollection = serde_json::from_str(json).unwrap();
        let collection = EventCollection::from_features(parsed).unwrap();
        let only = &collection.events()[0];
        assert_eq!(only.id, "7");
        assert_eq!(only.coordinates, Coordinates::new(13.4, 52.5));
    }
}
