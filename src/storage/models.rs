//! Storage record models for the persistence layer.
//!
//! These are the raw shapes delivered by the event backend. They are kept
//! apart from the domain [`MapEvent`] so the backend's column names and its
//! PostGIS geometry encoding never leak into the engine.

use crate::domain::error::Result;
use crate::domain::{format_postgis_point, parse_postgis_point, MapEvent};
use serde::{Deserialize, Serialize};

/// One row of the backend `events` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Backend ids are numeric in some exports and textual in others.
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub description: Option<String>,

    /// ISO-8601 timestamp.
    pub event_time: String,

    #[serde(rename = "type")]
    pub event_type: String,

    #[serde(default)]
    pub event_url: Option<String>,

    #[serde(default)]
    pub photo_url: Option<String>,

    /// `POINT(lng lat)` or `SRID=4326;POINT(lng lat)`.
    pub geometry: String,
}

impl EventRecord {
    /// Converts the row into a domain event.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Geometry`](crate::domain::EventMapError::Geometry)
    /// if `geometry` is not a PostGIS point.
    ///
    /// # Examples
    ///
    /// ```
    /// use eventmap::storage::EventRecord;
    ///
    /// let record: EventRecord = serde_json::from_str(r#"{
    ///     "id": 3, "title": "Summer fest", "event_time": "2024-07-01T18:00:00Z",
    ///     "type": "festival", "geometry": "SRID=4326;POINT(13.4 52.5)"
    /// }"#).unwrap();
    /// let event = record.into_event().unwrap();
    /// assert_eq!(event.id, "3");
    /// assert_eq!(event.coordinates.latitude, 52.5);
    /// ```
    pub fn into_event(self) -> Result<MapEvent> {
        let coordinates = parse_postgis_point(&self.geometry)?;
        Ok(MapEvent {
            id: self.id,
            name: self.title,
            event_type: self.event_type,
            description: self.description.unwrap_or_default(),
            date: self.event_time,
            link: self.event_url.unwrap_or_default(),
            photo: self.photo_url.unwrap_or_default(),
            coordinates,
        })
    }
}

impl From<&MapEvent> for EventRecord {
    fn from(event: &MapEvent) -> Self {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            id: event.id.clone(),
            title: event.name.clone(),
            description: non_empty(&event.description),
            event_time: event.date.clone(),
            event_type: event.event_type.clone(),
            event_url: non_empty(&event.link),
            photo_url: non_empty(&event.photo),
            geometry: format_postgis_point(event.coordinates),
        }
    }
}

fn id_as_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}
