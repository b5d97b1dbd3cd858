//! Event source collaborators and the bundled snapshot.

use crate::domain::error::{EventMapError, Result};
use crate::domain::{EventCollection, EventFeatureCollection};
use crate::storage::EventRecord;
use std::path::PathBuf;

/// Static event set compiled into the binary. Used as the initial collection
/// and whenever a fetch fails.
const BUNDLED_EVENTS: &str = include_str!("../../assets/events.json");

/// Delivers the full event collection.
pub trait EventSource: Send {
    /// Fetches every event.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Fetch`] on transport or parse failures.
    fn fetch_events(&mut self) -> Result<EventCollection>;
}

/// Parses an event document: either a JSON array of backend rows or a
/// GeoJSON `FeatureCollection` of events.
///
/// # Errors
///
/// Fails on malformed JSON, bad geometries and duplicate ids.
pub fn parse_events_json(text: &str) -> Result<EventCollection> {
    let value: serde_json::Value = serde_json::from_str(text)?;
    if value.is_array() {
        let records: Vec<EventRecord> = serde_json::from_value(value)?;
        let events = records
            .into_iter()
            .map(EventRecord::into_event)
            .collect::<Result<Vec<_>>>()?;
        EventCollection::new(events)
    } else {
        let collection: EventFeatureCollection = serde_json::from_value(value)?;
        EventCollection::from_features(collection)
    }
}

/// The compiled-in snapshot.
///
/// # Errors
///
/// Only fails if the bundled asset itself is malformed.
pub fn bundled_snapshot() -> Result<EventCollection> {
    parse_events_json(BUNDLED_EVENTS)
}

/// Reads events from a JSON export on disk.
#[derive(Debug, Clone)]
pub struct FileEventSource {
    path: PathBuf,
}

impl FileEventSource {
    #[must_use]
    pub const fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl EventSource for FileEventSource {
    fn fetch_events(&mut self) -> Result<EventCollection> {
        let _span = tracing::debug_span!("file_fetch_events", path = ?self.path).entered();
        let text = std::fs::read_to_string(&self.path)
            .map_err(|e| EventMapError::Fetch(format!("{}: {e}", self.path.display())))?;
        let collection = parse_events_json(&text).map_err(|e| EventMapError::Fetch(e.to_string()))?;
        tracing::debug!(event_count = collection.len(), "events fetched");
        Ok(collection)
    }
}

/// Serves the bundled snapshot. Used when no export file is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledEventSource;

impl EventSource for BundledEventSource {
    fn fetch_events(&mut self) -> Result<EventCollection> {
        bundled_snapshot().map_err(|e| EventMapError::Fetch(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_snapshot_covers_every_marker_type() {
        let snapshot = bundled_snapshot().unwrap();
        let types = snapshot.types();
        for expected in ["music", "sport", "conference", "art", "theatre", "festival"] {
            assert!(types.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[test]
    fn reads_backend_rows_and_geojson() {
        let dir = tempfile::tempdir().unwrap();

        let rows = dir.path().join("rows.json");
        std::fs::write(
            &rows,
            r#"[{"id":1,"title":"A","event_time":"2024-01-01","type":"art","geometry":"POINT(1 2)"}]"#,
        )
        .unwrap();
        assert_eq!(FileEventSource::new(rows).fetch_events().unwrap().len(), 1);

        let features = dir.path().join("features.json");
        std::fs::write(
            &features,
            r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[1,2]},"properties":{"id":"x","name":"B","type":"sport","date":"2024-01-01"}}]}"#,
        )
        .unwrap();
        assert_eq!(FileEventSource::new(features).fetch_events().unwrap().len(), 1);
    }

    #[test]
    fn missing_or_broken_files_are_fetch_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = FileEventSource::new(dir.path().join("nope.json")).fetch_events();
        assert!(matches!(missing, Err(EventMapError::Fetch(_))));

        let broken = dir.path().join("broken.json");
        std::fs::write(&broken, r#"[{"id":1,"title":"A","event_time":"x","type":"art","geometry":"nowhere"}]"#).unwrap();
        assert!(matches!(FileEventSource::new(broken).fetch_events(), Err(EventMapError::Fetch(_))));
    }
}
