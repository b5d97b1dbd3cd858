//! Worker implementation for the collaborator calls.
//!
//! The worker owns every collaborator (event source, geocoder, location
//! provider, key-value store) and turns each [`WorkerMessage`] into exactly
//! one [`WorkerResponse`]. Failures never escape as `Err`: each is mapped to
//! the response the store knows how to fall back from.

use crate::domain::error::{EventMapError, Result};
use crate::domain::{Place, PlaceCollection, Viewbox};
use crate::infrastructure::{
    paths, BundledEventSource, EventSource, FileEventSource, FixedLocationProvider, GazetteerGeocoder,
    Geocoder, LocationProvider, Permission,
};
use crate::app::recent::RECENT_PLACES_KEY;
use crate::storage::{JsonStorage, KeyValueStore, KeyValueStoreExt, FAVORITES_KEY};
use crate::worker::{WorkerMessage, WorkerResponse};
use crate::Config;
use std::collections::BTreeSet;

/// Executes collaborator requests on behalf of the store.
pub struct EventMapWorker {
    events: Box<dyn EventSource>,
    geocoder: Box<dyn Geocoder>,
    location: Box<dyn LocationProvider>,
    storage: Box<dyn KeyValueStore>,
}

impl EventMapWorker {
    /// Wires the worker to explicit collaborators.
    #[must_use]
    pub fn new(
        events: Box<dyn EventSource>,
        geocoder: Box<dyn Geocoder>,
        location: Box<dyn LocationProvider>,
        storage: Box<dyn KeyValueStore>,
    ) -> Self {
        Self {
            events,
            geocoder,
            location,
            storage,
        }
    }

    /// Builds the local collaborators described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be opened or a configured
    /// gazetteer file cannot be read.
    pub fn from_config(config: &Config) -> Result<Self> {
        let events: Box<dyn EventSource> = match &config.events_file {
            Some(path) => Box::new(FileEventSource::new(path.clone())),
            None => Box::new(BundledEventSource),
        };
        let geocoder = match &config.gazetteer_file {
            Some(path) => GazetteerGeocoder::from_file(path)?,
            None => GazetteerGeocoder::bundled()?,
        };
        let storage = JsonStorage::new(paths::store_path(&config.data_dir))?;

        Ok(Self::new(
            events,
            Box::new(geocoder),
            Box::new(FixedLocationProvider::new(config.user_location)),
            Box::new(storage),
        ))
    }

    /// Logs the outcome of a collaborator call and maps it to a response.
    fn handle_result<T, F, E>(operation: &str, result: Result<T>, on_success: F, on_error: E) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
        E: FnOnce(String) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "worker operation failed");
                on_error(format!("{operation}: {e}"))
            }
        }
    }

    fn handle_fetch_events(&mut self, request_id: u64) -> WorkerResponse {
        Self::handle_result(
            "fetch events",
            self.events.fetch_events(),
            |collection| {
                tracing::debug!(event_count = collection.len(), "events fetched");
                WorkerResponse::events_loaded(request_id, &collection)
            },
            |message| WorkerResponse::EventsFetchFailed { request_id, message },
        )
    }

    fn handle_search_places(&mut self, request_id: u64, query: String, viewbox: Option<Viewbox>) -> WorkerResponse {
        let result = self.geocoder.search_places(&query, viewbox);
        let failed_query = query.clone();
        Self::handle_result(
            "search places",
            result,
            |places| WorkerResponse::PlacesFound {
                request_id,
                query,
                places,
            },
            |_| WorkerResponse::PlacesFound {
                request_id,
                query: failed_query,
                places: PlaceCollection::empty(),
            },
        )
    }

    fn handle_request_location(&mut self, request_id: u64) -> WorkerResponse {
        if self.location.request_permission() == Permission::Denied {
            tracing::debug!("location permission denied");
            return WorkerResponse::LocationDenied { request_id };
        }
        Self::handle_result(
            "current position",
            self.location.current_position(),
            |location| WorkerResponse::LocationFixed { request_id, location },
            |_| WorkerResponse::LocationDenied { request_id },
        )
    }

    fn handle_load_favorites(&mut self) -> WorkerResponse {
        Self::handle_result(
            "load favourites",
            self.storage.get_as::<Vec<String>>(FAVORITES_KEY),
            |favorites| WorkerResponse::FavoritesLoaded {
                favorites: favorites.unwrap_or_default(),
            },
            |message| WorkerResponse::Error { message },
        )
    }

    fn handle_set_favorite(&mut self, request_id: u64, event_id: &str, favorite: bool) -> WorkerResponse {
        let result = self
            .storage
            .get_as::<BTreeSet<String>>(FAVORITES_KEY)
            .and_then(|stored| {
                let mut favorites = stored.unwrap_or_default();
                if favorite {
                    favorites.insert(event_id.to_string());
                } else {
                    favorites.remove(event_id);
                }
                self.storage.set_as(FAVORITES_KEY, &favorites)
            });
        Self::handle_result(
            "set favourite",
            result,
            |()| WorkerResponse::FavoriteSaved { request_id },
            |message| WorkerResponse::FavoriteFailed { request_id, message },
        )
    }

    fn handle_load_recent_places(&mut self) -> WorkerResponse {
        Self::handle_result(
            "load recent places",
            self.storage.get_as::<Vec<Place>>(RECENT_PLACES_KEY),
            |places| WorkerResponse::RecentPlacesLoaded {
                places: places.unwrap_or_default(),
            },
            |message| WorkerResponse::Error { message },
        )
    }

    fn handle_save_recent_places(&mut self, places: &[Place]) -> WorkerResponse {
        let count = places.len();
        Self::handle_result(
            "save recent places",
            self.storage.set_as(RECENT_PLACES_KEY, &places),
            |()| WorkerResponse::RecentPlacesSaved { count },
            |message| WorkerResponse::Error { message },
        )
    }

    /// Attaches the parent trace context carried by `message`.
    ///
    /// Returns a guard that must be held while the message is handled.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        let otel_context = opentelemetry::Context::current().with_remote_span_context(span_context);

        Some(otel_context.attach())
    }

    /// Processes one request and returns its response.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);

        let span = tracing::debug_span!("worker_handle_message", message_type = message.kind());
        let _guard = span.entered();

        match message {
            WorkerMessage::FetchEvents { request_id, .. } => self.handle_fetch_events(request_id),
            WorkerMessage::SearchPlaces {
                request_id,
                query,
                viewbox,
                ..
            } => self.handle_search_places(request_id, query, viewbox),
            WorkerMessage::RequestLocation { request_id, .. } => self.handle_request_location(request_id),
            WorkerMessage::LoadFavorites { .. } => self.handle_load_favorites(),
            WorkerMessage::SetFavorite {
                request_id,
                event_id,
                favorite,
                ..
            } => self.handle_set_favorite(request_id, &event_id, favorite),
            WorkerMessage::LoadRecentPlaces { .. } => self.handle_load_recent_places(),
            WorkerMessage::SaveRecentPlaces { places, .. } => self.handle_save_recent_places(&places),
        }
    }

    /// Decodes a JSON request, handles it and encodes the response.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Worker`] if the payload is not a request or the
    /// response cannot be encoded.
    pub fn handle_payload(&mut self, payload: &str) -> Result<String> {
        let message: WorkerMessage = serde_json::from_str(payload)
            .map_err(|e| EventMapError::Worker(format!("failed to deserialize worker message: {e}")))?;
        let response = self.handle_message(message);
        serde_json::to_string(&response)
            .map_err(|e| EventMapError::Worker(format!("failed to serialize worker response: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, EventCollection};

    struct FailingSource;

    impl EventSource for FailingSource {
        fn fetch_events(&mut self) -> Result<EventCollection> {
            Err(EventMapError::Fetch("offline".into()))
        }
    }

    struct FailingGeocoder;

    impl Geocoder for FailingGeocoder {
        fn search_places(&mut self, _query: &str, _viewbox: Option<Viewbox>) -> Result<PlaceCollection> {
            Err(EventMapError::Geocoding("rate limited".into()))
        }
    }

    fn worker(dir: &tempfile::TempDir, location: Option<Coordinates>) -> EventMapWorker {
        EventMapWorker::new(
            Box::new(FailingSource),
            Box::new(FailingGeocoder),
            Box::new(FixedLocationProvider::new(location)),
            Box::new(JsonStorage::new(dir.path().join("store.json")).unwrap()),
        )
    }

    #[test]
    fn collaborator_failures_become_fallback_responses() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(&dir, None);

        assert!(matches!(
            worker.handle_message(WorkerMessage::fetch_events(1)),
            WorkerResponse::EventsFetchFailed { request_id: 1, .. }
        ));
        assert!(matches!(
            worker.handle_message(WorkerMessage::search_places(2, "x".into(), None)),
            WorkerResponse::PlacesFound { request_id: 2, places, .. } if places.features.is_empty()
        ));
        assert_eq!(
            worker.handle_message(WorkerMessage::request_location(3)),
            WorkerResponse::LocationDenied { request_id: 3 }
        );
    }

    #[test]
    fn favourites_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(&dir, Some(Coordinates::new(1.0, 2.0)));

        assert_eq!(
            worker.handle_message(WorkerMessage::set_favorite(1, "7".into(), true)),
            WorkerResponse::FavoriteSaved { request_id: 1 }
        );
        worker.handle_message(WorkerMessage::set_favorite(2, "8".into(), true));
        worker.handle_message(WorkerMessage::set_favorite(3, "7".into(), false));
        assert_eq!(
            worker.handle_message(WorkerMessage::load_favorites()),
            WorkerResponse::FavoritesLoaded {
                favorites: vec!["8".to_string()]
            }
        );
        assert_eq!(
            worker.handle_message(WorkerMessage::request_location(4)),
            WorkerResponse::LocationFixed {
                request_id: 4,
                location: Coordinates::new(1.0, 2.0)
            }
        );
    }

    #[test]
    fn json_payloads_round_trip_through_the_worker() {
        let dir = tempfile::tempdir().unwrap();
        let mut worker = worker(&dir, None);

        let request = serde_json::to_string(&WorkerMessage::load_recent_places()).unwrap();
        let response: WorkerResponse = serde_json::from_str(&worker.handle_payload(&request).unwrap()).unwrap();
        assert_eq!(response, WorkerResponse::RecentPlacesLoaded { places: vec![] });

        assert!(matches!(worker.handle_payload("{}"), Err(EventMapError::Worker(_))));
    }
}
