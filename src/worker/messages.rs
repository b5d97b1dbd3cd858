//! Worker message types for the collaborator boundary.
//!
//! This module defines the request and response protocol between the store and
//! the worker that talks to the event source, geocoder, location provider and
//! key-value store. It also carries tracing context across that boundary so
//! worker spans link to the handler span that issued the request.
//!
//! Every request that can race carries a `request_id`. The store only applies
//! the response whose id is the latest one it issued for that kind.

use crate::domain::{Coordinates, EventCollection, MapEvent, Place, PlaceCollection, Viewbox};
use serde::{Deserialize, Serialize};

/// Distributed tracing context for cross-boundary span propagation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID as a hex string.
    pub trace_id: String,

    /// Parent span ID for linking spans.
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the trace and span ids of the active span.
    ///
    /// Returns `None` if the current span context is invalid or not sampled,
    /// e.g. when no OpenTelemetry layer is installed.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let span = tracing::Span::current();
        let otel_context = span.context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if span_context.is_valid() {
            Some(Self {
                trace_id: format!("{:032x}", span_context.trace_id()),
                parent_span_id: format!("{:016x}", span_context.span_id()),
            })
        } else {
            None
        }
    }
}

/// Generates constructors for `WorkerMessage` variants that attach the
/// current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Create a ", stringify!($variant), " message with current trace context")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    fetch_events(FetchEvents { request_id: u64 }),
    search_places(SearchPlaces { request_id: u64, query: String, viewbox: Option<Viewbox> }),
    request_location(RequestLocation { request_id: u64 }),
    load_favorites(LoadFavorites {}),
    set_favorite(SetFavorite { request_id: u64, event_id: String, favorite: bool }),
    load_recent_places(LoadRecentPlaces {}),
    save_recent_places(SaveRecentPlaces { places: Vec<Place> }),
}

/// Requests from the store to the worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Fetch the full event collection.
    FetchEvents {
        request_id: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Geocode `query`, biased to `viewbox`.
    SearchPlaces {
        request_id: u64,
        query: String,
        viewbox: Option<Viewbox>,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Ask for permission and a device position.
    RequestLocation {
        request_id: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load the persisted favourite ids.
    LoadFavorites {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist one favourite change.
    SetFavorite {
        request_id: u64,
        event_id: String,
        favorite: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Load the recent place searches.
    LoadRecentPlaces {
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Persist the recent place searches, newest first.
    SaveRecentPlaces {
        places: Vec<Place>,
        #[serde(skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Tracing context attached to the message, if any.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::FetchEvents { trace_context, .. }
            | Self::SearchPlaces { trace_context, .. }
            | Self::RequestLocation { trace_context, .. }
            | Self::LoadFavorites { trace_context }
            | Self::SetFavorite { trace_context, .. }
            | Self::LoadRecentPlaces { trace_context }
            | Self::SaveRecentPlaces { trace_context, .. } => trace_context.as_ref(),
        }
    }

    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FetchEvents { .. } => "fetch_events",
            Self::SearchPlaces { .. } => "search_places",
            Self::RequestLocation { .. } => "request_location",
            Self::LoadFavorites { .. } => "load_favorites",
            Self::SetFavorite { .. } => "set_favorite",
            Self::LoadRecentPlaces { .. } => "load_recent_places",
            Self::SaveRecentPlaces { .. } => "save_recent_places",
        }
    }
}

/// Responses from the worker back to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// The event source delivered a collection.
    EventsLoaded {
        request_id: u64,
        events: Vec<MapEvent>,
    },

    /// The event source failed; the store falls back to the snapshot.
    EventsFetchFailed { request_id: u64, message: String },

    /// Geocoding finished. Failures arrive as an empty collection.
    PlacesFound {
        request_id: u64,
        query: String,
        places: PlaceCollection,
    },

    /// A device position was acquired.
    LocationFixed {
        request_id: u64,
        location: Coordinates,
    },

    /// Permission was denied or no position was available.
    LocationDenied { request_id: u64 },

    FavoritesLoaded { favorites: Vec<String> },

    FavoriteSaved { request_id: u64 },

    FavoriteFailed { request_id: u64, message: String },

    RecentPlacesLoaded { places: Vec<Place> },

    RecentPlacesSaved { count: usize },

    /// An operation without a dedicated failure response failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

impl WorkerResponse {
    /// Builds an `EventsLoaded` response from a collection.
    #[must_use]
    pub fn events_loaded(request_id: u64, collection: &EventCollection) -> Self {
        Self::EventsLoaded {
            request_id,
            events: collection.to_vec(),
        }
    }
}
