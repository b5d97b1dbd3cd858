//! Eventmap: filtering, sorting and map/list synchronization for a map of
//! geolocated events.
//!
//! The crate takes an event collection, a set of independent filter
//! predicates (type, free-text search, date interval) and a sort criterion
//! (distance to the map center, distance to the user, or date), and maintains
//! one derived display order shared by a map clusterer and a scrollable list.
//! Around it sit the single-open-panel state machine that routes the shared
//! search input, and the viewport synchronizer that keeps map, list and
//! selection from fighting each other.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  CLI Shim (main.rs)                                 │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← Store + handler
//! │  - Filter pipeline, sort engine                     │
//! │  - Panel coordinator, viewport sync                 │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ Worker Layer  │
//! │ (ui/)         │   │ (storage/)    │   │ (worker/)     │
//! │ - View model  │   │ - JSON store  │   │ - Requests    │
//! │ - Text render │   │ - Records     │   │ - Responses   │
//! │ - Colours     │   │               │   │ - Trace ctx   │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Collaborators: events, geocoding, location       │
//! │  - Events, places, geo primitives, errors           │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │  ← Optional
//! │  - OpenTelemetry spans to a rotating file           │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`app`]: Store, event handler and the engine components
//! - [`domain`]: Events, places, geo primitives and errors
//! - [`infrastructure`]: Collaborator traits with local implementations
//! - [`storage`]: Key-value persistence and backend record models
//! - [`worker`]: Request/response boundary to the collaborators
//! - [`ui`]: View model, text renderer and marker colours
//! - [`observability`]: Tracing setup
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::{Action, PanelKind};
//! use eventmap::worker::EventMapWorker;
//! use eventmap::{handle_event, initialize, Config, Event};
//! use std::time::Instant;
//!
//! let config = Config {
//!     data_dir: std::env::temp_dir().join("eventmap-lib-doc"),
//!     ..Default::default()
//! };
//! let mut state = initialize(&config);
//! let mut worker = EventMapWorker::from_config(&config)?;
//!
//! let (_, actions) = handle_event(&mut state, &Event::Mounted, Instant::now())?;
//! for action in actions {
//!     if let Action::PostToWorker(message) = action {
//!         let response = worker.handle_message(message);
//!         handle_event(&mut state, &Event::WorkerResponse(response), Instant::now())?;
//!     }
//! }
//! handle_event(&mut state, &Event::OpenPanel(PanelKind::Type), Instant::now())?;
//! assert!(!state.visible_types().is_empty());
//! # Ok::<(), eventmap::EventMapError>(())
//! ```

#![allow(clippy::multiple_crate_versions)]

pub mod app;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod storage;
pub mod ui;
pub mod worker;

pub use app::{handle_event, Action, AppState, Event};
pub use domain::{Coordinates, EventMapError, MapEvent, Result};
pub use ui::Theme;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Latitude of the fallback map center (Germany).
pub const DEFAULT_CENTER_LATITUDE: f64 = 51.1657;
/// Longitude of the fallback map center.
pub const DEFAULT_CENTER_LONGITUDE: f64 = 10.4515;
/// Span in degrees of the fallback region.
pub const DEFAULT_CENTER_SPAN_DEG: f64 = 30.0;

/// Runtime configuration.
///
/// Parsed from `key=value` pairs ([`Config::from_map`]) or a TOML file
/// ([`Config::from_toml_file`]) with the same keys. Unknown keys are ignored
/// and malformed values keep their default.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON snapshot read by the file event source. Bundled data when unset.
    pub events_file: Option<PathBuf>,

    /// GeoJSON gazetteer for offline geocoding. Bundled places when unset.
    pub gazetteer_file: Option<PathBuf>,

    /// Storage and span files.
    pub data_dir: PathBuf,

    /// Throttle window for observed-region updates feeding the sort.
    pub viewport_throttle_ms: u64,

    pub geocode_debounce_ms: u64,

    /// Region span used when focusing an event, place or the user.
    pub detail_span_deg: f64,

    /// Fallback controlled center (`default_center = "lat,lon"`).
    pub default_center: Coordinates,

    pub default_span_deg: f64,

    /// Position reported by the location collaborator
    /// (`user_location = "lat,lon"`). `None` behaves as a denied permission.
    pub user_location: Option<Coordinates>,

    /// Whether closing a filter panel also clears the search text.
    pub clear_search_on_close: bool,

    pub recent_places_limit: usize,

    /// TOML marker-colour theme.
    pub theme_file: Option<PathBuf>,

    /// `EnvFilter` directive. Default: `"info"`
    pub trace_level: String,

    /// Also log human-readable lines to stderr.
    pub log_to_stderr: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            events_file: None,
            gazetteer_file: None,
            data_dir: infrastructure::get_data_dir(),
            viewport_throttle_ms: 500,
            geocode_debounce_ms: 500,
            detail_span_deg: 0.1,
            default_center: Coordinates::new(DEFAULT_CENTER_LONGITUDE, DEFAULT_CENTER_LATITUDE),
            default_span_deg: DEFAULT_CENTER_SPAN_DEG,
            user_location: None,
            clear_search_on_close: true,
            recent_places_limit: 10,
            theme_file: None,
            trace_level: "info".to_string(),
            log_to_stderr: false,
        }
    }
}

impl Config {
    /// Parses configuration from string pairs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use eventmap::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("viewport_throttle_ms".to_string(), "750".to_string());
    /// map.insert("user_location".to_string(), "52.52, 13.405".to_string());
    /// map.insert("recent_places_limit".to_string(), "lots".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.viewport_throttle_ms, 750);
    /// assert_eq!(config.user_location.unwrap().latitude, 52.52);
    /// assert_eq!(config.recent_places_limit, 10);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        let defaults = Self::default();
        let path = |key: &str| {
            map.get(key)
                .map(|s| s.trim())
                .filter(|s| !s.is_empty())
                .map(infrastructure::expand_tilde)
        };

        Self {
            events_file: path("events_file"),
            gazetteer_file: path("gazetteer_file"),
            data_dir: path("data_dir").unwrap_or(defaults.data_dir),
            viewport_throttle_ms: parse_or(map, "viewport_throttle_ms", defaults.viewport_throttle_ms),
            geocode_debounce_ms: parse_or(map, "geocode_debounce_ms", defaults.geocode_debounce_ms),
            detail_span_deg: parse_or(map, "detail_span_deg", defaults.detail_span_deg),
            default_center: map
                .get("default_center")
                .and_then(|s| parse_lat_lon(s))
                .unwrap_or(defaults.default_center),
            default_span_deg: parse_or(map, "default_span_deg", defaults.default_span_deg),
            user_location: map
                .get("user_location")
                .and_then(|s| parse_lat_lon(s)),
            clear_search_on_close: parse_or(map, "clear_search_on_close", defaults.clear_search_on_close),
            recent_places_limit: parse_or(map, "recent_places_limit", defaults.recent_places_limit),
            theme_file: path("theme_file"),
            trace_level: map
                .get("trace_level")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.trace_level),
            log_to_stderr: parse_or(map, "log_to_stderr", defaults.log_to_stderr),
        }
    }

    /// Reads a flat TOML table with the keys of [`Config::from_map`].
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Config`] if the file cannot be read or is not
    /// valid TOML.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EventMapError::Config(format!("failed to read config file {}: {e}", path.display())))?;
        Self::from_toml(&contents)
    }

    /// Parses a flat TOML table.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Config`] on malformed TOML.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Self::toml_pairs(contents).map(|pairs| Self::from_map(&pairs))
    }

    /// Flattens a TOML table into the string pairs [`Config::from_map`]
    /// reads. Non-string scalars keep their TOML spelling.
    ///
    /// # Errors
    ///
    /// Returns [`EventMapError::Config`] on malformed TOML.
    pub fn toml_pairs(contents: &str) -> Result<BTreeMap<String, String>> {
        let table: toml::Table =
            toml::from_str(contents).map_err(|e| EventMapError::Config(format!("failed to parse config TOML: {e}")))?;

        Ok(table
            .into_iter()
            .map(|(key, value)| match value {
                toml::Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect())
    }
}

fn parse_or<T: FromStr>(map: &BTreeMap<String, String>, key: &str, default: T) -> T {
    match map.get(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "malformed configuration value, using default");
            default
        }),
    }
}

/// Parses `"lat,lon"`.
fn parse_lat_lon(raw: &str) -> Option<Coordinates> {
    let (lat, lon) = raw.split_once(',')?;
    let latitude: f64 = lat.trim().parse().ok()?;
    let longitude: f64 = lon.trim().parse().ok()?;
    ((-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude))
        .then(|| Coordinates::new(longitude, latitude))
}

/// Builds the store for `config`.
///
/// Loads the theme file when one is configured, falling back to the built-in
/// palette on any error. The store starts with the bundled snapshot; the
/// `Event::Mounted` requests replace it with fetched data.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!("initializing event map store");

    let theme = config.theme_file.as_ref().map_or_else(Theme::default, |theme_file| {
        Theme::from_file(theme_file).unwrap_or_else(|e| {
            tracing::warn!(theme_file = %theme_file.display(), error = %e, "failed to load theme from file, using default");
            Theme::default()
        })
    });

    AppState::new(config, theme)
}
