//! Application state container and view model computation.
//!
//! This module defines [`AppState`], the single store behind the main screen.
//! It owns the event collection, committed filter state, panel coordinator,
//! viewport synchronizer and the derived filtered and display views.
//!
//! # Derived Views
//!
//! The filtered collection and the display order are never patched. After
//! every handled event [`AppState::sync_derived`] compares the inputs they
//! depend on with the ones they were last built from and rebuilds whichever
//! is stale:
//!
//! - filtered: events generation + [`FilterState`]
//! - display: filtered + [`SortCriterion`] + reference point
//!
//! Which input changed never matters, only whether any did.
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::AppState;
//! use eventmap::ui::theme::Theme;
//! use eventmap::Config;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! state.sync_derived();
//! let viewmodel = state.compute_viewmodel();
//! assert_eq!(viewmodel.header.title, format!("Events: {}", state.display.len()));
//! ```

use super::favorites::FavoritesCache;
use super::filter::{apply_filters, filter_type_list, FilterState};
use super::modes::{Panel, SortCriterion};
use super::panel::PanelCoordinator;
use super::recent::RecentPlaces;
use super::sort::{sort_events, SortedEvent};
use super::timers::Debouncer;
use super::viewport::ViewportSync;
use crate::domain::{Coordinates, EventCollection, MapEvent, Place, PlaceCollection, Region};
use crate::infrastructure::bundled_snapshot;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    DisplayItem, EmptyState, FilterIndicators, HeaderInfo, PanelView, PlaceItem, SearchBarInfo, TypeItem,
    UIViewModel,
};
use crate::Config;
use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Kinds of asynchronous request whose responses may go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestKind {
    Events,
    Places,
    Location,
    Favorite,
}

/// Monotonic request ids with the latest id issued per kind.
#[derive(Debug, Clone, Default)]
pub struct RequestIds {
    last: u64,
    latest: BTreeMap<RequestKind, u64>,
}

impl RequestIds {
    /// Issues a new id for `kind`, superseding earlier ones.
    pub fn next(&mut self, kind: RequestKind) -> u64 {
        self.last += 1;
        self.latest.insert(kind, self.last);
        self.last
    }

    /// Whether `id` is the most recent request of `kind`.
    #[must_use]
    pub fn is_latest(&self, kind: RequestKind, id: u64) -> bool {
        self.latest.get(&kind) == Some(&id)
    }

    /// Makes every outstanding request of `kind` stale.
    pub fn invalidate(&mut self, kind: RequestKind) {
        self.latest.remove(&kind);
    }
}

#[derive(Debug, Clone, PartialEq)]
struct FilteredKey {
    generation: u64,
    filter: FilterState,
}

#[derive(Debug, Clone, PartialEq)]
struct DisplayKey {
    filtered: FilteredKey,
    criterion: SortCriterion,
    reference: Option<Coordinates>,
}

/// Central state container of the main screen.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Current event collection. Starts as the bundled snapshot.
    pub events: EventCollection,

    /// Distinct types of `events` in source order.
    pub type_universe: Vec<String>,

    /// Committed filter state.
    pub filter: FilterState,

    /// Open panel, local panel selections and the shared search input.
    pub panels: PanelCoordinator,

    /// Controlled/observed regions, location and list sheet state.
    pub viewport: ViewportSync,

    pub sort_criterion: SortCriterion,

    /// Events passing the filter pipeline, in source order.
    pub filtered: Vec<Arc<MapEvent>>,

    /// Display order shared by the map clusterer and the list.
    pub display: Vec<SortedEvent>,

    /// Number of times the sort engine has run.
    pub sort_runs: u64,

    /// Latest geocoding result, `None` until one arrives for the current
    /// Place panel session.
    pub place_results: Option<PlaceCollection>,

    pub recent_places: RecentPlaces,

    /// Debounced place query.
    pub geocode: Debouncer<String>,

    pub favorites: FavoritesCache,

    pub requests: RequestIds,

    pub theme: Theme,

    /// Cleared on unmount; responses arriving afterwards are dropped.
    pub active: bool,

    detail_span: f64,
    today: Option<NaiveDate>,
    generation: u64,
    filtered_key: Option<FilteredKey>,
    display_key: Option<DisplayKey>,
}

impl AppState {
    /// Creates the store with the bundled snapshot and configured defaults.
    ///
    /// Derived views are built on the first [`AppState::sync_derived`].
    #[must_use]
    pub fn new(config: &Config, theme: Theme) -> Self {
        let events = bundled_snapshot().unwrap_or_else(|e| {
            tracing::error!(error = %e, "bundled snapshot is malformed, starting empty");
            EventCollection::default()
        });
        Self::with_events(config, theme, events)
    }

    /// Creates the store around an explicit initial collection.
    #[must_use]
    pub fn with_events(config: &Config, theme: Theme, events: EventCollection) -> Self {
        let default_region = Region::around(config.default_center, config.default_span_deg);
        Self {
            type_universe: events.types(),
            events,
            filter: FilterState::default(),
            panels: PanelCoordinator::new(config.clear_search_on_close),
            viewport: ViewportSync::new(
                default_region,
                config.detail_span_deg,
                Duration::from_millis(config.viewport_throttle_ms),
            ),
            sort_criterion: SortCriterion::default(),
            filtered: Vec::new(),
            display: Vec::new(),
            sort_runs: 0,
            place_results: None,
            recent_places: RecentPlaces::new(config.recent_places_limit),
            geocode: Debouncer::new(Duration::from_millis(config.geocode_debounce_ms)),
            favorites: FavoritesCache::default(),
            requests: RequestIds::default(),
            theme,
            active: false,
            detail_span: config.detail_span_deg,
            today: None,
            generation: 0,
            filtered_key: None,
            display_key: None,
        }
    }

    /// Pins "today" for the date picker defaults.
    #[must_use]
    pub const fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Utc::now().date_naive())
    }

    #[must_use]
    pub const fn detail_span(&self) -> f64 {
        self.detail_span
    }

    /// Replaces the event collection wholesale.
    pub fn replace_events(&mut self, events: EventCollection) {
        tracing::debug!(event_count = events.len(), "replacing event collection");
        self.type_universe = events.types();
        self.panels.refresh_type_active(&self.filter, &self.type_universe);
        self.events = events;
        self.generation += 1;
    }

    /// Reference point for the current sort criterion.
    #[must_use]
    pub fn sort_reference(&self) -> Option<Coordinates> {
        match self.sort_criterion {
            SortCriterion::MapCenter => Some(self.viewport.map_center()),
            SortCriterion::UserLocation => self.viewport.user_location(),
            SortCriterion::Date => None,
        }
    }

    /// Rebuilds stale derived views. Returns `true` if the display order was
    /// rebuilt.
    pub fn sync_derived(&mut self) -> bool {
        let filtered_key = FilteredKey {
            generation: self.generation,
            filter: self.filter.clone(),
        };
        if self.filtered_key.as_ref() != Some(&filtered_key) {
            self.filtered = apply_filters(self.events.events(), &self.filter);
            self.filtered_key = Some(filtered_key.clone());
        }

        let display_key = DisplayKey {
            filtered: filtered_key,
            criterion: self.sort_criterion,
            reference: self.sort_reference(),
        };
        if self.display_key.as_ref() == Some(&display_key) {
            return false;
        }

        self.display = sort_events(&self.filtered, display_key.criterion, display_key.reference);
        self.display_key = Some(display_key);
        self.sort_runs += 1;
        tracing::debug!(sort_runs = self.sort_runs, displayed = self.display.len(), "display order rebuilt");
        true
    }

    /// Type list shown in the Type panel.
    #[must_use]
    pub fn visible_types(&self) -> Vec<String> {
        filter_type_list(&self.type_universe, self.panels.search_input())
    }

    /// Places listed in the Place panel: search results once any arrived,
    /// recent places before that.
    #[must_use]
    pub fn listed_places(&self) -> &[Place] {
        self.place_results
            .as_ref()
            .map_or_else(|| self.recent_places.places(), |results| results.features.as_slice())
    }

    /// Earliest instant at which a timer needs polling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        match (self.viewport.next_deadline(), self.geocode.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Transforms state into a renderable view model.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let open_event = self.panels.open_event();
        let display_items: Vec<DisplayItem> = self
            .display
            .iter()
            .map(|row| DisplayItem {
                id: row.event.id.clone(),
                name: row.event.name.clone(),
                event_type: row.event.event_type.clone(),
                date: row.event.date.clone(),
                distance: row.distance_km.map(format_distance),
                color: self.theme.marker_color(&row.event.event_type).to_string(),
                is_favorite: self.favorites.is_favorite(&row.event.id),
                is_open: open_event == Some(row.event.id.as_str()),
            })
            .collect();

        let empty_state = display_items.is_empty().then(|| EmptyState {
            message: "No events found".to_string(),
            subtitle: if self.filter.is_unrestricted() {
                "There are no events to show".to_string()
            } else {
                "Try loosening the filters".to_string()
            },
        });

        UIViewModel {
            header: HeaderInfo {
                title: format!("Events: {}", display_items.len()),
                sort_label: self.sort_criterion.label().to_string(),
            },
            search_bar: SearchBarInfo {
                query: self.panels.search_input().to_string(),
                placeholder: self.panels.panel().placeholder().to_string(),
            },
            indicators: FilterIndicators {
                type_active: self.panels.type_active(),
                date_active: self.panels.date_active(),
                centered_on_user: self.viewport.centered_on_user(),
            },
            panel: self.compute_panel_view(),
            display_items,
            empty_state,
            list_snap: self.viewport.list_snap(),
            show_scroll_to_top: self.viewport.show_scroll_to_top(),
        }
    }

    fn compute_panel_view(&self) -> PanelView {
        match self.panels.panel() {
            Panel::None => PanelView::None,
            Panel::Type => {
                let picked = self.panels.local_types();
                let items: Vec<TypeItem> = self
                    .visible_types()
                    .into_iter()
                    .map(|name| TypeItem {
                        picked: picked.contains(&name),
                        color: self.theme.marker_color(&name).to_string(),
                        name,
                    })
                    .collect();
                let all_picked = !items.is_empty() && items.iter().all(|t| t.picked);
                PanelView::Types { items, all_picked }
            }
            Panel::Place => PanelView::Places {
                items: self
                    .listed_places()
                    .iter()
                    .map(|p| PlaceItem {
                        key: p.key(),
                        label: p.label().to_string(),
                    })
                    .collect(),
                showing_recent: self.place_results.is_none(),
                searching: self.geocode.is_pending(),
            },
            Panel::Date => {
                let (start, end) = self.panels.pending_dates();
                PanelView::Dates { start, end }
            }
            Panel::EventDetails => self
                .panels
                .open_event()
                .and_then(|id| self.events.get(id))
                .map_or(PanelView::None, |event| PanelView::EventDetails {
                    id: event.id.clone(),
                    name: event.name.clone(),
                    event_type: event.event_type.clone(),
                    date: event.date.clone(),
                    description: event.description.clone(),
                    link: non_empty(&event.link),
                    photo: non_empty(&event.photo),
                    is_favorite: self.favorites.is_favorite(&event.id),
                }),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.trim().is_empty()).then(|| value.to_string())
}

fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else {
        format!("{km:.1} km")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::tests::event;

    fn state() -> AppState {
        let events = EventCollection::new(vec![
            event("a", "Alpha", "music", "2024-01-01", 0.0, 0.0),
            event("b", "Beta", "sport", "2024-02-01", 1.0, 1.0),
        ])
        .unwrap();
        AppState::with_events(&Config::default(), Theme::default(), events)
    }

    #[test]
    fn derived_views_rebuild_only_when_inputs_change() {
        let mut state = state();
        assert!(state.sync_derived());
        assert_eq!(state.sort_runs, 1);
        assert!(!state.sync_derived());

        state.filter.search_query = "alp".into();
        assert!(state.sync_derived());
        assert_eq!(state.display.len(), 1);

        state.sort_criterion = SortCriterion::Date;
        assert!(state.sync_derived());
        assert_eq!(state.sort_runs, 3);
    }

    #[test]
    fn request_ids_track_the_latest_per_kind() {
        let mut ids = RequestIds::default();
        let first = ids.next(RequestKind::Places);
        let other = ids.next(RequestKind::Events);
        let second = ids.next(RequestKind::Places);
        assert!(first < second);
        assert!(!ids.is_latest(RequestKind::Places, first));
        assert!(ids.is_latest(RequestKind::Places, second));
        assert!(ids.is_latest(RequestKind::Events, other));
        ids.invalidate(RequestKind::Places);
        assert!(!ids.is_latest(RequestKind::Places, second));
    }

    #[test]
    fn viewmodel_reports_count_and_empty_state() {
        let mut state = state();
        state.sync_derived();
        let vm = state.compute_viewmodel();
        assert_eq!(vm.header.title, "Events: 2");
        assert_eq!(vm.search_bar.placeholder, "Find events...");
        let alpha = vm.display_items.iter().find(|item| item.id == "a").unwrap();
        assert_eq!(alpha.color, "#FF4081");
        assert!(alpha.distance.is_some());

        state.filter.search_query = "zzz".into();
        state.sync_derived();
        let vm = state.compute_viewmodel();
        assert!(vm.empty_state.is_some());
    }

    #[test]
    fn distances_are_human_readable() {
        assert_eq!(format_distance(0.25), "250 m");
        assert_eq!(format_distance(12.34), "12.3 km");
    }
}
