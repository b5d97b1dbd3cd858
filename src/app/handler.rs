//! Event handling and state transition logic.
//!
//! This module implements the event handler that processes user input, map
//! callbacks, timer ticks and worker responses, translating them into state
//! changes and action sequences.
//!
//! # Architecture
//!
//! 1. Events arrive from the host (UI, map, timers) or the worker
//! 2. Elapsed timers are released first: the viewport throttle and the
//!    geocoding debouncer
//! 3. [`handle_event`] pattern-matches the event and mutates `AppState`
//! 4. Derived views are resynchronised from their inputs
//! 5. Actions are collected and returned for execution
//!
//! Time is passed in as `now` rather than read from a clock, so the same
//! sequence of events and instants always yields the same state.
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::{handle_event, AppState, Event};
//! use eventmap::ui::theme::Theme;
//! use eventmap::Config;
//! use std::time::Instant;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! let (changed, actions) = handle_event(&mut state, &Event::Mounted, Instant::now())?;
//! assert!(changed);
//! assert_eq!(actions.len(), 4);
//! # Ok::<(), eventmap::domain::EventMapError>(())
//! ```

use super::modes::{ListSnap, Panel, PanelKind, SearchTarget, SortCriterion};
use super::state::RequestKind;
use super::viewport::MarkerPress;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::domain::{EventCollection, Place, Region, Viewbox};
use crate::infrastructure::bundled_snapshot;
use crate::worker::{WorkerMessage, WorkerResponse};
use chrono::NaiveDate;
use std::time::Instant;

/// Half-width in degrees of the box place searches are biased to.
pub const GEOCODE_VIEWBOX_HALF_SPAN: f64 = 0.1;

/// Events triggered by user input, map callbacks, timers or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// The main screen appeared. Issues the start-up requests.
    Mounted,
    /// The main screen went away. Late responses are dropped from now on.
    Unmounted,
    /// Re-fetches the event collection.
    Reload,

    /// Opens a filter panel, closing any other.
    OpenPanel(PanelKind),
    /// Closes the open filter panel without committing anything.
    ClosePanel,
    /// Opens the details panel for an event.
    OpenEventDetails { event_id: String },
    CloseEventDetails,

    /// Ticks or unticks a type in the Type panel.
    ToggleType(String),
    /// "Select all" / "Clear all" over the visible types.
    SelectOrClearAllTypes,
    AcceptTypes,
    /// Accepts the `index`-th listed place in the Place panel.
    AcceptPlace { index: usize },
    AcceptDates,
    /// Cancels a filter panel if it is the open one.
    Cancel(PanelKind),
    SetStartDate(Option<NaiveDate>),
    SetEndDate(Option<NaiveDate>),

    /// New text in the shared search input.
    SearchInput(String),
    /// The search input gained focus.
    SearchFocused,

    SetSortCriterion(SortCriterion),

    /// A row of the event list was pressed.
    ListItemPressed { event_id: String },
    /// A map marker was pressed.
    MarkerPressed(MarkerPress),
    /// The user started dragging the map.
    MapPanned,
    /// The map came to rest on a region.
    RegionSettled(Region),
    /// The "center on me" button.
    CenterOnUser,

    /// The user dragged the bottom sheet to a snap point.
    ListSnapChanged(ListSnap),
    /// The first visible list row changed.
    ListScrolled(usize),
    ScrollToTop,

    ToggleFavorite { event_id: String },

    /// Timer tick. Releases throttled regions and debounced queries.
    Tick,

    /// A response from the collaborator worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to
/// execute.
///
/// Returns `(changed, actions)` where `changed` means the view must be
/// re-rendered.
///
/// # Errors
///
/// Collaborator failures are recovered here and never surface; the `Result`
/// is kept for host integrations that propagate.
pub fn handle_event(state: &mut AppState, event: &Event, now: Instant) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    let mut actions = Vec::new();
    let panel_before = state.panels.panel();
    let mut changed = poll_timers(state, now, &mut actions);

    changed |= match event {
        Event::Mounted => {
            tracing::debug!("store mounted, issuing start-up requests");
            state.active = true;
            let events_id = state.requests.next(RequestKind::Events);
            let location_id = state.requests.next(RequestKind::Location);
            actions.push(Action::PostToWorker(WorkerMessage::fetch_events(events_id)));
            actions.push(Action::PostToWorker(WorkerMessage::request_location(location_id)));
            actions.push(Action::PostToWorker(WorkerMessage::load_favorites()));
            actions.push(Action::PostToWorker(WorkerMessage::load_recent_places()));
            true
        }

        Event::Unmounted => {
            tracing::debug!("store unmounted");
            state.active = false;
            state.geocode.cancel();
            false
        }

        Event::Reload => {
            let id = state.requests.next(RequestKind::Events);
            actions.push(Action::PostToWorker(WorkerMessage::fetch_events(id)));
            false
        }

        Event::OpenPanel(kind) => {
            let today = state.today();
            state.panels.open(*kind, &mut state.filter, today)
        }

        Event::ClosePanel => {
            if state.panels.panel() == Panel::EventDetails {
                state.panels.close_details()
            } else {
                state.panels.close_filter(&mut state.filter);
                true
            }
        }

        Event::OpenEventDetails { event_id } => open_details(state, event_id),

        Event::CloseEventDetails => state.panels.close_details(),

        Event::ToggleType(event_type) => state.panels.toggle_type(event_type),

        Event::SelectOrClearAllTypes => {
            let visible = state.visible_types();
            state.panels.select_or_clear_all(&visible)
        }

        Event::AcceptTypes => state.panels.accept_types(&mut state.filter, &state.type_universe),

        Event::AcceptPlace { index } => accept_place(state, *index, &mut actions),

        Event::AcceptDates => state.panels.accept_dates(&mut state.filter),

        Event::Cancel(kind) => state.panels.cancel(*kind, &mut state.filter),

        Event::SetStartDate(date) => state.panels.set_start_date(*date),

        Event::SetEndDate(date) => state.panels.set_end_date(*date),

        Event::SearchInput(text) => {
            let target = state.panels.set_search_input(text, &mut state.filter);
            tracing::trace!(query = %text, ?target, "search input routed");
            if target == SearchTarget::Places {
                if text.trim().is_empty() {
                    abandon_place_search(state);
                } else {
                    state.geocode.push(text.trim().to_string(), now);
                }
            }
            true
        }

        Event::SearchFocused => {
            if state.panels.panel() == Panel::None && state.viewport.set_list_snap(ListSnap::Expanded) {
                actions.push(Action::SnapList(ListSnap::Expanded));
                true
            } else {
                false
            }
        }

        Event::SetSortCriterion(criterion) => {
            tracing::debug!(?criterion, "sort criterion selected");
            std::mem::replace(&mut state.sort_criterion, *criterion) != *criterion
        }

        Event::ListItemPressed { event_id } => match state.events.get(event_id).map(|e| e.coordinates) {
            Some(point) => {
                let region = state.viewport.select_list_item(point);
                actions.push(Action::AnimateTo(region));
                actions.push(Action::SnapList(ListSnap::Minimized));
                state.panels.open_event_details(event_id);
                true
            }
            None => {
                tracing::warn!(event_id = %event_id, "list item for unknown event");
                false
            }
        },

        Event::MarkerPressed(MarkerPress::Point { event_id }) => open_details(state, event_id),

        Event::MarkerPressed(MarkerPress::Cluster { expansion }) => {
            tracing::debug!(?expansion, "expanding cluster");
            actions.push(Action::AnimateTo(state.viewport.animate_to(*expansion)));
            false
        }

        Event::MapPanned => {
            let was_centered = state.viewport.centered_on_user();
            state.viewport.map_panned();
            was_centered
        }

        Event::RegionSettled(region) => state.viewport.region_settled(*region, now),

        Event::CenterOnUser => {
            if let Some(region) = state.viewport.center_on_user() {
                actions.push(Action::AnimateTo(region));
            }
            let id = state.requests.next(RequestKind::Location);
            actions.push(Action::PostToWorker(WorkerMessage::request_location(id)));
            true
        }

        Event::ListSnapChanged(snap) => state.viewport.set_list_snap(*snap),

        Event::ListScrolled(index) => {
            let before = state.viewport.show_scroll_to_top();
            state.viewport.list_scrolled(*index);
            before != state.viewport.show_scroll_to_top()
        }

        Event::ScrollToTop => {
            state.viewport.scroll_to_top();
            actions.push(Action::ScrollListToTop);
            true
        }

        Event::ToggleFavorite { event_id } => {
            let id = state.requests.next(RequestKind::Favorite);
            let op = state.favorites.toggle(event_id, id);
            actions.push(Action::PostToWorker(WorkerMessage::set_favorite(id, op.event_id, op.favorite)));
            true
        }

        Event::Tick => false,

        Event::WorkerResponse(response) => handle_worker_response(state, response, &mut actions),
    };

    if panel_before == Panel::Place && state.panels.panel() != Panel::Place {
        abandon_place_search(state);
    }

    changed |= state.sync_derived();
    Ok((changed, actions))
}

/// Releases elapsed timers. Returns `true` if the view changed.
fn poll_timers(state: &mut AppState, now: Instant, actions: &mut Vec<Action>) -> bool {
    let mut changed = state.viewport.poll(now);

    if let Some(query) = state.geocode.poll(now) {
        if state.panels.panel() == Panel::Place {
            let id = state.requests.next(RequestKind::Places);
            let viewbox = state
                .viewport
                .user_location()
                .map(|location| Viewbox::around(location, GEOCODE_VIEWBOX_HALF_SPAN));
            tracing::debug!(query = %query, request_id = id, "geocoding query released");
            actions.push(Action::PostToWorker(WorkerMessage::search_places(id, query, viewbox)));
            changed = true;
        }
    }
    changed
}

fn open_details(state: &mut AppState, event_id: &str) -> bool {
    if state.events.get(event_id).is_none() {
        tracing::warn!(event_id, "details requested for unknown event");
        return false;
    }
    state.panels.open_event_details(event_id)
}

fn accept_place(state: &mut AppState, index: usize, actions: &mut Vec<Action>) -> bool {
    if state.panels.panel() != Panel::Place {
        return false;
    }
    let Some(place) = state.listed_places().get(index).cloned() else {
        tracing::warn!(index, "accepted place out of range");
        return false;
    };

    tracing::debug!(place = %place.label(), "place accepted");
    match place.point() {
        Some(point) => actions.push(Action::AnimateTo(state.viewport.focus(point))),
        None => tracing::warn!(place = %place.label(), "accepted place has no point geometry"),
    }
    remember_place(state, place, actions);
    state.panels.accept_place(&mut state.filter)
}

fn remember_place(state: &mut AppState, place: Place, actions: &mut Vec<Action>) {
    state.recent_places.remember(place);
    actions.push(Action::PostToWorker(WorkerMessage::save_recent_places(
        state.recent_places.places().to_vec(),
    )));
}

/// Drops every trace of an in-progress place search. Results still in flight
/// are ignored on arrival.
fn abandon_place_search(state: &mut AppState) {
    state.geocode.cancel();
    state.requests.invalidate(RequestKind::Places);
    state.place_results = None;
}

fn replace_events(state: &mut AppState, events: EventCollection) {
    state.replace_events(events);
    let dangling = state
        .panels
        .open_event()
        .is_some_and(|id| state.events.get(id).is_none());
    if dangling {
        tracing::debug!("open event vanished from the collection");
        state.panels.close_details();
    }
}

fn fall_back_to_snapshot(state: &mut AppState) {
    match bundled_snapshot() {
        Ok(snapshot) => replace_events(state, snapshot),
        Err(e) => tracing::error!(error = %e, "bundled snapshot unavailable, keeping current events"),
    }
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse, actions: &mut Vec<Action>) -> bool {
    if !state.active {
        tracing::debug!(?response, "store inactive, ignoring worker response");
        return false;
    }

    match response {
        WorkerResponse::EventsLoaded { request_id, events } => {
            if !state.requests.is_latest(RequestKind::Events, *request_id) {
                tracing::debug!(request_id, "stale event collection ignored");
                return false;
            }
            match EventCollection::new(events.clone()) {
                Ok(collection) => replace_events(state, collection),
                Err(e) => {
                    tracing::warn!(error = %e, "fetched events rejected, using bundled snapshot");
                    fall_back_to_snapshot(state);
                }
            }
            true
        }

        WorkerResponse::EventsFetchFailed { request_id, message } => {
            if !state.requests.is_latest(RequestKind::Events, *request_id) {
                return false;
            }
            tracing::warn!(error = %message, "event fetch failed, using bundled snapshot");
            fall_back_to_snapshot(state);
            true
        }

        WorkerResponse::PlacesFound {
            request_id,
            query,
            places,
        } => {
            if state.panels.panel() != Panel::Place || !state.requests.is_latest(RequestKind::Places, *request_id) {
                tracing::debug!(request_id, query = %query, "stale geocoding result ignored");
                return false;
            }
            tracing::debug!(query = %query, found = places.features.len(), "places found");
            state.place_results = Some(places.clone());
            true
        }

        WorkerResponse::LocationFixed { request_id, location } => {
            if !state.requests.is_latest(RequestKind::Location, *request_id) {
                return false;
            }
            if let Some(region) = state.viewport.location_fixed(*location) {
                actions.push(Action::AnimateTo(region));
            }
            true
        }

        WorkerResponse::LocationDenied { request_id } => {
            if !state.requests.is_latest(RequestKind::Location, *request_id) {
                return false;
            }
            tracing::debug!("location unavailable, keeping current center");
            state.viewport.location_unavailable();
            true
        }

        WorkerResponse::FavoritesLoaded { favorites } => {
            state.favorites.loaded(favorites.iter().cloned().collect());
            true
        }

        WorkerResponse::FavoriteSaved { request_id } => {
            state.favorites.confirmed(*request_id);
            false
        }

        WorkerResponse::FavoriteFailed { request_id, message } => {
            tracing::warn!(request_id, error = %message, "favourite not persisted");
            state.favorites.failed(*request_id);
            true
        }

        WorkerResponse::RecentPlacesLoaded { places } => {
            state.recent_places.restore(places.clone());
            state.panels.panel() == Panel::Place
        }

        WorkerResponse::RecentPlacesSaved { count } => {
            tracing::debug!(count, "recent places saved");
            false
        }

        WorkerResponse::Error { message } => {
            tracing::error!("Worker error: {}", message);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::tests::event;
    use crate::domain::geojson::Geometry;
    use crate::domain::{Coordinates, FeatureId, PlaceCollection, PlaceProperties};
    use crate::ui::theme::Theme;
    use crate::Config;
    use std::time::Duration;

    fn state() -> AppState {
        let events = EventCollection::new(vec![
            event("1", "Jazz Night", "music", "2024-01-01", 13.4, 52.5),
            event("2", "Derby", "sport", "2024-06-01", 11.6, 48.1),
            event("3", "Art Fair", "art", "2024-12-01", 6.9, 50.9),
        ])
        .unwrap();
        AppState::with_events(&Config::default(), Theme::default(), events)
            .with_today(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap())
    }

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

    fn mounted(now: Instant) -> AppState {
        let mut state = state();
        handle_event(&mut state, &Event::Mounted, now).unwrap();
        state
    }

    fn posted(actions: &[Action]) -> Vec<&WorkerMessage> {
        actions
            .iter()
            .filter_map(|a| match a {
                Action::PostToWorker(m) => Some(m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn mount_issues_start_up_requests() {
        let mut state = state();
        let (changed, actions) = handle_event(&mut state, &Event::Mounted, Instant::now()).unwrap();
        assert!(changed);
        let kinds: Vec<_> = posted(&actions).iter().map(|m| m.kind()).collect();
        assert_eq!(
            kinds,
            ["fetch_events", "request_location", "load_favorites", "load_recent_places"]
        );
    }

    #[test]
    fn responses_after_unmount_are_ignored() {
        let now = Instant::now();
        let mut state = mounted(now);
        handle_event(&mut state, &Event::Unmounted, now).unwrap();

        let response = WorkerResponse::LocationFixed {
            request_id: 2,
            location: Coordinates::new(13.4, 52.5),
        };
        let (changed, actions) = handle_event(&mut state, &Event::WorkerResponse(response), now).unwrap();
        assert!(!changed);
        assert!(actions.is_empty());
        assert_eq!(state.viewport.user_location(), None);
    }

    #[test]
    fn geocoding_is_debounced_and_stale_results_dropped() {
        let start = Instant::now();
        let mut state = mounted(start);
        handle_event(&mut state, &Event::OpenPanel(PanelKind::Place), start).unwrap();

        for (i, text) in ["B", "Be", "Ber"].iter().enumerate() {
            let at = start + Duration::from_millis(100 * i as u64);
            let (_, actions) = handle_event(&mut state, &Event::SearchInput((*text).into()), at).unwrap();
            assert!(posted(&actions).is_empty());
        }

        let (_, actions) = handle_event(&mut state, &Event::Tick, start + Duration::from_millis(800)).unwrap();
        let sent = posted(&actions);
        assert_eq!(sent.len(), 1);
        let WorkerMessage::SearchPlaces { request_id, query, .. } = sent[0] else {
            panic!("expected a place search");
        };
        assert_eq!(query, "Ber");
        let request_id = *request_id;

        let stale = WorkerResponse::PlacesFound {
            request_id: request_id - 1,
            query: "Be".into(),
            places: PlaceCollection::new(vec![place(9, "Bergen", 5.3, 60.4)]),
        };
        handle_event(&mut state, &Event::WorkerResponse(stale), start).unwrap();
        assert!(state.place_results.is_none());

        let fresh = WorkerResponse::PlacesFound {
            request_id,
            query: "Ber".into(),
            places: PlaceCollection::new(vec![place(1, "Berlin", 13.4, 52.5)]),
        };
        handle_event(&mut state, &Event::WorkerResponse(fresh), start).unwrap();
        assert_eq!(state.listed_places()[0].label(), "Berlin");
    }

    #[test]
    fn closing_place_panel_discards_in_flight_geocoding() {
        let start = Instant::now();
        let mut state = mounted(start);
        handle_event(&mut state, &Event::OpenPanel(PanelKind::Place), start).unwrap();
        handle_event(&mut state, &Event::SearchInput("Mun".into()), start).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::Tick, start + Duration::from_secs(1)).unwrap();
        let WorkerMessage::SearchPlaces { request_id, .. } = posted(&actions)[0] else {
            panic!("expected a place search");
        };
        let request_id = *request_id;

        handle_event(&mut state, &Event::OpenPanel(PanelKind::Date), start).unwrap();
        let late = WorkerResponse::PlacesFound {
            request_id,
            query: "Mun".into(),
            places: PlaceCollection::new(vec![place(2, "Munich", 11.6, 48.1)]),
        };
        let (changed, _) = handle_event(&mut state, &Event::WorkerResponse(late), start).unwrap();
        assert!(!changed);
        assert!(state.place_results.is_none());
    }

    #[test]
    fn accepting_a_place_focuses_and_remembers_it() {
        let now = Instant::now();
        let mut state = mounted(now);
        handle_event(&mut state, &Event::OpenPanel(PanelKind::Place), now).unwrap();
        state.place_results = Some(PlaceCollection::new(vec![place(2, "Munich", 11.6, 48.1)]));

        let (_, actions) = handle_event(&mut state, &Event::AcceptPlace { index: 0 }, now).unwrap();
        assert_eq!(state.panels.panel(), Panel::None);
        assert_eq!(state.viewport.controlled().center(), Coordinates::new(11.6, 48.1));
        assert!(actions.contains(&Action::AnimateTo(state.viewport.controlled())));
        assert_eq!(state.recent_places.places()[0].label(), "Munich");
        assert!(posted(&actions)
            .iter()
            .any(|m| matches!(m, WorkerMessage::SaveRecentPlaces { places, .. } if places.len() == 1)));
    }

    #[test]
    fn list_item_press_pans_collapses_and_opens_details() {
        let now = Instant::now();
        let mut state = mounted(now);
        handle_event(&mut state, &Event::ListSnapChanged(ListSnap::Expanded), now).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::ListItemPressed { event_id: "2".into() }, now).unwrap();
        assert_eq!(state.panels.panel(), Panel::EventDetails);
        assert_eq!(state.panels.open_event(), Some("2"));
        assert_eq!(state.viewport.list_snap(), ListSnap::Minimized);
        assert!(actions.contains(&Action::SnapList(ListSnap::Minimized)));
        assert_eq!(state.viewport.controlled().center(), Coordinates::new(11.6, 48.1));
    }

    #[test]
    fn point_marker_opens_details_without_panning() {
        let now = Instant::now();
        let mut state = mounted(now);
        let before = state.viewport.controlled();
        let press = MarkerPress::Point { event_id: "3".into() };
        let (_, actions) = handle_event(&mut state, &Event::MarkerPressed(press), now).unwrap();
        assert!(actions.is_empty());
        assert_eq!(state.panels.open_event(), Some("3"));
        assert_eq!(state.viewport.controlled(), before);
    }

    #[test]
    fn fetch_failure_falls_back_to_snapshot() {
        let now = Instant::now();
        let mut state = mounted(now);
        let failed = WorkerResponse::EventsFetchFailed {
            request_id: 1,
            message: "offline".into(),
        };
        handle_event(&mut state, &Event::WorkerResponse(failed), now).unwrap();
        assert_eq!(state.events.len(), bundled_snapshot().unwrap().len());
        assert_eq!(state.display.len(), state.events.len());
    }

    #[test]
    fn favourite_failure_rolls_back() {
        let now = Instant::now();
        let mut state = mounted(now);
        let (_, actions) = handle_event(&mut state, &Event::ToggleFavorite { event_id: "1".into() }, now).unwrap();
        assert!(state.favorites.is_favorite("1"));
        let WorkerMessage::SetFavorite { request_id, .. } = posted(&actions)[0] else {
            panic!("expected a favourite write");
        };

        let failed = WorkerResponse::FavoriteFailed {
            request_id: *request_id,
            message: "disk full".into(),
        };
        handle_event(&mut state, &Event::WorkerResponse(failed), now).unwrap();
        assert!(!state.favorites.is_favorite("1"));
    }

    #[test]
    fn marker_press_from_place_panel_clears_place_text() {
        let now = Instant::now();
        let mut state = mounted(now);
        handle_event(&mut state, &Event::OpenPanel(PanelKind::Place), now).unwrap();
        handle_event(&mut state, &Event::SearchInput("Zzz".into()), now).unwrap();

        let press = MarkerPress::Point { event_id: "1".into() };
        handle_event(&mut state, &Event::MarkerPressed(press), now).unwrap();
        let vm = state.compute_viewmodel();
        assert_eq!(state.panels.panel(), Panel::EventDetails);
        assert_eq!(vm.search_bar.query, "");
        assert_eq!(vm.search_bar.placeholder, "Find events...");
        assert_eq!(vm.display_items.len(), 3);
        assert!(state.geocode.deadline().is_none());
    }

    #[test]
    fn fix_after_pan_then_untouched_map_follows_later_fixes() {
        let now = Instant::now();
        let mut state = mounted(now);
        handle_event(&mut state, &Event::MapPanned, now).unwrap();

        for (lon, lat) in [(1.0, 1.0), (2.0, 2.0)] {
            let fix = WorkerResponse::LocationFixed {
                request_id: 2,
                location: Coordinates::new(lon, lat),
            };
            let (_, actions) = handle_event(&mut state, &Event::WorkerResponse(fix), now).unwrap();
            assert_eq!(actions.len(), 1);
            assert_eq!(state.viewport.controlled().center(), Coordinates::new(lon, lat));
        }
    }

    #[test]
    fn reload_recomputes_type_indicator() {
        let now = Instant::now();
        let mut state = mounted(now);
        handle_event(&mut state, &Event::OpenPanel(PanelKind::Type), now).unwrap();
        handle_event(&mut state, &Event::ToggleType("music".into()), now).unwrap();
        handle_event(&mut state, &Event::AcceptTypes, now).unwrap();
        assert!(state.compute_viewmodel().indicators.type_active);

        let loaded = WorkerResponse::EventsLoaded {
            request_id: 1,
            events: vec![event("9", "Solo", "music", "2024-02-02", 0.0, 0.0)],
        };
        handle_event(&mut state, &Event::WorkerResponse(loaded), now).unwrap();
        assert_eq!(state.type_universe, ["music"]);
        assert!(!state.compute_viewmodel().indicators.type_active);
    }

    #[test]
    fn search_focus_expands_list_only_without_panel() {
        let now = Instant::now();
        let mut state = mounted(now);
        handle_event(&mut state, &Event::OpenPanel(PanelKind::Type), now).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::SearchFocused, now).unwrap();
        assert!(actions.is_empty());

        handle_event(&mut state, &Event::Cancel(PanelKind::Type), now).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::SearchFocused, now).unwrap();
        assert_eq!(actions, vec![Action::SnapList(ListSnap::Expanded)]);
    }
}
