//! Panel coordinator: the single-open-panel state machine.
//!
//! [`PanelCoordinator`] owns the open [`Panel`], the panels' local (not yet
//! committed) selections and the shared search input. Committed filter state
//! lives in [`FilterState`] and is only written here, on accept, or through
//! the search input while it feeds the event-name predicate.
//!
//! Every transition is exhaustive over [`Panel`]; opening a panel implicitly
//! closes whichever one was open before and drops its local selection.

use crate::app::filter::{is_type_filter_active, DateInterval, FilterState};
use crate::app::modes::{Panel, PanelKind, SearchTarget};
use chrono::{Days, NaiveDate};
use std::collections::BTreeSet;

/// Length of the default date picker range.
pub const DEFAULT_DATE_RANGE_DAYS: u64 = 365;

/// Owner of panel state and the search input.
#[derive(Debug, Clone)]
pub struct PanelCoordinator {
    panel: Panel,
    open_event: Option<String>,
    search_input: String,
    local_types: BTreeSet<String>,
    pending_start: Option<NaiveDate>,
    pending_end: Option<NaiveDate>,
    type_active: bool,
    date_active: bool,
    clear_search_on_close: bool,
}

impl PanelCoordinator {
    #[must_use]
    pub fn new(clear_search_on_close: bool) -> Self {
        Self {
            panel: Panel::None,
            open_event: None,
            search_input: String::new(),
            local_types: BTreeSet::new(),
            pending_start: None,
            pending_end: None,
            type_active: false,
            date_active: false,
            clear_search_on_close,
        }
    }

    #[must_use]
    pub const fn panel(&self) -> Panel {
        self.panel
    }

    /// Id of the event whose details are shown.
    #[must_use]
    pub fn open_event(&self) -> Option<&str> {
        self.open_event.as_deref()
    }

    #[must_use]
    pub fn search_input(&self) -> &str {
        &self.search_input
    }

    #[must_use]
    pub const fn search_target(&self) -> SearchTarget {
        self.panel.search_target()
    }

    /// Types ticked in the Type panel, not yet committed.
    #[must_use]
    pub const fn local_types(&self) -> &BTreeSet<String> {
        &self.local_types
    }

    #[must_use]
    pub const fn pending_dates(&self) -> (Option<NaiveDate>, Option<NaiveDate>) {
        (self.pending_start, self.pending_end)
    }

    #[must_use]
    pub const fn type_active(&self) -> bool {
        self.type_active
    }

    #[must_use]
    pub const fn date_active(&self) -> bool {
        self.date_active
    }

    /// Opens a filter panel. Returns `false` if it was already open.
    ///
    /// The search input is cleared, as is the event-name query it may have
    /// been feeding. Local selections are seeded from the committed filter.
    pub fn open(&mut self, kind: PanelKind, filter: &mut FilterState, today: NaiveDate) -> bool {
        let target = Panel::from(kind);
        if self.panel == target {
            tracing::debug!(panel = ?target, "panel already open");
            return false;
        }

        tracing::debug!(from = ?self.panel, to = ?target, "opening panel");
        self.discard_local();
        self.open_event = None;
        self.panel = target;
        self.search_input.clear();
        filter.search_query.clear();

        match kind {
            PanelKind::Type => self.local_types = filter.picked_types.clone(),
            PanelKind::Date => {
                let (start, end) = filter.date_interval.map_or_else(
                    || (today, default_end(today)),
                    |interval| (interval.start().date_naive(), interval.end().date_naive()),
                );
                self.pending_start = Some(start);
                self.pending_end = Some(end);
            }
            PanelKind::Place => {}
        }
        self.check_invariant();
        true
    }

    /// Opens the details panel for `event_id`, closing any filter panel.
    ///
    /// Text typed for a filter panel's type list or place search goes with
    /// the panel; event-name text typed with no panel open stays.
    pub fn open_event_details(&mut self, event_id: &str) -> bool {
        if self.panel == Panel::EventDetails && self.open_event.as_deref() == Some(event_id) {
            return false;
        }
        tracing::debug!(from = ?self.panel, event_id, "opening event details");
        if self.panel.is_filter() && self.search_target() != SearchTarget::Events {
            self.search_input.clear();
        }
        self.discard_local();
        self.panel = Panel::EventDetails;
        self.open_event = Some(event_id.to_string());
        self.check_invariant();
        true
    }

    pub fn close_details(&mut self) -> bool {
        if self.panel != Panel::EventDetails {
            return false;
        }
        self.panel = Panel::None;
        self.open_event = None;
        self.check_invariant();
        true
    }

    /// Closes whatever filter panel is open and, when configured, clears the
    /// search text together with the event-name query.
    pub fn close_filter(&mut self, filter: &mut FilterState) -> bool {
        let was = self.panel;
        if was.is_filter() {
            self.discard_local();
            self.panel = Panel::None;
        }
        if self.clear_search_on_close {
            self.search_input.clear();
            filter.search_query.clear();
        }
        self.check_invariant();
        tracing::debug!(from = ?was, cleared = self.clear_search_on_close, "filter panel closed");
        was.is_filter()
    }

    /// Routes new search text to its consumer and returns which one it was.
    ///
    /// Event-name text is committed to `filter` immediately; type-list and
    /// place text only live in the input.
    pub fn set_search_input(&mut self, text: &str, filter: &mut FilterState) -> SearchTarget {
        text.clone_into(&mut self.search_input);
        let target = self.search_target();
        if target == SearchTarget::Events {
            text.clone_into(&mut filter.search_query);
        }
        target
    }

    pub fn toggle_type(&mut self, event_type: &str) -> bool {
        if self.panel != Panel::Type {
            return false;
        }
        if !self.local_types.remove(event_type) {
            self.local_types.insert(event_type.to_string());
        }
        true
    }

    /// Clears the selection when every visible type is ticked, otherwise
    /// ticks all visible types.
    pub fn select_or_clear_all(&mut self, visible: &[String]) -> bool {
        if self.panel != Panel::Type {
            return false;
        }
        if !visible.is_empty() && visible.iter().all(|t| self.local_types.contains(t)) {
            for t in visible {
                self.local_types.remove(t);
            }
        } else {
            self.local_types.extend(visible.iter().cloned());
        }
        true
    }

    /// Commits the local type selection.
    pub fn accept_types(&mut self, filter: &mut FilterState, universe: &[String]) -> bool {
        if self.panel != Panel::Type {
            return false;
        }
        filter.picked_types = std::mem::take(&mut self.local_types);
        self.type_active = is_type_filter_active(&filter.picked_types, universe);
        tracing::debug!(picked = filter.picked_types.len(), active = self.type_active, "types accepted");
        self.close_filter(filter)
    }

    /// Re-measures the committed type selection against a new universe.
    pub fn refresh_type_active(&mut self, filter: &FilterState, universe: &[String]) {
        self.type_active = is_type_filter_active(&filter.picked_types, universe);
    }

    /// Closes the Place panel after the store has committed the chosen
    /// place's region as the controlled center.
    pub fn accept_place(&mut self, filter: &mut FilterState) -> bool {
        if self.panel != Panel::Place {
            return false;
        }
        self.close_filter(filter)
    }

    pub fn set_start_date(&mut self, date: Option<NaiveDate>) -> bool {
        if self.panel != Panel::Date {
            return false;
        }
        self.pending_start = date;
        true
    }

    pub fn set_end_date(&mut self, date: Option<NaiveDate>) -> bool {
        if self.panel != Panel::Date {
            return false;
        }
        self.pending_end = date;
        true
    }

    /// Commits the picked interval. A missing bound commits no interval.
    pub fn accept_dates(&mut self, filter: &mut FilterState) -> bool {
        if self.panel != Panel::Date {
            return false;
        }
        filter.date_interval = match (self.pending_start, self.pending_end) {
            (Some(start), Some(end)) => Some(DateInterval::from_days(start, end)),
            _ => None,
        };
        self.date_active = filter.date_interval.is_some();
        tracing::debug!(interval = ?filter.date_interval, "dates accepted");
        self.close_filter(filter)
    }

    /// Cancels the open filter panel; committed filter state is untouched.
    pub fn cancel(&mut self, kind: PanelKind, filter: &mut FilterState) -> bool {
        if self.panel != Panel::from(kind) {
            return false;
        }
        self.close_filter(filter)
    }

    fn discard_local(&mut self) {
        self.local_types.clear();
        self.pending_start = None;
        self.pending_end = None;
    }

    fn check_invariant(&self) {
        debug_assert_eq!(
            self.open_event.is_some(),
            self.panel == Panel::EventDetails,
            "event details anchor out of sync with panel {:?}",
            self.panel
        );
    }
}

fn default_end(today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(DEFAULT_DATE_RANGE_DAYS))
        .unwrap_or(NaiveDate::MAX)
}
