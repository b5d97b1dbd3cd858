//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They contain
//! no business logic, only display-ready data: formatted distances, marker
//! colours and indicator flags are all resolved before rendering.
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::ListSnap;
//! use eventmap::ui::viewmodel::{
//!     FilterIndicators, HeaderInfo, PanelView, SearchBarInfo, UIViewModel,
//! };
//!
//! let vm = UIViewModel {
//!     header: HeaderInfo {
//!         title: "Events: 0".to_string(),
//!         sort_label: "Date".to_string(),
//!     },
//!     search_bar: SearchBarInfo {
//!         query: String::new(),
//!         placeholder: "Find events...".to_string(),
//!     },
//!     indicators: FilterIndicators::default(),
//!     panel: PanelView::None,
//!     display_items: vec![],
//!     empty_state: None,
//!     list_snap: ListSnap::Minimized,
//!     show_scroll_to_top: false,
//! };
//! assert!(vm.display_items.is_empty());
//! ```

use crate::app::modes::ListSnap;
use chrono::NaiveDate;

/// Complete view model for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    /// Event count and active sort label.
    pub header: HeaderInfo,

    /// Shared search input. Its placeholder follows the open panel.
    pub search_bar: SearchBarInfo,

    /// Active markers on the filter buttons.
    pub indicators: FilterIndicators,

    /// Content of the open panel, if any.
    pub panel: PanelView,

    /// Events in display order. The map clusterer and the list share it.
    pub display_items: Vec<DisplayItem>,

    /// Set when `display_items` is empty.
    pub empty_state: Option<EmptyState>,

    pub list_snap: ListSnap,

    pub show_scroll_to_top: bool,
}

/// One event row (and one map marker).
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub id: String,
    pub name: String,
    pub event_type: String,
    /// Raw event date as delivered by the source.
    pub date: String,
    /// Formatted distance to the sort reference, when sorting by distance.
    pub distance: Option<String>,
    /// Marker colour for the event type.
    pub color: String,
    pub is_favorite: bool,
    /// Whether the details panel shows this event.
    pub is_open: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    /// `Events: N` where N is the displayed count.
    pub title: String,
    pub sort_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub placeholder: String,
}

/// Filter button indicator state.
///
/// The Type and Date indicators reflect the last accepted selection, not
/// pending choices inside an open panel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterIndicators {
    pub type_active: bool,
    pub date_active: bool,
    /// The "center on me" button is highlighted.
    pub centered_on_user: bool,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No events found").
    pub message: String,

    /// Secondary explanatory text.
    pub subtitle: String,
}

/// Content of the open panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelView {
    None,

    /// Type checklist, filtered by the search input.
    Types {
        items: Vec<TypeItem>,
        /// Drives the "Select all" / "Clear all" label.
        all_picked: bool,
    },

    /// Geocoding results, or recent places before the first result.
    Places {
        items: Vec<PlaceItem>,
        showing_recent: bool,
        /// A debounced query has not been sent yet.
        searching: bool,
    },

    /// Pending date bounds.
    Dates {
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    },

    EventDetails {
        id: String,
        name: String,
        event_type: String,
        date: String,
        description: String,
        link: Option<String>,
        photo: Option<String>,
        is_favorite: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeItem {
    pub name: String,
    pub picked: bool,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceItem {
    pub key: String,
    pub label: String,
}
