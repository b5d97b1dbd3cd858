//! Panel and view mode state types for the application.
//!
//! This module defines the enums that replace the loose "active filter"
//! strings of a typical UI: which panel is open, what the shared search input
//! currently feeds, how the list is ordered and how far it is expanded.
//!
//! # State Machine
//!
//! At most one panel is open at a time:
//! - **None**: map and list only; search text filters events by name
//! - **Type**: type picker; search text narrows the type list
//! - **Place**: place search; search text drives geocoding
//! - **Date**: date picker; search text filters events by name
//! - **`EventDetails`**: details for one event; search text filters events
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::modes::{Panel, SearchTarget};
//!
//! assert_eq!(Panel::Place.search_target(), SearchTarget::Places);
//! assert_eq!(Panel::None.placeholder(), "Find events...");
//! ```

/// The single open panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Panel {
    /// No panel is open.
    #[default]
    None,

    /// Event type picker with local selection.
    Type,

    /// Place search with geocoding results.
    Place,

    /// Start/end date picker.
    Date,

    /// Details of one event, anchored to `PanelCoordinator::open_event`.
    ///
    /// [`PanelCoordinator::open_event`]: crate::app::panel::PanelCoordinator::open_event
    EventDetails,
}

impl Panel {
    /// Consumer of the shared search input while this panel is open.
    #[must_use]
    pub const fn search_target(self) -> SearchTarget {
        match self {
            Self::Type => SearchTarget::EventTypes,
            Self::Place => SearchTarget::Places,
            Self::None | Self::Date | Self::EventDetails => SearchTarget::Events,
        }
    }

    /// Placeholder shown in the search input.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self.search_target() {
            SearchTarget::EventTypes => "Find event types...",
            SearchTarget::Places => "Find location...",
            SearchTarget::Events => "Find events...",
        }
    }

    /// Whether this is one of the three filter panels.
    #[must_use]
    pub const fn is_filter(self) -> bool {
        matches!(self, Self::Type | Self::Place | Self::Date)
    }
}

impl From<PanelKind> for Panel {
    fn from(kind: PanelKind) -> Self {
        match kind {
            PanelKind::Type => Self::Type,
            PanelKind::Place => Self::Place,
            PanelKind::Date => Self::Date,
        }
    }
}

/// Filter panels that can be opened from the filter bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKind {
    Type,
    Place,
    Date,
}

/// What keystrokes in the search input are routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    /// Narrows the type list shown in the Type panel.
    EventTypes,

    /// Debounced place geocoding.
    Places,

    /// The event-name search predicate.
    Events,
}

/// Ranking key of the sort engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortCriterion {
    /// Distance to the observed (throttled) map center.
    #[default]
    MapCenter,

    /// Distance to the last device location fix.
    UserLocation,

    /// Event date ascending, unparseable dates last.
    Date,
}

impl SortCriterion {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::MapCenter => "Distance to map center",
            Self::UserLocation => "Distance to me",
            Self::Date => "Date",
        }
    }
}

/// Snap positions of the bottom list sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListSnap {
    #[default]
    Minimized,
    Expanded,
}
