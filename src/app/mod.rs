//! Application layer coordinating state, events, and actions.
//!
//! This module sits between the host (CLI shim, UI shell) and the
//! domain/storage/worker layers. It implements the filter pipeline, the sort
//! engine, the panel state machine and the viewport synchronizer, all owned by
//! one store and driven by one event handler.
//!
//! # Architecture
//!
//! ```text
//! Host Input → Events → Event Handler → State Mutations → Actions → Side Effects
//!                           ↑                                  ↓
//!                           └──────── Worker Responses ────────┘
//! ```
//!
//! # Modules
//!
//! - [`actions`]: Side effect commands emitted by the event handler
//! - [`favorites`]: Optimistic favourites with rollback
//! - [`filter`]: Filter predicates and the filter pipeline
//! - [`handler`]: Event processing logic and state transition coordinator
//! - [`modes`]: Panel, sort criterion and list snap types
//! - [`panel`]: Single-open-panel state machine and search input routing
//! - [`recent`]: Recently accepted places
//! - [`sort`]: Display order by distance or date
//! - [`state`]: Central application state container and view model computation
//! - [`timers`]: Throttle and debouncer driven by injected instants
//! - [`viewport`]: Controlled/observed map regions and list sheet state
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::{handle_event, AppState, Event, PanelKind};
//! use eventmap::ui::theme::Theme;
//! use eventmap::Config;
//! use std::time::Instant;
//!
//! let mut state = AppState::new(&Config::default(), Theme::default());
//! handle_event(&mut state, &Event::OpenPanel(PanelKind::Type), Instant::now())?;
//! assert_eq!(state.compute_viewmodel().search_bar.placeholder, "Find event types...");
//! # Ok::<(), eventmap::domain::EventMapError>(())
//! ```

pub mod actions;
pub mod favorites;
pub mod filter;
pub mod handler;
pub mod modes;
pub mod panel;
pub mod recent;
pub mod sort;
pub mod state;
pub mod timers;
pub mod viewport;

pub use actions::Action;
pub use filter::{apply_filters, DateInterval, FilterState};
pub use handler::{handle_event, Event};
pub use modes::{ListSnap, Panel, PanelKind, SearchTarget, SortCriterion};
pub use sort::{sort_events, SortedEvent};
pub use state::AppState;
pub use viewport::MarkerPress;
