//! User interface layer: view models, a plain-text renderer and the marker
//! colour theme.
//!
//! # Architecture
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → String
//! ```
//!
//! Map drawing and clustering belong to the host. The view model hands it the
//! same display order the list uses, together with each marker's colour.
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Text rendering of a view model
//! - [`theme`]: Marker colours and ANSI escape sequence generation

pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{
    DisplayItem, EmptyState, FilterIndicators, HeaderInfo, PanelView, PlaceItem, SearchBarInfo, TypeItem,
    UIViewModel,
};
