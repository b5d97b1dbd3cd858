//! Domain layer for the event map engine.
//!
//! This module contains the core domain types, independent of any collaborator
//! or rendering concern.
//!
//! # Organization
//!
//! - [`error`]: Error types and result aliases
//! - [`event`]: Event model and the id-unique event collection
//! - [`geo`]: Coordinates, regions, viewboxes, haversine distance, PostGIS points
//! - [`geojson`]: Minimal GeoJSON feature types
//! - [`place`]: Geocoded places
//!
//! # Examples
//!
//! ```
//! use eventmap::domain::{haversine_km, Coordinates};
//!
//! let d = haversine_km(Coordinates::new(0.0, 0.0), Coordinates::new(0.0, 0.0));
//! assert_eq!(d, 0.0);
//! ```

pub mod error;
pub mod event;
pub mod geo;
pub mod geojson;
pub mod place;

pub use error::{EventMapError, Result};
pub use event::{EventCollection, EventFeatureCollection, FeatureId, MapEvent};
pub use geo::{format_postgis_point, haversine_km, parse_postgis_point, Coordinates, Region, Viewbox};
pub use place::{Place, PlaceCollection, PlaceProperties};
