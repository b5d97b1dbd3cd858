//! Infrastructure layer: collaborator traits, their local implementations and
//! filesystem locations.
//!
//! The engine never talks to a network or a device directly. Each suspension
//! point of the application is one of the traits below, driven by the worker:
//!
//! - [`EventSource`]: full event collection fetch
//! - [`Geocoder`]: free-text place lookup
//! - [`LocationProvider`]: permission + device position

pub mod geocoding;
pub mod location;
pub mod paths;
pub mod sources;

pub use geocoding::{GazetteerGeocoder, Geocoder};
pub use location::{FixedLocationProvider, LocationProvider, Permission};
pub use paths::{expand_tilde, get_data_dir, store_path};
pub use sources::{bundled_snapshot, parse_events_json, BundledEventSource, EventSource, FileEventSource};
