//! Storage layer for persisted user data and backend record shapes.
//!
//! Favourites and recent place searches are kept in a small key-value store;
//! the event backend's row format lives here too so conversion to the domain
//! model happens at the storage boundary.
//!
//! # Modules
//!
//! - `backend`: [`KeyValueStore`] trait abstraction
//! - `json`: JSON file-based implementation
//! - `models`: backend record types separate from domain models

pub mod backend;
pub mod json;
pub mod models;

pub use backend::{KeyValueStore, KeyValueStoreExt};
pub use json::JsonStorage;
pub use models::EventRecord;

/// Storage key holding the confirmed favourite event ids.
pub const FAVORITES_KEY: &str = "favorites";
