//! Error types for the event map engine.
//!
//! This module defines the centralized error type [`EventMapError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! Most collaborator failures never reach the caller: the event handler converts
//! them into their local fallback (bundled snapshot, "no places found", default
//! center) and logs them. The variants below are what the layers hand to each
//! other before that conversion happens.

use thiserror::Error;

/// The main error type for event map operations.
///
/// # Examples
///
/// ```
/// use eventmap::domain::EventMapError;
///
/// fn fetch() -> Result<(), EventMapError> {
///     Err(EventMapError::Fetch("backend unreachable".to_string()))
/// }
/// assert!(fetch().is_err());
/// ```
#[derive(Debug, Error)]
pub enum EventMapError {
    /// The event source could not deliver a collection.
    ///
    /// Covers network and parse failures. The caller substitutes the bundled
    /// static snapshot.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// A place lookup failed. Treated as "no results" by the handler.
    #[error("Geocoding error: {0}")]
    Geocoding(String),

    /// The device position could not be acquired.
    #[error("Location error: {0}")]
    Location(String),

    /// Reading from or writing to the key-value store failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A PostGIS point string could not be parsed.
    #[error("Invalid geometry: {0}")]
    Geometry(String),

    /// Two events in one collection share an id.
    #[error("Duplicate event id: {0}")]
    DuplicateEventId(String),

    /// Communication with the worker failed.
    #[error("Worker communication error: {0}")]
    Worker(String),

    /// Configuration is invalid or missing.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A specialized `Result` type for event map operations.
pub type Result<T> = std::result::Result<T, EventMapError>;
