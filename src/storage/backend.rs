//! Key-value persistence abstraction.
//!
//! This module defines the [`KeyValueStore`] trait the worker uses for
//! favourites and recent searches. Values are JSON documents so callers can
//! store any serde type without the backend knowing about it.

use crate::domain::error::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Abstraction over persistent key-value backends.
///
/// # Implementations
///
/// - [`JsonStorage`](crate::storage::JsonStorage): JSON file with atomic writes
///
/// # Examples
///
/// ```no_run
/// use eventmap::storage::{JsonStorage, KeyValueStore};
/// use std::path::PathBuf;
///
/// let mut storage = JsonStorage::new(PathBuf::from("/tmp/eventmap.json"))?;
/// storage.set("last-searched", serde_json::json!([]))?;
/// assert!(storage.get("last-searched")?.is_some());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub trait KeyValueStore: Send {
    /// Reads the value stored under `key`, `Ok(None)` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&mut self, key: &str, value: serde_json::Value) -> Result<()>;

    /// Removes `key`. Removing an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Typed convenience layer over [`KeyValueStore`].
pub trait KeyValueStoreExt: KeyValueStore {
    /// Reads and deserializes `key`.
    ///
    /// # Errors
    ///
    /// Fails if the backend read fails or the stored value has another shape.
    fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)?
            .map(serde_json::from_value)
            .transpose()
            .map_err(Into::into)
    }

    /// Serializes and stores `value` under `key`.
    ///
    /// # Errors
    ///
    /// Fails if serialization or the backend write fails.
    fn set_as<T: Serialize>(&mut self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {}
