//! Device-location collaborators.

use crate::domain::error::{EventMapError, Result};
use crate::domain::Coordinates;

/// Outcome of a permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

/// Access to the device position.
pub trait LocationProvider: Send {
    fn request_permission(&mut self) -> Permission;

    /// # Errors
    ///
    /// Returns [`EventMapError::Location`] when no position can be acquired.
    fn current_position(&mut self) -> Result<Coordinates>;
}

/// Reports a configured position, or denies permission when there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocationProvider {
    position: Option<Coordinates>,
}

impl FixedLocationProvider {
    #[must_use]
    pub const fn new(position: Option<Coordinates>) -> Self {
        Self { position }
    }
}

impl LocationProvider for FixedLocationProvider {
    fn request_permission(&mut self) -> Permission {
        if self.position.is_some() {
            Permission::Granted
        } else {
            Permission::Denied
        }
    }

    fn current_position(&mut self) -> Result<Coordinates> {
        self.position
            .ok_or_else(|| EventMapError::Location("no position configured".to_string()))
    }
}
