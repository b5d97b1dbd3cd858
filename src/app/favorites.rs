//! Optimistic favourites with rollback.
//!
//! The cache keeps two sets: the last state the persistence collaborator
//! confirmed, and the local state shown to the user. A toggle lands in the
//! local set at once and is remembered as pending under its request id. A
//! failure rebuilds the local set from the confirmed one and replays the
//! operations that are still pending, so unrelated in-flight toggles survive
//! the rollback.

use std::collections::{BTreeMap, BTreeSet};

/// A single favourite mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoriteOp {
    pub event_id: String,
    pub favorite: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FavoritesCache {
    known_good: BTreeSet<String>,
    local: BTreeSet<String>,
    pending: BTreeMap<u64, FavoriteOp>,
}

impl FavoritesCache {
    #[must_use]
    pub fn is_favorite(&self, event_id: &str) -> bool {
        self.local.contains(event_id)
    }

    #[must_use]
    pub const fn favorites(&self) -> &BTreeSet<String> {
        &self.local
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Replaces the confirmed set with what persistence loaded.
    pub fn loaded(&mut self, favorites: BTreeSet<String>) {
        self.known_good = favorites;
        self.rebuild();
    }

    /// Flips `event_id` locally and records the operation under
    /// `request_id`. Returns the operation to persist.
    pub fn toggle(&mut self, event_id: &str, request_id: u64) -> FavoriteOp {
        let op = FavoriteOp {
            event_id: event_id.to_string(),
            favorite: !self.is_favorite(event_id),
        };
        apply(&mut self.local, &op);
        self.pending.insert(request_id, op.clone());
        tracing::debug!(event_id, favorite = op.favorite, request_id, "favourite toggled");
        op
    }

    /// Persistence confirmed `request_id`.
    pub fn confirmed(&mut self, request_id: u64) {
        if let Some(op) = self.pending.remove(&request_id) {
            apply(&mut self.known_good, &op);
        }
    }

    /// Persistence rejected `request_id`: revert to the confirmed set and
    /// replay what is still in flight.
    pub fn failed(&mut self, request_id: u64) {
        if let Some(op) = self.pending.remove(&request_id) {
            tracing::warn!(event_id = %op.event_id, request_id, "favourite update failed, rolling back");
            self.rebuild();
        }
    }

    fn rebuild(&mut self) {
        self.local = self.known_good.clone();
        for op in self.pending.values() {
            apply(&mut self.local, op);
        }
    }
}

fn apply(set: &mut BTreeSet<String>, op: &FavoriteOp) {
    if op.favorite {
        set.insert(op.event_id.clone());
    } else {
        set.remove(&op.event_id);
    }
}
