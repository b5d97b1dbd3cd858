//! Actions representing side effects to be executed by the host.
//!
//! The event handler returns a `Vec<Action>` after processing each event. The
//! host executes them in order: worker messages go to an
//! [`EventMapWorker`](crate::worker::EventMapWorker), map and list commands go
//! to whatever draws them.
//!
//! # Example
//!
//! ```rust
//! use eventmap::app::Action;
//! use eventmap::worker::WorkerMessage;
//!
//! let actions = vec![Action::PostToWorker(WorkerMessage::fetch_events(1))];
//! assert_eq!(actions.len(), 1);
//! ```

use super::modes::ListSnap;
use crate::domain::Region;
use crate::worker::WorkerMessage;

/// Commands produced by the event handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hands a request to the collaborator worker.
    PostToWorker(WorkerMessage),

    /// Animates the map camera to `region`.
    ///
    /// Emitted whenever the controlled region changes; the observed region
    /// follows once the map reports the settled position.
    AnimateTo(Region),

    /// Moves the bottom sheet to a snap point.
    SnapList(ListSnap),

    /// Scrolls the event list back to its first row.
    ScrollListToTop,
}
