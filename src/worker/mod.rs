//! Worker for collaborator calls: event fetches, geocoding, location and
//! persistence.
//!
//! The store never performs I/O itself. It emits [`WorkerMessage`]s as
//! actions; whoever drives the event loop hands them to an
//! [`EventMapWorker`] and feeds the [`WorkerResponse`]s back as events.
//!
//! # Architecture
//!
//! - `messages`: Request/response protocol types with trace context propagation
//! - `handler`: Worker implementation and message processing logic

pub mod handler;
pub mod messages;

pub use handler::EventMapWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
