//! The kanban board engine.
//!
//! [`ops`] holds the pure copy-on-write transforms; [`store::BoardStore`]
//! owns the current snapshot, persists every transition and publishes new
//! snapshots to subscribers.

pub mod ops;
pub mod store;

pub use store::{ANONYMOUS_USER, BoardStore, PersistWarning};
