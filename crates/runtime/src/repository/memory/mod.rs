//! In-memory repositories for tests and local runs.

mod log;
mod snapshot;

pub use log::InMemoryTurnLog;
pub use snapshot::InMemorySnapshotStore;
