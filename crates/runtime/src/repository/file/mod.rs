//! File-backed repositories.

mod log;
mod snapshot;

pub use log::FileTurnLog;
pub use snapshot::FileSnapshotStore;
