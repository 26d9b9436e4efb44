//! Repository layer for match persistence.
//!
//! Repositories handle data that changes during play:
//! - the turn log (every executed or imported turn, append-only)
//! - game snapshots (the starting point a replay imports the log into)

mod error;
mod file;
mod memory;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use file::{FileSnapshotStore, FileTurnLog};
pub use memory::{InMemorySnapshotStore, InMemoryTurnLog};
pub use traits::{SnapshotRepository, TurnLogRepository};
pub use types::TurnRecord;
