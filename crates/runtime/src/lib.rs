//! Async runtime around the deterministic skirmish simulation.
//!
//! This crate wires together command providers, repositories, and the
//! simulation worker into a cohesive runtime API. Consumers embed [`Runtime`]
//! to drive turns, subscribe to events, and query the game through
//! [`RuntimeHandle`].
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides topic-based event bus for flexible event routing
//! - [`workers`] keeps background tasks internal to the crate
//! - [`repository`] persists turn logs and snapshots
//! - [`replay`] rebuilds a game from stored data
pub mod api;
pub mod events;
pub mod replay;
pub mod repository;
pub mod runtime;

mod workers;

pub use api::{
    CommandProvider, IdleProvider, Result, RuntimeError, RuntimeHandle, ScriptedProvider,
};
pub use events::{Event, EventBus, GameStateEvent, Topic, TurnEvent};
pub use replay::ReplayError;
pub use repository::{
    FileSnapshotStore, FileTurnLog, InMemorySnapshotStore, InMemoryTurnLog, RepositoryError,
    SnapshotRepository, TurnLogRepository, TurnRecord,
};
pub use runtime::{Runtime, RuntimeBuilder, RuntimeConfig, default_data_dir};
