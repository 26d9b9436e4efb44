//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination, repositories, and command providers
//! so clients can bubble them up with consistent context.

use thiserror::Error;
use tokio::sync::oneshot;

use skirmish_core::ImportError;

pub use crate::replay::ReplayError;
pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("turn import rejected")]
    Import(#[from] ImportError),

    #[error("runtime requires an initial game before building")]
    MissingInitialGame,

    #[error("turn log already holds turn {last}, but the game starts at turn {turn}")]
    TurnLogAhead { last: u32, turn: u32 },

    #[error("no command providers registered")]
    NoProviders,

    #[error(transparent)]
    Replay(#[from] ReplayError),
}
