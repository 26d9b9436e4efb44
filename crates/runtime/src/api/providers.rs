//! Asynchronous abstraction for sourcing team intent.
//!
//! Runtime users plug in [`CommandProvider`] implementations so the simulation
//! can run with human input, scripted fixtures, or AI policies.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use skirmish_core::{Command, Game, TeamId};

use super::errors::Result;

/// Trait for providing a team's commands based on the current game state.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - AI decisions
/// - Scripted/replayed commands
#[async_trait]
pub trait CommandProvider: Send + Sync {
    /// Commands `team` wants to issue this turn.
    ///
    /// `game` is a read-only copy taken before any team's commands run.
    /// Returning an empty list passes the turn.
    async fn provide_commands(&self, team: TeamId, game: &Game) -> Result<Vec<Command>>;
}

/// Always passes. Useful for testing or as a placeholder opponent.
pub struct IdleProvider;

#[async_trait]
impl CommandProvider for IdleProvider {
    async fn provide_commands(&self, _team: TeamId, _game: &Game) -> Result<Vec<Command>> {
        Ok(Vec::new())
    }
}

/// Replays a fixed list of per-turn command batches, then passes.
pub struct ScriptedProvider {
    turns: Mutex<VecDeque<Vec<Command>>>,
}

impl ScriptedProvider {
    pub fn new(turns: impl IntoIterator<Item = Vec<Command>>) -> Self {
        Self {
            turns: Mutex::new(turns.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.turns.lock().map(|turns| turns.len()).unwrap_or(0)
    }
}

#[async_trait]
impl CommandProvider for ScriptedProvider {
    async fn provide_commands(&self, _team: TeamId, _game: &Game) -> Result<Vec<Command>> {
        let next = self
            .turns
            .lock()
            .ok()
            .and_then(|mut turns| turns.pop_front());
        Ok(next.unwrap_or_default())
    }
}
