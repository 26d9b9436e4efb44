//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! running turns, querying the game, or streaming events from specific topics.

use std::collections::HashMap;

use tokio::sync::{broadcast, mpsc, oneshot};

use skirmish_core::{Action, Command, Game, GameSnapshot};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::repository::TurnRecord;
use crate::workers::SimulationCommand;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<SimulationCommand>,
    event_bus: EventBus,
}

impl RuntimeHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<SimulationCommand>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SimulationCommand,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(build(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Run one turn with the given commands, in order.
    ///
    /// Individual command failures are recorded in the returned actions and
    /// never fail the call.
    pub async fn execute_turn(&self, commands: Vec<Command>) -> Result<TurnRecord> {
        self.request(|reply| SimulationCommand::ExecuteTurn { commands, reply })
            .await?
    }

    /// Apply a recorded turn without re-validating it.
    pub async fn import_turn(&self, turn: u32, actions: Vec<Action>) -> Result<()> {
        self.request(|reply| SimulationCommand::ImportTurn {
            turn,
            actions,
            reply,
        })
        .await?
    }

    /// Query a read-only copy of the current game.
    pub async fn game(&self) -> Result<Game> {
        self.request(|reply| SimulationCommand::QueryGame { reply })
            .await
    }

    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        self.request(|reply| SimulationCommand::QuerySnapshot { reply })
            .await
    }

    /// Actions recorded for `turn`; empty when the turn never ran.
    pub async fn history(&self, turn: u32) -> Result<Vec<Action>> {
        self.request(|reply| SimulationCommand::QueryHistory { turn, reply })
            .await
    }

    /// Ask the worker to stop. Commands already queued still run.
    pub(crate) async fn shutdown(&self) {
        let _ = self.command_tx.send(SimulationCommand::Shutdown).await;
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::GameState` - Kills, defeated teams and the winner
    /// - `Topic::Turn` - Executed and imported turns
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use skirmish_runtime::Topic;
    ///
    /// let mut turns = handle.subscribe(Topic::Turn);
    /// while let Ok(event) = turns.recv().await {
    ///     // Handle turn events
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
