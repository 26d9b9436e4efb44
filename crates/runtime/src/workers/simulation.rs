//! Simulation worker that owns the authoritative [`skirmish_core::Game`].
//!
//! Receives commands from [`RuntimeHandle`](crate::RuntimeHandle), runs turns
//! through [`skirmish_core::GameEngine`], persists them, and publishes events
//! to the [`EventBus`].

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use skirmish_core::{Action, Command, Game, GameSnapshot};

use crate::api::{Result, RuntimeError};
use crate::events::{Event, EventBus, TurnEvent, extract_events};
use crate::repository::{SnapshotRepository, TurnLogRepository, TurnRecord};

/// Commands that can be sent to the simulation worker
pub enum SimulationCommand {
    /// Run one turn of commands.
    ExecuteTurn {
        commands: Vec<Command>,
        reply: oneshot::Sender<Result<TurnRecord>>,
    },
    /// Apply a recorded turn.
    ImportTurn {
        turn: u32,
        actions: Vec<Action>,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Query a copy of the game (read-only).
    QueryGame { reply: oneshot::Sender<Game> },
    QuerySnapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
    QueryHistory {
        turn: u32,
        reply: oneshot::Sender<Vec<Action>>,
    },
    /// Stop after the commands queued before this one.
    Shutdown,
}

/// Where finished turns are written.
#[derive(Default)]
pub struct Persistence {
    pub turn_log: Option<Box<dyn TurnLogRepository>>,
    pub snapshots: Option<Arc<dyn SnapshotRepository>>,
    /// Save a snapshot whenever the next turn number is a multiple of this.
    pub snapshot_interval: Option<u32>,
}

/// Background task that processes gameplay commands.
pub struct SimulationWorker {
    game: Game,
    persistence: Persistence,
    command_rx: mpsc::Receiver<SimulationCommand>,
    event_bus: EventBus,
}

impl SimulationWorker {
    pub fn new(
        game: Game,
        persistence: Persistence,
        command_rx: mpsc::Receiver<SimulationCommand>,
        event_bus: EventBus,
    ) -> Self {
        Self {
            game,
            persistence,
            command_rx,
            event_bus,
        }
    }

    /// Main worker loop. Exits on `Shutdown` or once every handle is dropped.
    pub async fn run(mut self) {
        while let Some(cmd) = self.command_rx.recv().await {
            if matches!(cmd, SimulationCommand::Shutdown) {
                break;
            }
            self.handle_command(cmd);
        }

        if let Some(log) = self.persistence.turn_log.as_mut()
            && let Err(error) = log.flush()
        {
            warn!(target: "runtime::worker", %error, "Failed to flush turn log on shutdown");
        }
        debug!(target: "runtime::worker", turn = self.game.turn(), "Simulation worker stopped");
    }

    fn handle_command(&mut self, cmd: SimulationCommand) {
        match cmd {
            SimulationCommand::ExecuteTurn { commands, reply } => {
                let result = self.execute_turn(commands);
                let _ = reply.send(result);
            }
            SimulationCommand::ImportTurn {
                turn,
                actions,
                reply,
            } => {
                let result = self.import_turn(turn, actions);
                let _ = reply.send(result);
            }
            SimulationCommand::QueryGame { reply } => {
                let _ = reply.send(self.game.clone());
            }
            SimulationCommand::QuerySnapshot { reply } => {
                let _ = reply.send(self.game.to_snapshot());
            }
            SimulationCommand::QueryHistory { turn, reply } => {
                let _ = reply.send(self.game.history().actions(turn).to_vec());
            }
            SimulationCommand::Shutdown => {}
        }
    }

    fn execute_turn(&mut self, commands: Vec<Command>) -> Result<TurnRecord> {
        let turn = self.game.turn();
        let actions = self.game.execute_turn(commands);

        for action in actions.iter().filter(|action| !action.is_success()) {
            debug!(
                target: "runtime::worker",
                turn,
                unit = %action.unit.id,
                command = %action.command.kind,
                error = action.error.as_deref().unwrap_or_default(),
                "Command rejected"
            );
        }

        let record = TurnRecord::capture(turn, actions.clone(), &self.game);
        info!(
            target: "runtime::worker",
            turn,
            commands = record.actions.len(),
            succeeded = record.successes(),
            state_root = %record.state_root,
            "Turn executed"
        );

        self.publish_state_events(turn, &actions);
        self.event_bus
            .publish(Event::Turn(TurnEvent::Executed { turn, actions }));

        self.persist(&record)?;
        Ok(record)
    }

    fn import_turn(&mut self, turn: u32, actions: Vec<Action>) -> Result<()> {
        if let Err(error) = self.game.import_turn(turn, &actions) {
            warn!(target: "runtime::worker", turn, %error, "Turn import rejected");
            return Err(RuntimeError::Import(error));
        }

        let record = TurnRecord::capture(turn, actions, &self.game);
        info!(
            target: "runtime::worker",
            turn,
            actions = record.actions.len(),
            state_root = %record.state_root,
            "Turn imported"
        );

        self.publish_state_events(turn, &record.actions);
        self.event_bus.publish(Event::Turn(TurnEvent::Imported {
            turn,
            count: record.actions.len(),
        }));

        self.persist(&record)
    }

    fn publish_state_events(&self, turn: u32, actions: &[Action]) {
        for event in extract_events(turn, actions, &self.game) {
            self.event_bus.publish(Event::GameState(event));
        }
    }

    /// The game has already advanced when this fails; the error only reports
    /// that the record did not reach storage.
    fn persist(&mut self, record: &TurnRecord) -> Result<()> {
        if let Some(log) = self.persistence.turn_log.as_mut() {
            log.append(record)?;
        }

        let next_turn = self.game.turn();
        let due = self
            .persistence
            .snapshot_interval
            .is_some_and(|interval| interval > 0 && next_turn % interval == 0);
        if due && let Some(store) = &self.persistence.snapshots {
            store.save(&self.game.to_snapshot())?;
            debug!(target: "runtime::worker", turn = next_turn, "Snapshot saved");
        }

        Ok(())
    }
}
