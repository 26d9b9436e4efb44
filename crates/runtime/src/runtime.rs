//! High-level runtime orchestrator.
//!
//! The runtime owns the simulation worker, wires up command/event channels,
//! and exposes a builder-based API for clients to drive the match.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use skirmish_core::{Game, TeamId};

use crate::api::{CommandProvider, Result, RuntimeError, RuntimeHandle};
use crate::events::EventBus;
use crate::repository::{
    FileSnapshotStore, FileTurnLog, SnapshotRepository, TurnLogRepository, TurnRecord,
};
use crate::workers::{Persistence, SimulationCommand, SimulationWorker};

/// Runtime configuration shared across the orchestrator and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub command_buffer_size: usize,
    pub event_buffer_size: usize,
    /// Directory for the turn log and snapshots. No persistence when unset.
    pub data_dir: Option<PathBuf>,
    /// Save a snapshot every N turns (the initial snapshot is always saved).
    pub snapshot_interval: Option<u32>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            command_buffer_size: 32,
            event_buffer_size: 100,
            data_dir: None,
            snapshot_interval: None,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `SKIRMISH_*` environment variables.
    ///
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(size) = read_env::<usize>("SKIRMISH_COMMAND_BUFFER") {
            config.command_buffer_size = size.max(1);
        }
        if let Some(size) = read_env::<usize>("SKIRMISH_EVENT_BUFFER") {
            config.event_buffer_size = size.max(1);
        }
        if let Some(dir) = read_env::<PathBuf>("SKIRMISH_DATA_DIR") {
            config.data_dir = Some(dir);
        }
        if let Some(interval) = read_env::<u32>("SKIRMISH_SNAPSHOT_INTERVAL") {
            config.snapshot_interval = Some(interval);
        }

        config
    }

    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    pub fn with_snapshot_interval(mut self, interval: u32) -> Self {
        self.snapshot_interval = Some(interval);
        self
    }
}

/// Platform data directory for saved matches
///
/// - Linux: `~/.local/share/skirmish` (or `$XDG_DATA_HOME/skirmish`)
/// - macOS: `~/Library/Application Support/skirmish`
/// - Windows: `%APPDATA%\skirmish`
/// - Fallback: `./save_data`
pub fn default_data_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "skirmish")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("./save_data"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}

/// Main runtime that orchestrates the simulation
///
/// Runtime owns the worker and the registered providers.
/// [`RuntimeHandle`] provides a cloneable façade for clients.
pub struct Runtime {
    handle: RuntimeHandle,
    providers: Vec<(TeamId, Box<dyn CommandProvider>)>,
    sim_worker_handle: JoinHandle<()>,
}

impl Runtime {
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Get a cloneable handle to this runtime
    pub fn handle(&self) -> RuntimeHandle {
        self.handle.clone()
    }

    /// Register (or replace) the provider for `team`.
    pub fn set_provider(&mut self, team: TeamId, provider: impl CommandProvider + 'static) {
        self.providers.retain(|(existing, _)| *existing != team);
        self.providers.push((team, Box::new(provider)));
        self.providers.sort_by_key(|(team, _)| *team);
    }

    /// Run one turn: ask every provider in team order, then execute the
    /// concatenated commands as a single batch.
    ///
    /// Commands a provider issues for another team's units are dropped.
    /// Unknown actors are kept so the turn records their failure.
    pub async fn step(&mut self) -> Result<TurnRecord> {
        if self.providers.is_empty() {
            return Err(RuntimeError::NoProviders);
        }

        let game = self.handle.game().await?;
        let mut commands = Vec::new();
        for (team, provider) in &self.providers {
            let provided = provider.provide_commands(*team, &game).await?;
            commands.extend(provided.into_iter().filter(|command| {
                let owner = game.lookup().get(command.actor).map(|location| location.team);
                let owned = owner.is_none_or(|owner| owner == *team);
                if !owned {
                    debug!(
                        target: "runtime",
                        team = %team,
                        unit = %command.actor,
                        "Dropped command for a unit of another team"
                    );
                }
                owned
            }));
        }

        self.handle.execute_turn(commands).await
    }

    /// Step until a team wins or `max_turns` turns have run.
    ///
    /// Returns the winner, if any.
    pub async fn run_until_winner(&mut self, max_turns: u32) -> Result<Option<TeamId>> {
        for _ in 0..max_turns {
            self.step().await?;
            if let Some(winner) = self.handle.game().await?.winner() {
                info!(target: "runtime", team = %winner, "Match won");
                return Ok(Some(winner));
            }
        }
        Ok(None)
    }

    /// Shutdown the runtime gracefully
    ///
    /// Waits for the worker to drain commands queued before the call. Calls
    /// made afterwards through other handle clones fail with
    /// [`RuntimeError::CommandChannelClosed`].
    pub async fn shutdown(self) -> Result<()> {
        self.handle.shutdown().await;

        self.sim_worker_handle
            .await
            .map_err(RuntimeError::WorkerJoin)?;

        Ok(())
    }
}

/// Builder for [`Runtime`] with flexible configuration.
#[derive(Default)]
pub struct RuntimeBuilder {
    config: RuntimeConfig,
    game: Option<Game>,
    providers: Vec<(TeamId, Box<dyn CommandProvider>)>,
    turn_log: Option<Box<dyn TurnLogRepository>>,
    snapshots: Option<Arc<dyn SnapshotRepository>>,
}

impl RuntimeBuilder {
    fn new() -> Self {
        Self::default()
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Provide the game the worker starts from (required)
    pub fn initial_game(mut self, game: Game) -> Self {
        self.game = Some(game);
        self
    }

    /// Register the provider for `team`
    pub fn provider(mut self, team: TeamId, provider: impl CommandProvider + 'static) -> Self {
        self.providers.retain(|(existing, _)| *existing != team);
        self.providers.push((team, Box::new(provider)));
        self
    }

    /// Use a custom turn log instead of the one under `data_dir`
    pub fn turn_log(mut self, log: impl TurnLogRepository + 'static) -> Self {
        self.turn_log = Some(Box::new(log));
        self
    }

    /// Use a custom snapshot store instead of the one under `data_dir`
    pub fn snapshot_store(mut self, store: Arc<dyn SnapshotRepository>) -> Self {
        self.snapshots = Some(store);
        self
    }

    /// Build the runtime and spawn its worker
    pub async fn build(self) -> Result<Runtime> {
        let game = self.game.ok_or(RuntimeError::MissingInitialGame)?;

        let mut turn_log = self.turn_log;
        let mut snapshots = self.snapshots;
        if let Some(dir) = &self.config.data_dir {
            if turn_log.is_none() {
                turn_log = Some(Box::new(FileTurnLog::open_or_create(
                    dir,
                    FileTurnLog::DEFAULT_FILENAME,
                )?));
            }
            if snapshots.is_none() {
                snapshots = Some(Arc::new(FileSnapshotStore::new(
                    dir.join(FileSnapshotStore::DIR_NAME),
                )?));
            }
        }

        if let Some(log) = &turn_log
            && let Some(last) = log.last_turn()
            && last >= game.turn()
        {
            return Err(RuntimeError::TurnLogAhead {
                last,
                turn: game.turn(),
            });
        }

        // Nothing past the starting turn is logged, so any later snapshot, or
        // a different one at the starting turn, belongs to another match.
        if let Some(store) = &snapshots {
            let initial = game.to_snapshot();
            for stale in store.list_turns()?.into_iter().filter(|turn| *turn > initial.turn) {
                store.delete(stale)?;
                warn!(target: "runtime", turn = stale, "Discarded snapshot from another match");
            }
            if store.load(initial.turn)?.as_ref() != Some(&initial) {
                store.save(&initial)?;
            }
        }

        let (command_tx, command_rx) =
            mpsc::channel::<SimulationCommand>(self.config.command_buffer_size);
        let event_bus = EventBus::with_capacity(self.config.event_buffer_size);
        let handle = RuntimeHandle::new(command_tx, event_bus.clone());

        info!(
            target: "runtime",
            turn = game.turn(),
            teams = game.teams().len(),
            persistent = turn_log.is_some(),
            "Starting simulation worker"
        );

        let persistence = Persistence {
            turn_log,
            snapshots,
            snapshot_interval: self.config.snapshot_interval,
        };
        let sim_worker = SimulationWorker::new(game, persistence, command_rx, event_bus);
        let sim_worker_handle = tokio::spawn(async move {
            sim_worker.run().await;
        });

        let mut providers = self.providers;
        providers.sort_by_key(|(team, _)| *team);

        Ok(Runtime {
            handle,
            providers,
            sim_worker_handle,
        })
    }
}
