//! Rebuilding a game from a snapshot and its turn log.

use std::path::Path;

use thiserror::Error;
use tracing::debug;

use skirmish_core::{Game, GameSnapshot, ImportError, InitializationError};

use crate::repository::{
    FileSnapshotStore, FileTurnLog, RepositoryError, SnapshotRepository, TurnLogRepository,
    TurnRecord,
};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("snapshot is not a valid game")]
    InvalidSnapshot(#[source] InitializationError),

    #[error("turn {turn} could not be imported")]
    Import {
        turn: u32,
        #[source]
        source: ImportError,
    },

    #[error("turn {turn} diverged: expected state root {expected}, got {actual}")]
    Diverged {
        turn: u32,
        expected: String,
        actual: String,
    },

    #[error("no snapshot available")]
    NoSnapshot,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Restores `snapshot` and imports every record at or after its turn.
///
/// Records older than the snapshot are skipped. Each imported turn must
/// reproduce the state root stored with it.
pub fn rebuild(snapshot: GameSnapshot, records: &[TurnRecord]) -> Result<Game, ReplayError> {
    let mut game = Game::from_snapshot(snapshot).map_err(ReplayError::InvalidSnapshot)?;

    let start = game.turn();
    for record in records.iter().filter(|record| record.turn >= start) {
        game.import_turn(record.turn, &record.actions)
            .map_err(|source| ReplayError::Import {
                turn: record.turn,
                source,
            })?;

        let actual = hex::encode(game.state_root());
        if actual != record.state_root {
            return Err(ReplayError::Diverged {
                turn: record.turn,
                expected: record.state_root.clone(),
                actual,
            });
        }
        debug!(target: "runtime::replay", turn = record.turn, "Turn replayed");
    }

    Ok(game)
}

/// Rebuilds the newest state reachable from stored data: the latest snapshot
/// followed by the log records after it.
pub fn restore_latest(
    snapshots: &dyn SnapshotRepository,
    log: &dyn TurnLogRepository,
) -> Result<Game, ReplayError> {
    let records = log.read_all()?;
    restore_from_records(snapshots, &records)
}

/// Rebuilds the match saved under a runtime data directory.
///
/// Read-only: nothing is created or written under `data_dir`. A missing
/// turn log counts as empty.
pub fn restore_saved(data_dir: impl AsRef<Path>) -> Result<Game, ReplayError> {
    let data_dir = data_dir.as_ref();
    let snapshots = FileSnapshotStore::open(data_dir.join(FileSnapshotStore::DIR_NAME))?;

    let log_path = data_dir.join(FileTurnLog::DEFAULT_FILENAME);
    let records = if log_path.exists() {
        FileTurnLog::read_file(&log_path)?
    } else {
        Vec::new()
    };

    restore_from_records(&snapshots, &records)
}

fn restore_from_records(
    snapshots: &dyn SnapshotRepository,
    records: &[TurnRecord],
) -> Result<Game, ReplayError> {
    let target = records
        .last()
        .map(|record| record.turn.saturating_add(1))
        .unwrap_or(u32::MAX);

    let snapshot = snapshots
        .latest_at_or_before(target)?
        .ok_or(ReplayError::NoSnapshot)?;

    rebuild(snapshot, records)
}
