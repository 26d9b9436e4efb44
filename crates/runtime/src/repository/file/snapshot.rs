//! File-based SnapshotRepository implementation.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use skirmish_core::GameSnapshot;

use crate::repository::{RepositoryError, Result, SnapshotRepository};

/// Stores snapshots as individual pretty-printed JSON files.
///
/// # File Format
///
/// Snapshots are stored as `snapshot_{turn}.json`, the same document
/// `Game::to_json` produces, so they can be inspected or edited by hand.
pub struct FileSnapshotStore {
    base_dir: PathBuf,
}

impl FileSnapshotStore {
    /// Directory name used for snapshots inside a data directory.
    pub const DIR_NAME: &'static str = "snapshots";

    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    /// Opens an existing snapshot directory without creating it.
    pub fn open(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        if !base_dir.is_dir() {
            return Err(RepositoryError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no snapshot directory at {}", base_dir.display()),
            )));
        }
        Ok(Self { base_dir })
    }

    /// Path of the snapshot taken at `turn`.
    pub fn snapshot_path(&self, turn: u32) -> PathBuf {
        self.base_dir.join(format!("snapshot_{}.json", turn))
    }

    /// Reads a snapshot document from an arbitrary path.
    pub fn read_file(path: impl AsRef<Path>) -> Result<GameSnapshot> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl SnapshotRepository for FileSnapshotStore {
    fn save(&self, snapshot: &GameSnapshot) -> Result<()> {
        let path = self.snapshot_path(snapshot.turn);
        let temp_path = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&temp_path, json)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved snapshot[{}] to {}", snapshot.turn, path.display());

        Ok(())
    }

    fn load(&self, turn: u32) -> Result<Option<GameSnapshot>> {
        let path = self.snapshot_path(turn);

        if !path.exists() {
            return Ok(None);
        }

        let snapshot = Self::read_file(&path)?;
        if snapshot.turn != turn {
            return Err(RepositoryError::CorruptedData(format!(
                "{} holds turn {}",
                path.display(),
                snapshot.turn
            )));
        }

        Ok(Some(snapshot))
    }

    fn exists(&self, turn: u32) -> bool {
        self.snapshot_path(turn).exists()
    }

    fn delete(&self, turn: u32) -> Result<()> {
        let path = self.snapshot_path(turn);

        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted snapshot[{}]", turn);
        }

        Ok(())
    }

    fn list_turns(&self) -> Result<Vec<u32>> {
        let mut turns = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            let turn = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(|name| name.strip_prefix("snapshot_"))
                .and_then(|name| name.strip_suffix(".json"))
                .and_then(|turn| turn.parse::<u32>().ok());
            if let Some(turn) = turn {
                turns.push(turn);
            }
        }

        turns.sort_unstable();
        Ok(turns)
    }
}
