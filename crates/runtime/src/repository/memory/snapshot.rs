use std::collections::BTreeMap;
use std::sync::RwLock;

use skirmish_core::GameSnapshot;

use crate::repository::{RepositoryError, Result, SnapshotRepository};

/// In-memory implementation of SnapshotRepository.
#[derive(Default)]
pub struct InMemorySnapshotStore {
    snapshots: RwLock<BTreeMap<u32, GameSnapshot>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with an initial snapshot already stored.
    pub fn with_snapshot(snapshot: GameSnapshot) -> Self {
        let mut snapshots = BTreeMap::new();
        snapshots.insert(snapshot.turn, snapshot);
        Self {
            snapshots: RwLock::new(snapshots),
        }
    }
}

impl SnapshotRepository for InMemorySnapshotStore {
    fn save(&self, snapshot: &GameSnapshot) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.insert(snapshot.turn, snapshot.clone());
        Ok(())
    }

    fn load(&self, turn: u32) -> Result<Option<GameSnapshot>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.get(&turn).cloned())
    }

    fn exists(&self, turn: u32) -> bool {
        self.snapshots
            .read()
            .map(|snapshots| snapshots.contains_key(&turn))
            .unwrap_or(false)
    }

    fn delete(&self, turn: u32) -> Result<()> {
        let mut snapshots = self
            .snapshots
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        snapshots.remove(&turn);
        Ok(())
    }

    fn list_turns(&self) -> Result<Vec<u32>> {
        let snapshots = self
            .snapshots
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(snapshots.keys().copied().collect())
    }
}
