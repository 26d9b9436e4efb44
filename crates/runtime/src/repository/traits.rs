//! Repository contracts for persisting a match.

use skirmish_core::GameSnapshot;

use super::{Result, TurnRecord};

/// Append-only log of executed turns.
///
/// Records must be appended in strictly increasing turn order; together with
/// a snapshot taken at or before the first record they are enough to rebuild
/// the game.
pub trait TurnLogRepository: Send {
    fn append(&mut self, record: &TurnRecord) -> Result<()>;

    /// Every record, oldest first.
    fn read_all(&self) -> Result<Vec<TurnRecord>>;

    fn flush(&mut self) -> Result<()>;

    /// Turn of the most recent record, if any.
    fn last_turn(&self) -> Option<u32>;
}

/// Snapshot storage indexed by the turn the snapshot was taken at.
pub trait SnapshotRepository: Send + Sync {
    fn save(&self, snapshot: &GameSnapshot) -> Result<()>;

    fn load(&self, turn: u32) -> Result<Option<GameSnapshot>>;

    fn exists(&self, turn: u32) -> bool;

    fn delete(&self, turn: u32) -> Result<()>;

    /// All stored turns in ascending order.
    fn list_turns(&self) -> Result<Vec<u32>>;

    /// Newest snapshot taken at or before `turn`.
    fn latest_at_or_before(&self, turn: u32) -> Result<Option<GameSnapshot>> {
        let candidate = self
            .list_turns()?
            .into_iter()
            .filter(|stored| *stored <= turn)
            .max();
        match candidate {
            Some(stored) => self.load(stored),
            None => Ok(None),
        }
    }
}

/// Rejects records that would break the log's turn ordering.
pub(crate) fn check_order(last: Option<u32>, record: &TurnRecord) -> Result<()> {
    match last {
        Some(last) if record.turn <= last => Err(super::RepositoryError::OutOfOrder {
            turn: record.turn,
            last,
        }),
        _ => Ok(()),
    }
}
