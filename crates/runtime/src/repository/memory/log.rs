use std::sync::{Arc, RwLock};

use crate::repository::traits::check_order;
use crate::repository::{RepositoryError, Result, TurnLogRepository, TurnRecord};

/// Turn log kept in memory.
///
/// Clones share the same storage, so a test can hand one clone to the
/// runtime and inspect the other.
#[derive(Clone, Default)]
pub struct InMemoryTurnLog {
    records: Arc<RwLock<Vec<TurnRecord>>>,
}

impl InMemoryTurnLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TurnLogRepository for InMemoryTurnLog {
    fn append(&mut self, record: &TurnRecord) -> Result<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        check_order(records.last().map(|last| last.turn), record)?;
        records.push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<TurnRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(records.clone())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn last_turn(&self) -> Option<u32> {
        self.records
            .read()
            .ok()
            .and_then(|records| records.last().map(|record| record.turn))
    }
}
