use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::action::Action;

/// Append-only log of recorded actions, keyed by the turn they were taken in.
///
/// A turn with no commands still gets an (empty) entry so the log covers every
/// turn the game has advanced through.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    turns: BTreeMap<u32, Vec<Action>>,
}

impl History {
    pub(crate) fn push_actions(&mut self, turn: u32, actions: Vec<Action>) {
        self.turns.entry(turn).or_default().extend(actions);
    }

    /// Actions recorded for `turn`, or an empty slice if the turn never ran.
    pub fn actions(&self, turn: u32) -> &[Action] {
        self.turns.get(&turn).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every recorded turn in ascending order.
    pub fn turns(&self) -> impl Iterator<Item = (u32, &[Action])> + '_ {
        self.turns
            .iter()
            .map(|(turn, actions)| (*turn, actions.as_slice()))
    }

    pub fn latest_turn(&self) -> Option<u32> {
        self.turns.keys().next_back().copied()
    }

    /// Number of turns recorded.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
