use serde::{Deserialize, Serialize};

use skirmish_core::{Action, Game};

/// One line of the turn log: everything a replica needs to re-enter a turn.
///
/// `state_root` is the hex-encoded root of the game *after* the turn, so a
/// replay can detect divergence at the exact turn it happens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnRecord {
    pub turn: u32,
    pub actions: Vec<Action>,
    pub state_root: String,
}

impl TurnRecord {
    /// Builds the record for `turn` from the game state right after it ran.
    pub fn capture(turn: u32, actions: Vec<Action>, game: &Game) -> Self {
        Self {
            turn,
            actions,
            state_root: hex::encode(game.state_root()),
        }
    }

    pub fn successes(&self) -> usize {
        self.actions.iter().filter(|action| action.is_success()).count()
    }
}
