//! Event types for different topics.

use serde::{Deserialize, Serialize};
use skirmish_core::{Action, TeamId, Unit};

/// Notable changes in the match state, derived from a turn's actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStateEvent {
    /// A unit was reduced to zero hit points.
    UnitKilled { turn: u32, unit: Unit },

    /// A team lost its headquarters.
    TeamDefeated { turn: u32, team: TeamId },

    /// Only one team is left standing.
    GameWon { turn: u32, team: TeamId },
}

/// Turn lifecycle events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnEvent {
    /// A live turn ran; carries every action it produced, failures included.
    Executed { turn: u32, actions: Vec<Action> },

    /// A recorded turn was replayed into the game.
    Imported { turn: u32, count: usize },
}

impl TurnEvent {
    pub fn turn(&self) -> u32 {
        match self {
            Self::Executed { turn, .. } | Self::Imported { turn, .. } => *turn,
        }
    }
}
