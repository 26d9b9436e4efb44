//! Serializable view of a game, used for saving, loading and state roots.

use serde::{Deserialize, Serialize};

use super::{Game, History, InitializationError, Lookup, Positioned, SnapshotError, Team};
use crate::env::FoodSource;

/// Everything needed to rebuild a [`Game`] except its history.
///
/// The lookup registry is not stored: it is derived from team membership
/// when the snapshot is loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    pub width: u32,
    pub height: u32,
    pub turn: u32,
    pub next_unit_id: u32,
    pub teams: Vec<Team>,
    #[serde(default)]
    pub food_sources: Vec<FoodSource>,
}

impl GameSnapshot {
    /// SHA-256 commitment to the snapshot's canonical bincode encoding.
    ///
    /// Two games that reach the same state (same units, hp, positions, food,
    /// turn and allocator) produce the same root regardless of how they got
    /// there.
    ///
    /// Encoding cannot fail: the snapshot holds only integers, structs and
    /// sequences of known length (unit maps go through `collect_seq` over
    /// `BTreeMap` values), and bincode's default options set no size limit
    /// on an in-memory buffer.
    pub fn state_root(&self) -> [u8; 32] {
        use sha2::{Digest, Sha256};

        let bytes = bincode::serialize(self).unwrap_or_default();
        Sha256::digest(&bytes).into()
    }
}

impl Game {
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            width: self.width,
            height: self.height,
            turn: self.turn,
            next_unit_id: self.next_unit_id,
            teams: self.teams.clone(),
            food_sources: self.food_sources.clone(),
        }
    }

    /// Rebuilds a game from a snapshot, validating its internal consistency.
    ///
    /// The returned game starts with an empty history at the snapshot's turn.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, InitializationError> {
        for (index, team) in snapshot.teams.iter().enumerate() {
            if snapshot.teams[..index].iter().any(|other| other.id == team.id) {
                return Err(InitializationError::DuplicateTeam(team.id));
            }
        }

        let lookup = Lookup::from_teams(&snapshot.teams)?;

        let highest = snapshot
            .teams
            .iter()
            .flat_map(|team| {
                std::iter::once(team.hq.id)
                    .chain(team.citizens.keys().copied())
                    .chain(team.fighters.keys().copied())
            })
            .map(|id| id.0)
            .max();
        if let Some(highest) = highest.filter(|highest| snapshot.next_unit_id <= *highest) {
            return Err(InitializationError::StaleUnitAllocator {
                next: snapshot.next_unit_id,
                highest,
            });
        }

        let game = Self {
            width: snapshot.width,
            height: snapshot.height,
            turn: snapshot.turn,
            next_unit_id: snapshot.next_unit_id,
            teams: snapshot.teams,
            food_sources: snapshot.food_sources,
            lookup,
            history: History::default(),
        };

        let placed = game
            .units()
            .flat_map(|unit| unit.covering())
            .chain(game.food_sources.iter().map(|source| source.position));
        for position in placed {
            if !game.in_bounds(position) {
                return Err(game.out_of_bounds(position));
            }
        }

        Ok(game)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: GameSnapshot = serde_json::from_str(json)?;
        Ok(Self::from_snapshot(snapshot)?)
    }

    /// Commitment to the current state. See [`GameSnapshot::state_root`].
    pub fn state_root(&self) -> [u8; 32] {
        self.to_snapshot().state_root()
    }
}
