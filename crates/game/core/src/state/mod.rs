//! Authoritative game state representation.
//!
//! [`Game`] owns the grid bounds, the turn counter, every team (and through
//! them every unit), the id registry and the turn history. Hosts read it
//! freely but mutate it only through the engine entry points
//! [`Game::execute_turn`] and [`Game::import_turn`], plus the setup helpers
//! used by map generation.
mod error;
mod history;
mod lookup;
mod snapshot;
pub mod types;

use std::collections::{BTreeSet, VecDeque};

pub use error::{InitializationError, SnapshotError};
pub use history::History;
pub use lookup::{Lookup, UnitLocation};
pub use snapshot::GameSnapshot;
pub use types::{
    Citizen, Fighter, FighterClass, Footprint, Hq, Position, Positioned, Team, TeamError, TeamId,
    Unit, UnitClass, UnitId, UnitRecordError, UnitRef,
};

use crate::config::GameConfig;
use crate::env::{FoodSource, UnitSettings};

/// Initial parameters for one team.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamSetup {
    pub id: TeamId,
    pub hq_position: Position,
    pub hq_size: (u32, u32),
    pub food_count: u32,
    pub max_pop: u32,
    pub settings: UnitSettings,
}

impl TeamSetup {
    pub fn from_config(id: TeamId, hq_position: Position, config: &GameConfig) -> Self {
        Self {
            id,
            hq_position,
            hq_size: config.hq_size,
            food_count: config.starting_food,
            max_pop: config.max_pop,
            settings: config.settings.clone(),
        }
    }

    pub fn with_food(mut self, food_count: u32) -> Self {
        self.food_count = food_count;
        self
    }

    pub fn with_max_pop(mut self, max_pop: u32) -> Self {
        self.max_pop = max_pop;
        self
    }
}

/// Mutable parts of the state captured before a risky mutation.
///
/// History and the turn counter are deliberately absent: they only change at
/// the end of a batch, after every command has settled.
#[derive(Clone, Debug)]
pub(crate) struct StateCheckpoint {
    teams: Vec<Team>,
    food_sources: Vec<FoodSource>,
    next_unit_id: u32,
    lookup: Lookup,
}

/// Process-independent simulation state for one match.
#[derive(Clone, Debug)]
pub struct Game {
    width: u32,
    height: u32,
    turn: u32,
    /// Sequential unit id allocator. Ids are never reused.
    next_unit_id: u32,
    teams: Vec<Team>,
    food_sources: Vec<FoodSource>,
    lookup: Lookup,
    history: History,
}

impl Game {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            turn: 0,
            next_unit_id: 0,
            teams: Vec::new(),
            food_sources: Vec::new(),
            lookup: Lookup::default(),
            history: History::default(),
        }
    }

    pub fn with_config(config: &GameConfig) -> Self {
        Self::new(config.width, config.height)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Turn that the next `execute_turn` / `import_turn` call will record.
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn lookup(&self) -> &Lookup {
        &self.lookup
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|team| team.id == id)
    }

    pub(crate) fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|team| team.id == id)
    }

    pub fn food_sources(&self) -> &[FoodSource] {
        &self.food_sources
    }

    pub(crate) fn food_source_mut(&mut self, position: Position) -> Option<&mut FoodSource> {
        self.food_sources
            .iter_mut()
            .find(|source| source.position == position)
    }

    pub fn in_bounds(&self, position: Position) -> bool {
        position.x >= 0
            && position.y >= 0
            && (position.x as u32) < self.width
            && (position.y as u32) < self.height
    }

    /// True if `id` was handed out by this game at some point.
    pub fn was_allocated(&self, id: UnitId) -> bool {
        id.0 < self.next_unit_id
    }

    // ===== unit queries =====

    /// Resolves a living unit through the registry.
    pub fn unit(&self, id: UnitId) -> Option<UnitRef<'_>> {
        let location = self.lookup.get(id)?;
        self.team(location.team)?.unit(id)
    }

    /// Owned copy of a living unit's current state.
    pub fn unit_state(&self, id: UnitId) -> Option<Unit> {
        self.unit(id).map(|unit| unit.to_unit())
    }

    /// Every living unit, team by team.
    pub fn units(&self) -> impl Iterator<Item = UnitRef<'_>> {
        self.teams.iter().flat_map(Team::units)
    }

    /// Living units whose footprint covers `position`.
    pub fn units_at(&self, position: Position) -> Vec<UnitRef<'_>> {
        self.units().filter(|unit| unit.occupies(position)).collect()
    }

    /// The unit an attack on `position` hits: a unit standing there, else the
    /// headquarters covering the cell.
    pub fn target_at(&self, position: Position) -> Option<UnitRef<'_>> {
        let occupants = self.units_at(position);
        occupants
            .iter()
            .find(|unit| !matches!(unit, UnitRef::Hq(_)))
            .or_else(|| occupants.first())
            .copied()
    }

    /// Cells a unit may move to this turn.
    ///
    /// Breadth-first flood over orthogonal neighbours up to the unit's speed.
    /// Cells held by another team block the flood. Cells held by team mates
    /// can be crossed but not landed on, except for the team's own HQ
    /// footprint, which units spawn onto and walk off of.
    pub fn valid_moves(&self, id: UnitId) -> Vec<Position> {
        let Some(unit) = self.unit(id) else {
            return Vec::new();
        };
        let team = unit.team_id();
        let speed = unit.speed();
        let origin = unit.position();

        let mut visited = BTreeSet::from([origin]);
        let mut frontier = VecDeque::from([(origin, 0u32)]);
        let mut moves = Vec::new();

        while let Some((cell, distance)) = frontier.pop_front() {
            if distance >= speed {
                continue;
            }
            for next in cell.adjacents() {
                if !self.in_bounds(next) || !visited.insert(next) {
                    continue;
                }
                let occupants = self.units_at(next);
                if occupants.iter().any(|other| other.team_id() != team) {
                    continue;
                }
                if occupants.iter().all(|other| matches!(other, UnitRef::Hq(_))) {
                    moves.push(next);
                }
                frontier.push_back((next, distance + 1));
            }
        }

        moves
    }

    /// First cell of the HQ footprint not taken by a freshly spawned unit.
    pub fn next_spawn_position(&self, team: TeamId) -> Option<Position> {
        let team = self.team(team)?;
        team.hq
            .covering()
            .into_iter()
            .find(|cell| self.is_free_spawn_cell(team, *cell))
    }

    /// Spawn cells are HQ footprint cells with no other unit standing on them.
    pub fn is_free_spawn_cell(&self, team: &Team, position: Position) -> bool {
        team.hq.occupies(position)
            && self
                .units_at(position)
                .iter()
                .all(|unit| matches!(unit, UnitRef::Hq(_)))
    }

    /// The last team standing, once every other headquarters has fallen.
    pub fn winner(&self) -> Option<TeamId> {
        let mut alive = self.teams.iter().filter(|team| !team.is_defeated());
        match (alive.next(), alive.next()) {
            (Some(team), None) if self.teams.len() > 1 => Some(team.id),
            _ => None,
        }
    }

    // ===== setup (used by map generation and tests) =====

    pub fn add_team(&mut self, setup: TeamSetup) -> Result<UnitId, InitializationError> {
        if self.team(setup.id).is_some() {
            return Err(InitializationError::DuplicateTeam(setup.id));
        }
        let footprint = Footprint::new(setup.hq_position, setup.hq_size.0, setup.hq_size.1);
        for cell in footprint.covering() {
            self.ensure_placeable(cell)?;
        }

        let id = self.allocate_unit_id();
        let hq = Hq::new(id, setup.id, setup.hq_position, setup.hq_size, &setup.settings);
        self.lookup.register(id, setup.id, UnitClass::Hq)?;
        self.teams.push(Team::new(
            setup.id,
            hq,
            setup.food_count,
            setup.max_pop,
            setup.settings,
        ));
        Ok(id)
    }

    pub fn add_citizen(
        &mut self,
        team: TeamId,
        position: Position,
    ) -> Result<UnitId, InitializationError> {
        self.ensure_placeable(position)?;
        let settings = self.setup_settings(team)?;
        let id = self.allocate_unit_id();
        self.insert_unit(Unit::Citizen(Citizen::new(id, team, position, &settings)))?;
        Ok(id)
    }

    pub fn add_fighter(
        &mut self,
        team: TeamId,
        class: FighterClass,
        position: Position,
    ) -> Result<UnitId, InitializationError> {
        self.ensure_placeable(position)?;
        let settings = self.setup_settings(team)?;
        let id = self.allocate_unit_id();
        self.insert_unit(Unit::Fighter(Fighter::new(
            id, team, class, position, &settings,
        )))?;
        Ok(id)
    }

    pub fn add_food_source(&mut self, source: FoodSource) -> Result<(), InitializationError> {
        if !self.in_bounds(source.position) {
            return Err(self.out_of_bounds(source.position));
        }
        self.food_sources.push(source);
        Ok(())
    }

    /// Removes a unit as if it had been killed. Returns its final state.
    pub fn kill_unit(&mut self, id: UnitId) -> Option<Unit> {
        let location = self.lookup.unregister(id)?;
        let team = self.team_mut(location.team)?;
        if team.hq.id == id {
            team.hq.hp = team.hq.hp.min(0);
            return Some(Unit::Hq(team.hq.clone()));
        }
        team.citizens
            .remove(&id)
            .map(Unit::Citizen)
            .or_else(|| team.fighters.remove(&id).map(Unit::Fighter))
    }

    fn ensure_placeable(&self, position: Position) -> Result<(), InitializationError> {
        if !self.in_bounds(position) {
            return Err(self.out_of_bounds(position));
        }
        if !self.units_at(position).is_empty() {
            return Err(InitializationError::CellOccupied { position });
        }
        Ok(())
    }

    fn setup_settings(&self, team: TeamId) -> Result<UnitSettings, InitializationError> {
        self.team(team)
            .map(|team| team.settings.clone())
            .ok_or(InitializationError::UnknownTeam(team))
    }

    fn out_of_bounds(&self, position: Position) -> InitializationError {
        InitializationError::OutOfBounds {
            position,
            width: self.width,
            height: self.height,
        }
    }

    // ===== mutation primitives used by actions and replay =====

    pub(crate) fn allocate_unit_id(&mut self) -> UnitId {
        let id = UnitId(self.next_unit_id);
        self.next_unit_id += 1;
        id
    }

    /// Registers a citizen or fighter with its team and the lookup registry.
    ///
    /// The allocator is advanced past the unit's id so replayed spawns keep
    /// later allocations aligned with the original game.
    pub(crate) fn insert_unit(&mut self, unit: Unit) -> Result<(), InitializationError> {
        let id = unit.id();
        let team_id = unit.team_id();
        if self.team(team_id).is_none() {
            return Err(InitializationError::UnknownTeam(team_id));
        }
        if matches!(unit, Unit::Hq(_)) {
            return Err(InitializationError::DuplicateUnit(id));
        }
        self.lookup.register(id, team_id, unit.class())?;
        self.next_unit_id = self.next_unit_id.max(id.0 + 1);

        let Some(team) = self.team_mut(team_id) else {
            return Err(InitializationError::UnknownTeam(team_id));
        };
        match unit {
            Unit::Citizen(citizen) => {
                team.citizens.insert(id, citizen);
            }
            Unit::Fighter(fighter) => {
                team.fighters.insert(id, fighter);
            }
            Unit::Hq(_) => {}
        }
        Ok(())
    }

    pub(crate) fn citizen_mut(&mut self, id: UnitId) -> Option<&mut Citizen> {
        let location = self.lookup.get(id)?;
        self.team_mut(location.team)?.citizens.get_mut(&id)
    }

    /// Moves a citizen or fighter. Headquarters are fixed in place.
    pub(crate) fn set_position(&mut self, id: UnitId, position: Position) -> bool {
        let Some(location) = self.lookup.get(id) else {
            return false;
        };
        let Some(team) = self.team_mut(location.team) else {
            return false;
        };
        if let Some(citizen) = team.citizens.get_mut(&id) {
            citizen.position = position;
            true
        } else if let Some(fighter) = team.fighters.get_mut(&id) {
            fighter.position = position;
            true
        } else {
            false
        }
    }

    /// Damage intake. A unit whose hp drops to zero or below is removed from
    /// its team and the registry before this returns.
    pub(crate) fn apply_damage(&mut self, id: UnitId, damage: u32) -> Option<Unit> {
        let hp = self.unit(id)?.hp();
        let damage = i32::try_from(damage).unwrap_or(i32::MAX);
        self.set_hp(id, hp.saturating_sub(damage))
    }

    /// Sets hp directly, applying the same death rule as [`Self::apply_damage`].
    pub(crate) fn set_hp(&mut self, id: UnitId, hp: i32) -> Option<Unit> {
        let location = self.lookup.get(id)?;
        let team = self.team_mut(location.team)?;
        if team.hq.id == id {
            team.hq.hp = hp;
        } else if let Some(citizen) = team.citizens.get_mut(&id) {
            citizen.hp = hp;
        } else if let Some(fighter) = team.fighters.get_mut(&id) {
            fighter.hp = hp;
        } else {
            return None;
        }

        if hp <= 0 {
            self.kill_unit(id)
        } else {
            self.unit_state(id)
        }
    }

    pub(crate) fn checkpoint(&self) -> StateCheckpoint {
        StateCheckpoint {
            teams: self.teams.clone(),
            food_sources: self.food_sources.clone(),
            next_unit_id: self.next_unit_id,
            lookup: self.lookup.clone(),
        }
    }

    pub(crate) fn restore(&mut self, checkpoint: StateCheckpoint) {
        self.teams = checkpoint.teams;
        self.food_sources = checkpoint.food_sources;
        self.next_unit_id = checkpoint.next_unit_id;
        self.lookup = checkpoint.lookup;
    }

    /// Appends a finished batch under the current turn and advances the counter.
    pub(crate) fn record_turn(&mut self, actions: Vec<crate::action::Action>) {
        self.history.push_actions(self.turn, actions);
        self.turn += 1;
    }
}
