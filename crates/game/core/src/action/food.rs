use serde::{Deserialize, Serialize};

use super::{ActionError, ActionTransition, CommandKind, resolve_actor};
use crate::engine::ImportError;
use crate::env::FoodSource;
use crate::state::{Citizen, Game, Position, Positioned, TeamId, UnitId, UnitRef};

fn resolve_citizen(
    game: &Game,
    id: UnitId,
    command: CommandKind,
) -> Result<&Citizen, ActionError> {
    match resolve_actor(game, id)? {
        UnitRef::Citizen(citizen) => Ok(citizen),
        other => Err(ActionError::WrongActorClass {
            command,
            class: other.class(),
        }),
    }
}

/// Citizen gathering from a food source on or next to its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PickUpFoodAction {
    pub actor: UnitId,
    /// Explicit source cell; the first reachable source is used when absent.
    pub source: Option<Position>,
}

impl PickUpFoodAction {
    pub fn new(actor: UnitId, source: Option<Position>) -> Self {
        Self { actor, source }
    }

    /// Returns the source cell and the amount that will be transferred.
    fn harvest(&self, game: &Game) -> Result<(Position, u32), ActionError> {
        let citizen = resolve_citizen(game, self.actor, CommandKind::PickUpFood)?;
        let origin = citizen.position();

        let reachable = |source: &&FoodSource| source.is_reachable_from(origin);
        let source = match self.source {
            Some(position) => game
                .food_sources()
                .iter()
                .filter(reachable)
                .find(|source| source.position == position)
                .ok_or(ActionError::NoFoodSource { position })?,
            None => {
                let mut candidates = game.food_sources().iter().filter(reachable).peekable();
                let first = *candidates
                    .peek()
                    .ok_or(ActionError::NoFoodSource { position: origin })?;
                candidates
                    .find(|source| !source.is_depleted())
                    .unwrap_or(first)
            }
        };

        if source.is_depleted() {
            return Err(ActionError::FoodSourceDepleted {
                position: source.position,
            });
        }
        let spare = citizen.spare_capacity();
        if spare == 0 {
            return Err(ActionError::CarryCapacityReached(self.actor));
        }

        Ok((source.position, spare.min(source.amount)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickUpFoodResponse {
    pub id: UnitId,
    /// Citizen's load after the pick-up.
    pub carried: u32,
    pub source: Position,
    /// Food left in the source.
    pub remaining: u32,
}

impl PickUpFoodResponse {
    pub fn import(&self, game: &mut Game) -> Result<(), ImportError> {
        let source = game
            .food_source_mut(self.source)
            .ok_or(ImportError::UnknownFoodSource(self.source))?;
        source.amount = self.remaining;

        let citizen = game
            .citizen_mut(self.id)
            .ok_or(ImportError::UnknownUnit(self.id))?;
        citizen.food_carried = self.carried;
        Ok(())
    }
}

impl ActionTransition for PickUpFoodAction {
    type Response = PickUpFoodResponse;

    fn actor(&self) -> UnitId {
        self.actor
    }

    fn pre_validate(&self, game: &Game) -> Result<(), ActionError> {
        self.harvest(game).map(|_| ())
    }

    fn apply(&self, game: &mut Game) -> Result<Self::Response, ActionError> {
        let (position, amount) = self.harvest(game)?;

        let source = game
            .food_source_mut(position)
            .ok_or(ActionError::NoFoodSource { position })?;
        source.amount -= amount;
        let remaining = source.amount;

        let citizen = game
            .citizen_mut(self.actor)
            .ok_or(ActionError::RegistryDesync(self.actor))?;
        citizen.food_carried += amount;

        Ok(PickUpFoodResponse {
            id: self.actor,
            carried: citizen.food_carried,
            source: position,
            remaining,
        })
    }
}

/// Citizen unloading its food at its own headquarters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DropOffFoodAction {
    pub actor: UnitId,
}

impl DropOffFoodAction {
    pub fn new(actor: UnitId) -> Self {
        Self { actor }
    }

    /// Returns the team receiving the food and the amount delivered.
    fn delivery(&self, game: &Game) -> Result<(TeamId, u32), ActionError> {
        let citizen = resolve_citizen(game, self.actor, CommandKind::DropOffFood)?;
        if citizen.food_carried == 0 {
            return Err(ActionError::NothingToDropOff(self.actor));
        }

        let team = game
            .team(citizen.team_id)
            .ok_or(ActionError::RegistryDesync(self.actor))?;
        if !team.hq.footprint().touches(citizen.position) {
            return Err(ActionError::NotAtDropOff(self.actor));
        }

        Ok((team.id, citizen.food_carried))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropOffFoodResponse {
    pub id: UnitId,
    pub team: TeamId,
    /// Team food counter after the delivery.
    pub food_count: u32,
}

impl DropOffFoodResponse {
    pub fn import(&self, game: &mut Game) -> Result<(), ImportError> {
        let citizen = game
            .citizen_mut(self.id)
            .ok_or(ImportError::UnknownUnit(self.id))?;
        citizen.food_carried = 0;

        let team = game
            .team_mut(self.team)
            .ok_or(ImportError::UnknownTeam(self.team))?;
        team.food_count = self.food_count;
        Ok(())
    }
}

impl ActionTransition for DropOffFoodAction {
    type Response = DropOffFoodResponse;

    fn actor(&self) -> UnitId {
        self.actor
    }

    fn pre_validate(&self, game: &Game) -> Result<(), ActionError> {
        self.delivery(game).map(|_| ())
    }

    fn apply(&self, game: &mut Game) -> Result<Self::Response, ActionError> {
        let (team_id, amount) = self.delivery(game)?;

        let citizen = game
            .citizen_mut(self.actor)
            .ok_or(ActionError::RegistryDesync(self.actor))?;
        citizen.food_carried = 0;

        let team = game
            .team_mut(team_id)
            .ok_or(ActionError::RegistryDesync(self.actor))?;
        team.gain_food(amount);

        Ok(DropOffFoodResponse {
            id: self.actor,
            team: team_id,
            food_count: team.food_count,
        })
    }
}
