use serde::{Deserialize, Serialize};

use super::{ActionError, ActionTransition, CommandKind, resolve_actor_as};
use crate::engine::ImportError;
use crate::state::{Citizen, Fighter, Game, Position, TeamId, Unit, UnitClass, UnitId};

/// Headquarters spawning a citizen or fighter onto its own footprint.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SpawnAction {
    pub actor: UnitId,
    pub command: CommandKind,
    pub unit_type: Option<UnitClass>,
    pub position: Option<Position>,
}

/// Everything `apply` needs once the checks have passed.
struct SpawnPlan {
    team: TeamId,
    class: UnitClass,
    position: Position,
    cost: u32,
}

impl SpawnAction {
    pub fn new(actor: UnitId, unit_type: Option<UnitClass>, position: Option<Position>) -> Self {
        Self {
            actor,
            command: CommandKind::SpawnCitizen,
            unit_type,
            position,
        }
    }

    pub fn fighter(actor: UnitId, unit_type: Option<UnitClass>, position: Option<Position>) -> Self {
        Self {
            command: CommandKind::SpawnFighter,
            ..Self::new(actor, unit_type, position)
        }
    }

    fn unit_class(&self) -> Result<UnitClass, ActionError> {
        match self.command {
            CommandKind::SpawnFighter => match self.unit_type {
                None => Err(ActionError::MissingArgument("unitType")),
                Some(class) if class.is_fighter() => Ok(class),
                Some(class) => Err(ActionError::InvalidUnitType(class)),
            },
            _ => Ok(UnitClass::Citizen),
        }
    }

    /// Runs every check in order: actor, position, unit type, population, food.
    fn plan(&self, game: &Game) -> Result<SpawnPlan, ActionError> {
        let hq = resolve_actor_as(game, self.actor, self.command, |class| {
            class == UnitClass::Hq
        })?;
        let team = game
            .team(hq.team_id())
            .ok_or(ActionError::RegistryDesync(self.actor))?;

        let position = match self.position {
            Some(position) => position,
            None => game
                .next_spawn_position(team.id)
                .ok_or(ActionError::NoSpawnPosition)?,
        };
        if !game.in_bounds(position) {
            return Err(ActionError::OutOfBounds { position });
        }
        if !game.is_free_spawn_cell(team, position) {
            return Err(ActionError::InvalidSpawnPosition { position });
        }

        let class = self.unit_class()?;

        if !team.has_pop_headroom() {
            return Err(ActionError::PopulationCapReached {
                pop: team.pop(),
                max_pop: team.max_pop,
            });
        }

        let cost = team.settings.cost(class);
        if team.food_count < cost {
            return Err(ActionError::InsufficientFood {
                required: cost,
                available: team.food_count,
            });
        }

        Ok(SpawnPlan {
            team: team.id,
            class,
            position,
            cost,
        })
    }
}

/// Full state of the new unit plus the team's food after paying for it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpawnResponse {
    pub unit: Unit,
    pub food_count: u32,
}

impl SpawnResponse {
    pub fn import(&self, game: &mut Game) -> Result<(), ImportError> {
        let team_id = self.unit.team_id();
        if game.team(team_id).is_none() {
            return Err(ImportError::UnknownTeam(team_id));
        }
        game.insert_unit(self.unit.clone())?;
        if let Some(team) = game.team_mut(team_id) {
            team.food_count = self.food_count;
        }
        Ok(())
    }
}

impl ActionTransition for SpawnAction {
    type Response = SpawnResponse;

    fn actor(&self) -> UnitId {
        self.actor
    }

    fn pre_validate(&self, game: &Game) -> Result<(), ActionError> {
        self.plan(game).map(|_| ())
    }

    fn apply(&self, game: &mut Game) -> Result<Self::Response, ActionError> {
        let plan = self.plan(game)?;

        let team = game
            .team_mut(plan.team)
            .ok_or(ActionError::RegistryDesync(self.actor))?;
        team.spend_food(plan.cost)?;
        let food_count = team.food_count;
        let settings = team.settings.clone();

        let id = game.allocate_unit_id();
        let unit = match plan.class.fighter_class() {
            Some(class) => Unit::Fighter(Fighter::new(
                id,
                plan.team,
                class,
                plan.position,
                &settings,
            )),
            None => Unit::Citizen(Citizen::new(id, plan.team, plan.position, &settings)),
        };
        game.insert_unit(unit.clone())
            .map_err(|_| ActionError::RegistryDesync(id))?;

        Ok(SpawnResponse { unit, food_count })
    }
}
