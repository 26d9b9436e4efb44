use serde::{Deserialize, Serialize};

use super::{ActionError, ActionTransition, CommandKind, resolve_actor_as};
use crate::engine::ImportError;
use crate::state::{Game, Position, Positioned, UnitClass, UnitId};

/// Moves a citizen or fighter to a cell inside its movement range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveAction {
    pub actor: UnitId,
    pub destination: Option<Position>,
}

impl MoveAction {
    pub fn new(actor: UnitId, destination: Option<Position>) -> Self {
        Self { actor, destination }
    }

    fn destination(&self) -> Result<Position, ActionError> {
        self.destination
            .ok_or(ActionError::MissingArgument("position"))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveResponse {
    pub id: UnitId,
    pub position: Position,
}

impl MoveResponse {
    pub fn import(&self, game: &mut Game) -> Result<(), ImportError> {
        if game.set_position(self.id, self.position) {
            Ok(())
        } else {
            Err(ImportError::UnknownUnit(self.id))
        }
    }
}

impl ActionTransition for MoveAction {
    type Response = MoveResponse;

    fn actor(&self) -> UnitId {
        self.actor
    }

    fn pre_validate(&self, game: &Game) -> Result<(), ActionError> {
        let unit = resolve_actor_as(game, self.actor, CommandKind::Move, |class| {
            class != UnitClass::Hq
        })?;
        let destination = self.destination()?;

        if !game.in_bounds(destination) {
            return Err(ActionError::OutOfBounds {
                position: destination,
            });
        }
        if !game.valid_moves(self.actor).contains(&destination) {
            return Err(ActionError::UnreachableDestination {
                origin: unit.position(),
                destination,
            });
        }
        Ok(())
    }

    fn apply(&self, game: &mut Game) -> Result<Self::Response, ActionError> {
        let destination = self.destination()?;
        if !game.set_position(self.actor, destination) {
            return Err(ActionError::RegistryDesync(self.actor));
        }
        Ok(MoveResponse {
            id: self.actor,
            position: destination,
        })
    }
}
