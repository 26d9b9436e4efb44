//! Action domain: commands, their transitions and the recorded results.
//!
//! A [`Command`] names what a player wants. [`ActionKind::from_command`] turns
//! it into a concrete transition, the engine drives that transition against
//! the game, and the outcome is captured as an [`Action`] in the history.
mod combat;
mod command;
mod error;
mod food;
mod movement;
mod spawn;
mod types;

pub use combat::{AttackAction, AttackResponse};
pub use command::{Command, CommandArgs, CommandKind};
pub use error::{ActionError, ErrorCategory};
pub use food::{DropOffFoodAction, DropOffFoodResponse, PickUpFoodAction, PickUpFoodResponse};
pub use movement::{MoveAction, MoveResponse};
pub use spawn::{SpawnAction, SpawnResponse};
pub use types::{Action, ActionClass, ActionResponse, ActionStatus, UnitHandle};

use crate::state::{Game, UnitClass, UnitId, UnitRef};

/// Defines how a concrete action validates and mutates game state.
///
/// `pre_validate` sees the state before anything changes and must reject
/// every command that would fail. `apply` performs the mutation and reports
/// what happened; if it still fails, the engine restores the state it had
/// before the call.
pub trait ActionTransition {
    type Response: Into<ActionResponse>;

    /// Returns the unit performing this action.
    fn actor(&self) -> UnitId;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _game: &Game) -> Result<(), ActionError> {
        Ok(())
    }

    /// Applies the action by mutating the game directly.
    fn apply(&self, game: &mut Game) -> Result<Self::Response, ActionError>;
}

/// Transition selected for a command.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Move(MoveAction),
    Attack(AttackAction),
    Spawn(SpawnAction),
    PickUpFood(PickUpFoodAction),
    DropOffFood(DropOffFoodAction),
}

impl ActionKind {
    /// Every command kind has a transition; missing arguments are reported by
    /// that transition's `pre_validate`.
    pub fn from_command(command: &Command) -> Self {
        let actor = command.actor;
        let position = command.args.position;
        match command.kind {
            CommandKind::Move => Self::Move(MoveAction::new(actor, position)),
            CommandKind::Attack => Self::Attack(AttackAction::new(actor, position)),
            CommandKind::SpawnCitizen => {
                Self::Spawn(SpawnAction::new(actor, Some(UnitClass::Citizen), position))
            }
            CommandKind::SpawnFighter => {
                Self::Spawn(SpawnAction::fighter(actor, command.args.unit_type, position))
            }
            CommandKind::PickUpFood => {
                Self::PickUpFood(PickUpFoodAction::new(actor, position))
            }
            CommandKind::DropOffFood => Self::DropOffFood(DropOffFoodAction::new(actor)),
        }
    }

    pub fn actor(&self) -> UnitId {
        match self {
            Self::Move(action) => action.actor(),
            Self::Attack(action) => action.actor(),
            Self::Spawn(action) => action.actor(),
            Self::PickUpFood(action) => action.actor(),
            Self::DropOffFood(action) => action.actor(),
        }
    }
}

/// Resolves a living actor through the lookup registry.
///
/// Ids this game handed out but no longer tracks belong to fallen units.
pub(crate) fn resolve_actor(game: &Game, id: UnitId) -> Result<UnitRef<'_>, ActionError> {
    if !game.lookup().contains(id) {
        return Err(if game.was_allocated(id) {
            ActionError::UnitDead(id)
        } else {
            ActionError::UnitNotFound(id)
        });
    }

    let unit = game.unit(id).ok_or(ActionError::RegistryDesync(id))?;
    if unit.hp() <= 0 {
        return Err(ActionError::UnitDead(id));
    }
    Ok(unit)
}

/// Like [`resolve_actor`], additionally requiring a specific actor class.
pub(crate) fn resolve_actor_as<'a>(
    game: &'a Game,
    id: UnitId,
    command: CommandKind,
    accepts: impl Fn(UnitClass) -> bool,
) -> Result<UnitRef<'a>, ActionError> {
    let unit = resolve_actor(game, id)?;
    if !accepts(unit.class()) {
        return Err(ActionError::WrongActorClass {
            command,
            class: unit.class(),
        });
    }
    Ok(unit)
}
