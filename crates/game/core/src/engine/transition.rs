//! Action transition dispatch and execution logic.

use crate::action::{ActionKind, ActionResponse, ActionTransition};
use crate::state::Game;

use super::errors::{ExecuteError, TransitionPhase};

/// Executes a transition through the two-phase pipeline and returns its response.
///
/// Phases:
/// 1. `pre_validate` - Check preconditions before mutation
/// 2. `apply` - Mutate the game and build the replay payload
///
/// If `apply` fails the game is restored to the checkpoint taken before it
/// ran, so a failed command never leaves partial changes behind.
#[inline]
fn drive_transition<T>(transition: &T, game: &mut Game) -> Result<ActionResponse, ExecuteError>
where
    T: ActionTransition,
{
    transition
        .pre_validate(game)
        .map_err(|error| ExecuteError::new(TransitionPhase::PreValidate, error))?;

    let checkpoint = game.checkpoint();
    match transition.apply(game) {
        Ok(response) => Ok(response.into()),
        Err(error) => {
            game.restore(checkpoint);
            Err(ExecuteError::new(TransitionPhase::Apply, error))
        }
    }
}

/// Routes an action to its transition.
pub(super) fn execute_transition(
    action: &ActionKind,
    game: &mut Game,
) -> Result<ActionResponse, ExecuteError> {
    match action {
        ActionKind::Move(transition) => drive_transition(transition, game),
        ActionKind::Attack(transition) => drive_transition(transition, game),
        ActionKind::Spawn(transition) => drive_transition(transition, game),
        ActionKind::PickUpFood(transition) => drive_transition(transition, game),
        ActionKind::DropOffFood(transition) => drive_transition(transition, game),
    }
}
