//! Event extraction from a turn's actions.

use skirmish_core::{Action, ActionResponse, Game, UnitClass};

use super::types::GameStateEvent;

/// Derive state events from the actions of `turn`.
///
/// `game` is the state after the turn ran. Events follow action order; a
/// `GameWon` event, if any, comes last.
pub fn extract_events(turn: u32, actions: &[Action], game: &Game) -> Vec<GameStateEvent> {
    let mut events = Vec::new();

    for action in actions {
        let Some(ActionResponse::Attacked(attack)) = &action.response else {
            continue;
        };
        if !attack.is_kill() {
            continue;
        }

        events.push(GameStateEvent::UnitKilled {
            turn,
            unit: attack.target.clone(),
        });
        if attack.target.class() == UnitClass::Hq {
            events.push(GameStateEvent::TeamDefeated {
                turn,
                team: attack.target.team_id(),
            });
        }
    }

    let defeated_this_turn = events
        .iter()
        .any(|event| matches!(event, GameStateEvent::TeamDefeated { .. }));
    if defeated_this_turn && let Some(team) = game.winner() {
        events.push(GameStateEvent::GameWon { turn, team });
    }

    events
}
