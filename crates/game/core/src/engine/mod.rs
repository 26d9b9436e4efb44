//! Turn execution and replay pipeline.
//!
//! The [`GameEngine`] is the authoritative reducer for [`Game`]. Live play
//! goes through [`GameEngine::execute_turn`], which validates every command
//! and records its outcome; replay goes through [`GameEngine::import_turn`],
//! which trusts the recorded responses and skips validation entirely.
mod errors;
mod transition;

pub use errors::{ExecuteError, ImportError, TransitionPhase, TransitionPhaseError};

use crate::action::{Action, ActionKind, ActionResponse, Command};
use crate::state::Game;

/// Drives commands and recorded actions against a borrowed game.
///
/// Commands within one batch run strictly in submission order: the effects
/// of command *i* are visible to the validation of command *i + 1*.
pub struct GameEngine<'a> {
    game: &'a mut Game,
}

impl<'a> GameEngine<'a> {
    pub fn new(game: &'a mut Game) -> Self {
        Self { game }
    }

    /// Runs one command without touching history or the turn counter.
    ///
    /// On error the game is exactly as it was before the call.
    pub fn execute(&mut self, command: &Command) -> Result<ActionResponse, ExecuteError> {
        let action = ActionKind::from_command(command);
        transition::execute_transition(&action, self.game)
    }

    /// Executes a batch and records it as the current turn.
    ///
    /// Returns one action per command, in input order. Per-command failures
    /// become `failure` entries. The turn advances exactly once, even for an
    /// empty batch.
    pub fn execute_turn<I>(&mut self, commands: I) -> Vec<Action>
    where
        I: IntoIterator<Item = Command>,
    {
        let actions: Vec<Action> = commands
            .into_iter()
            .map(|command| match self.execute(&command) {
                Ok(response) => Action::success(command, response),
                Err(failure) => Action::failure(command, &failure.error),
            })
            .collect();

        self.game.record_turn(actions.clone());
        actions
    }

    /// Reapplies a recorded turn without validating game rules.
    ///
    /// The whole call is all-or-nothing: if `turn` is not the turn this game
    /// expects, or any entry cannot be applied, the game is left unchanged.
    pub fn import_turn(&mut self, turn: u32, actions: &[Action]) -> Result<(), ImportError> {
        let expected = self.game.turn();
        if turn != expected {
            return Err(ImportError::TurnMismatch {
                expected,
                got: turn,
            });
        }

        let checkpoint = self.game.checkpoint();
        for action in actions {
            if let Err(error) = action.import(self.game) {
                self.game.restore(checkpoint);
                return Err(error);
            }
        }

        self.game.record_turn(actions.to_vec());
        Ok(())
    }
}

impl Game {
    /// See [`GameEngine::execute_turn`].
    pub fn execute_turn<I>(&mut self, commands: I) -> Vec<Action>
    where
        I: IntoIterator<Item = Command>,
    {
        GameEngine::new(self).execute_turn(commands)
    }

    /// See [`GameEngine::import_turn`].
    pub fn import_turn(&mut self, turn: u32, actions: &[Action]) -> Result<(), ImportError> {
        GameEngine::new(self).import_turn(turn, actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::{ActionClass, ActionResponse, ActionStatus, CommandKind};
    use crate::config::GameConfig;
    use crate::env::FoodSource;
    use crate::state::{FighterClass, Position, TeamId, TeamSetup, UnitId};

    struct Match {
        game: Game,
        red_hq: UnitId,
        blue_hq: UnitId,
    }

    fn new_match(food: u32) -> Match {
        let config = GameConfig::default().with_starting_food(food);
        let mut game = Game::with_config(&config);
        let red_hq = game
            .add_team(TeamSetup::from_config(TeamId(0), Position::new(0, 0), &config))
            .unwrap();
        let blue_hq = game
            .add_team(TeamSetup::from_config(TeamId(1), Position::new(8, 8), &config))
            .unwrap();
        Match {
            game,
            red_hq,
            blue_hq,
        }
    }

    #[test]
    fn empty_batch_still_advances_turn() {
        let mut game = new_match(0).game;

        let actions = game.execute_turn(Vec::<Command>::new());

        assert!(actions.is_empty());
        assert_eq!(game.turn(), 1);
        assert_eq!(game.history().latest_turn(), Some(0));
        assert!(game.history().actions(0).is_empty());
    }

    #[test]
    fn spawn_citizen_without_food_fails_cleanly() {
        let Match {
            mut game, red_hq, ..
        } = new_match(0);
        let before = game.to_snapshot();

        let actions = game.execute_turn([Command::spawn_citizen(red_hq)]);

        assert_eq!(actions.len(), 1);
        let action = &actions[0];
        assert_eq!(action.status, ActionStatus::Failure);
        assert_eq!(action.class_name, ActionClass::SpawnAction);
        assert!(action.response.is_none());
        assert!(!action.error.as_deref().unwrap_or_default().is_empty());
        assert_eq!(game.team(TeamId(0)).unwrap().pop(), 0);
        assert_eq!(game.to_snapshot().teams, before.teams);
    }

    #[test]
    fn citizen_moves_to_adjacent_cell() {
        let mut game = new_match(0).game;
        let citizen = game.add_citizen(TeamId(0), Position::new(2, 2)).unwrap();

        let actions = game.execute_turn([Command::move_to(citizen, Position::new(2, 3))]);

        assert!(actions[0].is_success());
        assert_eq!(
            actions[0].response,
            Some(ActionResponse::Moved(crate::action::MoveResponse {
                id: citizen,
                position: Position::new(2, 3)
            }))
        );
        assert_eq!(
            game.unit(citizen).map(|unit| crate::state::Positioned::position(&unit)),
            Some(Position::new(2, 3))
        );
    }

    #[test]
    fn invalid_commands_leave_state_untouched() {
        let Match {
            mut game, red_hq, ..
        } = new_match(3);
        let citizen = game.add_citizen(TeamId(0), Position::new(5, 5)).unwrap();
        let before = game.to_snapshot();

        let actions = game.execute_turn([
            Command::move_to(citizen, Position::new(7, 7)),
            Command::move_to(citizen, Position::new(-1, 5)),
            Command::spawn_fighter(red_hq, FighterClass::Infantry),
            Command::attack(citizen, Position::new(8, 8)),
            Command::new(citizen, CommandKind::Move),
            Command::pick_up_food(citizen),
            Command::drop_off_food(red_hq),
            Command::move_to(UnitId(99), Position::new(1, 1)),
        ]);

        assert_eq!(actions.len(), 8);
        assert!(actions.iter().all(|action| !action.is_success()));
        let after = game.to_snapshot();
        assert_eq!(after.teams, before.teams);
        assert_eq!(after.next_unit_id, before.next_unit_id);
        assert_eq!(after.turn, before.turn + 1);
    }

    #[test]
    fn later_commands_see_earlier_effects() {
        let config = GameConfig::default()
            .with_starting_food(100)
            .with_max_pop(1);
        let mut game = Game::with_config(&config);
        let hq = game
            .add_team(TeamSetup::from_config(TeamId(0), Position::new(0, 0), &config))
            .unwrap();

        let actions = game.execute_turn([Command::spawn_citizen(hq), Command::spawn_citizen(hq)]);

        assert!(actions[0].is_success());
        assert!(!actions[1].is_success());
        let team = game.team(TeamId(0)).unwrap();
        assert_eq!(team.pop(), 1);
        assert_eq!(team.food_count, 95);
    }

    #[test]
    fn lethal_attack_removes_target_immediately() {
        let mut game = new_match(0).game;
        let cavalry = game
            .add_fighter(TeamId(0), FighterClass::Cavalry, Position::new(4, 4))
            .unwrap();
        let archer = game
            .add_fighter(TeamId(1), FighterClass::Ranged, Position::new(4, 5))
            .unwrap();

        let actions = game.execute_turn([
            Command::attack(cavalry, Position::new(4, 5)),
            Command::attack(archer, Position::new(4, 4)),
        ]);

        let Some(ActionResponse::Attacked(hit)) = &actions[0].response else {
            panic!("expected attack response, got {:?}", actions[0]);
        };
        assert_eq!(hit.damage, 9);
        assert_eq!(hit.target.hp(), 1);

        let actions = game.execute_turn([Command::attack(cavalry, Position::new(4, 5))]);
        assert!(actions[0].is_success());
        assert!(game.unit(archer).is_none());
        assert!(!game.lookup().contains(archer));
        assert!(game.team(TeamId(1)).unwrap().fighters.is_empty());

        let actions = game.execute_turn([Command::attack(archer, Position::new(4, 4))]);
        assert_eq!(
            actions[0].error.as_deref(),
            Some(crate::action::ActionError::UnitDead(archer).to_string().as_str())
        );
    }

    #[test]
    fn replay_from_snapshot_converges() {
        let Match {
            mut game,
            red_hq,
            blue_hq,
        } = new_match(40);
        game.add_food_source(FoodSource::new(Position::new(3, 0), 9))
            .unwrap();
        let origin = game.to_json().unwrap();

        let mut turns = Vec::new();
        let turn = game.turn();
        turns.push((
            turn,
            game.execute_turn([
                Command::spawn_citizen(red_hq),
                Command::spawn_fighter(blue_hq, FighterClass::Cavalry),
                Command::spawn_citizen(red_hq).with_position(Position::new(5, 5)),
            ]),
        ));
        let citizen = UnitId(2);
        let turn = game.turn();
        turns.push((
            turn,
            game.execute_turn([
                Command::move_to(citizen, Position::new(1, 0)),
                Command::move_to(UnitId(3), Position::new(7, 7)),
            ]),
        ));
        let turn = game.turn();
        turns.push((
            turn,
            game.execute_turn([
                Command::move_to(citizen, Position::new(2, 0)),
                Command::pick_up_food(citizen),
                Command::drop_off_food(citizen),
            ]),
        ));
        assert!(turns[1..3].iter().all(|(_, actions)| actions.iter().all(Action::is_success)));
        assert_eq!(game.team(TeamId(0)).unwrap().food_count, 40);
        let turn = game.turn();
        turns.push((turn, game.execute_turn(Vec::<Command>::new())));

        let mut replica = Game::from_json(&origin).unwrap();
        for (turn, actions) in &turns {
            replica.import_turn(*turn, actions).unwrap();
        }

        assert_eq!(replica.to_snapshot(), game.to_snapshot());
        assert_eq!(
            hex::encode(replica.state_root()),
            hex::encode(game.state_root())
        );
        assert_eq!(replica.history(), game.history());
    }

    #[test]
    fn replayed_attacks_damage_and_remove_units() {
        let mut game = new_match(0).game;
        let cavalry = game
            .add_fighter(TeamId(0), FighterClass::Cavalry, Position::new(4, 4))
            .unwrap();
        let archer = game
            .add_fighter(TeamId(1), FighterClass::Ranged, Position::new(4, 5))
            .unwrap();
        let origin = game.to_json().unwrap();

        let mut turns = Vec::new();
        for commands in [
            vec![
                Command::attack(cavalry, Position::new(4, 5)),
                Command::attack(archer, Position::new(4, 4)),
            ],
            vec![Command::attack(cavalry, Position::new(4, 5))],
            vec![Command::attack(archer, Position::new(4, 4))],
        ] {
            let turn = game.turn();
            turns.push((turn, game.execute_turn(commands)));
        }
        assert!(turns[0].1.iter().all(Action::is_success));
        assert!(turns[1].1[0].is_success());
        assert!(!turns[2].1[0].is_success());

        let mut replica = Game::from_json(&origin).unwrap();
        replica.import_turn(turns[0].0, &turns[0].1).unwrap();
        assert_eq!(replica.unit(archer).map(|unit| unit.hp()), Some(1));
        assert_eq!(
            replica.unit(cavalry).map(|unit| unit.hp()),
            game.unit(cavalry).map(|unit| unit.hp())
        );

        for (turn, actions) in &turns[1..] {
            replica.import_turn(*turn, actions).unwrap();
        }

        assert!(replica.unit(archer).is_none());
        assert!(!replica.lookup().contains(archer));
        assert!(replica.team(TeamId(1)).unwrap().fighters.is_empty());
        assert_eq!(replica.to_snapshot(), game.to_snapshot());
        assert_eq!(replica.state_root(), game.state_root());
    }

    #[test]
    fn import_rejects_wrong_turn_without_changes() {
        let Match {
            mut game, red_hq, ..
        } = new_match(10);
        let origin = game.to_json().unwrap();
        let first = game.execute_turn([Command::spawn_citizen(red_hq)]);

        let mut replica = Game::from_json(&origin).unwrap();
        let before = replica.to_snapshot();

        let result = replica.import_turn(1, &first);

        assert_eq!(
            result,
            Err(ImportError::TurnMismatch {
                expected: 0,
                got: 1
            })
        );
        assert_eq!(replica.to_snapshot(), before);
        assert!(replica.history().is_empty());
    }

    #[test]
    fn import_into_unrelated_game_is_rolled_back() {
        let Match {
            mut game, red_hq, ..
        } = new_match(10);
        let citizen = game.add_citizen(TeamId(0), Position::new(4, 4)).unwrap();
        let actions = game.execute_turn([
            Command::spawn_citizen(red_hq),
            Command::move_to(citizen, Position::new(4, 3)),
        ]);
        assert!(actions.iter().all(Action::is_success));

        let mut stranger = new_match(10).game;
        let before = stranger.to_snapshot();

        let result = stranger.import_turn(0, &actions);

        assert_eq!(result, Err(ImportError::UnknownUnit(citizen)));
        assert_eq!(stranger.to_snapshot(), before);
        assert_eq!(stranger.turn(), 0);
    }

    #[test]
    fn action_log_round_trips_through_json() {
        let Match {
            mut game, red_hq, ..
        } = new_match(10);
        let actions = game.execute_turn([
            Command::spawn_citizen(red_hq),
            Command::spawn_fighter(red_hq, FighterClass::Ranged),
        ]);

        let json = serde_json::to_value(&actions).unwrap();
        assert_eq!(json[0]["className"], "SpawnAction");
        assert_eq!(json[0]["status"], "success");
        assert_eq!(json[0]["unit"]["id"], red_hq.0);
        assert_eq!(json[0]["response"]["kind"], "spawned");
        assert_eq!(json[0]["response"]["unit"]["className"], "Citizen");
        assert_eq!(json[1]["status"], "failure");
        assert!(json[1].get("response").is_none());

        let decoded: Vec<Action> = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, actions);
    }
}
