use serde::{Deserialize, Serialize};

use super::{ActionError, ActionTransition, CommandKind, resolve_actor};
use crate::engine::ImportError;
use crate::state::{Fighter, Game, Position, Positioned, Unit, UnitId, UnitRef};

/// Fighter attack against whatever stands on (or covers) a target cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttackAction {
    pub actor: UnitId,
    pub target: Option<Position>,
}

/// Resolved participants of an attack.
struct Engagement {
    attacker: Fighter,
    target: UnitId,
    damage: u32,
}

impl AttackAction {
    pub fn new(actor: UnitId, target: Option<Position>) -> Self {
        Self { actor, target }
    }

    fn engage(&self, game: &Game) -> Result<Engagement, ActionError> {
        let attacker = match resolve_actor(game, self.actor)? {
            UnitRef::Fighter(fighter) => fighter,
            other => {
                return Err(ActionError::WrongActorClass {
                    command: CommandKind::Attack,
                    class: other.class(),
                });
            }
        };
        let position = self
            .target
            .ok_or(ActionError::MissingArgument("position"))?;
        if !game.in_bounds(position) {
            return Err(ActionError::OutOfBounds { position });
        }

        let target = game
            .target_at(position)
            .ok_or(ActionError::NoTarget { position })?;
        if target.team_id() == attacker.team_id {
            return Err(ActionError::FriendlyTarget {
                target: target.id(),
            });
        }

        let distance = attacker.position().manhattan_distance(position);
        if distance > attacker.range {
            return Err(ActionError::OutOfRange {
                position,
                distance,
                range: attacker.range,
            });
        }

        let matchup_bonus = game
            .team(attacker.team_id)
            .map(|team| team.settings.matchup_bonus)
            .ok_or(ActionError::RegistryDesync(self.actor))?;

        Ok(Engagement {
            attacker: attacker.clone(),
            target: target.id(),
            damage: attacker.damage_against(target.class(), matchup_bonus),
        })
    }
}

/// Post-damage state of the target.
///
/// A target whose hp is at or below zero was removed from play by the attack.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackResponse {
    pub attacker: UnitId,
    pub target: Unit,
    pub damage: u32,
}

impl AttackResponse {
    pub fn is_kill(&self) -> bool {
        self.target.hp() <= 0
    }

    pub fn import(&self, game: &mut Game) -> Result<(), ImportError> {
        let id = self.target.id();
        game.set_hp(id, self.target.hp())
            .map(|_| ())
            .ok_or(ImportError::UnknownUnit(id))
    }
}

impl ActionTransition for AttackAction {
    type Response = AttackResponse;

    fn actor(&self) -> UnitId {
        self.actor
    }

    fn pre_validate(&self, game: &Game) -> Result<(), ActionError> {
        self.engage(game).map(|_| ())
    }

    fn apply(&self, game: &mut Game) -> Result<Self::Response, ActionError> {
        let Engagement {
            attacker,
            target,
            damage,
        } = self.engage(game)?;

        let target_state = game
            .apply_damage(target, damage)
            .ok_or(ActionError::RegistryDesync(target))?;

        Ok(AttackResponse {
            attacker: attacker.id,
            target: target_state,
            damage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::state::{FighterClass, TeamId, TeamSetup};

    fn arena() -> (Game, UnitId) {
        let config = GameConfig::default();
        let mut game = Game::with_config(&config);
        game.add_team(TeamSetup::from_config(TeamId(0), Position::new(0, 0), &config))
            .unwrap();
        let enemy_hq = game
            .add_team(TeamSetup::from_config(TeamId(1), Position::new(8, 8), &config))
            .unwrap();
        (game, enemy_hq)
    }

    #[test]
    fn infantry_deals_bonus_damage_to_cavalry() {
        let (mut game, _) = arena();
        let infantry = game
            .add_fighter(TeamId(0), FighterClass::Infantry, Position::new(4, 4))
            .unwrap();
        let cavalry = game
            .add_fighter(TeamId(1), FighterClass::Cavalry, Position::new(4, 5))
            .unwrap();

        let response = AttackAction::new(infantry, Some(Position::new(4, 5)))
            .apply(&mut game)
            .unwrap();

        assert_eq!(response.damage, 10);
        assert_eq!(response.target.hp(), 5);
        assert_eq!(game.unit(cavalry).unwrap().hp(), 5);
        assert!(!response.is_kill());
    }

    #[test]
    fn ranged_reaches_three_cells() {
        let (mut game, _) = arena();
        let archer = game
            .add_fighter(TeamId(0), FighterClass::Ranged, Position::new(2, 5))
            .unwrap();
        game.add_fighter(TeamId(1), FighterClass::Infantry, Position::new(4, 6))
            .unwrap();
        game.add_fighter(TeamId(1), FighterClass::Cavalry, Position::new(6, 5))
            .unwrap();

        let near = AttackAction::new(archer, Some(Position::new(4, 6)));
        assert_eq!(near.pre_validate(&game), Ok(()));

        let far = AttackAction::new(archer, Some(Position::new(6, 5)));
        assert_eq!(
            far.pre_validate(&game),
            Err(ActionError::OutOfRange {
                position: Position::new(6, 5),
                distance: 4,
                range: 3
            })
        );
    }

    #[test]
    fn attacking_headquarters_cell_hits_the_headquarters() {
        let (mut game, enemy_hq) = arena();
        let infantry = game
            .add_fighter(TeamId(0), FighterClass::Infantry, Position::new(7, 9))
            .unwrap();

        let response = AttackAction::new(infantry, Some(Position::new(8, 9)))
            .apply(&mut game)
            .unwrap();

        assert_eq!(response.target.id(), enemy_hq);
        assert_eq!(game.unit(enemy_hq).unwrap().hp(), 95);
    }

    #[test]
    fn citizens_and_friendly_targets_are_rejected() {
        let (mut game, _) = arena();
        let citizen = game.add_citizen(TeamId(0), Position::new(3, 3)).unwrap();
        let fighter = game
            .add_fighter(TeamId(0), FighterClass::Infantry, Position::new(3, 4))
            .unwrap();

        assert_eq!(
            AttackAction::new(citizen, Some(Position::new(3, 4))).pre_validate(&game),
            Err(ActionError::WrongActorClass {
                command: CommandKind::Attack,
                class: crate::state::UnitClass::Citizen
            })
        );
        assert_eq!(
            AttackAction::new(fighter, Some(Position::new(3, 3))).pre_validate(&game),
            Err(ActionError::FriendlyTarget { target: citizen })
        );
        assert_eq!(
            AttackAction::new(fighter, Some(Position::new(3, 5))).pre_validate(&game),
            Err(ActionError::NoTarget {
                position: Position::new(3, 5)
            })
        );
    }
}
