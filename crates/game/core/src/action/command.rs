//! Player-issued commands: the transient input to a turn.

use serde::{Deserialize, Serialize};

use crate::state::{FighterClass, Position, UnitClass, UnitId};

#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum CommandKind {
    Move,
    Attack,
    SpawnCitizen,
    SpawnFighter,
    PickUpFood,
    DropOffFood,
}

/// Optional arguments; which ones matter depends on the command kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandArgs {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<UnitClass>,
}

/// One instruction for one unit, consumed by a single `execute_turn` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    pub actor: UnitId,
    pub kind: CommandKind,
    #[serde(default)]
    pub args: CommandArgs,
}

impl Command {
    pub fn new(actor: UnitId, kind: CommandKind) -> Self {
        Self {
            actor,
            kind,
            args: CommandArgs::default(),
        }
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.args.position = Some(position);
        self
    }

    pub fn with_unit_type(mut self, unit_type: UnitClass) -> Self {
        self.args.unit_type = Some(unit_type);
        self
    }

    pub fn move_to(actor: UnitId, destination: Position) -> Self {
        Self::new(actor, CommandKind::Move).with_position(destination)
    }

    pub fn attack(actor: UnitId, target: Position) -> Self {
        Self::new(actor, CommandKind::Attack).with_position(target)
    }

    pub fn spawn_citizen(hq: UnitId) -> Self {
        Self::new(hq, CommandKind::SpawnCitizen)
    }

    pub fn spawn_fighter(hq: UnitId, class: FighterClass) -> Self {
        Self::new(hq, CommandKind::SpawnFighter).with_unit_type(class.unit_class())
    }

    pub fn pick_up_food(citizen: UnitId) -> Self {
        Self::new(citizen, CommandKind::PickUpFood)
    }

    pub fn drop_off_food(citizen: UnitId) -> Self {
        Self::new(citizen, CommandKind::DropOffFood)
    }
}
