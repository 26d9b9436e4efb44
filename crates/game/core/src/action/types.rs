//! Recorded action entries and their response payloads.

use serde::{Deserialize, Serialize};

use super::{
    ActionError, AttackResponse, Command, CommandArgs, CommandKind, DropOffFoodResponse,
    MoveResponse, PickUpFoodResponse, SpawnResponse,
};
use crate::engine::ImportError;
use crate::state::{Game, UnitId};

/// Action variant tag persisted as `className`.
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
pub enum ActionClass {
    MoveAction,
    AttackAction,
    SpawnAction,
    PickUpFoodAction,
    DropOffFoodAction,
}

impl ActionClass {
    pub const fn for_command(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Move => Self::MoveAction,
            CommandKind::Attack => Self::AttackAction,
            CommandKind::SpawnCitizen | CommandKind::SpawnFighter => Self::SpawnAction,
            CommandKind::PickUpFood => Self::PickUpFoodAction,
            CommandKind::DropOffFood => Self::DropOffFoodAction,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Success,
    Failure,
}

/// Reference to the acting unit, serialized as `{ "id": .. }`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitHandle {
    pub id: UnitId,
}

/// Everything needed to reapply a successful action without re-validating it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ActionResponse {
    Moved(MoveResponse),
    Attacked(AttackResponse),
    Spawned(SpawnResponse),
    PickedUpFood(PickUpFoodResponse),
    DroppedOffFood(DropOffFoodResponse),
}

impl ActionResponse {
    /// Writes the recorded effect into `game`, trusting the log over live rules.
    pub fn import(&self, game: &mut Game) -> Result<(), ImportError> {
        match self {
            Self::Moved(response) => response.import(game),
            Self::Attacked(response) => response.import(game),
            Self::Spawned(response) => response.import(game),
            Self::PickedUpFood(response) => response.import(game),
            Self::DroppedOffFood(response) => response.import(game),
        }
    }
}

impl From<MoveResponse> for ActionResponse {
    fn from(response: MoveResponse) -> Self {
        Self::Moved(response)
    }
}

impl From<AttackResponse> for ActionResponse {
    fn from(response: AttackResponse) -> Self {
        Self::Attacked(response)
    }
}

impl From<SpawnResponse> for ActionResponse {
    fn from(response: SpawnResponse) -> Self {
        Self::Spawned(response)
    }
}

impl From<PickUpFoodResponse> for ActionResponse {
    fn from(response: PickUpFoodResponse) -> Self {
        Self::PickedUpFood(response)
    }
}

impl From<DropOffFoodResponse> for ActionResponse {
    fn from(response: DropOffFoodResponse) -> Self {
        Self::DroppedOffFood(response)
    }
}

/// Outcome of one command, as appended to the game history.
///
/// Entries are immutable once recorded. A failed entry carries the error
/// message and no response; the game state is exactly as it was before the
/// command was attempted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub class_name: ActionClass,
    pub command: Command,
    pub unit: UnitHandle,
    pub args: CommandArgs,
    pub status: ActionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ActionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Action {
    pub fn success(command: Command, response: ActionResponse) -> Self {
        Self {
            response: Some(response),
            ..Self::pending(command, ActionStatus::Success)
        }
    }

    pub fn failure(command: Command, error: &ActionError) -> Self {
        Self {
            error: Some(error.to_string()),
            ..Self::pending(command, ActionStatus::Failure)
        }
    }

    fn pending(command: Command, status: ActionStatus) -> Self {
        Self {
            class_name: ActionClass::for_command(command.kind),
            command,
            unit: UnitHandle { id: command.actor },
            args: command.args,
            status,
            response: None,
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ActionStatus::Success
    }

    /// Reapplies a successful entry. Failed entries change nothing.
    pub fn import(&self, game: &mut Game) -> Result<(), ImportError> {
        match (self.status, &self.response) {
            (ActionStatus::Success, Some(response)) => response.import(game),
            (ActionStatus::Success, None) => Err(ImportError::MissingResponse {
                unit: self.unit.id,
            }),
            (ActionStatus::Failure, _) => Ok(()),
        }
    }
}
