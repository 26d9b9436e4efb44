//! Errors raised while validating or applying a single command.

use super::CommandKind;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{Position, TeamError, UnitClass, UnitId};

/// Coarse grouping of per-command failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Bad position, target, argument or actor kind.
    Validation,
    /// Not enough food, or no room under the population cap.
    Resource,
    /// The acting unit has already fallen.
    DeadActor,
    /// Registry and team membership disagree.
    Internal,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("unit {0} is dead (HP is at or below 0)")]
    UnitDead(UnitId),

    #[error("{command} cannot be issued by a {class} unit")]
    WrongActorClass {
        command: CommandKind,
        class: UnitClass,
    },

    #[error("missing `{0}` argument")]
    MissingArgument(&'static str),

    #[error("position {position} is outside the grid")]
    OutOfBounds { position: Position },

    #[error("invalid position: {destination} is not reachable from {origin}")]
    UnreachableDestination {
        origin: Position,
        destination: Position,
    },

    #[error("no unit to attack at {position}")]
    NoTarget { position: Position },

    #[error("unit {target} is on the attacker's team")]
    FriendlyTarget { target: UnitId },

    #[error("target at {position} is {distance} cells away but range is {range}")]
    OutOfRange {
        position: Position,
        distance: u32,
        range: u32,
    },

    #[error("invalid spawn position: {position}")]
    InvalidSpawnPosition { position: Position },

    #[error("no position available for spawn")]
    NoSpawnPosition,

    #[error("{0} cannot be spawned by this command")]
    InvalidUnitType(UnitClass),

    #[error("population cap reached ({pop}/{max_pop})")]
    PopulationCapReached { pop: u32, max_pop: u32 },

    #[error("not enough food to pay for spawn: {required} required, {available} available")]
    InsufficientFood { required: u32, available: u32 },

    #[error("no food source within reach of {position}")]
    NoFoodSource { position: Position },

    #[error("food source at {position} is depleted")]
    FoodSourceDepleted { position: Position },

    #[error("citizen {0} cannot carry any more food")]
    CarryCapacityReached(UnitId),

    #[error("citizen {0} is not carrying any food")]
    NothingToDropOff(UnitId),

    #[error("citizen {0} is not next to its headquarters")]
    NotAtDropOff(UnitId),

    #[error("unit {0} is registered but missing from its team")]
    RegistryDesync(UnitId),
}

impl ActionError {
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::UnitDead(_) => ErrorCategory::DeadActor,
            Self::PopulationCapReached { .. } | Self::InsufficientFood { .. } => {
                ErrorCategory::Resource
            }
            Self::RegistryDesync(_) => ErrorCategory::Internal,
            _ => ErrorCategory::Validation,
        }
    }
}

impl From<TeamError> for ActionError {
    fn from(error: TeamError) -> Self {
        match error {
            TeamError::InsufficientFood {
                required,
                available,
            } => Self::InsufficientFood {
                required,
                available,
            },
        }
    }
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Resource => ErrorSeverity::Recoverable,
            ErrorCategory::Validation | ErrorCategory::DeadActor => ErrorSeverity::Validation,
            ErrorCategory::Internal => ErrorSeverity::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnitNotFound(_) => "ACTION_UNIT_NOT_FOUND",
            Self::UnitDead(_) => "ACTION_UNIT_DEAD",
            Self::WrongActorClass { .. } => "ACTION_WRONG_ACTOR_CLASS",
            Self::MissingArgument(_) => "ACTION_MISSING_ARGUMENT",
            Self::OutOfBounds { .. } => "ACTION_OUT_OF_BOUNDS",
            Self::UnreachableDestination { .. } => "ACTION_UNREACHABLE_DESTINATION",
            Self::NoTarget { .. } => "ACTION_NO_TARGET",
            Self::FriendlyTarget { .. } => "ACTION_FRIENDLY_TARGET",
            Self::OutOfRange { .. } => "ACTION_OUT_OF_RANGE",
            Self::InvalidSpawnPosition { .. } => "ACTION_INVALID_SPAWN_POSITION",
            Self::NoSpawnPosition => "ACTION_NO_SPAWN_POSITION",
            Self::InvalidUnitType(_) => "ACTION_INVALID_UNIT_TYPE",
            Self::PopulationCapReached { .. } => "ACTION_POPULATION_CAP_REACHED",
            Self::InsufficientFood { .. } => "ACTION_INSUFFICIENT_FOOD",
            Self::NoFoodSource { .. } => "ACTION_NO_FOOD_SOURCE",
            Self::FoodSourceDepleted { .. } => "ACTION_FOOD_SOURCE_DEPLETED",
            Self::CarryCapacityReached(_) => "ACTION_CARRY_CAPACITY_REACHED",
            Self::NothingToDropOff(_) => "ACTION_NOTHING_TO_DROP_OFF",
            Self::NotAtDropOff(_) => "ACTION_NOT_AT_DROP_OFF",
            Self::RegistryDesync(_) => "ACTION_REGISTRY_DESYNC",
        }
    }
}
