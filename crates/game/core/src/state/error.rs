use super::{Position, TeamId, UnitId};
use crate::error::{ErrorSeverity, GameError};

/// Errors raised while building a game from setup data or a snapshot.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitializationError {
    #[error("team {0} already exists")]
    DuplicateTeam(TeamId),

    #[error("team {0} does not exist")]
    UnknownTeam(TeamId),

    #[error("unit id {0} is registered twice")]
    DuplicateUnit(UnitId),

    #[error("unit {unit} is stored under {team} but belongs to another team")]
    UnitTeamMismatch { unit: UnitId, team: TeamId },

    #[error("position {position} is outside the {width}x{height} grid")]
    OutOfBounds {
        position: Position,
        width: u32,
        height: u32,
    },

    #[error("position {position} is already occupied")]
    CellOccupied { position: Position },

    #[error("next unit id {next} does not exceed highest existing id {highest}")]
    StaleUnitAllocator { next: u32, highest: u32 },
}

impl GameError for InitializationError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateTeam(_) => "INIT_DUPLICATE_TEAM",
            Self::UnknownTeam(_) => "INIT_UNKNOWN_TEAM",
            Self::DuplicateUnit(_) => "INIT_DUPLICATE_UNIT",
            Self::UnitTeamMismatch { .. } => "INIT_UNIT_TEAM_MISMATCH",
            Self::OutOfBounds { .. } => "INIT_OUT_OF_BOUNDS",
            Self::CellOccupied { .. } => "INIT_CELL_OCCUPIED",
            Self::StaleUnitAllocator { .. } => "INIT_STALE_UNIT_ALLOCATOR",
        }
    }
}

/// Errors raised when encoding or decoding a game snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot JSON is malformed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot is inconsistent: {0}")]
    Invalid(#[from] InitializationError),
}
