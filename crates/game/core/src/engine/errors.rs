//! Error types for the execution and import pipelines.

use crate::action::ActionError;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{InitializationError, Position, TeamId, UnitId};

/// Identifies which stage of the transition pipeline produced an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionPhase {
    PreValidate,
    Apply,
}

impl TransitionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionPhase::PreValidate => "pre_validate",
            TransitionPhase::Apply => "apply",
        }
    }
}

/// Associates a transition phase with the underlying error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionPhaseError<E> {
    pub phase: TransitionPhase,
    pub error: E,
}

impl<E> TransitionPhaseError<E> {
    pub fn new(phase: TransitionPhase, error: E) -> Self {
        Self { phase, error }
    }
}

impl<E: std::fmt::Display> std::fmt::Display for TransitionPhaseError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.phase.as_str(), self.error)
    }
}

impl<E: std::fmt::Display + std::fmt::Debug> std::error::Error for TransitionPhaseError<E> {}

/// Failure of a single command, as seen by callers of [`GameEngine::execute`].
///
/// [`GameEngine::execute`]: super::GameEngine::execute
pub type ExecuteError = TransitionPhaseError<ActionError>;

/// Errors that reject a whole `import_turn` call.
///
/// Unlike per-command failures these are never turned into data: they mean
/// the log does not belong to this game, or not at this point in its life.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("turn mismatch: game expects turn {expected}, log entry is for turn {got}")]
    TurnMismatch { expected: u32, got: u32 },

    #[error("unit {0} referenced by the log does not exist in this game")]
    UnknownUnit(UnitId),

    #[error("team {0} referenced by the log does not exist in this game")]
    UnknownTeam(TeamId),

    #[error("no food source at {0}")]
    UnknownFoodSource(Position),

    #[error("successful action by unit {unit} has no recorded response")]
    MissingResponse { unit: UnitId },

    #[error("recorded unit cannot be registered: {0}")]
    Registry(#[from] InitializationError),
}

impl GameError for ImportError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TurnMismatch { .. } => "IMPORT_TURN_MISMATCH",
            Self::UnknownUnit(_) => "IMPORT_UNKNOWN_UNIT",
            Self::UnknownTeam(_) => "IMPORT_UNKNOWN_TEAM",
            Self::UnknownFoodSource(_) => "IMPORT_UNKNOWN_FOOD_SOURCE",
            Self::MissingResponse { .. } => "IMPORT_MISSING_RESPONSE",
            Self::Registry(_) => "IMPORT_REGISTRY",
        }
    }
}
