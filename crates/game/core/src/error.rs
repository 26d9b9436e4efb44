//! Common error infrastructure for skirmish-core.
//!
//! Domain errors (`ActionError`, `ImportError`, `InitializationError`, ...) live
//! beside the code that raises them. This module holds the classification
//! shared by all of them.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the command may succeed later or with other arguments
/// - **Validation**: the input is wrong and should not be retried unchanged
/// - **Internal**: state and registry disagree; indicates a bug
/// - **Fatal**: the game cannot be built or continued from this data
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Examples: not enough food, population cap reached.
    Recoverable,

    /// Examples: destination not reachable, target out of range, dead actor.
    Validation,

    /// Examples: lookup entry without a matching team member.
    Internal,

    /// Examples: inconsistent snapshot, replaying the wrong turn.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all skirmish-core errors.
///
/// Every error enum in the crate implements it so hosts can classify and
/// count failures without matching on concrete types.
pub trait GameError: std::fmt::Display + std::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier for this error variant, used in logs and metrics.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
