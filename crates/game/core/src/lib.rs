//! Deterministic rules for a turn-based grid strategy simulation.
//!
//! `skirmish-core` defines the canonical game state (teams, units, the id
//! registry and the turn history) and the command-to-action pipeline that
//! mutates it. All live mutation flows through [`engine::GameEngine`]; a game
//! rebuilt from a snapshot and fed the recorded actions through
//! [`Game::import_turn`] converges to the same [`Game::state_root`].
pub mod action;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod state;

pub use action::{
    Action, ActionClass, ActionError, ActionKind, ActionResponse, ActionStatus, ActionTransition,
    AttackAction, AttackResponse, Command, CommandArgs, CommandKind, DropOffFoodAction,
    DropOffFoodResponse, ErrorCategory, MoveAction, MoveResponse, PickUpFoodAction,
    PickUpFoodResponse, SpawnAction, SpawnResponse, UnitHandle,
};
pub use config::GameConfig;
pub use engine::{ExecuteError, GameEngine, ImportError, TransitionPhase, TransitionPhaseError};
pub use env::{ClassStats, FoodSource, UnitSettings};
pub use error::{ErrorSeverity, GameError};
pub use state::{
    Citizen, Fighter, FighterClass, Footprint, Game, GameSnapshot, History, Hq,
    InitializationError, Lookup, Position, Positioned, SnapshotError, Team, TeamError, TeamId,
    TeamSetup, Unit, UnitClass, UnitId, UnitLocation, UnitRecordError, UnitRef,
};
