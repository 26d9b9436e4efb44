//! Plain data types that make up the game state.
mod common;
mod team;
mod unit;

pub use common::{Footprint, Position, Positioned, TeamId, UnitId};
pub use team::{Team, TeamError};
pub use unit::{Citizen, Fighter, FighterClass, Hq, Unit, UnitClass, UnitRecordError, UnitRef};
