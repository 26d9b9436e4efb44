//! Data supplied by collaborators outside the rules engine.
//!
//! Balance tables come from match configuration and food sources from the map
//! generator. The engine reads both but never decides their contents.
mod food;
mod tables;

pub use food::FoodSource;
pub use tables::{ClassStats, UnitSettings};
