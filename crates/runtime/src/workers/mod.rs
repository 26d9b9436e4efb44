//! Background workers driven by the runtime.

mod simulation;

pub use simulation::{Persistence, SimulationCommand, SimulationWorker};
