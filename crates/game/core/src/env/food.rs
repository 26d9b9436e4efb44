use serde::{Deserialize, Serialize};

use crate::state::Position;

/// Gatherable stack of food placed on the grid by the map generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodSource {
    pub position: Position,
    pub amount: u32,
}

impl FoodSource {
    pub const fn new(position: Position, amount: u32) -> Self {
        Self { position, amount }
    }

    pub const fn is_depleted(&self) -> bool {
        self.amount == 0
    }

    /// Sources are reachable from their own cell and the four orthogonal neighbours.
    pub fn is_reachable_from(&self, position: Position) -> bool {
        self.position.manhattan_distance(position) <= 1
    }
}
