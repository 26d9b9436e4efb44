use serde::{Deserialize, Serialize};

use crate::env::UnitSettings;

/// Match configuration and tunable defaults used when setting up a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    /// Population cap applied to each team (citizens + fighters).
    pub max_pop: u32,
    /// Width and height of each headquarters footprint.
    pub hq_size: (u32, u32),
    /// Food each team starts with.
    pub starting_food: u32,
    pub settings: UnitSettings,
}

impl GameConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_WIDTH: u32 = 10;
    pub const DEFAULT_HEIGHT: u32 = 10;
    pub const DEFAULT_MAX_POP: u32 = 10;
    pub const DEFAULT_HQ_SIZE: (u32, u32) = (2, 2);

    pub fn new() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            max_pop: Self::DEFAULT_MAX_POP,
            hq_size: Self::DEFAULT_HQ_SIZE,
            starting_food: 0,
            settings: UnitSettings::default(),
        }
    }

    pub fn with_grid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::new()
        }
    }

    pub fn with_max_pop(mut self, max_pop: u32) -> Self {
        self.max_pop = max_pop;
        self
    }

    pub fn with_starting_food(mut self, starting_food: u32) -> Self {
        self.starting_food = starting_food;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
