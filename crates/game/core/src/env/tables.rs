use serde::{Deserialize, Serialize};

use crate::state::UnitClass;

/// Numeric profile of one unit class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassStats {
    /// Food paid by the team when spawning a unit of this class.
    pub cost: u32,
    pub base_hp: i32,
    pub attack_damage: u32,
    /// Cells a unit may travel in one move.
    pub speed: u32,
    /// Manhattan reach of an attack.
    pub range: u32,
}

impl ClassStats {
    pub const fn new(cost: u32, base_hp: i32, attack_damage: u32, speed: u32, range: u32) -> Self {
        Self {
            cost,
            base_hp,
            attack_damage,
            speed,
            range,
        }
    }
}

/// Balance table carried by every team.
///
/// Values are captured into a unit when it is spawned, so changing a team's
/// table only affects units created afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitSettings {
    #[serde(rename = "HQ")]
    pub hq: ClassStats,
    #[serde(rename = "Citizen")]
    pub citizen: ClassStats,
    #[serde(rename = "InfantryFighter")]
    pub infantry: ClassStats,
    #[serde(rename = "CavalryFighter")]
    pub cavalry: ClassStats,
    #[serde(rename = "RangedFighter")]
    pub ranged: ClassStats,
    /// Extra damage a fighter deals to the class it has the advantage over.
    pub matchup_bonus: u32,
    /// Food a single citizen can hold.
    pub carry_capacity: u32,
}

impl UnitSettings {
    pub const DEFAULT_MATCHUP_BONUS: u32 = 5;
    pub const DEFAULT_CARRY_CAPACITY: u32 = 5;

    pub const fn stats(&self, class: UnitClass) -> &ClassStats {
        match class {
            UnitClass::Hq => &self.hq,
            UnitClass::Citizen => &self.citizen,
            UnitClass::InfantryFighter => &self.infantry,
            UnitClass::CavalryFighter => &self.cavalry,
            UnitClass::RangedFighter => &self.ranged,
        }
    }

    pub const fn cost(&self, class: UnitClass) -> u32 {
        self.stats(class).cost
    }
}

impl Default for UnitSettings {
    fn default() -> Self {
        Self {
            hq: ClassStats::new(0, 100, 0, 0, 0),
            citizen: ClassStats::new(5, 10, 0, 1, 0),
            infantry: ClassStats::new(10, 20, 5, 1, 1),
            cavalry: ClassStats::new(15, 15, 4, 2, 1),
            ranged: ClassStats::new(12, 10, 3, 1, 3),
            matchup_bonus: Self::DEFAULT_MATCHUP_BONUS,
            carry_capacity: Self::DEFAULT_CARRY_CAPACITY,
        }
    }
}
