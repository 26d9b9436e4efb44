//! Unit variants and their serialized forms.
//!
//! Teams own concrete [`Hq`], [`Citizen`] and [`Fighter`] records. The tagged
//! union [`Unit`] is used wherever a unit of any class has to travel as a
//! single value, most notably inside recorded action responses.

use serde::{Deserialize, Serialize};

use super::{Position, Positioned, TeamId, UnitId};
use crate::env::UnitSettings;

/// Wire-level class tag carried by every serialized unit.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
pub enum UnitClass {
    #[serde(rename = "HQ")]
    #[strum(serialize = "HQ")]
    Hq,
    Citizen,
    InfantryFighter,
    CavalryFighter,
    RangedFighter,
}

impl UnitClass {
    pub const fn is_fighter(self) -> bool {
        matches!(
            self,
            Self::InfantryFighter | Self::CavalryFighter | Self::RangedFighter
        )
    }

    pub const fn fighter_class(self) -> Option<FighterClass> {
        match self {
            Self::InfantryFighter => Some(FighterClass::Infantry),
            Self::CavalryFighter => Some(FighterClass::Cavalry),
            Self::RangedFighter => Some(FighterClass::Ranged),
            Self::Hq | Self::Citizen => None,
        }
    }
}

/// Fighter specialisations.
///
/// Advantages form a triangle: infantry beats cavalry, cavalry beats ranged,
/// ranged beats infantry.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum FighterClass {
    Infantry,
    Cavalry,
    Ranged,
}

impl FighterClass {
    pub const ALL: [FighterClass; 3] = [
        FighterClass::Infantry,
        FighterClass::Cavalry,
        FighterClass::Ranged,
    ];

    pub const fn unit_class(self) -> UnitClass {
        match self {
            Self::Infantry => UnitClass::InfantryFighter,
            Self::Cavalry => UnitClass::CavalryFighter,
            Self::Ranged => UnitClass::RangedFighter,
        }
    }

    pub const fn has_advantage_over(self, target: UnitClass) -> bool {
        matches!(
            (self, target),
            (Self::Infantry, UnitClass::CavalryFighter)
                | (Self::Cavalry, UnitClass::RangedFighter)
                | (Self::Ranged, UnitClass::InfantryFighter)
        )
    }
}

/// Team headquarters. Spawns new units onto its own footprint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hq {
    pub id: UnitId,
    pub team_id: TeamId,
    pub position: Position,
    pub width: u32,
    pub height: u32,
    pub hp: i32,
    pub base_hp: i32,
}

impl Hq {
    pub fn new(
        id: UnitId,
        team_id: TeamId,
        position: Position,
        (width, height): (u32, u32),
        settings: &UnitSettings,
    ) -> Self {
        let base_hp = settings.stats(UnitClass::Hq).base_hp;
        Self {
            id,
            team_id,
            position,
            width,
            height,
            hp: base_hp,
            base_hp,
        }
    }

    pub const fn is_alive(&self) -> bool {
        self.hp > 0
    }
}

impl Positioned for Hq {
    fn position(&self) -> Position {
        self.position
    }

    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Worker unit that gathers food and carries it back to the HQ.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citizen {
    pub id: UnitId,
    pub team_id: TeamId,
    pub position: Position,
    pub hp: i32,
    pub base_hp: i32,
    pub speed: u32,
    pub food_carried: u32,
    pub carry_capacity: u32,
}

impl Citizen {
    pub fn new(id: UnitId, team_id: TeamId, position: Position, settings: &UnitSettings) -> Self {
        let stats = settings.stats(UnitClass::Citizen);
        Self {
            id,
            team_id,
            position,
            hp: stats.base_hp,
            base_hp: stats.base_hp,
            speed: stats.speed,
            food_carried: 0,
            carry_capacity: settings.carry_capacity,
        }
    }

    pub const fn spare_capacity(&self) -> u32 {
        self.carry_capacity.saturating_sub(self.food_carried)
    }
}

impl Positioned for Citizen {
    fn position(&self) -> Position {
        self.position
    }
}

/// Combat unit. Stats are captured from the team's settings when spawned.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fighter {
    pub id: UnitId,
    pub team_id: TeamId,
    pub class: FighterClass,
    pub position: Position,
    pub hp: i32,
    pub base_hp: i32,
    pub attack_damage: u32,
    pub speed: u32,
    pub range: u32,
}

impl Fighter {
    pub fn new(
        id: UnitId,
        team_id: TeamId,
        class: FighterClass,
        position: Position,
        settings: &UnitSettings,
    ) -> Self {
        let stats = settings.stats(class.unit_class());
        Self {
            id,
            team_id,
            class,
            position,
            hp: stats.base_hp,
            base_hp: stats.base_hp,
            attack_damage: stats.attack_damage,
            speed: stats.speed,
            range: stats.range,
        }
    }

    /// Damage dealt to a unit of `target` class, including any matchup bonus.
    pub const fn damage_against(&self, target: UnitClass, matchup_bonus: u32) -> u32 {
        if self.class.has_advantage_over(target) {
            self.attack_damage + matchup_bonus
        } else {
            self.attack_damage
        }
    }
}

impl Positioned for Fighter {
    fn position(&self) -> Position {
        self.position
    }
}

/// Any unit, tagged by class on the wire.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UnitRecord", into = "UnitRecord")]
pub enum Unit {
    Hq(Hq),
    Citizen(Citizen),
    Fighter(Fighter),
}

impl Unit {
    pub fn id(&self) -> UnitId {
        self.view().id()
    }

    pub fn team_id(&self) -> TeamId {
        self.view().team_id()
    }

    pub fn class(&self) -> UnitClass {
        self.view().class()
    }

    pub fn hp(&self) -> i32 {
        self.view().hp()
    }

    pub fn view(&self) -> UnitRef<'_> {
        match self {
            Unit::Hq(hq) => UnitRef::Hq(hq),
            Unit::Citizen(citizen) => UnitRef::Citizen(citizen),
            Unit::Fighter(fighter) => UnitRef::Fighter(fighter),
        }
    }
}

impl Positioned for Unit {
    fn position(&self) -> Position {
        self.view().position()
    }

    fn size(&self) -> (u32, u32) {
        self.view().size()
    }
}

/// Borrowed view of a unit owned by a team.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitRef<'a> {
    Hq(&'a Hq),
    Citizen(&'a Citizen),
    Fighter(&'a Fighter),
}

impl UnitRef<'_> {
    pub fn id(&self) -> UnitId {
        match self {
            UnitRef::Hq(hq) => hq.id,
            UnitRef::Citizen(citizen) => citizen.id,
            UnitRef::Fighter(fighter) => fighter.id,
        }
    }

    pub fn team_id(&self) -> TeamId {
        match self {
            UnitRef::Hq(hq) => hq.team_id,
            UnitRef::Citizen(citizen) => citizen.team_id,
            UnitRef::Fighter(fighter) => fighter.team_id,
        }
    }

    pub fn class(&self) -> UnitClass {
        match self {
            UnitRef::Hq(_) => UnitClass::Hq,
            UnitRef::Citizen(_) => UnitClass::Citizen,
            UnitRef::Fighter(fighter) => fighter.class.unit_class(),
        }
    }

    pub fn hp(&self) -> i32 {
        match self {
            UnitRef::Hq(hq) => hq.hp,
            UnitRef::Citizen(citizen) => citizen.hp,
            UnitRef::Fighter(fighter) => fighter.hp,
        }
    }

    /// Movement budget in cells per turn. Headquarters never move.
    pub fn speed(&self) -> u32 {
        match self {
            UnitRef::Hq(_) => 0,
            UnitRef::Citizen(citizen) => citizen.speed,
            UnitRef::Fighter(fighter) => fighter.speed,
        }
    }

    pub fn to_unit(&self) -> Unit {
        match *self {
            UnitRef::Hq(hq) => Unit::Hq(hq.clone()),
            UnitRef::Citizen(citizen) => Unit::Citizen(citizen.clone()),
            UnitRef::Fighter(fighter) => Unit::Fighter(fighter.clone()),
        }
    }
}

impl Positioned for UnitRef<'_> {
    fn position(&self) -> Position {
        match self {
            UnitRef::Hq(hq) => hq.position,
            UnitRef::Citizen(citizen) => citizen.position,
            UnitRef::Fighter(fighter) => fighter.position,
        }
    }

    fn size(&self) -> (u32, u32) {
        match self {
            UnitRef::Hq(hq) => hq.size(),
            UnitRef::Citizen(_) | UnitRef::Fighter(_) => (1, 1),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{class} unit {id} is missing `{field}`")]
pub struct UnitRecordError {
    id: UnitId,
    class: UnitClass,
    field: &'static str,
}

/// Flat JSON form shared by every unit class.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnitRecord {
    id: UnitId,
    class_name: UnitClass,
    team_id: TeamId,
    position: Position,
    hp: i32,
    base_hp: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speed: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    range: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attack_damage: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    food_carried: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    carry_capacity: Option<u32>,
}

impl UnitRecord {
    fn require(&self, value: Option<u32>, field: &'static str) -> Result<u32, UnitRecordError> {
        value.ok_or(UnitRecordError {
            id: self.id,
            class: self.class_name,
            field,
        })
    }
}

impl TryFrom<UnitRecord> for Unit {
    type Error = UnitRecordError;

    fn try_from(record: UnitRecord) -> Result<Self, Self::Error> {
        let unit = match record.class_name {
            UnitClass::Hq => Unit::Hq(Hq {
                id: record.id,
                team_id: record.team_id,
                position: record.position,
                width: record.require(record.width, "width")?,
                height: record.require(record.height, "height")?,
                hp: record.hp,
                base_hp: record.base_hp,
            }),
            UnitClass::Citizen => Unit::Citizen(Citizen {
                id: record.id,
                team_id: record.team_id,
                position: record.position,
                hp: record.hp,
                base_hp: record.base_hp,
                speed: record.require(record.speed, "speed")?,
                food_carried: record.food_carried.unwrap_or(0),
                carry_capacity: record.require(record.carry_capacity, "carryCapacity")?,
            }),
            fighter_class => Unit::Fighter(Fighter {
                id: record.id,
                team_id: record.team_id,
                class: fighter_class.fighter_class().ok_or(UnitRecordError {
                    id: record.id,
                    class: fighter_class,
                    field: "className",
                })?,
                position: record.position,
                hp: record.hp,
                base_hp: record.base_hp,
                attack_damage: record.require(record.attack_damage, "attackDamage")?,
                speed: record.require(record.speed, "speed")?,
                range: record.require(record.range, "range")?,
            }),
        };
        Ok(unit)
    }
}

impl From<Unit> for UnitRecord {
    fn from(unit: Unit) -> Self {
        let base = |id, class_name, team_id, position, hp, base_hp| UnitRecord {
            id,
            class_name,
            team_id,
            position,
            hp,
            base_hp,
            width: None,
            height: None,
            speed: None,
            range: None,
            attack_damage: None,
            food_carried: None,
            carry_capacity: None,
        };

        match unit {
            Unit::Hq(hq) => UnitRecord {
                width: Some(hq.width),
                height: Some(hq.height),
                ..base(hq.id, UnitClass::Hq, hq.team_id, hq.position, hq.hp, hq.base_hp)
            },
            Unit::Citizen(citizen) => UnitRecord {
                speed: Some(citizen.speed),
                food_carried: Some(citizen.food_carried),
                carry_capacity: Some(citizen.carry_capacity),
                ..base(
                    citizen.id,
                    UnitClass::Citizen,
                    citizen.team_id,
                    citizen.position,
                    citizen.hp,
                    citizen.base_hp,
                )
            },
            Unit::Fighter(fighter) => UnitRecord {
                speed: Some(fighter.speed),
                range: Some(fighter.range),
                attack_damage: Some(fighter.attack_damage),
                ..base(
                    fighter.id,
                    fighter.class.unit_class(),
                    fighter.team_id,
                    fighter.position,
                    fighter.hp,
                    fighter.base_hp,
                )
            },
        }
    }
}
