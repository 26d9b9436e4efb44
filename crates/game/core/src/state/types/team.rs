use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Citizen, Fighter, Hq, TeamId, UnitId, UnitRef};
use crate::env::UnitSettings;
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TeamError {
    #[error("not enough food: {required} required, {available} available")]
    InsufficientFood { required: u32, available: u32 },
}

impl GameError for TeamError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFood { .. } => "TEAM_INSUFFICIENT_FOOD",
        }
    }
}

/// One side of the match: its headquarters, its units and its food stock.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub hq: Hq,
    #[serde(with = "unit_map")]
    pub citizens: BTreeMap<UnitId, Citizen>,
    #[serde(with = "unit_map")]
    pub fighters: BTreeMap<UnitId, Fighter>,
    pub food_count: u32,
    pub max_pop: u32,
    pub settings: UnitSettings,
}

impl Team {
    pub fn new(id: TeamId, hq: Hq, food_count: u32, max_pop: u32, settings: UnitSettings) -> Self {
        Self {
            id,
            hq,
            citizens: BTreeMap::new(),
            fighters: BTreeMap::new(),
            food_count,
            max_pop,
            settings,
        }
    }

    /// Population counts citizens and fighters; the HQ is not included.
    pub fn pop(&self) -> u32 {
        (self.citizens.len() + self.fighters.len()) as u32
    }

    pub fn has_pop_headroom(&self) -> bool {
        self.pop() < self.max_pop
    }

    /// A team is out of the match once its HQ has fallen.
    pub fn is_defeated(&self) -> bool {
        !self.hq.is_alive()
    }

    pub fn spend_food(&mut self, amount: u32) -> Result<(), TeamError> {
        self.food_count = self
            .food_count
            .checked_sub(amount)
            .ok_or(TeamError::InsufficientFood {
                required: amount,
                available: self.food_count,
            })?;
        Ok(())
    }

    pub fn gain_food(&mut self, amount: u32) {
        self.food_count = self.food_count.saturating_add(amount);
    }

    pub fn unit(&self, id: UnitId) -> Option<UnitRef<'_>> {
        if self.hq.id == id {
            return Some(UnitRef::Hq(&self.hq));
        }
        self.citizens
            .get(&id)
            .map(UnitRef::Citizen)
            .or_else(|| self.fighters.get(&id).map(UnitRef::Fighter))
    }

    /// Living units in a stable order: HQ first, then citizens and fighters by id.
    pub fn units(&self) -> impl Iterator<Item = UnitRef<'_>> {
        let hq = self.hq.is_alive().then_some(UnitRef::Hq(&self.hq));
        hq.into_iter()
            .chain(self.citizens.values().map(UnitRef::Citizen))
            .chain(self.fighters.values().map(UnitRef::Fighter))
    }
}

/// Serializes an id-keyed unit map as a plain array of units.
mod unit_map {
    use std::collections::BTreeMap;

    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::state::{Citizen, Fighter, UnitId};

    pub trait Keyed {
        fn key(&self) -> UnitId;
    }

    impl Keyed for Citizen {
        fn key(&self) -> UnitId {
            self.id
        }
    }

    impl Keyed for Fighter {
        fn key(&self) -> UnitId {
            self.id
        }
    }

    pub fn serialize<S, T>(map: &BTreeMap<UnitId, T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        serializer.collect_seq(map.values())
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<BTreeMap<UnitId, T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de> + Keyed,
    {
        let units = Vec::<T>::deserialize(deserializer)?;
        let mut map = BTreeMap::new();
        for unit in units {
            let id = unit.key();
            if map.insert(id, unit).is_some() {
                return Err(D::Error::custom(format!("duplicate unit id {id}")));
            }
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Position;

    fn team(food: u32, max_pop: u32) -> Team {
        let settings = UnitSettings::default();
        let hq = Hq::new(UnitId(1), TeamId(0), Position::ORIGIN, (2, 2), &settings);
        Team::new(TeamId(0), hq, food, max_pop, settings)
    }

    #[test]
    fn spend_food_never_goes_negative() {
        let mut team = team(3, 10);

        let result = team.spend_food(5);

        assert_eq!(
            result,
            Err(TeamError::InsufficientFood {
                required: 5,
                available: 3
            })
        );
        assert_eq!(team.food_count, 3);

        team.spend_food(3).unwrap();
        assert_eq!(team.food_count, 0);
    }

    #[test]
    fn pop_excludes_hq() {
        let mut team = team(0, 1);
        assert_eq!(team.pop(), 0);
        assert!(team.has_pop_headroom());

        let citizen = Citizen::new(UnitId(2), TeamId(0), Position::new(0, 1), &team.settings);
        team.citizens.insert(citizen.id, citizen);

        assert_eq!(team.pop(), 1);
        assert!(!team.has_pop_headroom());
        assert_eq!(team.units().count(), 2);
    }

    #[test]
    fn units_serialize_as_arrays() {
        let mut team = team(4, 10);
        let citizen = Citizen::new(UnitId(2), TeamId(0), Position::new(0, 1), &team.settings);
        team.citizens.insert(citizen.id, citizen);

        let json = serde_json::to_value(&team).unwrap();
        assert!(json["citizens"].is_array());
        assert_eq!(json["citizens"][0]["id"], 2);
        assert_eq!(json["foodCount"], 4);

        let back: Team = serde_json::from_value(json).unwrap();
        assert_eq!(back, team);
    }
}
