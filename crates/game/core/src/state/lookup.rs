use std::collections::BTreeMap;

use super::{InitializationError, Team, TeamId, UnitClass, UnitId};

/// Where a registered unit lives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitLocation {
    pub team: TeamId,
    pub class: UnitClass,
}

/// Flat `UnitId -> owner` registry.
///
/// Every living unit has exactly one entry. The registry is updated in the
/// same call that adds a unit to, or removes it from, its team, so actions
/// later in a batch always see a consistent view.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Lookup {
    entries: BTreeMap<UnitId, UnitLocation>,
}

impl Lookup {
    /// Rebuilds the registry from team membership.
    pub fn from_teams(teams: &[Team]) -> Result<Self, InitializationError> {
        let mut lookup = Self::default();
        for team in teams {
            for unit in team.units() {
                if unit.team_id() != team.id {
                    return Err(InitializationError::UnitTeamMismatch {
                        unit: unit.id(),
                        team: team.id,
                    });
                }
                lookup.register(unit.id(), team.id, unit.class())?;
            }
        }
        Ok(lookup)
    }

    pub fn get(&self, id: UnitId) -> Option<UnitLocation> {
        self.entries.get(&id).copied()
    }

    pub fn contains(&self, id: UnitId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (UnitId, UnitLocation)> + '_ {
        self.entries.iter().map(|(id, location)| (*id, *location))
    }

    pub(crate) fn register(
        &mut self,
        id: UnitId,
        team: TeamId,
        class: UnitClass,
    ) -> Result<(), InitializationError> {
        if self.entries.contains_key(&id) {
            return Err(InitializationError::DuplicateUnit(id));
        }
        self.entries.insert(id, UnitLocation { team, class });
        Ok(())
    }

    pub(crate) fn unregister(&mut self, id: UnitId) -> Option<UnitLocation> {
        self.entries.remove(&id)
    }
}
