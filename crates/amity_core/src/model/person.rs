//! Person domain model.

use super::room::RoomKind;
use super::{normalize_name, ModelError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable person identifier.
pub type PersonId = Uuid;

/// Occupant role inside a facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonRole {
    Staff,
    Fellow,
}

impl PersonRole {
    /// Storage and CLI label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Fellow => "fellow",
        }
    }

    /// Parses a role label, case-insensitive.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "staff" => Ok(Self::Staff),
            "fellow" => Ok(Self::Fellow),
            _ => Err(ModelError::InvalidRole(value.to_string())),
        }
    }

    /// Room kinds a holder of this role may ever be assigned to.
    pub fn eligible_room_kinds(self) -> &'static [RoomKind] {
        match self {
            Self::Staff => &[RoomKind::Office],
            Self::Fellow => &RoomKind::ALL,
        }
    }

    pub fn can_occupy(self, kind: RoomKind) -> bool {
        self.eligible_room_kinds().contains(&kind)
    }
}

impl Display for PersonRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registered occupant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub role: PersonRole,
    /// Always `false` for staff.
    pub wants_accommodation: bool,
}

impl Person {
    /// Creates a person with a generated id.
    ///
    /// # Invariants
    /// - Staff are recorded with `wants_accommodation = false` whatever the input.
    pub fn new(name: &str, role: PersonRole, wants_accommodation: bool) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(name)?,
            role,
            wants_accommodation: role == PersonRole::Fellow && wants_accommodation,
        })
    }

    /// Whether auto-allocation should look for a room of `kind` for this person.
    ///
    /// Everyone gets an office; only fellows asking for accommodation get a
    /// living space.
    pub fn wants_room(&self, kind: RoomKind) -> bool {
        match kind {
            RoomKind::Office => true,
            RoomKind::LivingSpace => self.role.can_occupy(kind) && self.wants_accommodation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonRole};
    use crate::model::room::RoomKind;

    #[test]
    fn staff_never_want_accommodation() {
        let staff = Person::new("SHERLOCK HOLMES", PersonRole::Staff, true).unwrap();
        assert!(!staff.wants_accommodation);
        assert!(!staff.wants_room(RoomKind::LivingSpace));
        assert!(staff.wants_room(RoomKind::Office));
    }

    #[test]
    fn fellows_keep_their_accommodation_choice() {
        let fellow = Person::new("JOHN WATSON", PersonRole::Fellow, true).unwrap();
        assert!(fellow.wants_room(RoomKind::LivingSpace));

        let commuter = Person::new("MARY MORSTAN", PersonRole::Fellow, false).unwrap();
        assert!(!commuter.wants_room(RoomKind::LivingSpace));
    }

    #[test]
    fn staff_may_only_occupy_offices() {
        assert!(PersonRole::Staff.can_occupy(RoomKind::Office));
        assert!(!PersonRole::Staff.can_occupy(RoomKind::LivingSpace));
        assert!(PersonRole::Fellow.can_occupy(RoomKind::LivingSpace));
    }
}
