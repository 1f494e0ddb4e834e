//! Room domain model.

use super::{normalize_name, ModelError};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable room identifier.
pub type RoomId = Uuid;

const OFFICE_CAPACITY: u32 = 6;
const LIVING_SPACE_CAPACITY: u32 = 4;

/// The two room kinds a facility can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    /// Workspace shared by staff and fellows.
    Office,
    /// Sleeping quarters, fellows only.
    LivingSpace,
}

impl RoomKind {
    pub const ALL: [RoomKind; 2] = [RoomKind::Office, RoomKind::LivingSpace];

    /// Fixed capacity for every room of this kind.
    pub fn capacity(self) -> u32 {
        match self {
            Self::Office => OFFICE_CAPACITY,
            Self::LivingSpace => LIVING_SPACE_CAPACITY,
        }
    }

    /// Storage and CLI label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Office => "office",
            Self::LivingSpace => "living_space",
        }
    }

    /// Parses a kind label, case-insensitive.
    ///
    /// Accepts `living-space` and `livingspace` as spellings of `living_space`.
    pub fn parse(value: &str) -> Result<Self, ModelError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "office" => Ok(Self::Office),
            "living_space" | "living-space" | "livingspace" => Ok(Self::LivingSpace),
            _ => Err(ModelError::InvalidRoomKind(value.to_string())),
        }
    }
}

impl Display for RoomKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Room record. Capacity always equals `kind.capacity()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub kind: RoomKind,
    pub capacity: u32,
}

impl Room {
    /// Creates a room with a generated id and the kind's fixed capacity.
    pub fn new(kind: RoomKind, name: &str) -> Result<Self, ModelError> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name(name)?,
            kind,
            capacity: kind.capacity(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Room, RoomKind};
    use crate::model::ModelError;

    #[test]
    fn capacity_is_fixed_by_kind() {
        assert_eq!(Room::new(RoomKind::Office, "Valhalla").unwrap().capacity, 6);
        assert_eq!(
            Room::new(RoomKind::LivingSpace, "Python").unwrap().capacity,
            4
        );
    }

    #[test]
    fn parse_accepts_known_labels_case_insensitively() {
        assert_eq!(RoomKind::parse("OFFICE").unwrap(), RoomKind::Office);
        assert_eq!(
            RoomKind::parse(" Living_Space ").unwrap(),
            RoomKind::LivingSpace
        );
    }

    #[test]
    fn parse_rejects_unknown_kinds() {
        assert_eq!(
            RoomKind::parse("kitchen").unwrap_err(),
            ModelError::InvalidRoomKind("kitchen".to_string())
        );
    }
}
