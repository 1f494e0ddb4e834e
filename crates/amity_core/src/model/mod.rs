//! Facility domain model.
//!
//! # Responsibility
//! - Define rooms, people and assignments as closed sets of variants.
//! - Own the capacity and eligibility rules attached to each variant.
//!
//! # Invariants
//! - Room capacity is derived from `RoomKind` only.
//! - Staff never want accommodation.
//! - Names are trimmed and never blank.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod assignment;
pub mod person;
pub mod room;

/// Validation failure raised before anything is written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Room kind text is not `office` or `living_space`.
    InvalidRoomKind(String),
    /// Role text is not `staff` or `fellow`.
    InvalidRole(String),
    /// Room or person name is blank after trim.
    BlankName,
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoomKind(value) => write!(
                f,
                "invalid room type `{value}`; expected office|living_space"
            ),
            Self::InvalidRole(value) => {
                write!(f, "invalid role `{value}`; expected staff|fellow")
            }
            Self::BlankName => write!(f, "name must not be blank"),
        }
    }
}

impl Error for ModelError {}

/// Trims a room or person name, rejecting blank input.
pub fn normalize_name(value: &str) -> Result<String, ModelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ModelError::BlankName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::{normalize_name, ModelError};

    #[test]
    fn normalize_name_trims_surrounding_whitespace() {
        assert_eq!(normalize_name("  Valhalla ").unwrap(), "Valhalla");
    }

    #[test]
    fn normalize_name_rejects_blank_values() {
        assert_eq!(normalize_name(" \t ").unwrap_err(), ModelError::BlankName);
    }
}
