//! Allocation engine and reporting services.
//!
//! # Responsibility
//! - Orchestrate registry and ledger calls into facility use-cases.
//! - Translate repository failures into the public `FacilityError` kinds.
//!
//! # Invariants
//! - Validation errors are raised before any write.
//! - Services stay storage-agnostic; SQL lives in `repo`.

use crate::db::DbError;
use crate::model::person::PersonRole;
use crate::model::room::RoomKind;
use crate::model::ModelError;
use crate::repo::{Entity, RepoError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod allocation_service;
pub mod batch;
pub mod report_service;
pub mod selector;

pub type FacilityResult<T> = Result<T, FacilityError>;

/// Error kinds surfaced to facility callers. All are recoverable.
#[derive(Debug)]
pub enum FacilityError {
    DuplicateName { entity: Entity, name: String },
    /// Room kind is not `office` or `living_space`.
    InvalidType(String),
    /// Role is not `staff` or `fellow`.
    InvalidRole(String),
    /// Name is blank after trim.
    InvalidName,
    NotFound { entity: Entity, key: String },
    CapacityExceeded { room: String, capacity: u32 },
    AlreadyAssigned {
        person: String,
        kind: RoomKind,
        room: String,
    },
    NotAssigned { person: String, room: String },
    TypeMismatch {
        person: String,
        role: PersonRole,
        kind: RoomKind,
    },
    SameRoom { person: String, room: String },
    /// Bulk-load line matches neither the fellow nor the staff shape.
    InvalidRecord { line: usize, content: String },
    /// People file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Storage failure that is not a domain rule violation.
    Storage(RepoError),
}

impl Display for FacilityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateName { entity, name } => {
                write!(f, "{entity} `{name}` already exists")
            }
            Self::InvalidType(value) => write!(
                f,
                "invalid room type `{value}`; expected office|living_space"
            ),
            Self::InvalidRole(value) => {
                write!(f, "invalid role `{value}`; expected staff|fellow")
            }
            Self::InvalidName => write!(f, "name must not be blank"),
            Self::NotFound { entity, key } => write!(f, "{entity} not found: {key}"),
            Self::CapacityExceeded { room, capacity } => {
                write!(f, "room `{room}` is full ({capacity} occupants)")
            }
            Self::AlreadyAssigned { person, kind, room } => {
                write!(f, "`{person}` already holds {kind} `{room}`")
            }
            Self::NotAssigned { person, room } => {
                write!(f, "`{person}` is not assigned to `{room}`")
            }
            Self::TypeMismatch { person, role, kind } => {
                write!(f, "`{person}` is {role} and cannot occupy a {kind}")
            }
            Self::SameRoom { person, room } => write!(f, "`{person}` is already in `{room}`"),
            Self::InvalidRecord { line, content } => {
                write!(f, "invalid record on line {line}: `{content}`")
            }
            Self::Io { path, source } => write!(f, "cannot read `{}`: {source}", path.display()),
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for FacilityError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Storage(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelError> for FacilityError {
    fn from(value: ModelError) -> Self {
        match value {
            ModelError::InvalidRoomKind(kind) => Self::InvalidType(kind),
            ModelError::InvalidRole(role) => Self::InvalidRole(role),
            ModelError::BlankName => Self::InvalidName,
        }
    }
}

impl From<RepoError> for FacilityError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::DuplicateName { entity, name } => Self::DuplicateName { entity, name },
            RepoError::NotFound { entity, key } => Self::NotFound { entity, key },
            RepoError::CapacityExceeded { room, capacity } => {
                Self::CapacityExceeded { room, capacity }
            }
            RepoError::AlreadyAssigned { person, kind, room } => {
                Self::AlreadyAssigned { person, kind, room }
            }
            RepoError::NotAssigned { person, room } => Self::NotAssigned { person, room },
            RepoError::TypeMismatch { person, role, kind } => {
                Self::TypeMismatch { person, role, kind }
            }
            RepoError::SameRoom { person, room } => Self::SameRoom { person, room },
            other => Self::Storage(other),
        }
    }
}

impl From<DbError> for FacilityError {
    fn from(value: DbError) -> Self {
        Self::Storage(RepoError::Db(value))
    }
}

impl From<rusqlite::Error> for FacilityError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Storage(RepoError::from(value))
    }
}

impl FacilityError {
    /// Stable machine-readable code, used in log lines and CLI exit output.
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateName { .. } => "duplicate_name",
            Self::InvalidType(_) => "invalid_type",
            Self::InvalidRole(_) => "invalid_role",
            Self::InvalidName => "invalid_name",
            Self::NotFound { .. } => "not_found",
            Self::CapacityExceeded { .. } => "capacity_exceeded",
            Self::AlreadyAssigned { .. } => "already_assigned",
            Self::NotAssigned { .. } => "not_assigned",
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::SameRoom { .. } => "same_room",
            Self::InvalidRecord { .. } => "invalid_record",
            Self::Io { .. } => "io",
            Self::Storage(_) => "storage",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FacilityError;
    use crate::model::ModelError;
    use crate::repo::{Entity, RepoError};

    #[test]
    fn model_errors_map_to_validation_kinds() {
        let err = FacilityError::from(ModelError::InvalidRoomKind("attic".to_string()));
        assert!(matches!(err, FacilityError::InvalidType(ref kind) if kind == "attic"));
        assert_eq!(FacilityError::from(ModelError::BlankName).code(), "invalid_name");
    }

    #[test]
    fn repo_rule_violations_keep_their_kind() {
        let err = FacilityError::from(RepoError::DuplicateName {
            entity: Entity::Room,
            name: "Valhalla".to_string(),
        });
        assert_eq!(err.code(), "duplicate_name");
        assert_eq!(err.to_string(), "room `Valhalla` already exists");
    }

    #[test]
    fn repo_storage_errors_become_storage() {
        let err = FacilityError::from(RepoError::InvalidData("bad row".to_string()));
        assert!(matches!(err, FacilityError::Storage(_)));
    }
}
