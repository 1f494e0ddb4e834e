//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define registry and ledger contracts used by the allocation engine.
//! - Isolate SQL details from service orchestration.
//!
//! # Invariants
//! - Repositories only accept connections migrated to `latest_version()`.
//! - Unique-name conflicts surface as `RepoError::DuplicateName`, never as raw
//!   SQLite errors.
//! - Ledger rule violations are semantic errors, not storage errors.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::person::PersonRole;
use crate::model::room::RoomKind;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod ledger_repo;
pub mod person_repo;
pub mod room_repo;

pub type RepoResult<T> = Result<T, RepoError>;

/// Registry entity named in not-found and duplicate errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Room,
    Person,
}

impl Display for Entity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Room => f.write_str("room"),
            Self::Person => f.write_str("person"),
        }
    }
}

/// Error for registry and ledger persistence operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// A room or person with this name already exists.
    DuplicateName { entity: Entity, name: String },
    /// Lookup by name or id found nothing.
    NotFound { entity: Entity, key: String },
    /// Room already holds `capacity` occupants.
    CapacityExceeded { room: String, capacity: u32 },
    /// Person already holds `room`, which has the requested kind.
    AlreadyAssigned {
        person: String,
        kind: RoomKind,
        room: String,
    },
    /// Person is not in `room`.
    NotAssigned { person: String, room: String },
    /// Role may not occupy the room kind.
    TypeMismatch {
        person: String,
        role: PersonRole,
        kind: RoomKind,
    },
    /// Reassignment target is the room the person already holds.
    SameRoom { person: String, room: String },
    /// Connection schema is not at the expected migrated version.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Required table is missing.
    MissingRequiredTable(&'static str),
    /// Persisted data cannot be converted to a valid model.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::DuplicateName { entity, name } => {
                write!(f, "{entity} `{name}` already exists")
            }
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
            Self::SameRoom { person, room } => {
                write!(f, "`{person}` is already in `{room}`")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "facility repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::MissingRequiredTable(table) => {
                write!(f, "facility repository requires table `{table}`")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted facility data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Maps an insert failure to `DuplicateName` when a unique constraint fired.
pub(crate) fn map_insert_error(err: rusqlite::Error, entity: Entity, name: &str) -> RepoError {
    let err = DbError::from(err);
    if err.is_unique_violation() {
        RepoError::DuplicateName {
            entity,
            name: name.to_string(),
        }
    } else {
        RepoError::Db(err)
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

/// Verifies the connection is migrated and carries `tables`.
pub(crate) fn ensure_connection_ready(
    conn: &Connection,
    tables: &[&'static str],
) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &table in tables {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}
