//! Room registry contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist rooms with their kind-derived capacity.
//! - Serve room lookups by id and name, and ordered listings.
//!
//! # Invariants
//! - Listing order is insertion order (`rooms.id ASC`).
//! - Persisted capacity must match `RoomKind::capacity()`; mismatches are
//!   reported as invalid data.

use super::{
    ensure_connection_ready, map_insert_error, parse_uuid, Entity, RepoError, RepoResult,
};
use crate::model::room::{Room, RoomId, RoomKind};
use rusqlite::{params, Connection, OptionalExtension, Row};

pub(crate) const ROOM_SELECT_SQL: &str = "SELECT
    r.uuid AS uuid,
    r.name AS name,
    r.kind AS kind,
    r.capacity AS capacity
FROM rooms r";

/// Repository interface for the room registry.
pub trait RoomRepository {
    /// Persists a new room, failing with `DuplicateName` on a name clash.
    fn create_room(&self, room: &Room) -> RepoResult<RoomId>;
    fn get_room(&self, id: RoomId) -> RepoResult<Option<Room>>;
    fn find_room_by_name(&self, name: &str) -> RepoResult<Option<Room>>;
    /// Lists rooms in insertion order, optionally filtered by kind.
    fn list_rooms(&self, kind: Option<RoomKind>) -> RepoResult<Vec<Room>>;
    fn count_rooms(&self) -> RepoResult<u64>;
}

/// SQLite-backed room registry.
pub struct SqliteRoomRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoomRepository<'conn> {
    /// Creates repository from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["rooms"])?;
        Ok(Self { conn })
    }
}

impl RoomRepository for SqliteRoomRepository<'_> {
    fn create_room(&self, room: &Room) -> RepoResult<RoomId> {
        self.conn
            .execute(
                "INSERT INTO rooms (uuid, name, kind, capacity) VALUES (?1, ?2, ?3, ?4);",
                params![
                    room.id.to_string(),
                    room.name.as_str(),
                    room.kind.as_str(),
                    room.capacity,
                ],
            )
            .map_err(|err| map_insert_error(err, Entity::Room, &room.name))?;
        Ok(room.id)
    }

    fn get_room(&self, id: RoomId) -> RepoResult<Option<Room>> {
        load_room(self.conn, id)
    }

    fn find_room_by_name(&self, name: &str) -> RepoResult<Option<Room>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ROOM_SELECT_SQL} WHERE r.name = ?1;"))?;
        let mut rows = stmt.query([name])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_room_row(row)?));
        }
        Ok(None)
    }

    fn list_rooms(&self, kind: Option<RoomKind>) -> RepoResult<Vec<Room>> {
        let mut rooms = Vec::new();
        match kind {
            Some(kind) => {
                let mut stmt = self.conn.prepare(&format!(
                    "{ROOM_SELECT_SQL} WHERE r.kind = ?1 ORDER BY r.id ASC;"
                ))?;
                let mut rows = stmt.query([kind.as_str()])?;
                while let Some(row) = rows.next()? {
                    rooms.push(parse_room_row(row)?);
                }
            }
            None => {
                let mut stmt = self
                    .conn
                    .prepare(&format!("{ROOM_SELECT_SQL} ORDER BY r.id ASC;"))?;
                let mut rows = stmt.query([])?;
                while let Some(row) = rows.next()? {
                    rooms.push(parse_room_row(row)?);
                }
            }
        }
        Ok(rooms)
    }

    fn count_rooms(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM rooms;", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

pub(crate) fn load_room(conn: &Connection, id: RoomId) -> RepoResult<Option<Room>> {
    conn.query_row(
        &format!("{ROOM_SELECT_SQL} WHERE r.uuid = ?1;"),
        [id.to_string()],
        |row| Ok(parse_room_row(row)),
    )
    .optional()?
    .transpose()
}

pub(crate) fn load_required_room(conn: &Connection, id: RoomId) -> RepoResult<Room> {
    load_room(conn, id)?.ok_or_else(|| RepoError::NotFound {
        entity: Entity::Room,
        key: id.to_string(),
    })
}

pub(crate) fn parse_room_row(row: &Row<'_>) -> RepoResult<Room> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "rooms.uuid")?;

    let kind_text: String = row.get("kind")?;
    let kind = parse_room_kind(&kind_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid room kind `{kind_text}` in rooms.kind"))
    })?;

    let capacity: u32 = row.get("capacity")?;
    if capacity != kind.capacity() {
        return Err(RepoError::InvalidData(format!(
            "capacity {capacity} does not match {kind} capacity {} in rooms.capacity",
            kind.capacity()
        )));
    }

    Ok(Room {
        id,
        name: row.get("name")?,
        kind,
        capacity,
    })
}

pub(crate) fn parse_room_kind(value: &str) -> Option<RoomKind> {
    match value {
        "office" => Some(RoomKind::Office),
        "living_space" => Some(RoomKind::LivingSpace),
        _ => None,
    }
}
