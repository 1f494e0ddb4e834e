//! Occupancy ledger contracts and SQLite implementation.
//!
//! # Responsibility
//! - Own `people_rooms` assignment records.
//! - Enforce capacity, eligibility and one-room-per-kind rules on every write.
//!
//! # Invariants
//! - Each mutation runs in one `BEGIN IMMEDIATE` transaction that covers the
//!   rule checks and the write, so no other connection can commit between them.
//! - `(person_uuid, room_kind)` is unique among assignments.
//! - A reassignment removes the old row and inserts the new one in the same
//!   transaction; readers never see zero or two rooms of that kind.
//! - Occupant order is assignment creation order (`people_rooms.id ASC`).

use super::person_repo::{load_required_person, parse_person_row, PERSON_SELECT_SQL};
use super::room_repo::{load_required_room, parse_room_row, ROOM_SELECT_SQL};
use super::{ensure_connection_ready, RepoError, RepoResult};
use crate::model::assignment::Assignment;
use crate::model::person::{Person, PersonId};
use crate::model::room::{Room, RoomId, RoomKind};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction, TransactionBehavior};

/// Outcome of a reassignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reassignment {
    /// Room of the same kind the person left, if any.
    pub previous: Option<Room>,
    pub assignment: Assignment,
}

/// Repository interface for the occupancy ledger.
pub trait OccupancyLedger {
    /// Places a person in a room.
    ///
    /// # Errors
    /// - `TypeMismatch` when the role may not occupy the room kind.
    /// - `AlreadyAssigned` when the person holds a room of that kind.
    /// - `CapacityExceeded` when the room is full.
    fn assign(&self, person_id: PersonId, room_id: RoomId) -> RepoResult<Assignment>;
    /// Removes a placement, failing with `NotAssigned` when absent.
    fn unassign(&self, person_id: PersonId, room_id: RoomId) -> RepoResult<()>;
    /// Moves a person into `room_id`, releasing their current room of that kind.
    ///
    /// # Errors
    /// - `TypeMismatch`, `SameRoom` or `CapacityExceeded`; nothing changes on error.
    fn reassign(&self, person_id: PersonId, room_id: RoomId) -> RepoResult<Reassignment>;
    fn occupants_of(&self, room_id: RoomId) -> RepoResult<Vec<Person>>;
    fn rooms_of(&self, person_id: PersonId) -> RepoResult<Vec<Room>>;
    fn occupant_count(&self, room_id: RoomId) -> RepoResult<u32>;
    /// `capacity - occupant_count`; `NotFound` for unknown rooms.
    fn available_capacity(&self, room_id: RoomId) -> RepoResult<u32>;
    /// Rooms of `kind` with at least one free slot, in insertion order.
    fn rooms_with_vacancy(&self, kind: RoomKind) -> RepoResult<Vec<Room>>;
    /// People holding no room of `kind`, in registration order.
    fn people_without(&self, kind: RoomKind) -> RepoResult<Vec<Person>>;
}

/// SQLite-backed occupancy ledger.
pub struct SqliteOccupancyLedger<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOccupancyLedger<'conn> {
    /// Creates ledger from migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &["rooms", "people", "people_rooms"])?;
        Ok(Self { conn })
    }
}

impl OccupancyLedger for SqliteOccupancyLedger<'_> {
    fn assign(&self, person_id: PersonId, room_id: RoomId) -> RepoResult<Assignment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let person = load_required_person(&tx, person_id)?;
        let room = load_required_room(&tx, room_id)?;

        ensure_eligible(&person, &room)?;
        if let Some(current) = room_of_kind(&tx, person_id, room.kind)? {
            return Err(RepoError::AlreadyAssigned {
                person: person.name,
                kind: room.kind,
                room: current.name,
            });
        }
        ensure_vacancy(&tx, &room)?;

        let assignment = insert_assignment(&tx, &person, &room)?;
        tx.commit()?;
        debug!(
            "event=ledger_assign module=ledger status=ok kind={} sequence={}",
            room.kind, assignment.sequence
        );
        Ok(assignment)
    }

    fn unassign(&self, person_id: PersonId, room_id: RoomId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let person = load_required_person(&tx, person_id)?;
        let room = load_required_room(&tx, room_id)?;

        let changed = tx.execute(
            "DELETE FROM people_rooms
             WHERE person_uuid = ?1
               AND room_uuid = ?2;",
            params![person_id.to_string(), room_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::NotAssigned {
                person: person.name,
                room: room.name,
            });
        }

        tx.commit()?;
        debug!(
            "event=ledger_unassign module=ledger status=ok kind={}",
            room.kind
        );
        Ok(())
    }

    fn reassign(&self, person_id: PersonId, room_id: RoomId) -> RepoResult<Reassignment> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let person = load_required_person(&tx, person_id)?;
        let room = load_required_room(&tx, room_id)?;

        ensure_eligible(&person, &room)?;
        let previous = room_of_kind(&tx, person_id, room.kind)?;
        if previous.as_ref().is_some_and(|current| current.id == room.id) {
            return Err(RepoError::SameRoom {
                person: person.name,
                room: room.name,
            });
        }
        ensure_vacancy(&tx, &room)?;

        if let Some(current) = &previous {
            tx.execute(
                "DELETE FROM people_rooms
                 WHERE person_uuid = ?1
                   AND room_uuid = ?2;",
                params![person_id.to_string(), current.id.to_string()],
            )?;
        }
        let assignment = insert_assignment(&tx, &person, &room)?;
        tx.commit()?;
        debug!(
            "event=ledger_reassign module=ledger status=ok kind={} had_previous={} sequence={}",
            room.kind,
            previous.is_some(),
            assignment.sequence
        );

        Ok(Reassignment {
            previous,
            assignment,
        })
    }

    fn occupants_of(&self, room_id: RoomId) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             INNER JOIN people_rooms pr ON pr.person_uuid = p.uuid
             WHERE pr.room_uuid = ?1
             ORDER BY pr.id ASC;"
        ))?;
        let mut rows = stmt.query([room_id.to_string()])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }

    fn rooms_of(&self, person_id: PersonId) -> RepoResult<Vec<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROOM_SELECT_SQL}
             INNER JOIN people_rooms pr ON pr.room_uuid = r.uuid
             WHERE pr.person_uuid = ?1
             ORDER BY pr.id ASC;"
        ))?;
        let mut rows = stmt.query([person_id.to_string()])?;
        let mut rooms = Vec::new();
        while let Some(row) = rows.next()? {
            rooms.push(parse_room_row(row)?);
        }
        Ok(rooms)
    }

    fn occupant_count(&self, room_id: RoomId) -> RepoResult<u32> {
        count_occupants(self.conn, room_id)
    }

    fn available_capacity(&self, room_id: RoomId) -> RepoResult<u32> {
        let room = load_required_room(self.conn, room_id)?;
        let occupied = count_occupants(self.conn, room_id)?;
        Ok(room.capacity.saturating_sub(occupied))
    }

    fn rooms_with_vacancy(&self, kind: RoomKind) -> RepoResult<Vec<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROOM_SELECT_SQL}
             WHERE r.kind = ?1
               AND (
                 SELECT COUNT(*)
                 FROM people_rooms pr
                 WHERE pr.room_uuid = r.uuid
               ) < r.capacity
             ORDER BY r.id ASC;"
        ))?;
        let mut rows = stmt.query([kind.as_str()])?;
        let mut rooms = Vec::new();
        while let Some(row) = rows.next()? {
            rooms.push(parse_room_row(row)?);
        }
        Ok(rooms)
    }

    fn people_without(&self, kind: RoomKind) -> RepoResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERSON_SELECT_SQL}
             WHERE NOT EXISTS (
               SELECT 1
               FROM people_rooms pr
               WHERE pr.person_uuid = p.uuid
                 AND pr.room_kind = ?1
             )
             ORDER BY p.id ASC;"
        ))?;
        let mut rows = stmt.query([kind.as_str()])?;
        let mut people = Vec::new();
        while let Some(row) = rows.next()? {
            people.push(parse_person_row(row)?);
        }
        Ok(people)
    }
}

fn ensure_eligible(person: &Person, room: &Room) -> RepoResult<()> {
    if person.role.can_occupy(room.kind) {
        return Ok(());
    }
    Err(RepoError::TypeMismatch {
        person: person.name.clone(),
        role: person.role,
        kind: room.kind,
    })
}

fn ensure_vacancy(conn: &Connection, room: &Room) -> RepoResult<()> {
    if count_occupants(conn, room.id)? >= room.capacity {
        return Err(RepoError::CapacityExceeded {
            room: room.name.clone(),
            capacity: room.capacity,
        });
    }
    Ok(())
}

fn count_occupants(conn: &Connection, room_id: RoomId) -> RepoResult<u32> {
    let count: u32 = conn.query_row(
        "SELECT COUNT(*)
         FROM people_rooms
         WHERE room_uuid = ?1;",
        [room_id.to_string()],
        |row| row.get(0),
    )?;
    Ok(count)
}

fn room_of_kind(conn: &Connection, person_id: PersonId, kind: RoomKind) -> RepoResult<Option<Room>> {
    conn.query_row(
        &format!(
            "{ROOM_SELECT_SQL}
             INNER JOIN people_rooms pr ON pr.room_uuid = r.uuid
             WHERE pr.person_uuid = ?1
               AND pr.room_kind = ?2;"
        ),
        params![person_id.to_string(), kind.as_str()],
        |row| Ok(parse_room_row(row)),
    )
    .optional()?
    .transpose()
}

fn insert_assignment(conn: &Connection, person: &Person, room: &Room) -> RepoResult<Assignment> {
    conn.execute(
        "INSERT INTO people_rooms (person_uuid, room_uuid, room_kind) VALUES (?1, ?2, ?3);",
        params![person.id.to_string(), room.id.to_string(), room.kind.as_str()],
    )?;
    Ok(Assignment {
        sequence: conn.last_insert_rowid(),
        person_id: person.id,
        room_id: room.id,
        room_kind: room.kind,
    })
}
