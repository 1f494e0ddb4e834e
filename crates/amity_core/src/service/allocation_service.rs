//! Allocation engine use-cases.
//!
//! # Responsibility
//! - Register rooms and people, then place new people in rooms with space.
//! - Expose explicit assign/unassign and reallocation by name.
//! - Bulk-load people records with per-line skip reporting.
//!
//! # Invariants
//! - Every write goes through the registries or the occupancy ledger; capacity
//!   and one-room-per-kind rules are enforced there.
//! - A person without a free room stays unallocated; this is not an error.
//! - Bulk load keeps lines processed before a malformed record.

use crate::model::assignment::Assignment;
use crate::model::person::{Person, PersonId, PersonRole};
use crate::model::room::{Room, RoomKind};
use crate::repo::ledger_repo::OccupancyLedger;
use crate::repo::person_repo::PersonRepository;
use crate::repo::room_repo::RoomRepository;
use crate::repo::{Entity, RepoError};
use crate::service::batch::parse_person_record;
use crate::service::selector::RoomSelector;
use crate::service::{FacilityError, FacilityResult};
use log::{info, warn};
use serde::Serialize;

/// One room handed to one person by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub person: String,
    pub kind: RoomKind,
    pub room: String,
}

/// Result of registering one person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Admission {
    pub person_id: PersonId,
    pub name: String,
    pub role: PersonRole,
    /// Rooms assigned right after registration.
    pub placements: Vec<Placement>,
    /// Kinds the person wanted but no room had space for.
    pub unplaced: Vec<RoomKind>,
}

impl Admission {
    /// Name of the room of `kind` the person received, if any.
    pub fn room_for(&self, kind: RoomKind) -> Option<&str> {
        self.placements
            .iter()
            .find(|placement| placement.kind == kind)
            .map(|placement| placement.room.as_str())
    }
}

/// Bulk-load entry whose name was already registered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// 1-based input line number.
    pub line: usize,
    pub name: String,
}

/// Per-line outcome of a bulk load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub added: Vec<Admission>,
    pub skipped: Vec<SkippedRecord>,
}

/// Result of moving a person into another room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reallocation {
    pub person: String,
    pub kind: RoomKind,
    /// Room of the same kind the person left, `None` if they had none.
    pub from: Option<String>,
    pub to: String,
}

/// Allocation engine facade over registries, ledger and room choice.
pub struct AllocationService<'s, R, P, L> {
    rooms: R,
    people: P,
    ledger: L,
    selector: &'s mut dyn RoomSelector,
}

impl<'s, R, P, L> AllocationService<'s, R, P, L>
where
    R: RoomRepository,
    P: PersonRepository,
    L: OccupancyLedger,
{
    /// Creates the engine from repository implementations and a room chooser.
    pub fn new(rooms: R, people: P, ledger: L, selector: &'s mut dyn RoomSelector) -> Self {
        Self {
            rooms,
            people,
            ledger,
            selector,
        }
    }

    /// Creates one room of the given kind label.
    ///
    /// # Errors
    /// - `InvalidType` / `InvalidName` before any write.
    /// - `DuplicateName` when the room name is taken.
    pub fn create_room(&self, kind: &str, name: &str) -> FacilityResult<Room> {
        let kind = RoomKind::parse(kind)?;
        let room = Room::new(kind, name)?;
        self.rooms.create_room(&room)?;
        info!("event=room_create module=registry status=ok kind={kind}");
        Ok(room)
    }

    /// Creates rooms of one kind in order, stopping at the first failure.
    pub fn create_rooms<S: AsRef<str>>(&self, kind: &str, names: &[S]) -> FacilityResult<Vec<Room>> {
        names
            .iter()
            .map(|name| self.create_room(kind, name.as_ref()))
            .collect()
    }

    /// Registers a person from raw role text and places them.
    pub fn add_person(
        &mut self,
        name: &str,
        role: &str,
        wants_accommodation: bool,
    ) -> FacilityResult<Admission> {
        let role = PersonRole::parse(role)?;
        self.admit(name, role, wants_accommodation)
    }

    /// Registers a person and runs auto-allocation for them.
    ///
    /// Everyone is offered an office; fellows asking for accommodation are also
    /// offered a living space.
    pub fn admit(
        &mut self,
        name: &str,
        role: PersonRole,
        wants_accommodation: bool,
    ) -> FacilityResult<Admission> {
        let person = Person::new(name, role, wants_accommodation)?;
        self.people.create_person(&person)?;

        let mut placements = Vec::new();
        let mut unplaced = Vec::new();
        for kind in RoomKind::ALL {
            if !person.wants_room(kind) {
                continue;
            }
            match self.place(&person, kind)? {
                Some(placement) => placements.push(placement),
                None => unplaced.push(kind),
            }
        }

        info!(
            "event=person_add module=allocation status=ok role={} placed={} unplaced={}",
            person.role,
            placements.len(),
            unplaced.len()
        );
        Ok(Admission {
            person_id: person.id,
            name: person.name,
            role: person.role,
            placements,
            unplaced,
        })
    }

    /// Explicitly places a named person in a named room.
    pub fn assign(&self, person_name: &str, room_name: &str) -> FacilityResult<Assignment> {
        let person = self.require_person(person_name)?;
        let room = self.require_room(room_name)?;
        Ok(self.ledger.assign(person.id, room.id)?)
    }

    /// Explicitly removes a named person from a named room.
    pub fn unassign(&self, person_name: &str, room_name: &str) -> FacilityResult<()> {
        let person = self.require_person(person_name)?;
        let room = self.require_room(room_name)?;
        Ok(self.ledger.unassign(person.id, room.id)?)
    }

    /// Moves a person into `room_name`, releasing their room of the same kind.
    ///
    /// # Errors
    /// - `NotFound` when the person or the room is unknown.
    /// - `TypeMismatch` when the role may not occupy the room kind.
    /// - `SameRoom` when the person already occupies `room_name`.
    /// - `CapacityExceeded` when the room is full.
    pub fn reallocate(&self, person_name: &str, room_name: &str) -> FacilityResult<Reallocation> {
        let person = self.require_person(person_name)?;
        let room = self.require_room(room_name)?;

        let outcome = match self.ledger.reassign(person.id, room.id) {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(
                    "event=reallocate module=allocation status=error kind={} error={}",
                    room.kind,
                    err_code(&err)
                );
                return Err(err.into());
            }
        };

        info!(
            "event=reallocate module=allocation status=ok kind={} had_previous={}",
            room.kind,
            outcome.previous.is_some()
        );
        Ok(Reallocation {
            person: person.name,
            kind: room.kind,
            from: outcome.previous.map(|previous| previous.name),
            to: room.name,
        })
    }

    /// Registers and places every record in `lines`, in order.
    ///
    /// Blank lines are ignored. A name that already exists is skipped and
    /// reported with its line number.
    ///
    /// # Errors
    /// - `InvalidRecord` for a line matching neither record shape. Lines before
    ///   it stay committed; re-running the same input is safe because known
    ///   names are skipped.
    pub fn load_batch<I, S>(&mut self, lines: I) -> FacilityResult<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = BatchReport::default();
        for (index, line) in lines.into_iter().enumerate() {
            let line_number = index + 1;
            let text = line.as_ref();
            if text.trim().is_empty() {
                continue;
            }

            let Some(record) = parse_person_record(text) else {
                warn!(
                    "event=batch_load module=allocation status=error line={line_number} error_code=invalid_record added={} skipped={}",
                    report.added.len(),
                    report.skipped.len()
                );
                return Err(FacilityError::InvalidRecord {
                    line: line_number,
                    content: text.trim().to_string(),
                });
            };

            match self.admit(&record.name, record.role, record.wants_accommodation) {
                Ok(admission) => report.added.push(admission),
                Err(FacilityError::DuplicateName { name, .. }) => {
                    report.skipped.push(SkippedRecord {
                        line: line_number,
                        name,
                    });
                }
                Err(err) => return Err(err),
            }
        }

        info!(
            "event=batch_load module=allocation status=ok added={} skipped={}",
            report.added.len(),
            report.skipped.len()
        );
        Ok(report)
    }

    /// Retries placement for everyone still missing a room they want.
    ///
    /// Useful after new rooms are created. People are visited in registration
    /// order, offices first.
    pub fn allocate_unallocated(&mut self) -> FacilityResult<Vec<Placement>> {
        let mut placements = Vec::new();
        for kind in RoomKind::ALL {
            for person in self.ledger.people_without(kind)? {
                if !person.wants_room(kind) {
                    continue;
                }
                match self.place(&person, kind)? {
                    Some(placement) => placements.push(placement),
                    None => break,
                }
            }
        }

        info!(
            "event=allocate_pending module=allocation status=ok placed={}",
            placements.len()
        );
        Ok(placements)
    }

    /// Resolves a room by name or fails with `NotFound`.
    pub fn require_room(&self, name: &str) -> FacilityResult<Room> {
        self.rooms
            .find_room_by_name(name.trim())?
            .ok_or_else(|| FacilityError::NotFound {
                entity: Entity::Room,
                key: name.to_string(),
            })
    }

    /// Resolves a person by name or fails with `NotFound`.
    pub fn require_person(&self, name: &str) -> FacilityResult<Person> {
        self.people
            .find_person_by_name(name.trim())?
            .ok_or_else(|| FacilityError::NotFound {
                entity: Entity::Person,
                key: name.to_string(),
            })
    }

    /// Picks a room of `kind` with space and assigns the person to it.
    ///
    /// A candidate that filled up after listing (another handle on the same
    /// file) is dropped and the choice repeated on the rest.
    fn place(&mut self, person: &Person, kind: RoomKind) -> FacilityResult<Option<Placement>> {
        let mut candidates = self.ledger.rooms_with_vacancy(kind)?;
        while !candidates.is_empty() {
            let index = self.selector.select(&candidates) % candidates.len();
            let room = candidates.remove(index);
            match self.ledger.assign(person.id, room.id) {
                Ok(_) => {
                    return Ok(Some(Placement {
                        person: person.name.clone(),
                        kind,
                        room: room.name,
                    }));
                }
                Err(RepoError::CapacityExceeded { .. }) => continue,
                Err(err) => return Err(err.into()),
            }
        }
        Ok(None)
    }
}

fn err_code(err: &RepoError) -> &'static str {
    match err {
        RepoError::TypeMismatch { .. } => "type_mismatch",
        RepoError::SameRoom { .. } => "same_room",
        RepoError::CapacityExceeded { .. } => "capacity_exceeded",
        RepoError::NotFound { .. } => "not_found",
        _ => "storage",
    }
}
