//! Facility handle: the single entry point used by CLI glue.
//!
//! # Responsibility
//! - Own one SQLite connection and one room chooser per facility.
//! - Wire registries, ledger and services for each call.
//!
//! # Invariants
//! - Mutations take `&mut self`; one handle never runs two at once.
//! - Handles on the same file are serialized by the ledger's immediate
//!   transactions.
//! - Multi-query reports read inside one transaction, so they never mix
//!   states from before and after a concurrent commit.

use crate::config::FacilityConfig;
use crate::db::{open_db, open_db_in_memory};
use crate::model::assignment::Assignment;
use crate::model::person::{Person, PersonRole};
use crate::model::room::{Room, RoomId, RoomKind};
use crate::repo::ledger_repo::{OccupancyLedger, SqliteOccupancyLedger};
use crate::repo::person_repo::{PersonRepository, SqlitePersonRepository};
use crate::repo::room_repo::{RoomRepository, SqliteRoomRepository};
use crate::repo::Entity;
use crate::service::allocation_service::{
    Admission, AllocationService, BatchReport, Placement, Reallocation,
};
use crate::service::report_service::{
    ReportService, RoomAllocation, RoomAvailability, RoomView, UnallocatedReport,
};
use crate::service::selector::{RandomSelector, RoomSelector};
use crate::service::{FacilityError, FacilityResult};
use log::info;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};

type SqliteAllocationService<'a> = AllocationService<
    'a,
    SqliteRoomRepository<'a>,
    SqlitePersonRepository<'a>,
    SqliteOccupancyLedger<'a>,
>;

/// A facility (e.g. Amity) backed by one SQLite database.
pub struct Facility {
    name: String,
    path: Option<PathBuf>,
    conn: Connection,
    selector: Box<dyn RoomSelector + Send>,
}

impl Facility {
    /// Opens (or creates) the facility stored at `path`.
    ///
    /// The facility name is the file stem.
    pub fn open(path: impl AsRef<Path>) -> FacilityResult<Self> {
        let path = path.as_ref().to_path_buf();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let conn = open_db(&path)?;
        Ok(Self::from_parts(name, Some(path), conn))
    }

    /// Opens the facility `name` stored as `<dir>/<name>.db`.
    pub fn open_named(dir: impl AsRef<Path>, name: &str) -> FacilityResult<Self> {
        let path = dir.as_ref().join(format!("{}.db", name.trim()));
        let conn = open_db(&path)?;
        Ok(Self::from_parts(name.trim().to_string(), Some(path), conn))
    }

    /// Opens an empty, private in-memory facility.
    pub fn open_in_memory(name: &str) -> FacilityResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::from_parts(name.trim().to_string(), None, conn))
    }

    /// Opens the facility described by `config`, seeding the chooser if asked.
    pub fn from_config(config: &FacilityConfig) -> FacilityResult<Self> {
        let mut facility = Self::open(&config.db_path)?;
        facility.name = config.facility_name();
        if let Some(seed) = config.seed {
            facility.selector = Box::new(RandomSelector::with_seed(seed));
        }
        Ok(facility)
    }

    /// Replaces the room chooser used by auto-allocation.
    pub fn with_selector(mut self, selector: impl RoomSelector + Send + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    fn from_parts(name: String, path: Option<PathBuf>, conn: Connection) -> Self {
        info!(
            "event=facility_open module=facility status=ok mode={}",
            if path.is_some() { "file" } else { "memory" }
        );
        Self {
            name,
            path,
            conn,
            selector: Box::new(RandomSelector::new()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Database file, `None` for in-memory facilities.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    pub fn create_room(&mut self, kind: &str, name: &str) -> FacilityResult<RoomId> {
        Ok(self.engine()?.create_room(kind, name)?.id)
    }

    /// Creates several rooms of one kind; stops at the first failure.
    pub fn create_rooms<S: AsRef<str>>(
        &mut self,
        kind: &str,
        names: &[S],
    ) -> FacilityResult<Vec<RoomId>> {
        let rooms = self.engine()?.create_rooms(kind, names)?;
        Ok(rooms.into_iter().map(|room| room.id).collect())
    }

    pub fn get_room(&self, name: &str) -> FacilityResult<Room> {
        SqliteRoomRepository::try_new(&self.conn)?
            .find_room_by_name(name.trim())?
            .ok_or_else(|| FacilityError::NotFound {
                entity: Entity::Room,
                key: name.to_string(),
            })
    }

    pub fn list_rooms(&self, kind: Option<RoomKind>) -> FacilityResult<Vec<Room>> {
        Ok(SqliteRoomRepository::try_new(&self.conn)?.list_rooms(kind)?)
    }

    pub fn room_count(&self) -> FacilityResult<u64> {
        Ok(SqliteRoomRepository::try_new(&self.conn)?.count_rooms()?)
    }

    /// Registers a person and immediately tries to place them.
    pub fn add_person(
        &mut self,
        name: &str,
        role: &str,
        wants_accommodation: bool,
    ) -> FacilityResult<Admission> {
        self.engine()?.add_person(name, role, wants_accommodation)
    }

    pub fn get_person(&self, name: &str) -> FacilityResult<Person> {
        SqlitePersonRepository::try_new(&self.conn)?
            .find_person_by_name(name.trim())?
            .ok_or_else(|| FacilityError::NotFound {
                entity: Entity::Person,
                key: name.to_string(),
            })
    }

    pub fn list_people(&self, role: Option<PersonRole>) -> FacilityResult<Vec<Person>> {
        Ok(SqlitePersonRepository::try_new(&self.conn)?.list_people(role)?)
    }

    pub fn people_count(&self) -> FacilityResult<u64> {
        Ok(SqlitePersonRepository::try_new(&self.conn)?.count_people()?)
    }

    pub fn assign(&mut self, person_name: &str, room_name: &str) -> FacilityResult<Assignment> {
        self.engine()?.assign(person_name, room_name)
    }

    pub fn unassign(&mut self, person_name: &str, room_name: &str) -> FacilityResult<()> {
        self.engine()?.unassign(person_name, room_name)
    }

    pub fn reallocate(
        &mut self,
        person_name: &str,
        room_name: &str,
    ) -> FacilityResult<Reallocation> {
        self.engine()?.reallocate(person_name, room_name)
    }

    /// Bulk-loads people records. See `AllocationService::load_batch`.
    pub fn load_batch<I, S>(&mut self, lines: I) -> FacilityResult<BatchReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.engine()?.load_batch(lines)
    }

    /// Reads a people file and bulk-loads its lines.
    pub fn load_people(&mut self, path: impl AsRef<Path>) -> FacilityResult<BatchReport> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| FacilityError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_batch(content.lines())
    }

    pub fn allocate_unallocated(&mut self) -> FacilityResult<Vec<Placement>> {
        self.engine()?.allocate_unallocated()
    }

    /// Rooms currently holding the named person.
    pub fn rooms_of(&self, person_name: &str) -> FacilityResult<Vec<Room>> {
        let person = self.get_person(person_name)?;
        Ok(SqliteOccupancyLedger::try_new(&self.conn)?.rooms_of(person.id)?)
    }

    /// People in the named room, in assignment order.
    pub fn occupants_of(&self, room_name: &str) -> FacilityResult<Vec<Person>> {
        let room = self.get_room(room_name)?;
        Ok(SqliteOccupancyLedger::try_new(&self.conn)?.occupants_of(room.id)?)
    }

    pub fn available_capacity(&self, room_name: &str) -> FacilityResult<u32> {
        let room = self.get_room(room_name)?;
        Ok(SqliteOccupancyLedger::try_new(&self.conn)?.available_capacity(room.id)?)
    }

    pub fn allocations(&self) -> FacilityResult<Vec<RoomAllocation>> {
        self.read_reports(|reports| reports.allocations())
    }

    pub fn unallocated(&self) -> FacilityResult<UnallocatedReport> {
        self.read_reports(|reports| reports.unallocated())
    }

    pub fn room_detail(&self, name: &str) -> FacilityResult<RoomView> {
        self.read_reports(|reports| reports.room_detail(name))
    }

    pub fn available_rooms(&self) -> FacilityResult<Vec<RoomAvailability>> {
        self.read_reports(|reports| reports.available_rooms())
    }

    /// Closes the facility and deletes its database file.
    ///
    /// In-memory facilities are simply dropped.
    pub fn drop_db(self) -> FacilityResult<()> {
        let Self { path, conn, .. } = self;
        conn.close().map_err(|(_, err)| FacilityError::from(err))?;
        if let Some(path) = path {
            if path.exists() {
                std::fs::remove_file(&path)
                    .map_err(|source| FacilityError::Io { path, source })?;
            }
        }
        Ok(())
    }

    fn engine(&mut self) -> FacilityResult<SqliteAllocationService<'_>> {
        let conn = &self.conn;
        Ok(AllocationService::new(
            SqliteRoomRepository::try_new(conn)?,
            SqlitePersonRepository::try_new(conn)?,
            SqliteOccupancyLedger::try_new(conn)?,
            self.selector.as_mut(),
        ))
    }

    fn read_reports<T>(
        &self,
        read: impl FnOnce(
            &ReportService<SqliteRoomRepository<'_>, SqliteOccupancyLedger<'_>>,
        ) -> FacilityResult<T>,
    ) -> FacilityResult<T> {
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Deferred)?;
        let reports = ReportService::new(
            SqliteRoomRepository::try_new(&tx)?,
            SqliteOccupancyLedger::try_new(&tx)?,
        );
        let value = read(&reports)?;
        drop(reports);
        tx.commit()?;
        Ok(value)
    }
}
