//! Core allocation engine for Amity-style facilities.
//!
//! A facility houses staff and fellows in offices (6 places) and living
//! spaces (4 places, fellows only). This crate owns every allocation rule;
//! callers hand it already-parsed values.

pub mod config;
pub mod db;
pub mod facility;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{ConfigError, FacilityConfig};
pub use facility::Facility;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::assignment::Assignment;
pub use model::person::{Person, PersonId, PersonRole};
pub use model::room::{Room, RoomId, RoomKind};
pub use model::ModelError;
pub use repo::ledger_repo::{OccupancyLedger, Reassignment, SqliteOccupancyLedger};
pub use repo::person_repo::{PersonRepository, SqlitePersonRepository};
pub use repo::room_repo::{RoomRepository, SqliteRoomRepository};
pub use repo::{Entity, RepoError, RepoResult};
pub use service::allocation_service::{
    Admission, AllocationService, BatchReport, Placement, Reallocation, SkippedRecord,
};
pub use service::batch::{parse_person_record, PersonRecord};
pub use service::report_service::{
    ReportService, RoomAllocation, RoomAvailability, RoomView, UnallocatedReport,
};
pub use service::selector::{FirstAvailable, RandomSelector, RoomSelector};
pub use service::{FacilityError, FacilityResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
