//! Read-only facility reports over the occupancy ledger.
//!
//! # Invariants
//! - Rooms are reported in insertion order, occupants in assignment order.
//! - Reports never write.

use crate::model::room::{Room, RoomKind};
use crate::repo::ledger_repo::OccupancyLedger;
use crate::repo::room_repo::RoomRepository;
use crate::repo::Entity;
use crate::service::{FacilityError, FacilityResult};
use serde::Serialize;

/// Occupant names of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomAllocation {
    pub room: String,
    pub kind: RoomKind,
    pub occupants: Vec<String>,
}

/// People still missing a room.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UnallocatedReport {
    /// Fellows who asked for accommodation and hold no living space.
    pub fellows_without_living_space: Vec<String>,
    /// Anyone holding no office.
    pub people_without_office: Vec<String>,
}

impl UnallocatedReport {
    pub fn is_empty(&self) -> bool {
        self.fellows_without_living_space.is_empty() && self.people_without_office.is_empty()
    }
}

/// Detail view of one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomView {
    pub name: String,
    pub kind: RoomKind,
    pub capacity: u32,
    pub available: u32,
    pub occupants: Vec<String>,
}

/// Free space summary for one room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomAvailability {
    pub name: String,
    pub kind: RoomKind,
    pub capacity: u32,
    pub available_space: u32,
}

/// Reporting facade over the room registry and ledger.
pub struct ReportService<R, L> {
    rooms: R,
    ledger: L,
}

impl<R: RoomRepository, L: OccupancyLedger> ReportService<R, L> {
    pub fn new(rooms: R, ledger: L) -> Self {
        Self { rooms, ledger }
    }

    /// Every room with its occupant names; empty rooms included.
    pub fn allocations(&self) -> FacilityResult<Vec<RoomAllocation>> {
        self.rooms
            .list_rooms(None)?
            .into_iter()
            .map(|room| -> FacilityResult<RoomAllocation> {
                Ok(RoomAllocation {
                    occupants: self.occupant_names(&room)?,
                    room: room.name,
                    kind: room.kind,
                })
            })
            .collect()
    }

    pub fn unallocated(&self) -> FacilityResult<UnallocatedReport> {
        let fellows_without_living_space = self
            .ledger
            .people_without(RoomKind::LivingSpace)?
            .into_iter()
            .filter(|person| person.wants_room(RoomKind::LivingSpace))
            .map(|person| person.name)
            .collect();
        let people_without_office = self
            .ledger
            .people_without(RoomKind::Office)?
            .into_iter()
            .map(|person| person.name)
            .collect();

        Ok(UnallocatedReport {
            fellows_without_living_space,
            people_without_office,
        })
    }

    /// Occupants, capacity and free space of one room.
    pub fn room_detail(&self, name: &str) -> FacilityResult<RoomView> {
        let room = self
            .rooms
            .find_room_by_name(name.trim())?
            .ok_or_else(|| FacilityError::NotFound {
                entity: Entity::Room,
                key: name.to_string(),
            })?;
        let occupants = self.occupant_names(&room)?;
        let available = room.capacity.saturating_sub(occupants.len() as u32);

        Ok(RoomView {
            name: room.name,
            kind: room.kind,
            capacity: room.capacity,
            available,
            occupants,
        })
    }

    pub fn available_rooms(&self) -> FacilityResult<Vec<RoomAvailability>> {
        self.rooms
            .list_rooms(None)?
            .into_iter()
            .map(|room| -> FacilityResult<RoomAvailability> {
                Ok(RoomAvailability {
                    available_space: self.ledger.available_capacity(room.id)?,
                    name: room.name,
                    kind: room.kind,
                    capacity: room.capacity,
                })
            })
            .collect()
    }

    fn occupant_names(&self, room: &Room) -> FacilityResult<Vec<String>> {
        Ok(self
            .ledger
            .occupants_of(room.id)?
            .into_iter()
            .map(|person| person.name)
            .collect())
    }
}
