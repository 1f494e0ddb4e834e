//! Occupancy ledger entry.

use super::person::PersonId;
use super::room::{RoomId, RoomKind};
use serde::{Deserialize, Serialize};

/// One person placed in one room.
///
/// Holds identifiers only; rooms and people are owned by their registries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// Monotonic creation order across the whole ledger.
    pub sequence: i64,
    pub person_id: PersonId,
    pub room_id: RoomId,
    /// Kind of `room_id`, kept so storage can enforce one room per kind.
    pub room_kind: RoomKind,
}
