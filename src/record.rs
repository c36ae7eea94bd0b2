//! Per-unit delivery records.
//!
//! A [`DeliveryRecord`] is the unit of storage: one per cargo unit, created by
//! whichever event for that unit arrives first and merged in place by every
//! later event. Position updates only ever append to the [`MovementTrail`];
//! arrival notices only ever replace the [`ArrivalState`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::arrival::{ArrivalState, WarehouseArrivalNotice};
use crate::position::Position;
use crate::unit::UnitId;

/// Ordered history of positions reported for a unit, oldest first.
///
/// The trail is append-only: entries are never removed, reordered or
/// deduplicated, so repeated identical positions appear as separate entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementTrail {
    /// The unit this trail belongs to.
    #[serde(rename = "cargo_unit_id")]
    pub unit_id: UnitId,
    #[serde(rename = "location")]
    positions: Vec<Position>,
}

impl MovementTrail {
    /// Creates an empty trail.
    #[must_use]
    pub const fn empty(unit_id: UnitId) -> Self {
        Self {
            unit_id,
            positions: Vec::new(),
        }
    }

    /// Creates a trail holding a single position.
    #[must_use]
    pub fn starting_at(unit_id: UnitId, position: Position) -> Self {
        Self {
            unit_id,
            positions: vec![position],
        }
    }

    /// Appends a position to the end of the trail.
    pub fn push(&mut self, position: Position) {
        self.positions.push(position);
    }

    /// All positions, oldest first.
    #[must_use]
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// The most recent position, if any.
    #[must_use]
    pub fn latest(&self) -> Option<Position> {
        self.positions.last().copied()
    }

    /// Number of recorded positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns true if no position has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Everything known about one cargo unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRecord {
    /// Record key; identical to the unit id.
    #[serde(rename = "report_id")]
    pub id: UnitId,
    /// Position history.
    #[serde(rename = "move_unit")]
    pub trail: MovementTrail,
    /// Latest warehouse arrival, absent until the first arrival notice.
    #[serde(rename = "unit_reached_warehouse")]
    pub arrival: Option<ArrivalState>,
    /// When the record was first stored.
    pub created_at: DateTime<Utc>,
    /// When the record was last merged.
    pub updated_at: DateTime<Utc>,
}

impl DeliveryRecord {
    /// A fresh record created by a position update.
    #[must_use]
    pub fn from_position(id: UnitId, position: Position) -> Self {
        let now = Utc::now();
        Self {
            id,
            trail: MovementTrail::starting_at(id, position),
            arrival: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A fresh record created by an arrival notice, keyed by the notice's unit id.
    #[must_use]
    pub fn from_arrival(position: Position, notice: WarehouseArrivalNotice) -> Self {
        let now = Utc::now();
        let id = notice.unit_id;
        Self {
            id,
            trail: MovementTrail::empty(id),
            arrival: Some(ArrivalState::new(position, notice)),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a position update; the arrival is left untouched.
    pub fn append_position(&mut self, position: Position) {
        self.trail.push(position);
        self.touch();
    }

    /// Replaces the arrival entirely; the trail is left untouched.
    pub fn replace_arrival(&mut self, arrival: ArrivalState) {
        self.arrival = Some(arrival);
        self.touch();
    }

    /// Returns true once an arrival notice has been applied.
    #[must_use]
    pub const fn has_arrived(&self) -> bool {
        self.arrival.is_some()
    }

    fn touch(&mut self) {
        let now = Utc::now();
        // Clock steps backwards must not make updated_at precede created_at.
        self.updated_at = now.max(self.created_at);
    }
}
