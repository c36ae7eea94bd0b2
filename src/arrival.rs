//! Warehouse arrival notices.

use serde::{Deserialize, Serialize};

use crate::position::Position;
use crate::unit::{UnitId, WarehouseId};

/// Declares that a cargo unit has reached a warehouse.
///
/// The notice's identity is its unit id: a later notice for the same unit
/// replaces the earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WarehouseArrivalNotice {
    /// The arriving unit.
    #[serde(rename = "cargo_unit_id")]
    pub unit_id: UnitId,
    /// The receiving warehouse.
    pub warehouse_id: WarehouseId,
    /// Free-text description of the arrival.
    pub message: String,
}

impl WarehouseArrivalNotice {
    /// Creates a notice.
    #[must_use]
    pub fn new(unit_id: UnitId, warehouse_id: WarehouseId, message: impl Into<String>) -> Self {
        Self {
            unit_id,
            warehouse_id,
            message: message.into(),
        }
    }
}

/// The latest arrival observed for a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArrivalState {
    /// Where the unit was when it reached the warehouse.
    pub position: Position,
    /// The notice that announced the arrival.
    pub notice: WarehouseArrivalNotice,
}

impl ArrivalState {
    /// Creates an arrival state.
    #[must_use]
    pub const fn new(position: Position, notice: WarehouseArrivalNotice) -> Self {
        Self { position, notice }
    }

    /// The receiving warehouse.
    #[must_use]
    pub const fn warehouse_id(&self) -> WarehouseId {
        self.notice.warehouse_id
    }

    /// The arriving unit.
    #[must_use]
    pub const fn unit_id(&self) -> UnitId {
        self.notice.unit_id
    }
}
