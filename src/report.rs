//! Aggregate delivery reports.
//!
//! A report is a pure fold over a snapshot of delivery records. Every list in
//! the report is sorted ascending so two reports over the same records compare
//! equal regardless of the order the store returned them in.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::DeliveryRecord;
use crate::unit::{UnitId, WarehouseId};

/// How records that never received an arrival notice are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ArrivalAccounting {
    /// A record without an arrival counts as "unit 0 arrived at warehouse 0".
    ///
    /// Matches the historical report output, where an arrival that never
    /// happened was indistinguishable from one at warehouse `0`.
    #[default]
    ZeroSentinel,
    /// Records without an arrival only contribute to the total count.
    ExcludeAbsent,
}

impl ArrivalAccounting {
    /// Parses `zero` / `exclude` (and their long forms).
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zero" | "zero-sentinel" | "zero_sentinel" => Some(Self::ZeroSentinel),
            "exclude" | "exclude-absent" | "exclude_absent" => Some(Self::ExcludeAbsent),
            _ => None,
        }
    }

    fn arrival_ids(self, record: &DeliveryRecord) -> Option<(WarehouseId, UnitId)> {
        match (&record.arrival, self) {
            (Some(arrival), _) => Some((arrival.warehouse_id(), arrival.unit_id())),
            (None, Self::ZeroSentinel) => Some((WarehouseId::default(), UnitId::default())),
            (None, Self::ExcludeAbsent) => None,
        }
    }
}

/// Number of delivery units a warehouse has received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarehouseDeliveryCount {
    /// The warehouse.
    pub warehouse_id: WarehouseId,
    /// Units whose latest arrival names this warehouse.
    pub delivery_units_number: u64,
}

/// Aggregate statistics over every tracked unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Number of tracked units.
    pub delivery_units_total_number: u64,
    /// Distinct warehouses named by any arrival, ascending.
    #[serde(rename = "warehouses_received_supplies_list")]
    pub warehouses_received_supplies: Vec<WarehouseId>,
    /// One unit id per counted record, ascending.
    pub delivery_units_reached_destination: Vec<UnitId>,
    /// Per-warehouse unit counts, ascending by warehouse.
    #[serde(rename = "delivery_units_each_warehouse_received_total_number")]
    pub warehouse_deliveries: Vec<WarehouseDeliveryCount>,
    /// When the snapshot was folded.
    pub generated_at: DateTime<Utc>,
}

impl DeliveryReport {
    /// Folds a snapshot of records into a report.
    #[must_use]
    pub fn from_records(
        records: &[DeliveryRecord],
        accounting: ArrivalAccounting,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut per_warehouse: BTreeMap<WarehouseId, u64> = BTreeMap::new();
        let mut reached = Vec::with_capacity(records.len());

        for record in records {
            let Some((warehouse_id, unit_id)) = accounting.arrival_ids(record) else {
                continue;
            };
            *per_warehouse.entry(warehouse_id).or_insert(0) += 1;
            reached.push(unit_id);
        }
        reached.sort_unstable();

        Self {
            delivery_units_total_number: records.len() as u64,
            warehouses_received_supplies: per_warehouse.keys().copied().collect(),
            delivery_units_reached_destination: reached,
            warehouse_deliveries: per_warehouse
                .into_iter()
                .map(|(warehouse_id, delivery_units_number)| WarehouseDeliveryCount {
                    warehouse_id,
                    delivery_units_number,
                })
                .collect(),
            generated_at,
        }
    }

    /// Units counted for `warehouse`, or 0 if it received none.
    #[must_use]
    pub fn deliveries_to(&self, warehouse: WarehouseId) -> u64 {
        self.warehouse_deliveries
            .iter()
            .find(|c| c.warehouse_id == warehouse)
            .map_or(0, |c| c.delivery_units_number)
    }
}
