//! Tracking engine.
//!
//! The engine turns inbound events into store mutations and folds store
//! snapshots into reports. It holds no state of its own besides a shared
//! handle to the store, so a single instance can be cloned across threads.
//!
//! Event ingestion never fails from the caller's point of view: the first
//! event for a unit creates its record, later events merge into it, and any
//! failure along the way is logged and reported as
//! [`IngestOutcome::Dropped`] rather than as an error.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, warn};

use crate::arrival::{ArrivalState, WarehouseArrivalNotice};
use crate::error::{TrackingError, TrackingResult};
use crate::position::Position;
use crate::record::DeliveryRecord;
use crate::report::{ArrivalAccounting, DeliveryReport};
use crate::storage::{DeliveryStore, StorageError, UpsertOutcome};
use crate::unit::UnitId;

/// How an event is merged into an existing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MergeStrategy {
    /// Existence check and merge run in one per-key critical section.
    #[default]
    Atomic,
    /// `create`, then on conflict `get_by_id` + merge + `update`.
    ///
    /// Concurrent events for the same unit can read the same prior record,
    /// and the last `update` silently discards the other merges.
    CreateThenMerge,
}

impl MergeStrategy {
    /// Parses `atomic` / `create-then-merge`.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Some(Self::Atomic),
            "create-then-merge" | "create_then_merge" | "legacy" => Some(Self::CreateThenMerge),
            _ => None,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EngineConfig {
    /// Merge protocol for events on existing records.
    pub merge_strategy: MergeStrategy,
    /// Report treatment of units that never arrived anywhere.
    pub arrival_accounting: ArrivalAccounting,
}

/// Why an acknowledged event did not reach the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// The caller cancelled before the event was applied.
    Cancelled,
    /// A store operation on the merge path failed.
    Storage(StorageError),
}

/// Acknowledgment returned for every ingested event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The event created the unit's record.
    Created,
    /// The event was merged into the unit's existing record.
    Merged,
    /// The event was acknowledged but not applied.
    Dropped(DropReason),
}

impl IngestOutcome {
    /// Returns true if the event reached the store.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Created | Self::Merged)
    }

    /// Returns true if the event was acknowledged without being applied.
    #[must_use]
    pub const fn is_dropped(&self) -> bool {
        matches!(self, Self::Dropped(_))
    }
}

impl From<UpsertOutcome> for IngestOutcome {
    fn from(outcome: UpsertOutcome) -> Self {
        match outcome {
            UpsertOutcome::Created => Self::Created,
            UpsertOutcome::Merged => Self::Merged,
        }
    }
}

/// Cargo tracking engine.
#[derive(Clone)]
pub struct TrackingEngine {
    store: Arc<dyn DeliveryStore>,
    config: EngineConfig,
}

impl TrackingEngine {
    /// Create a new engine with the default configuration.
    #[must_use]
    pub fn new(store: Arc<dyn DeliveryStore>) -> Self {
        Self::with_config(store, EngineConfig::default())
    }

    /// Create a new engine with an explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<dyn DeliveryStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Get a reference to the record store.
    pub fn store(&self) -> &Arc<dyn DeliveryStore> {
        &self.store
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Records a position update for `unit_id`.
    ///
    /// Creates the unit's record with a one-entry trail, or appends the
    /// position to the existing trail. The arrival is never touched.
    pub fn record_position(
        &self,
        cancel: &CancellationToken,
        unit_id: UnitId,
        position: Position,
    ) -> IngestOutcome {
        let span = info_span!("record_position", unit_id = %unit_id);
        let _enter = span.enter();

        info!(%position, "recording position update");
        let fresh = DeliveryRecord::from_position(unit_id, position);
        self.ingest(cancel, fresh, |existing| existing.append_position(position))
    }

    /// Records the arrival of `notice.unit_id` at `notice.warehouse_id`.
    ///
    /// Creates the unit's record with an empty trail, or replaces the
    /// existing arrival entirely. The trail is never touched.
    pub fn record_arrival(
        &self,
        cancel: &CancellationToken,
        position: Position,
        notice: WarehouseArrivalNotice,
    ) -> IngestOutcome {
        let span = info_span!(
            "record_arrival",
            unit_id = %notice.unit_id,
            warehouse_id = %notice.warehouse_id
        );
        let _enter = span.enter();

        info!(%position, "recording warehouse arrival");
        let arrival = ArrivalState::new(position, notice.clone());
        let fresh = DeliveryRecord::from_arrival(position, notice);
        self.ingest(cancel, fresh, |existing| existing.replace_arrival(arrival.clone()))
    }

    /// Folds a snapshot of every record into a delivery report.
    ///
    /// # Errors
    /// - `Storage`: the snapshot read failed
    /// - `Cancelled`: `cancel` fired before the report was produced
    pub fn compute_report(&self, cancel: &CancellationToken) -> TrackingResult<DeliveryReport> {
        const OPERATION: &str = "compute_report";
        let span = info_span!("compute_report");
        let _enter = span.enter();

        info!("computing delivery report");
        if cancel.is_cancelled() {
            return Err(TrackingError::cancelled(OPERATION));
        }

        let records = self.store.get_all().map_err(|err| {
            error!(error = %err, "failed to read delivery snapshot");
            err
        })?;

        if cancel.is_cancelled() {
            return Err(TrackingError::cancelled(OPERATION));
        }

        let report = DeliveryReport::from_records(&records, self.config.arrival_accounting, Utc::now());
        debug!(
            total = report.delivery_units_total_number,
            warehouses = report.warehouses_received_supplies.len(),
            "delivery report computed"
        );
        Ok(report)
    }

    fn ingest<F>(&self, cancel: &CancellationToken, fresh: DeliveryRecord, mut merge: F) -> IngestOutcome
    where
        F: FnMut(&mut DeliveryRecord),
    {
        if cancel.is_cancelled() {
            warn!("event cancelled before reaching the store");
            return IngestOutcome::Dropped(DropReason::Cancelled);
        }

        let result = match self.config.merge_strategy {
            MergeStrategy::Atomic => self.store.upsert_with(fresh, &mut merge).map(IngestOutcome::from),
            MergeStrategy::CreateThenMerge => self.create_then_merge(cancel, fresh, &mut merge),
        };

        match result {
            Ok(outcome) => outcome,
            Err(err) => {
                warn!(error = %err, "failed to merge event, dropping it");
                IngestOutcome::Dropped(DropReason::Storage(err))
            }
        }
    }

    fn create_then_merge(
        &self,
        cancel: &CancellationToken,
        fresh: DeliveryRecord,
        merge: &mut dyn FnMut(&mut DeliveryRecord),
    ) -> Result<IngestOutcome, StorageError> {
        let id = fresh.id;
        match self.store.create(fresh) {
            Ok(_) => return Ok(IngestOutcome::Created),
            Err(StorageError::AlreadyExists(_)) => {
                warn!("delivery record already exists, merging event into it");
            }
            Err(err) => return Err(err),
        }

        if cancel.is_cancelled() {
            warn!("event cancelled before merge");
            return Ok(IngestOutcome::Dropped(DropReason::Cancelled));
        }
        let mut existing = self.store.get_by_id(id)?;
        merge(&mut existing);

        if cancel.is_cancelled() {
            warn!("event cancelled before write-back");
            return Ok(IngestOutcome::Dropped(DropReason::Cancelled));
        }
        self.store.update(existing)?;
        Ok(IngestOutcome::Merged)
    }
}
