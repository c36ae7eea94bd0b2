//! Abstract storage trait for delivery records.
//!
//! The engine only talks to storage through [`DeliveryStore`], so backends can
//! be swapped without touching the merge or aggregation logic.

use thiserror::Error;

use crate::record::DeliveryRecord;
use crate::unit::UnitId;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// No record exists for the unit.
    #[error("Delivery record not found: {0}")]
    NotFound(UnitId),

    /// A record already exists for the unit.
    #[error("Delivery record already exists: {0}")]
    AlreadyExists(UnitId),

    /// The bulk snapshot read failed.
    #[error("Snapshot read failed: {0}")]
    SnapshotRead(String),

    /// Backend error.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result of [`DeliveryStore::upsert_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record existed; the given record was inserted.
    Created,
    /// A record existed and the merge function was applied to it.
    Merged,
}

/// Storage trait for delivery records, keyed by unit id.
///
/// # Safety Considerations
/// - Every operation is atomic with respect to the others on the same key
/// - Operations on different keys never wait on each other's merge logic;
///   a sharded backend may still briefly serialize keys that share a shard
/// - `get_all` need not be linearizable with concurrent writes
pub trait DeliveryStore: Send + Sync {
    /// Insert a new record. Returns `AlreadyExists` if the id is taken.
    fn create(&self, record: DeliveryRecord) -> Result<DeliveryRecord, StorageError>;

    /// Replace an existing record. Returns `NotFound` if the id is absent.
    fn update(&self, record: DeliveryRecord) -> Result<(), StorageError>;

    /// Get a record by unit id. Returns `NotFound` if absent.
    fn get_by_id(&self, id: UnitId) -> Result<DeliveryRecord, StorageError>;

    /// Snapshot of every stored record, in unspecified order.
    fn get_all(&self) -> Result<Vec<DeliveryRecord>, StorageError>;

    /// Delete a record by unit id. Returns `NotFound` if absent.
    fn delete(&self, id: UnitId) -> Result<(), StorageError>;

    /// Insert `record` if its id is absent, otherwise apply `merge` to the
    /// stored record. The existence check and the merge happen under one
    /// per-key critical section, so concurrent upserts never lose updates.
    fn upsert_with(
        &self,
        record: DeliveryRecord,
        merge: &mut dyn FnMut(&mut DeliveryRecord),
    ) -> Result<UpsertOutcome, StorageError>;

    /// Number of stored records.
    fn len(&self) -> Result<usize, StorageError>;

    /// Returns true if no record is stored.
    fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}
