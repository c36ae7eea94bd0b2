//! In-memory storage backend.
//!
//! Records live in a sharded concurrent map: each key is guarded by its
//! shard's lock, so writers to different units rarely contend and never wait
//! on each other's merge logic. Nothing survives a restart.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::record::DeliveryRecord;
use crate::storage::traits::{DeliveryStore, StorageError, UpsertOutcome};
use crate::unit::UnitId;

/// Thread-safe in-memory delivery record store.
#[derive(Debug, Default)]
pub struct InMemoryDeliveryStore {
    records: DashMap<UnitId, DeliveryRecord>,
}

impl InMemoryDeliveryStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store pre-sized for `capacity` units.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: DashMap::with_capacity(capacity),
        }
    }
}

impl DeliveryStore for InMemoryDeliveryStore {
    fn create(&self, record: DeliveryRecord) -> Result<DeliveryRecord, StorageError> {
        match self.records.entry(record.id) {
            Entry::Occupied(_) => Err(StorageError::AlreadyExists(record.id)),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    fn update(&self, record: DeliveryRecord) -> Result<(), StorageError> {
        let Some(mut stored) = self.records.get_mut(&record.id) else {
            return Err(StorageError::NotFound(record.id));
        };
        *stored = record;
        Ok(())
    }

    fn get_by_id(&self, id: UnitId) -> Result<DeliveryRecord, StorageError> {
        self.records
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or(StorageError::NotFound(id))
    }

    fn get_all(&self) -> Result<Vec<DeliveryRecord>, StorageError> {
        Ok(self.records.iter().map(|r| r.value().clone()).collect())
    }

    fn delete(&self, id: UnitId) -> Result<(), StorageError> {
        self.records
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound(id))
    }

    fn upsert_with(
        &self,
        record: DeliveryRecord,
        merge: &mut dyn FnMut(&mut DeliveryRecord),
    ) -> Result<UpsertOutcome, StorageError> {
        match self.records.entry(record.id) {
            Entry::Occupied(mut stored) => {
                merge(stored.get_mut());
                Ok(UpsertOutcome::Merged)
            }
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(UpsertOutcome::Created)
            }
        }
    }

    fn len(&self) -> Result<usize, StorageError> {
        Ok(self.records.len())
    }
}
