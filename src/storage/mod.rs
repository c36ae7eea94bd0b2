//! Storage layer for delivery records.
//!
//! [`DeliveryStore`] defines the contract; [`InMemoryDeliveryStore`] is the
//! volatile backend used by the engine and the server.

mod memory;
mod traits;

pub use memory::InMemoryDeliveryStore;
pub use traits::{DeliveryStore, StorageError, UpsertOutcome};
