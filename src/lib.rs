//! # Cargotrack - concurrent cargo unit tracking
//!
//! Cargotrack keeps one delivery record per cargo unit in memory, merges
//! position updates and warehouse arrivals into it as they stream in, and
//! folds the whole collection into an aggregate delivery report on demand.
//!
//! ## Core Concepts
//!
//! - **Unit**: a cargo item, identified by a 64-bit integer
//! - **Trail**: the ordered positions a unit has reported
//! - **Arrival**: the latest warehouse a unit was announced at
//! - **Report**: totals and per-warehouse counts over every record
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cargotrack::{
//!     InMemoryDeliveryStore, Position, TrackingEngine, UnitId, WarehouseArrivalNotice, WarehouseId,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! let engine = TrackingEngine::new(Arc::new(InMemoryDeliveryStore::new()));
//! let cancel = CancellationToken::new();
//!
//! engine.record_position(&cancel, UnitId::new(7), Position::new(10, 20));
//! engine.record_arrival(
//!     &cancel,
//!     Position::new(11, 21),
//!     WarehouseArrivalNotice::new(UnitId::new(7), WarehouseId::new(3), "unloaded"),
//! );
//!
//! let report = engine.compute_report(&cancel)?;
//! assert_eq!(report.delivery_units_total_number, 1);
//! assert_eq!(report.deliveries_to(WarehouseId::new(3)), 1);
//! # Ok::<(), cargotrack::TrackingError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Core types
pub mod arrival;
pub mod error;
pub mod position;
pub mod record;
pub mod report;
pub mod unit;

// Storage and engine
pub mod engine;
pub mod storage;

// Runtime wiring
pub mod config;
pub mod logging;

#[cfg(feature = "transport-grpc")]
pub mod transport;

// Re-export primary types at crate root for convenience
pub use arrival::{ArrivalState, WarehouseArrivalNotice};
pub use error::{TrackingError, TrackingResult};
pub use position::Position;
pub use record::{DeliveryRecord, MovementTrail};
pub use report::{ArrivalAccounting, DeliveryReport, WarehouseDeliveryCount};
pub use unit::{UnitId, WarehouseId};

pub use engine::{DropReason, EngineConfig, IngestOutcome, MergeStrategy, TrackingEngine};
pub use storage::{DeliveryStore, InMemoryDeliveryStore, StorageError, UpsertOutcome};

pub use config::{ConfigError, ServerConfig};
pub use logging::{init_logger, LogProfile};
