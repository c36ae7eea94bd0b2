//! Identifiers for tracked cargo units and warehouses.
//!
//! Both identifiers are plain 64-bit integers on the wire. They are wrapped in
//! newtypes so a warehouse id can never be passed where a unit id is expected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a cargo unit.
///
/// The same identifier keys the unit's [`DeliveryRecord`](crate::DeliveryRecord):
/// there is exactly one record per unit.
///
/// # Examples
///
/// ```
/// use cargotrack::UnitId;
///
/// let id = UnitId::new(42);
/// assert_eq!(id.get(), 42);
/// assert!(!id.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(i64);

impl UnitId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true for the zero id, which reports use as the "no arrival" sentinel.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for UnitId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<UnitId> for i64 {
    fn from(id: UnitId) -> Self {
        id.0
    }
}

/// Identifier of a warehouse receiving cargo units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarehouseId(i64);

impl WarehouseId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }

    /// Returns true for the zero id.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for WarehouseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for WarehouseId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

impl From<WarehouseId> for i64 {
    fn from(id: WarehouseId) -> Self {
        id.0
    }
}
