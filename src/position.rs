//! Geographic position of a cargo unit.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair on the tracking grid.
///
/// Coordinates are unsigned and unvalidated: any pair of `u32` values is a
/// valid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    /// Latitude on the grid.
    pub latitude: u32,
    /// Longitude on the grid.
    pub longitude: u32,
}

impl Position {
    /// Creates a position.
    #[must_use]
    pub const fn new(latitude: u32, longitude: u32) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// The zero position, used when a request carries no location.
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude, self.longitude)
    }
}
