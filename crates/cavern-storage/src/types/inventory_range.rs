//! Closed inventory interval.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{ensure_finite, StorageError, StorageResult};

/// Closed interval `[min, max]` of inventory levels.
///
/// Used both for the feasible inventory space of a period and for the set of
/// inventories reachable from a given starting point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InventoryRange {
    min: f64,
    max: f64,
}

impl InventoryRange {
    /// Creates a new inventory interval.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if a bound is not finite or
    /// if `min > max`.
    pub fn new(min: f64, max: f64) -> StorageResult<Self> {
        ensure_finite("inventory range min", min)?;
        ensure_finite("inventory range max", max)?;
        if min > max {
            return Err(StorageError::invalid_argument(format!(
                "inventory range min {} exceeds max {}",
                min, max
            )));
        }
        Ok(Self { min, max })
    }

    /// Builds an interval from bounds already known to be finite and ordered.
    pub(crate) fn from_ordered(min: f64, max: f64) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns true if `inventory` lies in the interval.
    pub fn contains(&self, inventory: f64) -> bool {
        self.min <= inventory && inventory <= self.max
    }

    /// Returns true if the two closed intervals share at least one point.
    pub fn overlaps(&self, other: &InventoryRange) -> bool {
        self.min <= other.max && other.min <= self.max
    }
}

impl fmt::Display for InventoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

impl<'de> Deserialize<'de> for InventoryRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct InventoryRangeData {
            min: f64,
            max: f64,
        }

        let data = InventoryRangeData::deserialize(deserializer)?;
        Self::new(data.min, data.max).map_err(serde::de::Error::custom)
    }
}
