//! Inventory-rate sample.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ensure_finite, StorageError, StorageResult};
use crate::types::InjectWithdrawRange;

/// The inject/withdraw rate range available at one inventory level.
///
/// A set of samples describes a ratchet profile: how the allowed rates vary
/// with the amount of commodity in storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InventoryRateSample {
    inventory: f64,
    rate_range: InjectWithdrawRange,
}

impl InventoryRateSample {
    /// Creates a sample.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if `inventory` is negative or not finite.
    pub fn new(inventory: f64, rate_range: InjectWithdrawRange) -> StorageResult<Self> {
        ensure_finite("inventory", inventory)?;
        if inventory < 0.0 {
            return Err(StorageError::invalid_argument(format!(
                "sample inventory must be non-negative, got {}",
                inventory
            )));
        }
        Ok(Self {
            inventory,
            rate_range,
        })
    }

    /// Creates a sample from raw rate bounds.
    pub fn from_rates(inventory: f64, min_rate: f64, max_rate: f64) -> StorageResult<Self> {
        Self::new(inventory, InjectWithdrawRange::new(min_rate, max_rate)?)
    }

    /// Inventory level.
    pub fn inventory(&self) -> f64 {
        self.inventory
    }

    /// Rate range at this inventory.
    pub fn rate_range(&self) -> InjectWithdrawRange {
        self.rate_range
    }
}

impl<'de> Deserialize<'de> for InventoryRateSample {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct InventoryRateSampleData {
            inventory: f64,
            rate_range: InjectWithdrawRange,
        }

        let data = InventoryRateSampleData::deserialize(deserializer)?;
        Self::new(data.inventory, data.rate_range).map_err(serde::de::Error::custom)
    }
}
