//! Inventory-independent ratchets.

use tracing::{debug, warn};

use super::{reachable_from, retention_factor, InjectWithdrawConstraint};
use crate::error::{ensure_finite, StorageError, StorageResult};
use crate::types::{InjectWithdrawRange, InventoryRange};

/// Inject/withdraw constraint whose rate range does not depend on inventory.
///
/// With constant rates the reachable-after-action value is a straight line in
/// inventory, so both bound searches are solved in closed form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRateConstraint {
    range: InjectWithdrawRange,
}

impl ConstantRateConstraint {
    /// Creates a constraint from the max withdrawal (negative) and max injection.
    pub fn new(min_rate: f64, max_rate: f64) -> StorageResult<Self> {
        Ok(Self::from_range(InjectWithdrawRange::new(min_rate, max_rate)?))
    }

    /// Creates a constraint from a rate range.
    pub fn from_range(range: InjectWithdrawRange) -> Self {
        Self { range }
    }

    /// The constant rate range.
    pub fn range(&self) -> InjectWithdrawRange {
        self.range
    }
}

impl InjectWithdrawConstraint for ConstantRateConstraint {
    fn inject_withdraw_range(&self, inventory: f64) -> StorageResult<InjectWithdrawRange> {
        ensure_finite("inventory", inventory)?;
        Ok(self.range)
    }

    fn inventory_space_upper_bound(
        &self,
        next_period_space: InventoryRange,
        current_period: InventoryRange,
        inventory_percent_loss: f64,
    ) -> StorageResult<f64> {
        let retention = retention_factor(inventory_percent_loss)?;
        let top = current_period.max();
        if reachable_from(top, retention, self.range).overlaps(&next_period_space) {
            debug!(inventory = top, "upper bound reached from current maximum");
            return Ok(top);
        }

        let target = next_period_space.max();
        let infeasible = || {
            warn!(next_bound = target, current = %current_period, "constant ratchets cannot reach next period space");
            StorageError::cannot_be_satisfied(target, current_period.min(), current_period.max())
        };
        if retention == 0.0 {
            // Everything is lost, reachable space no longer depends on inventory.
            return Err(infeasible());
        }

        let inventory = ((target - self.range.min_rate()) / retention).min(top);
        if inventory < current_period.min()
            || inventory * retention + self.range.max_rate() < next_period_space.min()
        {
            return Err(infeasible());
        }
        Ok(inventory)
    }

    fn inventory_space_lower_bound(
        &self,
        next_period_space: InventoryRange,
        current_period: InventoryRange,
        inventory_percent_loss: f64,
    ) -> StorageResult<f64> {
        let retention = retention_factor(inventory_percent_loss)?;
        let bottom = current_period.min();
        if reachable_from(bottom, retention, self.range).overlaps(&next_period_space) {
            debug!(inventory = bottom, "lower bound reached from current minimum");
            return Ok(bottom);
        }

        let target = next_period_space.min();
        let infeasible = || {
            warn!(next_bound = target, current = %current_period, "constant ratchets cannot reach next period space");
            StorageError::cannot_be_satisfied(target, current_period.min(), current_period.max())
        };
        if retention == 0.0 {
            return Err(infeasible());
        }

        let inventory = ((target - self.range.max_rate()) / retention).max(bottom);
        if inventory > current_period.max()
            || inventory * retention + self.range.min_rate() > next_period_space.max()
        {
            return Err(infeasible());
        }
        Ok(inventory)
    }
}
