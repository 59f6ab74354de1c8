//! Inject/withdraw constraint capability.
//!
//! A valuation engine stepping backwards through storage periods needs three
//! answers from a facility's ratchets:
//!
//! - the rate range available at a given inventory,
//! - the largest current inventory from which next period's feasible space
//!   is still reachable,
//! - the smallest such inventory.
//!
//! [`InjectWithdrawConstraint`] exposes exactly these, so the engine can hold
//! an `Arc<dyn InjectWithdrawConstraint>` without knowing whether the
//! ratchets are constant ([`ConstantRateConstraint`]) or inventory dependent
//! ([`PiecewiseLinearConstraint`]).
//!
//! # Reachability
//!
//! Inventory `x` held this period becomes `x * (1 - loss) + rate` next
//! period, where `loss` is the fraction of inventory lost per period and
//! `rate` is any value of the rate range at `x`.

mod bracket;
mod constant;
mod piecewise_linear;

pub use constant::ConstantRateConstraint;
pub use piecewise_linear::PiecewiseLinearConstraint;

use crate::error::{ensure_finite, StorageError, StorageResult};
use crate::types::{InjectWithdrawRange, InventoryRange};

/// Inventory-dependent inject/withdraw constraint.
///
/// Implementations are immutable after construction and may be shared
/// across threads.
pub trait InjectWithdrawConstraint: Send + Sync {
    /// Returns the rate range available when holding `inventory`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if `inventory` is not finite.
    fn inject_withdraw_range(&self, inventory: f64) -> StorageResult<InjectWithdrawRange>;

    /// Returns the largest current-period inventory in `current_period` from
    /// which some allowed action lands in `next_period_space`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ConstraintsCannotBeSatisfied`] if no inventory
    /// in `current_period` can reach `next_period_space`, and
    /// [`StorageError::InvalidArgument`] for an invalid loss factor.
    fn inventory_space_upper_bound(
        &self,
        next_period_space: InventoryRange,
        current_period: InventoryRange,
        inventory_percent_loss: f64,
    ) -> StorageResult<f64>;

    /// Returns the smallest current-period inventory in `current_period` from
    /// which some allowed action lands in `next_period_space`.
    ///
    /// # Errors
    ///
    /// Same as [`inventory_space_upper_bound`](Self::inventory_space_upper_bound).
    fn inventory_space_lower_bound(
        &self,
        next_period_space: InventoryRange,
        current_period: InventoryRange,
        inventory_percent_loss: f64,
    ) -> StorageResult<f64>;

    /// Returns the next-period inventories reachable from `inventory`.
    fn reachable_inventory(
        &self,
        inventory: f64,
        inventory_percent_loss: f64,
    ) -> StorageResult<InventoryRange> {
        let retention = retention_factor(inventory_percent_loss)?;
        let range = self.inject_withdraw_range(inventory)?;
        Ok(reachable_from(inventory, retention, range))
    }
}

/// Converts a per-period loss fraction into the retained fraction `1 - loss`.
pub(crate) fn retention_factor(inventory_percent_loss: f64) -> StorageResult<f64> {
    ensure_finite("inventory_percent_loss", inventory_percent_loss)?;
    if !(0.0..=1.0).contains(&inventory_percent_loss) {
        return Err(StorageError::invalid_argument(format!(
            "inventory_percent_loss must be in [0, 1], got {}",
            inventory_percent_loss
        )));
    }
    Ok(1.0 - inventory_percent_loss)
}

/// Next-period interval reached from `inventory` under `range`.
pub(crate) fn reachable_from(
    inventory: f64,
    retention: f64,
    range: InjectWithdrawRange,
) -> InventoryRange {
    let retained = inventory * retention;
    InventoryRange::from_ordered(retained + range.min_rate(), retained + range.max_rate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_retention_factor() {
        assert_relative_eq!(retention_factor(0.0).unwrap(), 1.0);
        assert_relative_eq!(retention_factor(0.02).unwrap(), 0.98);
        assert_relative_eq!(retention_factor(1.0).unwrap(), 0.0);
        assert!(retention_factor(-0.1).is_err());
        assert!(retention_factor(1.5).is_err());
        assert!(retention_factor(f64::NAN).is_err());
    }

    #[test]
    fn test_reachable_from() {
        let range = InjectWithdrawRange::new(-20.0, 10.0).unwrap();
        let reach = reachable_from(100.0, 0.9, range);
        assert_relative_eq!(reach.min(), 70.0);
        assert_relative_eq!(reach.max(), 100.0);
    }

    #[test]
    fn test_trait_object_usable() {
        let constraints: Vec<Box<dyn InjectWithdrawConstraint>> = vec![
            Box::new(ConstantRateConstraint::new(-10.0, 10.0).unwrap()),
            Box::new(
                PiecewiseLinearConstraint::from_rates(&[(0.0, -10.0, 10.0), (100.0, -10.0, 10.0)])
                    .unwrap(),
            ),
        ];

        for constraint in &constraints {
            let reach = constraint.reachable_inventory(50.0, 0.0).unwrap();
            assert_relative_eq!(reach.min(), 40.0);
            assert_relative_eq!(reach.max(), 60.0);
        }
    }
}
