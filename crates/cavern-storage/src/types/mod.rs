//! Domain types for storage constraints.
//!
//! - [`InjectWithdrawRange`]: Signed rate range, withdrawal negative, injection positive
//! - [`InventoryRange`]: Closed interval of inventory levels
//! - [`InventoryRateSample`]: Rate range observed at one inventory level

mod inventory_range;
mod rate_range;
mod sample;

pub use inventory_range::InventoryRange;
pub use rate_range::InjectWithdrawRange;
pub use sample::InventoryRateSample;
