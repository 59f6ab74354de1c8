//! # Cavern Storage
//!
//! Inventory-dependent inject/withdraw constraints for commodity storage
//! valuation.
//!
//! This crate provides:
//!
//! - **Types**: Rate ranges, inventory intervals, and inventory-rate samples
//! - **Constraints**: The [`InjectWithdrawConstraint`] capability with
//!   piecewise-linear and constant-rate implementations
//! - **Bound Search**: Reachable upper and lower inventory bounds between
//!   consecutive periods, accounting for per-period inventory loss
//! - **Schedules**: Date-keyed constraints for seasonal ratchets
//!
//! ## Quick Start
//!
//! ```rust
//! use cavern_storage::prelude::*;
//!
//! // Withdrawal capacity grows with inventory, injection shrinks.
//! let ratchets = PiecewiseLinearConstraint::from_rates(&[
//!     (0.0, -20.0, 60.0),
//!     (400.0, -40.0, 50.0),
//!     (1000.0, -80.0, 30.0),
//! ])
//! .unwrap();
//!
//! let next_period = InventoryRange::new(0.0, 700.0).unwrap();
//! let current_period = InventoryRange::new(0.0, 1000.0).unwrap();
//!
//! let upper = ratchets
//!     .inventory_space_upper_bound(next_period, current_period, 0.0)
//!     .unwrap();
//! let lower = ratchets
//!     .inventory_space_lower_bound(next_period, current_period, 0.0)
//!     .unwrap();
//! assert!(lower <= upper && upper < 1000.0);
//! ```
//!
//! ## Infeasibility
//!
//! When no current inventory can reach next period's feasible space the bound
//! searches return [`StorageError::ConstraintsCannotBeSatisfied`]. Retrying
//! cannot change the outcome; callers treat it as a configuration problem.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)]
#![allow(clippy::uninlined_format_args)]

pub mod constraints;
pub mod error;
pub mod schedule;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::constraints::{
        ConstantRateConstraint, InjectWithdrawConstraint, PiecewiseLinearConstraint,
    };
    pub use crate::error::{StorageError, StorageResult};
    pub use crate::schedule::ConstraintSchedule;
    pub use crate::types::{InjectWithdrawRange, InventoryRange, InventoryRateSample};
}

pub use constraints::{ConstantRateConstraint, InjectWithdrawConstraint, PiecewiseLinearConstraint};
pub use error::{StorageError, StorageResult};
pub use schedule::ConstraintSchedule;
pub use types::{InjectWithdrawRange, InventoryRange, InventoryRateSample};
