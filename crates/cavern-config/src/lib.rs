//! Cavern Configuration Layer
//!
//! Configuration for storage facilities: ratchet profiles, per-period
//! inventory loss, and dated ratchet schedules. Configurations are read from
//! JSON or TOML and turn into constraints from `cavern-storage`.
//!
//! # Example
//!
//! ```rust
//! use cavern_config::{ConfigManager, StorageFacilityConfig};
//! use cavern_storage::InjectWithdrawConstraint;
//!
//! let config = StorageFacilityConfig::from_json_str(r#"{
//!     "name": "HUMBLY.GROVE",
//!     "inventory_percent_loss": 0.001,
//!     "ratchets": {
//!         "type": "piecewise_linear",
//!         "points": [
//!             { "inventory": 0.0, "min_rate": -20.0, "max_rate": 60.0 },
//!             { "inventory": 1000.0, "min_rate": -80.0, "max_rate": 30.0 }
//!         ]
//!     }
//! }"#).unwrap();
//!
//! let manager = ConfigManager::new();
//! manager.register(config).unwrap();
//!
//! let constraint = manager.constraint_for("HUMBLY.GROVE").unwrap();
//! let range = constraint.inject_withdraw_range(500.0).unwrap();
//! assert_eq!(range.max_rate(), 45.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod facility;
mod manager;

pub use error::{ConfigError, ConfigResult, Validate, ValidationError};
pub use facility::{RatchetPoint, RatchetProfile, ScheduledRatchets, StorageFacilityConfig};
pub use manager::ConfigManager;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{ConfigError, ConfigResult, Validate};
    pub use crate::facility::{RatchetProfile, StorageFacilityConfig};
    pub use crate::manager::ConfigManager;
}
