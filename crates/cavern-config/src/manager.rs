//! Facility configuration registry.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, RwLock};

use cavern_storage::{ConstraintSchedule, InjectWithdrawConstraint};
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult, Validate};
use crate::facility::StorageFacilityConfig;

/// Thread-safe registry of storage facility configurations, keyed by name.
///
/// # Example
///
/// ```rust
/// use cavern_config::{ConfigManager, RatchetProfile, StorageFacilityConfig};
/// use cavern_storage::InjectWithdrawConstraint;
///
/// let manager = ConfigManager::new();
/// manager
///     .register(StorageFacilityConfig::new(
///         "TANK.FARM",
///         RatchetProfile::Constant { min_rate: -10.0, max_rate: 10.0 },
///     ))
///     .unwrap();
///
/// let constraint = manager.constraint_for("TANK.FARM").unwrap();
/// assert_eq!(constraint.inject_withdraw_range(50.0).unwrap().max_rate(), 10.0);
/// ```
#[derive(Debug, Default)]
pub struct ConfigManager {
    facilities: RwLock<HashMap<String, StorageFacilityConfig>>,
}

fn lock_error(e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Conflict(format!("Lock error: {}", e))
}

impl ConfigManager {
    /// Creates an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and registers a configuration, replacing any with the same name.
    ///
    /// Returns the configuration previously registered under that name.
    pub fn register(
        &self,
        config: StorageFacilityConfig,
    ) -> ConfigResult<Option<StorageFacilityConfig>> {
        config.validate_or_error()?;

        let mut facilities = self.facilities.write().map_err(lock_error)?;
        debug!(facility = %config.name, "registering storage facility");
        Ok(facilities.insert(config.name.clone(), config))
    }

    /// Loads a configuration file and registers it. Returns the registered name.
    pub fn load_file(&self, path: impl AsRef<Path>) -> ConfigResult<String> {
        let config = StorageFacilityConfig::from_file(path)?;
        let name = config.name.clone();
        if self.register(config)?.is_some() {
            info!(facility = %name, "replaced storage facility configuration");
        }
        Ok(name)
    }

    /// Gets a configuration by name.
    pub fn get(&self, name: &str) -> ConfigResult<StorageFacilityConfig> {
        let facilities = self.facilities.read().map_err(lock_error)?;

        facilities.get(name).cloned().ok_or_else(|| ConfigError::NotFound {
            key: name.to_string(),
        })
    }

    /// Lists registered names in sorted order.
    pub fn list(&self) -> ConfigResult<Vec<String>> {
        let facilities = self.facilities.read().map_err(lock_error)?;

        let mut names: Vec<String> = facilities.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Removes a configuration. Returns whether one was registered.
    pub fn remove(&self, name: &str) -> ConfigResult<bool> {
        let mut facilities = self.facilities.write().map_err(lock_error)?;
        Ok(facilities.remove(name).is_some())
    }

    /// Builds the base ratchet constraint of a registered facility.
    pub fn constraint_for(&self, name: &str) -> ConfigResult<Arc<dyn InjectWithdrawConstraint>> {
        self.get(name)?.build_constraint()
    }

    /// Builds the dated constraint schedule of a registered facility.
    pub fn schedule_for(&self, name: &str) -> ConfigResult<ConstraintSchedule> {
        self.get(name)?.build_schedule()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::RatchetProfile;

    fn flat(name: &str, max_rate: f64) -> StorageFacilityConfig {
        StorageFacilityConfig::new(
            name,
            RatchetProfile::Constant {
                min_rate: -max_rate,
                max_rate,
            },
        )
    }

    #[test]
    fn test_register_and_get() {
        let manager = ConfigManager::new();
        assert!(manager.register(flat("B", 1.0)).unwrap().is_none());
        assert!(manager.register(flat("A", 2.0)).unwrap().is_none());

        assert_eq!(manager.list().unwrap(), vec!["A", "B"]);
        assert_eq!(manager.get("A").unwrap(), flat("A", 2.0));

        let replaced = manager.register(flat("A", 3.0)).unwrap();
        assert_eq!(replaced, Some(flat("A", 2.0)));
    }

    #[test]
    fn test_not_found() {
        let manager = ConfigManager::new();
        assert!(matches!(
            manager.get("MISSING"),
            Err(ConfigError::NotFound { ref key }) if key == "MISSING"
        ));
        assert!(manager.constraint_for("MISSING").is_err());
    }

    #[test]
    fn test_register_rejects_invalid() {
        let manager = ConfigManager::new();
        let bad = flat("BAD", 1.0).with_inventory_percent_loss(-0.1);
        assert!(manager.register(bad).is_err());
        assert!(manager.list().unwrap().is_empty());
    }

    #[test]
    fn test_remove() {
        let manager = ConfigManager::new();
        manager.register(flat("A", 1.0)).unwrap();
        assert!(manager.remove("A").unwrap());
        assert!(!manager.remove("A").unwrap());
    }

    #[test]
    fn test_schedule_for() {
        let manager = ConfigManager::new();
        manager.register(flat("A", 1.0)).unwrap();
        let schedule = manager.schedule_for("A").unwrap();
        assert_eq!(schedule.len(), 1);
    }
}
