//! Storage facility configuration types.
//!
//! A facility configuration names a storage asset, its per-period inventory
//! loss, and its ratchets. Ratchets are either constant or sampled at
//! several inventory levels and interpolated linearly. An optional schedule
//! swaps in different ratchets from given start dates.
//!
//! # TOML
//!
//! ```toml
//! name = "HUMBLY.GROVE"
//! inventory_percent_loss = 0.0005
//!
//! [ratchets]
//! type = "piecewise_linear"
//! points = [
//!     { inventory = 0.0, min_rate = -20.0, max_rate = 60.0 },
//!     { inventory = 1000.0, min_rate = -80.0, max_rate = 30.0 },
//! ]
//!
//! [[schedule]]
//! start = "2025-10-01"
//! ratchets = { type = "constant", min_rate = -50.0, max_rate = 0.0 }
//! ```

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use cavern_storage::{
    ConstantRateConstraint, ConstraintSchedule, InjectWithdrawConstraint, InventoryRateSample,
    PiecewiseLinearConstraint, StorageResult,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{ConfigError, ConfigResult, Validate, ValidationError};

// =============================================================================
// RATCHETS
// =============================================================================

/// Rate range available at one inventory level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatchetPoint {
    /// Inventory level.
    pub inventory: f64,
    /// Largest withdrawal, as a negative rate.
    pub min_rate: f64,
    /// Largest injection.
    pub max_rate: f64,
}

impl RatchetPoint {
    /// Creates a ratchet point.
    pub fn new(inventory: f64, min_rate: f64, max_rate: f64) -> Self {
        Self {
            inventory,
            min_rate,
            max_rate,
        }
    }
}

/// Shape of a facility's inject/withdraw ratchets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RatchetProfile {
    /// Same rate range at every inventory.
    Constant {
        /// Largest withdrawal, as a negative rate.
        min_rate: f64,
        /// Largest injection.
        max_rate: f64,
    },

    /// Rate range interpolated linearly between sampled inventories.
    PiecewiseLinear {
        /// Sampled rate ranges, in any order.
        points: Vec<RatchetPoint>,
    },
}

impl RatchetProfile {
    /// Builds the constraint described by this profile.
    pub fn build(&self) -> StorageResult<Arc<dyn InjectWithdrawConstraint>> {
        Ok(match self {
            Self::Constant { min_rate, max_rate } => {
                Arc::new(ConstantRateConstraint::new(*min_rate, *max_rate)?)
            }
            Self::PiecewiseLinear { points } => {
                let samples = points
                    .iter()
                    .map(|p| InventoryRateSample::from_rates(p.inventory, p.min_rate, p.max_rate))
                    .collect::<StorageResult<Vec<_>>>()?;
                Arc::new(PiecewiseLinearConstraint::new(samples)?)
            }
        })
    }

    fn validate_at(&self, field: &str) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        match self {
            Self::Constant { min_rate, max_rate } => {
                check_rates(&mut errors, field, *min_rate, *max_rate);
            }
            Self::PiecewiseLinear { points } => {
                if points.len() < 2 {
                    errors.push(ValidationError::new(
                        format!("{field}.points"),
                        format!("at least 2 points required, got {}", points.len()),
                    ));
                }
                let mut seen = HashSet::new();
                for (i, p) in points.iter().enumerate() {
                    let at = format!("{field}.points[{i}]");
                    if !p.inventory.is_finite() || p.inventory < 0.0 {
                        errors.push(ValidationError::new(
                            format!("{at}.inventory"),
                            "must be finite and non-negative",
                        ));
                    } else if !seen.insert(p.inventory.to_bits()) {
                        errors.push(ValidationError::new(
                            format!("{at}.inventory"),
                            format!("duplicate inventory {}", p.inventory),
                        ));
                    }
                    check_rates(&mut errors, &at, p.min_rate, p.max_rate);
                }
            }
        }
        errors
    }
}

fn check_rates(errors: &mut Vec<ValidationError>, field: &str, min_rate: f64, max_rate: f64) {
    if !min_rate.is_finite() || !max_rate.is_finite() {
        errors.push(ValidationError::new(field, "rates must be finite"));
    } else if min_rate > max_rate {
        errors.push(ValidationError::new(
            field,
            format!("min_rate {} exceeds max_rate {}", min_rate, max_rate),
        ));
    }
}

/// Ratchets that become active on `start`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledRatchets {
    /// First date the ratchets apply (inclusive).
    pub start: NaiveDate,
    /// The ratchets.
    pub ratchets: RatchetProfile,
}

// =============================================================================
// FACILITY CONFIGURATION
// =============================================================================

/// Configuration of one storage facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageFacilityConfig {
    /// Configuration name/identifier.
    pub name: String,

    /// Description of this facility.
    #[serde(default)]
    pub description: Option<String>,

    /// Fraction of inventory lost each period.
    #[serde(default)]
    pub inventory_percent_loss: f64,

    /// Ratchets active unless a schedule entry overrides them.
    pub ratchets: RatchetProfile,

    /// Ratchets taking over from given dates.
    #[serde(default)]
    pub schedule: Vec<ScheduledRatchets>,

    /// Free-form metadata.
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl StorageFacilityConfig {
    /// Creates a facility configuration with the given ratchets and no loss.
    pub fn new(name: impl Into<String>, ratchets: RatchetProfile) -> Self {
        Self {
            name: name.into(),
            description: None,
            inventory_percent_loss: 0.0,
            ratchets,
            schedule: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the per-period inventory loss.
    #[must_use]
    pub fn with_inventory_percent_loss(mut self, loss: f64) -> Self {
        self.inventory_percent_loss = loss;
        self
    }

    /// Adds ratchets that take over from `start`.
    #[must_use]
    pub fn with_scheduled_ratchets(mut self, start: NaiveDate, ratchets: RatchetProfile) -> Self {
        self.schedule.push(ScheduledRatchets { start, ratchets });
        self
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a configuration from TOML.
    pub fn from_toml_str(toml: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(toml)?)
    }

    /// Loads a configuration file; the extension (`json` or `toml`) selects the format.
    pub fn from_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content)?,
            Some("toml") => Self::from_toml_str(&content)?,
            other => {
                return Err(ConfigError::UnsupportedFormat(
                    other.unwrap_or_default().to_string(),
                ))
            }
        };
        info!(facility = %config.name, path = %path.display(), "loaded storage facility configuration");
        Ok(config)
    }

    /// Serializes to pretty-printed JSON.
    pub fn to_json_string(&self) -> ConfigResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Serializes to TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string(self)?)
    }

    /// Builds the base ratchet constraint.
    pub fn build_constraint(&self) -> ConfigResult<Arc<dyn InjectWithdrawConstraint>> {
        self.validate_or_error()?;
        Ok(self.ratchets.build()?)
    }

    /// Builds a schedule: base ratchets from the earliest representable date,
    /// then every scheduled entry from its start.
    pub fn build_schedule(&self) -> ConfigResult<ConstraintSchedule> {
        self.validate_or_error()?;
        let mut entries = vec![(NaiveDate::MIN, self.ratchets.build()?)];
        for entry in &self.schedule {
            entries.push((entry.start, entry.ratchets.build()?));
        }
        Ok(ConstraintSchedule::new(entries)?)
    }
}

impl Validate for StorageFacilityConfig {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(ValidationError::new("name", "must not be empty"));
        }

        if !self.inventory_percent_loss.is_finite()
            || !(0.0..=1.0).contains(&self.inventory_percent_loss)
        {
            errors.push(ValidationError::new(
                "inventory_percent_loss",
                format!("must be in [0, 1], got {}", self.inventory_percent_loss),
            ));
        }

        errors.extend(self.ratchets.validate_at("ratchets"));

        let mut starts = HashSet::new();
        for (i, entry) in self.schedule.iter().enumerate() {
            if !starts.insert(entry.start) {
                errors.push(ValidationError::new(
                    format!("schedule[{i}].start"),
                    format!("duplicate start date {}", entry.start),
                ));
            }
            errors.extend(entry.ratchets.validate_at(&format!("schedule[{i}].ratchets")));
        }

        errors
    }
}
