//! Error types for storage constraint operations.

use cavern_math::MathError;
use chrono::NaiveDate;
use thiserror::Error;

/// A specialized Result type for storage constraint operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error types for storage constraint operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StorageError {
    /// An argument is outside its domain (non-finite, negative, inverted range).
    #[error("Invalid argument: {reason}")]
    InvalidArgument {
        /// Description of the invalid argument.
        reason: String,
    },

    /// Constraint configuration cannot describe a rate curve.
    #[error("Malformed configuration: {reason}")]
    MalformedConfiguration {
        /// Description of the configuration problem.
        reason: String,
    },

    /// No current-period inventory can reach the next period's feasible space.
    ///
    /// This is not a transient condition; retrying with the same inputs
    /// yields the same result.
    #[error(
        "Storage inventory constraints cannot be satisfied: no inventory in [{current_min}, {current_max}] reaches {target} next period"
    )]
    ConstraintsCannotBeSatisfied {
        /// The next-period inventory bound that could not be reached.
        target: f64,
        /// Current-period minimum inventory.
        current_min: f64,
        /// Current-period maximum inventory.
        current_max: f64,
    },

    /// A schedule has no constraint active on the requested date.
    #[error("No inject/withdraw constraint active on {date}")]
    NoConstraintForDate {
        /// The requested date.
        date: NaiveDate,
    },

    /// Underlying numerical failure.
    #[error("Math error: {0}")]
    Math(#[from] MathError),
}

impl StorageError {
    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Creates a malformed configuration error.
    #[must_use]
    pub fn malformed_configuration(reason: impl Into<String>) -> Self {
        Self::MalformedConfiguration {
            reason: reason.into(),
        }
    }

    /// Creates an infeasibility error.
    #[must_use]
    pub fn cannot_be_satisfied(target: f64, current_min: f64, current_max: f64) -> Self {
        Self::ConstraintsCannotBeSatisfied {
            target,
            current_min,
            current_max,
        }
    }

    /// Returns true if this error reports infeasible constraints.
    pub fn is_infeasible(&self) -> bool {
        matches!(self, Self::ConstraintsCannotBeSatisfied { .. })
    }
}

/// Rejects NaN and infinite values.
pub(crate) fn ensure_finite(name: &str, value: f64) -> StorageResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(StorageError::invalid_argument(format!(
            "{} must be finite, got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorageError::cannot_be_satisfied(20.0, 0.0, 10.0);
        assert!(err.to_string().contains("cannot be satisfied"));
        assert!(err.is_infeasible());

        let err = StorageError::malformed_configuration("need two samples");
        assert!(!err.is_infeasible());
    }

    #[test]
    fn test_from_math_error() {
        let err: StorageError = MathError::insufficient_data(2, 0).into();
        assert!(matches!(err, StorageError::Math(_)));
    }

    #[test]
    fn test_ensure_finite() {
        assert_eq!(ensure_finite("x", 1.5).unwrap(), 1.5);
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert!(ensure_finite("x", f64::NEG_INFINITY).is_err());
    }
}
