//! Inject/withdraw rate range.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::{ensure_finite, StorageError, StorageResult};

/// Range of signed inject/withdraw rates available over one period.
///
/// Withdrawal is negative and injection positive. A range of `[-50, 30]`
/// allows withdrawing up to 50 units or injecting up to 30 units.
///
/// # Example
///
/// ```rust
/// use cavern_storage::types::InjectWithdrawRange;
///
/// let range = InjectWithdrawRange::new(-50.0, 30.0).unwrap();
/// assert_eq!(range.min_rate(), -50.0);
/// assert_eq!(range.max_rate(), 30.0);
/// assert!(InjectWithdrawRange::new(10.0, -10.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InjectWithdrawRange {
    min_rate: f64,
    max_rate: f64,
}

impl InjectWithdrawRange {
    /// Creates a new rate range.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidArgument`] if either rate is not finite
    /// and [`StorageError::MalformedConfiguration`] if `min_rate > max_rate`.
    pub fn new(min_rate: f64, max_rate: f64) -> StorageResult<Self> {
        ensure_finite("min_rate", min_rate)?;
        ensure_finite("max_rate", max_rate)?;
        if min_rate > max_rate {
            return Err(StorageError::malformed_configuration(format!(
                "min rate {} exceeds max rate {}",
                min_rate, max_rate
            )));
        }
        Ok(Self { min_rate, max_rate })
    }

    /// Builds a range from bounds already known to be ordered.
    pub(crate) fn from_ordered(min_rate: f64, max_rate: f64) -> Self {
        debug_assert!(min_rate <= max_rate);
        Self { min_rate, max_rate }
    }

    /// Most negative rate: the largest withdrawal.
    pub fn min_rate(&self) -> f64 {
        self.min_rate
    }

    /// Most positive rate: the largest injection.
    pub fn max_rate(&self) -> f64 {
        self.max_rate
    }

    /// Returns true if `rate` is allowed.
    pub fn contains(&self, rate: f64) -> bool {
        self.min_rate <= rate && rate <= self.max_rate
    }
}

impl fmt::Display for InjectWithdrawRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min_rate, self.max_rate)
    }
}

// Deserialization goes through `new` so a crossed range is never built.
impl<'de> Deserialize<'de> for InjectWithdrawRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct InjectWithdrawRangeData {
            min_rate: f64,
            max_rate: f64,
        }

        let data = InjectWithdrawRangeData::deserialize(deserializer)?;
        Self::new(data.min_rate, data.max_rate).map_err(serde::de::Error::custom)
    }
}
