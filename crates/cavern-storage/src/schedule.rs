//! Date-keyed constraint schedules.
//!
//! Ratchets often change with the season or after maintenance. A
//! [`ConstraintSchedule`] holds one constraint per start date; the constraint
//! active on a day is the one with the latest start on or before it.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::constraints::InjectWithdrawConstraint;
use crate::error::{StorageError, StorageResult};

/// Constraints keyed by the date they become active.
#[derive(Clone)]
pub struct ConstraintSchedule {
    entries: Vec<(NaiveDate, Arc<dyn InjectWithdrawConstraint>)>,
}

impl ConstraintSchedule {
    /// Creates a schedule from `(start date, constraint)` pairs in any order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MalformedConfiguration`] if `entries` is empty
    /// or two entries share a start date.
    pub fn new(
        mut entries: Vec<(NaiveDate, Arc<dyn InjectWithdrawConstraint>)>,
    ) -> StorageResult<Self> {
        if entries.is_empty() {
            return Err(StorageError::malformed_configuration(
                "constraint schedule requires at least one entry",
            ));
        }
        entries.sort_by_key(|(start, _)| *start);
        if let Some(pair) = entries.windows(2).find(|w| w[0].0 == w[1].0) {
            return Err(StorageError::malformed_configuration(format!(
                "duplicate constraint schedule start date {}",
                pair[0].0
            )));
        }
        Ok(Self { entries })
    }

    /// A schedule with a single constraint active on every date.
    pub fn constant(constraint: Arc<dyn InjectWithdrawConstraint>) -> Self {
        Self {
            entries: vec![(NaiveDate::MIN, constraint)],
        }
    }

    /// Returns the constraint active on `date`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NoConstraintForDate`] if `date` precedes every start date.
    pub fn constraint_on(&self, date: NaiveDate) -> StorageResult<&Arc<dyn InjectWithdrawConstraint>> {
        let active = self.entries.partition_point(|(start, _)| *start <= date);
        match active.checked_sub(1) {
            Some(i) => Ok(&self.entries[i].1),
            None => Err(StorageError::NoConstraintForDate { date }),
        }
    }

    /// Start dates in ascending order.
    pub fn start_dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.entries.iter().map(|(start, _)| *start)
    }

    /// Number of scheduled constraints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a schedule holds at least one constraint.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for ConstraintSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConstraintSchedule")
            .field("start_dates", &self.start_dates().collect::<Vec<_>>())
            .finish()
    }
}
