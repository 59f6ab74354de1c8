//! Piecewise-linear inventory-dependent ratchets.

use cavern_math::interpolation::{Interpolator, LinearInterpolator};
use cavern_math::solvers::Point;
use tracing::{debug, trace, warn};

use super::bracket::{self, SearchEdge};
use super::{reachable_from, retention_factor, InjectWithdrawConstraint};
use crate::error::{ensure_finite, StorageError, StorageResult};
use crate::types::{InjectWithdrawRange, InventoryRange, InventoryRateSample};

/// Inject/withdraw constraint interpolated linearly between inventory samples.
///
/// Salt caverns and depleted fields typically withdraw faster when full and
/// inject faster when empty. Sampling the rate range at a handful of
/// inventory levels and joining the samples with straight lines gives a
/// continuous ratchet curve that is exact at every sample.
///
/// Outside the sampled inventories both rate curves are extended along their
/// nearest end segment. Where the extended curves cross, the rate range
/// collapses to the single max rate, so bound searches over a current period
/// reaching beyond the samples still succeed.
///
/// # Example
///
/// ```rust
/// use cavern_storage::constraints::{InjectWithdrawConstraint, PiecewiseLinearConstraint};
/// use cavern_storage::types::InventoryRange;
///
/// let ratchets = PiecewiseLinearConstraint::from_rates(&[
///     (0.0, 0.0, 0.0),
///     (100.0, -50.0, 50.0),
/// ])
/// .unwrap();
///
/// let range = ratchets.inject_withdraw_range(50.0).unwrap();
/// assert_eq!((range.min_rate(), range.max_rate()), (-25.0, 25.0));
///
/// let space = InventoryRange::new(0.0, 100.0).unwrap();
/// let upper = ratchets.inventory_space_upper_bound(space, space, 0.0).unwrap();
/// assert_eq!(upper, 100.0);
/// ```
#[derive(Debug, Clone)]
pub struct PiecewiseLinearConstraint {
    samples: Vec<InventoryRateSample>,
    min_rate_curve: LinearInterpolator,
    max_rate_curve: LinearInterpolator,
}

impl PiecewiseLinearConstraint {
    /// Builds the constraint from samples given in any order.
    ///
    /// The samples are copied and sorted by inventory.
    ///
    /// # Errors
    ///
    /// - [`StorageError::MalformedConfiguration`] if fewer than two distinct
    ///   inventories are given, if two samples share an inventory, or if a
    ///   sample's min rate exceeds its max rate
    /// - [`StorageError::InvalidArgument`] if a sample holds a negative or
    ///   non-finite value
    pub fn new(samples: impl IntoIterator<Item = InventoryRateSample>) -> StorageResult<Self> {
        let mut samples = samples
            .into_iter()
            .map(|s| {
                let range = s.rate_range();
                InventoryRateSample::new(
                    s.inventory(),
                    InjectWithdrawRange::new(range.min_rate(), range.max_rate())?,
                )
            })
            .collect::<StorageResult<Vec<_>>>()?;
        samples.sort_by(|a, b| a.inventory().total_cmp(&b.inventory()));

        let distinct = 1 + samples
            .windows(2)
            .filter(|w| w[0].inventory() != w[1].inventory())
            .count();
        if samples.len() < 2 || distinct < 2 {
            return Err(StorageError::malformed_configuration(format!(
                "at least two distinct inventory samples are required, got {}",
                if samples.is_empty() { 0 } else { distinct }
            )));
        }
        if distinct < samples.len() {
            return Err(StorageError::malformed_configuration(
                "inventory samples must be distinct",
            ));
        }

        let inventories: Vec<f64> = samples.iter().map(InventoryRateSample::inventory).collect();
        let min_rates = samples.iter().map(|s| s.rate_range().min_rate()).collect();
        let max_rates = samples.iter().map(|s| s.rate_range().max_rate()).collect();

        let min_rate_curve =
            LinearInterpolator::new(inventories.clone(), min_rates)?.with_extrapolation();
        let max_rate_curve = LinearInterpolator::new(inventories, max_rates)?.with_extrapolation();

        Ok(Self {
            samples,
            min_rate_curve,
            max_rate_curve,
        })
    }

    /// Builds the constraint from `(inventory, min rate, max rate)` triples.
    pub fn from_rates(rates: &[(f64, f64, f64)]) -> StorageResult<Self> {
        let samples = rates
            .iter()
            .map(|&(inventory, min_rate, max_rate)| {
                InventoryRateSample::from_rates(inventory, min_rate, max_rate)
            })
            .collect::<StorageResult<Vec<_>>>()?;
        Self::new(samples)
    }

    /// Samples sorted by ascending inventory.
    pub fn samples(&self) -> &[InventoryRateSample] {
        &self.samples
    }

    /// Smallest sampled inventory.
    pub fn min_inventory(&self) -> f64 {
        self.min_rate_curve.min_x()
    }

    /// Largest sampled inventory.
    pub fn max_inventory(&self) -> f64 {
        self.min_rate_curve.max_x()
    }

    /// `(inventory, reachable value)` at every knot of `current`, where the
    /// reachable value applies the rate selected by `rate_of`.
    fn reachable_knots(
        &self,
        current: InventoryRange,
        retention: f64,
        rate_of: impl Fn(&InjectWithdrawRange) -> f64,
    ) -> StorageResult<Vec<Point>> {
        bracket::search_knots(self.min_rate_curve.xs(), current)
            .into_iter()
            .map(|x| {
                let range = self.inject_withdraw_range(x)?;
                Ok(Point::new(x, x * retention + rate_of(&range)))
            })
            .collect()
    }
}

impl InjectWithdrawConstraint for PiecewiseLinearConstraint {
    fn inject_withdraw_range(&self, inventory: f64) -> StorageResult<InjectWithdrawRange> {
        ensure_finite("inventory", inventory)?;
        let min_rate = self.min_rate_curve.interpolate(inventory)?;
        let max_rate = self.max_rate_curve.interpolate(inventory)?;

        if min_rate <= max_rate {
            return Ok(InjectWithdrawRange::from_ordered(min_rate, max_rate));
        }
        // Inside the samples only rounding crosses the curves; beyond them the
        // extrapolated lines may genuinely cross. Either way the max rate wins.
        trace!(inventory, min_rate, max_rate, "rate curves cross, collapsing to max rate");
        Ok(InjectWithdrawRange::from_ordered(max_rate, max_rate))
    }

    fn inventory_space_upper_bound(
        &self,
        next_period_space: InventoryRange,
        current_period: InventoryRange,
        inventory_percent_loss: f64,
    ) -> StorageResult<f64> {
        let retention = retention_factor(inventory_percent_loss)?;

        let top = current_period.max();
        let reachable = reachable_from(top, retention, self.inject_withdraw_range(top)?);
        if reachable.overlaps(&next_period_space) {
            debug!(
                inventory = top,
                %reachable,
                next = %next_period_space,
                "upper bound reached from current maximum"
            );
            return Ok(top);
        }

        let target = next_period_space.max();
        let knots = self.reachable_knots(current_period, retention, InjectWithdrawRange::min_rate)?;
        trace!(knots = knots.len(), next_bound = target, "searching withdraw brackets top-down");

        match bracket::solve(&knots, target, SearchEdge::Upper) {
            Some(solved) => {
                let inventory = solved?;
                debug!(inventory, next_bound = target, "upper bound solved in bracket");
                Ok(inventory)
            }
            None => {
                warn!(
                    next_bound = target,
                    current = %current_period,
                    "no inventory can withdraw down to next period upper bound"
                );
                Err(StorageError::cannot_be_satisfied(
                    target,
                    current_period.min(),
                    current_period.max(),
                ))
            }
        }
    }

    fn inventory_space_lower_bound(
        &self,
        next_period_space: InventoryRange,
        current_period: InventoryRange,
        inventory_percent_loss: f64,
    ) -> StorageResult<f64> {
        let retention = retention_factor(inventory_percent_loss)?;

        let bottom = current_period.min();
        let reachable = reachable_from(bottom, retention, self.inject_withdraw_range(bottom)?);
        if reachable.overlaps(&next_period_space) {
            debug!(
                inventory = bottom,
                %reachable,
                next = %next_period_space,
                "lower bound reached from current minimum"
            );
            return Ok(bottom);
        }

        let target = next_period_space.min();
        let knots = self.reachable_knots(current_period, retention, InjectWithdrawRange::max_rate)?;
        trace!(knots = knots.len(), next_bound = target, "searching inject brackets bottom-up");

        match bracket::solve(&knots, target, SearchEdge::Lower) {
            Some(solved) => {
                let inventory = solved?;
                debug!(inventory, next_bound = target, "lower bound solved in bracket");
                Ok(inventory)
            }
            None => {
                warn!(
                    next_bound = target,
                    current = %current_period,
                    "no inventory can inject up to next period lower bound"
                );
                Err(StorageError::cannot_be_satisfied(
                    target,
                    current_period.min(),
                    current_period.max(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn range(min: f64, max: f64) -> InventoryRange {
        InventoryRange::new(min, max).unwrap()
    }

    /// Withdrawal slows as the cavern empties, injection slows as it fills.
    fn cavern() -> PiecewiseLinearConstraint {
        PiecewiseLinearConstraint::from_rates(&[
            (0.0, -20.0, 60.0),
            (400.0, -40.0, 50.0),
            (1000.0, -80.0, 30.0),
        ])
        .unwrap()
    }

    #[test]
    fn test_linear_between_samples() {
        let constraint =
            PiecewiseLinearConstraint::from_rates(&[(0.0, 0.0, 0.0), (100.0, -50.0, 50.0)])
                .unwrap();

        let r = constraint.inject_withdraw_range(50.0).unwrap();
        assert_relative_eq!(r.min_rate(), -25.0);
        assert_relative_eq!(r.max_rate(), 25.0);
    }

    #[test]
    fn test_exact_at_samples() {
        let constraint = cavern();
        for sample in constraint.samples() {
            let r = constraint.inject_withdraw_range(sample.inventory()).unwrap();
            assert_eq!(r, sample.rate_range());
        }
    }

    #[test]
    fn test_unordered_input_sorted() {
        let shuffled = PiecewiseLinearConstraint::from_rates(&[
            (1000.0, -80.0, 30.0),
            (0.0, -20.0, 60.0),
            (400.0, -40.0, 50.0),
        ])
        .unwrap();

        assert_eq!(shuffled.samples(), cavern().samples());
        assert_eq!(shuffled.min_inventory(), 0.0);
        assert_eq!(shuffled.max_inventory(), 1000.0);
    }

    #[test]
    fn test_extrapolates_end_segment() {
        let constraint =
            PiecewiseLinearConstraint::from_rates(&[(100.0, -10.0, 10.0), (200.0, -20.0, 20.0)])
                .unwrap();

        let r = constraint.inject_withdraw_range(250.0).unwrap();
        assert_relative_eq!(r.min_rate(), -25.0);
        assert_relative_eq!(r.max_rate(), 25.0);
    }

    #[test]
    fn test_crossed_extrapolation_collapses() {
        // Rates converge at inventory 0 and would cross below it
        let constraint =
            PiecewiseLinearConstraint::from_rates(&[(10.0, -10.0, 10.0), (20.0, -20.0, 20.0)])
                .unwrap();

        let at_zero = constraint.inject_withdraw_range(0.0).unwrap();
        assert_relative_eq!(at_zero.min_rate(), 0.0);
        assert_relative_eq!(at_zero.max_rate(), 0.0);

        let below = constraint.inject_withdraw_range(-5.0).unwrap();
        assert_relative_eq!(below.min_rate(), -5.0);
        assert_relative_eq!(below.max_rate(), -5.0);
    }

    #[test]
    fn test_lower_bound_with_current_period_below_samples() {
        // Below inventory 50 the extended curves cross (at 0: min 20, max 0)
        let constraint =
            PiecewiseLinearConstraint::from_rates(&[(50.0, -5.0, 5.0), (100.0, -30.0, 10.0)])
                .unwrap();
        let current = InventoryRange::new(0.0, 100.0).unwrap();
        let next = InventoryRange::new(60.0, 100.0).unwrap();

        // Inject reach is 0 at 0, 55 at 50 and 110 at 100
        let lower = constraint.inventory_space_lower_bound(next, current, 0.0).unwrap();
        assert_relative_eq!(lower, 50.0 + 50.0 * 5.0 / 55.0, epsilon = 1e-12);

        let upper = constraint.inventory_space_upper_bound(next, current, 0.0).unwrap();
        assert_relative_eq!(upper, 100.0);
    }

    #[test]
    fn test_construction_errors() {
        assert!(matches!(
            PiecewiseLinearConstraint::new(Vec::new()),
            Err(StorageError::MalformedConfiguration { .. })
        ));
        assert!(matches!(
            PiecewiseLinearConstraint::from_rates(&[(10.0, -1.0, 1.0)]),
            Err(StorageError::MalformedConfiguration { .. })
        ));
        assert!(matches!(
            PiecewiseLinearConstraint::from_rates(&[(10.0, -1.0, 1.0), (10.0, -2.0, 2.0)]),
            Err(StorageError::MalformedConfiguration { .. })
        ));
        assert!(matches!(
            PiecewiseLinearConstraint::from_rates(&[
                (0.0, -1.0, 1.0),
                (5.0, -1.0, 1.0),
                (5.0, -2.0, 2.0)
            ]),
            Err(StorageError::MalformedConfiguration { .. })
        ));
        assert!(matches!(
            PiecewiseLinearConstraint::from_rates(&[(0.0, -1.0, 1.0), (f64::NAN, -1.0, 1.0)]),
            Err(StorageError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_non_finite_query_rejected() {
        assert!(cavern().inject_withdraw_range(f64::NAN).is_err());
        assert!(cavern().inject_withdraw_range(f64::INFINITY).is_err());
    }

    #[test]
    fn test_short_circuit_bounds() {
        let constraint =
            PiecewiseLinearConstraint::from_rates(&[(0.0, 0.0, 0.0), (100.0, -50.0, 50.0)])
                .unwrap();
        let space = range(0.0, 100.0);

        assert_eq!(constraint.inventory_space_upper_bound(space, space, 0.0).unwrap(), 100.0);
        assert_eq!(constraint.inventory_space_lower_bound(space, space, 0.0).unwrap(), 0.0);
    }

    #[test]
    fn test_upper_bound_solved_in_top_bracket() {
        // From 1000 withdrawing 80 reaches 920; next period holds at most 700.
        // Withdraw-reachable at 400 is 360, at 1000 is 920: solve 700 on that line.
        let constraint = cavern();
        let upper = constraint
            .inventory_space_upper_bound(range(0.0, 700.0), range(0.0, 1000.0), 0.0)
            .unwrap();

        let expected = 400.0 + (700.0 - 360.0) / (920.0 - 360.0) * 600.0;
        assert_relative_eq!(upper, expected, epsilon = 1e-9);

        let reach = constraint.reachable_inventory(upper, 0.0).unwrap();
        assert_relative_eq!(reach.min(), 700.0, epsilon = 1e-9);
    }

    #[test]
    fn test_upper_bound_solved_in_lower_bracket() {
        // Next period holds at most 200: withdraw-reachable at 0 is -20, at 400 is 360.
        let upper = cavern()
            .inventory_space_upper_bound(range(0.0, 200.0), range(0.0, 1000.0), 0.0)
            .unwrap();

        let expected = (200.0 + 20.0) / (360.0 + 20.0) * 400.0;
        assert_relative_eq!(upper, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_lower_bound_solved() {
        // Inject-reachable at 0 is 60, at 400 is 450. Next period needs at least 300.
        let lower = cavern()
            .inventory_space_lower_bound(range(300.0, 1000.0), range(0.0, 1000.0), 0.0)
            .unwrap();

        let expected = (300.0 - 60.0) / (450.0 - 60.0) * 400.0;
        assert_relative_eq!(lower, expected, epsilon = 1e-9);
    }

    #[test]
    fn test_bounds_with_loss() {
        let constraint = cavern();
        let loss = 0.05;
        let next = range(500.0, 600.0);
        let current = range(0.0, 1000.0);

        let upper = constraint.inventory_space_upper_bound(next, current, loss).unwrap();
        let lower = constraint.inventory_space_lower_bound(next, current, loss).unwrap();

        let at_upper = constraint.reachable_inventory(upper, loss).unwrap();
        let at_lower = constraint.reachable_inventory(lower, loss).unwrap();
        assert_relative_eq!(at_upper.min(), 600.0, epsilon = 1e-9);
        assert_relative_eq!(at_lower.max(), 500.0, epsilon = 1e-9);
        assert!(lower <= upper);
    }

    #[test]
    fn test_bound_stays_within_current_period() {
        // Samples extend far beyond the current period limits
        let constraint = cavern();
        let current = range(100.0, 300.0);
        let next = range(0.0, 150.0);

        let upper = constraint.inventory_space_upper_bound(next, current, 0.0).unwrap();
        assert!(current.contains(upper));
        let reach = constraint.reachable_inventory(upper, 0.0).unwrap();
        assert_relative_eq!(reach.min(), 150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_infeasible_no_capability() {
        let constraint =
            PiecewiseLinearConstraint::from_rates(&[(0.0, 0.0, 0.0), (10.0, 0.0, 0.0)]).unwrap();
        let next = range(20.0, 30.0);
        let current = range(0.0, 10.0);

        let upper = constraint.inventory_space_upper_bound(next, current, 0.0);
        let lower = constraint.inventory_space_lower_bound(next, current, 0.0);
        assert!(upper.unwrap_err().is_infeasible());
        assert!(lower.unwrap_err().is_infeasible());
    }

    #[test]
    fn test_infeasible_when_every_withdrawal_overshoots() {
        // Even withdrawing at full rate from empty leaves more than next period allows.
        let constraint =
            PiecewiseLinearConstraint::from_rates(&[(100.0, -10.0, 10.0), (200.0, -10.0, 10.0)])
                .unwrap();
        let next = range(0.0, 50.0);
        let current = range(100.0, 200.0);

        assert!(constraint
            .inventory_space_upper_bound(next, current, 0.0)
            .unwrap_err()
            .is_infeasible());
        assert!(constraint
            .inventory_space_lower_bound(next, current, 0.0)
            .unwrap_err()
            .is_infeasible());
    }

    #[test]
    fn test_invalid_loss_rejected() {
        let space = range(0.0, 100.0);
        assert!(matches!(
            cavern().inventory_space_upper_bound(space, space, f64::NAN),
            Err(StorageError::InvalidArgument { .. })
        ));
        assert!(matches!(
            cavern().inventory_space_lower_bound(space, space, 1.5),
            Err(StorageError::InvalidArgument { .. })
        ));
    }
}
