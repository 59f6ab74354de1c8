//! Bracket search over piecewise-linear reachability functions.
//!
//! Between consecutive sample inventories the rate curves are linear, so the
//! reachable-after-action value `x * (1 - loss) + rate(x)` is linear too. The
//! search evaluates that value at every knot of the current-period interval
//! and inverts the first bracket that contains the target.

use cavern_math::solvers::{inverse_linear, Point};
use cavern_math::MathError;

use crate::error::StorageResult;
use crate::types::InventoryRange;

/// Which end of a flat bracket a search prefers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SearchEdge {
    /// Largest solution: brackets scanned top-down.
    Upper,
    /// Smallest solution: brackets scanned bottom-up.
    Lower,
}

/// Knots of the search restricted to `current`: its two limits plus every
/// sample inventory strictly between them, ascending.
pub(crate) fn search_knots(sample_inventories: &[f64], current: InventoryRange) -> Vec<f64> {
    let mut knots = Vec::with_capacity(sample_inventories.len() + 2);
    knots.push(current.min());
    knots.extend(
        sample_inventories
            .iter()
            .copied()
            .filter(|x| *x > current.min() && *x < current.max()),
    );
    if current.max() > current.min() {
        knots.push(current.max());
    }
    knots
}

/// Finds the inventory whose reachable value equals `target`.
///
/// `points` holds `(inventory, reachable value)` pairs sorted by inventory.
/// Returns `None` if no bracket contains the target.
pub(crate) fn solve(points: &[Point], target: f64, edge: SearchEdge) -> Option<StorageResult<f64>> {
    let solve_bracket = |pair: &[Point]| solve_in_bracket(pair[0], pair[1], target, edge);
    match edge {
        SearchEdge::Upper => points.windows(2).rev().find_map(solve_bracket),
        SearchEdge::Lower => points.windows(2).find_map(solve_bracket),
    }
}

fn solve_in_bracket(
    lower: Point,
    upper: Point,
    target: f64,
    edge: SearchEdge,
) -> Option<StorageResult<f64>> {
    if !lower.brackets(&upper, target) {
        return None;
    }
    let solved = match inverse_linear(lower, upper, target) {
        Ok(x) => Ok(x.clamp(lower.x, upper.x)),
        // Whole bracket maps onto the target.
        Err(MathError::DivisionByZero { .. }) => Ok(match edge {
            SearchEdge::Upper => upper.x,
            SearchEdge::Lower => lower.x,
        }),
        Err(err) => Err(err.into()),
    };
    Some(solved)
}
