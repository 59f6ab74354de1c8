//! Interpolation methods for inventory-dependent rate curves.
//!
//! # Available Methods
//!
//! - [`LinearInterpolator`]: Piecewise-linear interpolation between knots
//!
//! Piecewise-linear interpolation is shape preserving: on every segment the
//! interpolant lies between the values at its two knots, so it never
//! introduces new extrema, and the ordering of two curves sampled on the same
//! knots is preserved everywhere between those knots.

mod linear;

pub use linear::LinearInterpolator;

use crate::error::MathResult;

/// Trait for interpolation methods.
pub trait Interpolator: Send + Sync {
    /// Returns the interpolated value at x.
    fn interpolate(&self, x: f64) -> MathResult<f64>;

    /// Returns the minimum x value in the data.
    fn min_x(&self) -> f64;

    /// Returns the maximum x value in the data.
    fn max_x(&self) -> f64;

    /// Checks if x is within the interpolation range.
    fn in_range(&self, x: f64) -> bool {
        x >= self.min_x() && x <= self.max_x()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_through_points() {
        let inventories = vec![0.0, 250.0, 600.0, 1000.0];
        let rates = vec![-40.0, -55.0, -70.0, -70.0];

        let interp = LinearInterpolator::new(inventories.clone(), rates.clone()).unwrap();
        for (x, y) in inventories.iter().zip(rates.iter()) {
            assert_relative_eq!(interp.interpolate(*x).unwrap(), *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_no_crossing_between_knots() {
        // Two curves on the same knots that are ordered at every knot stay
        // ordered everywhere in between.
        let xs = vec![0.0, 100.0, 300.0, 1000.0];
        let lower = LinearInterpolator::new(xs.clone(), vec![-10.0, -20.0, -20.0, -5.0]).unwrap();
        let upper = LinearInterpolator::new(xs, vec![15.0, 10.0, -20.0, 0.0]).unwrap();

        for i in 0..=100_i32 {
            let x = f64::from(i) * 10.0;
            assert!(lower.interpolate(x).unwrap() <= upper.interpolate(x).unwrap() + 1e-12);
        }
    }
}
