//! Inversion of piecewise-linear functions.
//!
//! A piecewise-linear function is exactly linear between two adjacent knots,
//! so once a bracket containing the target value is known the inverse is a
//! closed-form line solve. No iteration or tolerance is involved.
//!
//! - [`inverse_linear`]: Solve for x on the line through two points
//!
//! # Example
//!
//! ```rust
//! use cavern_math::solvers::{inverse_linear, Point};
//!
//! // Inventory 400 reaches 380 after withdrawal, inventory 500 reaches 470.
//! let x = inverse_linear(Point::new(400.0, 380.0), Point::new(500.0, 470.0), 425.0).unwrap();
//! assert!((x - 450.0).abs() < 1e-12);
//! ```

mod inverse_linear;

pub use inverse_linear::inverse_linear;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// Abscissa.
    pub x: f64,
    /// Ordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if `target` lies between the ordinates of `self` and `other`, inclusive.
    pub fn brackets(&self, other: &Point, target: f64) -> bool {
        let lo = self.y.min(other.y);
        let hi = self.y.max(other.y);
        lo <= target && target <= hi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets_either_orientation() {
        let a = Point::new(0.0, 10.0);
        let b = Point::new(1.0, 20.0);

        assert!(a.brackets(&b, 15.0));
        assert!(b.brackets(&a, 15.0));
        assert!(a.brackets(&b, 10.0));
        assert!(a.brackets(&b, 20.0));
        assert!(!a.brackets(&b, 20.5));
        assert!(!a.brackets(&b, f64::NAN));
    }
}
