//! Two-point line inversion.

use crate::error::{MathError, MathResult};
use crate::solvers::Point;

/// Minimum ordinate spread for the line to be invertible.
const MIN_SLOPE_SPREAD: f64 = 1e-14;

/// Solves for x on the line through `p0` and `p1` such that y(x) = `target`.
///
/// The target must lie within, or on the boundary of, the ordinate range of
/// the two points. Values outside are rejected instead of extrapolated, so a
/// caller cannot silently leave the bracket it searched for.
///
/// # Errors
///
/// - [`MathError::InvalidInput`] if any argument is not finite
/// - [`MathError::InvalidBracket`] if `target` is outside `[min(y0, y1), max(y0, y1)]`
/// - [`MathError::DivisionByZero`] if the two ordinates coincide, in which
///   case every x on the segment solves the equation
pub fn inverse_linear(p0: Point, p1: Point, target: f64) -> MathResult<f64> {
    if ![p0.x, p0.y, p1.x, p1.y, target]
        .iter()
        .all(|v| v.is_finite())
    {
        return Err(MathError::invalid_input(
            "inverse linear solve requires finite inputs",
        ));
    }

    if !p0.brackets(&p1, target) {
        return Err(MathError::InvalidBracket {
            y0: p0.y,
            y1: p1.y,
            target,
        });
    }

    let dy = p1.y - p0.y;
    if dy.abs() < MIN_SLOPE_SPREAD {
        return Err(MathError::DivisionByZero { value: dy });
    }

    // Endpoints are returned exactly.
    if target == p0.y {
        return Ok(p0.x);
    }
    if target == p1.y {
        return Ok(p1.x);
    }

    let t = (target - p0.y) / dy;
    Ok(p0.x + t * (p1.x - p0.x))
}
