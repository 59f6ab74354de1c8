//! # Cavern Math
//!
//! Numerical utilities for the Cavern storage constraint library.
//!
//! This crate provides:
//!
//! - **Interpolation**: Piecewise-linear interpolation over sorted knots,
//!   with opt-in linear extrapolation beyond the end segments
//! - **Solvers**: Two-point line inversion used to invert piecewise-linear
//!   functions inside a known bracket
//!
//! ## Design Philosophy
//!
//! - **Exactness**: Interpolants pass through their knots; inversions are
//!   exact on the line through the bracket endpoints
//! - **Numerical Stability**: Flat segments are reported as
//!   [`MathError::DivisionByZero`] instead of being divided by

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod interpolation;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::interpolation::{Interpolator, LinearInterpolator};
    pub use crate::solvers::{inverse_linear, Point};
}

pub use error::{MathError, MathResult};
