//! # ql-math
//!
//! Mathematical utilities used by the finite-difference framework:
//! the `Array` / `Matrix` newtypes (over nalgebra), spline interpolation
//! with derivatives, Simpson quadrature, the normal distribution (via
//! statrs) and the BiCGStab iterative linear solver.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// One-dimensional real arrays.
pub mod array;

/// Preconditioned BiCGStab solver for matrix-free linear systems.
pub mod bicgstab;

/// Floating-point comparison utilities.
pub mod comparison;

/// Probability distributions.
pub mod distributions;

/// Numerical integration.
pub mod integrals;

/// 1D and 2D interpolation schemes.
pub mod interpolations;

/// Two-dimensional real matrices.
pub mod matrix;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use array::Array;
pub use bicgstab::{BiCGStab, BiCGStabResult};
pub use comparison::{close, close_enough};
pub use distributions::{normal_cdf, normal_cdf_inverse, normal_pdf};
pub use interpolations::{
    BicubicSpline, CubicNaturalSpline, Interpolation1D, Interpolation2D, LinearInterpolation,
};
pub use matrix::Matrix;
