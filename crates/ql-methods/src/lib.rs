//! # ql-methods
//!
//! Numerical methods for derivative pricing. This crate carries the
//! finite-difference framework: grids, banded operators, operator-splitting
//! time-stepping schemes, step conditions and the solvers that tie them
//! together.
//!
//! # Modules
//!
//! * [`finite_differences`] — meshers, operators, schemes, step conditions
//!   and 1-D/2-D solvers

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Modules ───────────────────────────────────────────────────────────────────

/// Finite-difference methods for PDE-based pricing.
pub mod finite_differences;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use finite_differences::{
    FdmBackwardSolver, FdmSchemeDesc, FdmSchemeType, FdmSolverDesc, Fdm1DimSolver, Fdm2DimSolver,
    FiniteDifferenceModel, TimeSteppingScheme,
};
