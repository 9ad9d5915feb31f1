//! # quantlib-fdm
//!
//! Finite-difference PDE framework for derivative valuation.
//!
//! This crate is a **façade** that re-exports the public items of the
//! underlying workspace crates. Application code should depend on this
//! crate rather than the individual `ql-*` crates.
//!
//! ## Quick start
//!
//! ```toml
//! [dependencies]
//! quantlib-fdm = "0.1"
//! ```
//!
//! Price a one-year European put under Black-Scholes:
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use quantlib_fdm::methods::finite_differences::{
//!     Fdm1DimSolver, FdmBlackScholesMesher, FdmBlackScholesOp, FdmBoundaryConditionSet,
//!     FdmExercise, FdmInnerValueCalculator, FdmLogInnerValue, FdmMesher, FdmMesherComposite,
//!     FdmSchemeDesc, FdmSolverDesc, FdmStepConditionComposite, OptionType, PlainVanillaPayoff,
//! };
//!
//! # fn main() -> quantlib_fdm::core::Result<()> {
//! let (spot, r, vol, maturity) = (100.0, 0.05, 0.2, 1.0);
//! let mesher: Arc<dyn FdmMesher> = Arc::new(FdmMesherComposite::from_1d(
//!     FdmBlackScholesMesher::new(200, spot, r, 0.0, vol, maturity)?,
//! )?);
//! let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0));
//! let calculator: Arc<dyn FdmInnerValueCalculator> =
//!     Arc::new(FdmLogInnerValue::new(payoff, mesher.clone(), 0)?);
//! let condition = Arc::new(FdmStepConditionComposite::vanilla_composite(
//!     &FdmExercise::European,
//!     mesher.clone(),
//!     calculator.clone(),
//! )?);
//! let mut op = FdmBlackScholesOp::new(mesher.clone(), r, 0.0, vol, 0)?;
//!
//! let desc = FdmSolverDesc {
//!     mesher,
//!     bc_set: FdmBoundaryConditionSet::new(),
//!     condition,
//!     calculator,
//!     maturity,
//!     time_steps: 100,
//!     damping_steps: 0,
//! };
//! let solver = Fdm1DimSolver::new(desc, FdmSchemeDesc::douglas(), &mut op)?;
//! let price = solver.interpolate_at(spot.ln())?;
//! approx::assert_abs_diff_eq!(price, 5.5735, epsilon = 2e-2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Mathematical utilities: arrays, interpolation, integration, BiCGStab.
pub use ql_math as math;

/// Numerical methods: the finite-difference framework.
pub use ql_methods as methods;
