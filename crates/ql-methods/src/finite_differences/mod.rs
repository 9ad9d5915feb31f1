//! Finite-difference framework for pricing PDEs.
//!
//! The pieces fit together as follows:
//!
//! * [`meshers`] discretise each axis and combine them into a product grid
//!   whose points are flattened by an [`FdmLinearOpLayout`];
//! * [`operators`] build the spatial operator from banded derivative
//!   stencils, split by axis;
//! * [`boundary_conditions`] patch the solution around every operator
//!   application and every solve;
//! * [`schemes`] advance the solution one step back in time;
//! * [`step_conditions`] impose early exercise and take snapshots at
//!   stopping times;
//! * [`FiniteDifferenceModel`] and [`FdmBackwardSolver`] drive a scheme
//!   over the time grid;
//! * [`solvers`] roll a payoff back to today and interpolate the result.

pub mod boundary_conditions;
pub mod fdm_backward_solver;
pub mod finite_difference_model;
pub mod meshers;
pub mod operators;
pub mod schemes;
pub mod solvers;
pub mod step_conditions;
pub mod utilities;

pub use boundary_conditions::{
    indices_on_boundary, FdmBoundaryCondition, FdmBoundaryConditionSet, FdmBoundarySide,
    FdmDirichletBoundary, FdmTimeDepDirichletBoundary,
};
pub use fdm_backward_solver::FdmBackwardSolver;
pub use finite_difference_model::FiniteDifferenceModel;
pub use meshers::{
    BlackScholesMesherOptions, Concentrating1dMesher, Fdm1dMesher, FdmBlackScholesMesher,
    FdmMesher, FdmMesherComposite, Predefined1dMesher, Uniform1dMesher,
};
pub use operators::{
    FdmBlackScholesOp, FdmHestonOp, FdmLinearOp, FdmLinearOpComposite, FdmLinearOpIterator,
    FdmLinearOpLayout, FirstDerivativeOp, LocalVolFn, NinePointLinearOp, SecondDerivativeOp,
    SecondOrderMixedDerivativeOp, TripleBandLinearOp,
};
pub use schemes::{
    CraigSneydScheme, CrankNicolsonScheme, DouglasScheme, ExplicitEulerScheme, FdmSchemeDesc,
    FdmSchemeType, HundsdorferScheme, ImplicitEulerScheme, MixedScheme, ModifiedCraigSneydScheme,
    TimeSteppingScheme,
};
pub use solvers::{Fdm1DimSolver, Fdm2DimSolver, FdmSolverDesc};
pub use step_conditions::{
    FdmAmericanStepCondition, FdmBermudanStepCondition, FdmExercise, FdmSnapshotCondition,
    FdmStepCondition, FdmStepConditionComposite,
};
pub use utilities::{
    CashOrNothingPayoff, FdmInnerValueCalculator, FdmLogInnerValue, FdmZeroInnerValue, OptionType,
    Payoff, PlainVanillaPayoff,
};
