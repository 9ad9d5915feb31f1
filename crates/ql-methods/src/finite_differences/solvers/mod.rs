//! Solvers: roll a payoff back to today and answer value and sensitivity
//! queries off the resulting grid.

pub mod fdm_1dim_solver;
pub mod fdm_2dim_solver;

pub use fdm_1dim_solver::Fdm1DimSolver;
pub use fdm_2dim_solver::Fdm2DimSolver;

use std::sync::Arc;

use ql_core::{errors::Result, Size, Time};

use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::step_conditions::{FdmSnapshotCondition, FdmStepConditionComposite};
use crate::finite_differences::utilities::FdmInnerValueCalculator;

/// Everything a solver needs besides the operator and the scheme.
#[derive(Debug)]
pub struct FdmSolverDesc {
    /// Spatial grid.
    pub mesher: Arc<dyn FdmMesher>,
    /// Boundary conditions.
    pub bc_set: FdmBoundaryConditionSet,
    /// Step conditions and their stopping times.
    pub condition: Arc<FdmStepConditionComposite>,
    /// Payoff at maturity.
    pub calculator: Arc<dyn FdmInnerValueCalculator>,
    /// Time to maturity.
    pub maturity: Time,
    /// Number of time steps of the main scheme.
    pub time_steps: Size,
    /// Number of implicit Euler steps taken first.
    pub damping_steps: Size,
}

/// Snapshot one step short of today used for theta, joined after the
/// other step conditions.
fn theta_snapshot(
    desc: &FdmSolverDesc,
) -> (Arc<FdmSnapshotCondition>, Arc<FdmStepConditionComposite>) {
    let first_stop = desc
        .condition
        .stopping_times()
        .first()
        .copied()
        .unwrap_or(desc.maturity);
    let snapshot = Arc::new(FdmSnapshotCondition::new(0.99 * first_stop.min(1.0 / 365.0)));
    let joined = Arc::new(FdmStepConditionComposite::join_conditions(&snapshot, &desc.condition));
    (snapshot, joined)
}

fn check_desc(desc: &FdmSolverDesc) -> Result<()> {
    ql_core::ensure_arg!(
        desc.maturity > 0.0 && desc.maturity.is_finite(),
        "maturity must be positive, got {}",
        desc.maturity
    );
    ql_core::ensure_arg!(desc.time_steps > 0, "at least one time step is required");
    Ok(())
}
