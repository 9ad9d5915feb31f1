//! One-dimensional solver.

use std::sync::Arc;

use log::debug;
use ql_core::{
    errors::{Error, Result},
    Real, Time,
};
use ql_math::{Array, CubicNaturalSpline, Interpolation1D};

use super::{check_desc, theta_snapshot, FdmSolverDesc};
use crate::finite_differences::fdm_backward_solver::FdmBackwardSolver;
use crate::finite_differences::operators::FdmLinearOpComposite;
use crate::finite_differences::schemes::FdmSchemeDesc;
use crate::finite_differences::step_conditions::FdmSnapshotCondition;

/// Rolls the payoff back to `t = 0` at construction and interpolates the
/// result with a natural cubic spline.
#[derive(Debug)]
pub struct Fdm1DimSolver {
    x: Vec<Real>,
    result_values: Array,
    first_stopping_time: Option<Time>,
    theta_condition: Arc<FdmSnapshotCondition>,
    interpolation: CubicNaturalSpline,
}

impl Fdm1DimSolver {
    /// Solve with `op` under `scheme_desc`.
    ///
    /// # Errors
    /// Construction errors for a mesher that is not one-dimensional or an
    /// invalid description; numerical errors of the rollback.
    pub fn new(
        solver_desc: FdmSolverDesc,
        scheme_desc: FdmSchemeDesc,
        op: &mut dyn FdmLinearOpComposite,
    ) -> Result<Self> {
        check_desc(&solver_desc)?;
        let (theta_condition, conditions) = theta_snapshot(&solver_desc);
        let first_stopping_time = solver_desc.condition.stopping_times().first().copied();

        let FdmSolverDesc {
            mesher,
            mut bc_set,
            calculator,
            maturity,
            time_steps,
            damping_steps,
            ..
        } = solver_desc;

        let layout = mesher.layout();
        ql_core::ensure_arg!(
            layout.dim().len() == 1,
            "one-dimensional solver needs a 1-d mesher, got {} dimensions",
            layout.dim().len()
        );
        debug!("1-d solver on {} grid points", layout.size());

        let mut x = Vec::with_capacity(layout.size());
        let mut rhs = Array::zeros(layout.size());
        for iter in layout.iter() {
            rhs[iter.index()] = calculator.avg_inner_value(&iter, maturity)?;
            x.push(mesher.location(&iter, 0));
        }

        FdmBackwardSolver::new(op, &mut bc_set, Some(conditions), scheme_desc).rollback(
            &mut rhs,
            maturity,
            0.0,
            time_steps,
            damping_steps,
        )?;

        let interpolation = CubicNaturalSpline::new(&x, rhs.as_slice())?;
        Ok(Self {
            x,
            result_values: rhs,
            first_stopping_time,
            theta_condition,
            interpolation,
        })
    }

    fn check_range(&self, x: Real) -> Result<()> {
        ql_core::ensure_arg!(
            self.interpolation.is_in_range(x),
            "x = {x} outside of the grid [{}, {}]",
            self.interpolation.x_min(),
            self.interpolation.x_max()
        );
        Ok(())
    }

    /// Grid locations.
    pub fn x(&self) -> &[Real] {
        &self.x
    }

    /// Values at `t = 0` on the grid.
    pub fn result_values(&self) -> &Array {
        &self.result_values
    }

    /// Value at `x`.
    pub fn interpolate_at(&self, x: Real) -> Result<Real> {
        self.check_range(x)?;
        Ok(self.interpolation.operator(x))
    }

    /// `∂u/∂x` at `x`.
    pub fn derivative_x(&self, x: Real) -> Result<Real> {
        self.check_range(x)?;
        Ok(self.interpolation.derivative(x))
    }

    /// `∂²u/∂x²` at `x`.
    pub fn derivative_xx(&self, x: Real) -> Result<Real> {
        self.check_range(x)?;
        Ok(self.interpolation.second_derivative(x))
    }

    /// Time decay at `x` from the snapshot taken just before `t = 0`.
    ///
    /// # Errors
    /// Fails when a stopping time sits at zero, since the snapshot then
    /// cannot precede it.
    pub fn theta_at(&self, x: Real) -> Result<Real> {
        if self.first_stopping_time == Some(0.0) {
            return Err(Error::InvalidArgument(
                "stopping time at zero, can't calculate theta".into(),
            ));
        }
        let snapshot = self
            .theta_condition
            .values()
            .ok_or_else(|| Error::Runtime("theta snapshot was not taken".into()))?;
        let earlier = CubicNaturalSpline::new(&self.x, snapshot.as_slice())?;
        Ok((earlier.operator(x) - self.interpolate_at(x)?) / self.theta_condition.time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
    use crate::finite_differences::meshers::{FdmMesher, FdmMesherComposite, Uniform1dMesher};
    use crate::finite_differences::operators::FdmBlackScholesOp;
    use crate::finite_differences::step_conditions::{FdmExercise, FdmStepConditionComposite};
    use crate::finite_differences::utilities::{
        FdmInnerValueCalculator, FdmLogInnerValue, OptionType, PlainVanillaPayoff,
    };

    fn desc(exercise: FdmExercise) -> (FdmSolverDesc, FdmBlackScholesOp) {
        let mesher: Arc<dyn FdmMesher> = Arc::new(
            FdmMesherComposite::from_1d(Uniform1dMesher::new(3.0, 6.0, 151).unwrap()).unwrap(),
        );
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Put, 100.0));
        let calculator: Arc<dyn FdmInnerValueCalculator> =
            Arc::new(FdmLogInnerValue::new(payoff, mesher.clone(), 0).unwrap());
        let condition = Arc::new(
            FdmStepConditionComposite::vanilla_composite(
                &exercise,
                mesher.clone(),
                calculator.clone(),
            )
            .unwrap(),
        );
        let op = FdmBlackScholesOp::new(mesher.clone(), 0.05, 0.0, 0.2, 0).unwrap();
        let desc = FdmSolverDesc {
            mesher,
            bc_set: FdmBoundaryConditionSet::new(),
            condition,
            calculator,
            maturity: 1.0,
            time_steps: 50,
            damping_steps: 0,
        };
        (desc, op)
    }

    #[test]
    fn american_put_is_worth_at_least_intrinsic() {
        let (desc, mut op) = desc(FdmExercise::American);
        let solver = Fdm1DimSolver::new(desc, FdmSchemeDesc::douglas(), &mut op).unwrap();
        // deep in the exercise region
        let x = 60.0f64.ln();
        let value = solver.interpolate_at(x).unwrap();
        assert!(value >= 40.0 - 1e-6, "{value}");
        // dV/dS = V_x / S
        let delta = solver.derivative_x(x).unwrap() / 60.0;
        assert!((-1.0 - 1e-3..=0.0).contains(&delta), "{delta}");
        assert!(solver.derivative_xx(100.0f64.ln()).unwrap().is_finite());
    }

    #[test]
    fn theta_of_european_put() {
        let (desc, mut op) = desc(FdmExercise::European);
        let solver = Fdm1DimSolver::new(desc, FdmSchemeDesc::crank_nicolson(), &mut op).unwrap();
        let theta = solver.theta_at(100.0f64.ln()).unwrap();
        // at-the-money put with r = 5%, σ = 20%, T = 1: Θ ≈ −1.65 per year
        assert!(theta < 0.0 && theta > -3.0, "{theta}");
    }

    #[test]
    fn queries_outside_the_grid_fail() {
        let (desc, mut op) = desc(FdmExercise::European);
        let solver = Fdm1DimSolver::new(desc, FdmSchemeDesc::douglas(), &mut op).unwrap();
        assert!(solver.interpolate_at(2.0).is_err());
        assert!(solver.derivative_x(7.0).is_err());
        assert_eq!(solver.x().len(), 151);
        assert_eq!(solver.result_values().size(), 151);
    }

    #[test]
    fn theta_needs_a_positive_first_stopping_time() {
        let (desc, mut op) = desc(FdmExercise::Bermudan(vec![0.0, 0.5]));
        let solver = Fdm1DimSolver::new(desc, FdmSchemeDesc::douglas(), &mut op).unwrap();
        assert!(solver.theta_at(100.0f64.ln()).is_err());
    }
}
