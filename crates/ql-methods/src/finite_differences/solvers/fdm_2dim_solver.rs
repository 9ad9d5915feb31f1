//! Two-dimensional solver.

use std::sync::Arc;

use log::debug;
use ql_core::{
    errors::{Error, Result},
    Real, Time,
};
use ql_math::{Array, BicubicSpline, Interpolation2D, Matrix};

use super::{check_desc, theta_snapshot, FdmSolverDesc};
use crate::finite_differences::fdm_backward_solver::FdmBackwardSolver;
use crate::finite_differences::operators::FdmLinearOpComposite;
use crate::finite_differences::schemes::FdmSchemeDesc;
use crate::finite_differences::step_conditions::FdmSnapshotCondition;

/// Rolls the payoff back to `t = 0` at construction and interpolates the
/// result with a bicubic spline over `(x, y)`.
#[derive(Debug)]
pub struct Fdm2DimSolver {
    x: Vec<Real>,
    y: Vec<Real>,
    result_values: Matrix,
    first_stopping_time: Option<Time>,
    theta_condition: Arc<FdmSnapshotCondition>,
    interpolation: BicubicSpline,
}

impl Fdm2DimSolver {
    /// Solve with `op` under `scheme_desc`.
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
            layout.dim().len() == 2,
            "two-dimensional solver needs a 2-d mesher, got {} dimensions",
            layout.dim().len()
        );
        debug!("2-d solver on a {:?} grid", layout.dim());

        let (nx, ny) = (layout.dim()[0], layout.dim()[1]);
        let mut x = Vec::with_capacity(nx);
        let mut y = Vec::with_capacity(ny);
        let mut rhs = Array::zeros(layout.size());
        for iter in layout.iter() {
            rhs[iter.index()] = calculator.avg_inner_value(&iter, maturity)?;
            let c = iter.coordinates();
            if c[1] == 0 {
                x.push(mesher.location(&iter, 0));
            }
            if c[0] == 0 {
                y.push(mesher.location(&iter, 1));
            }
        }

        FdmBackwardSolver::new(op, &mut bc_set, Some(conditions), scheme_desc).rollback(
            &mut rhs,
            maturity,
            0.0,
            time_steps,
            damping_steps,
        )?;

        // first axis runs fastest, so the flat vector is the row-major (y, x) grid
        let result_values = Matrix::from_row_slice(ny, nx, rhs.as_slice());
        let interpolation = BicubicSpline::new(&x, &y, rhs.as_slice())?;
        Ok(Self {
            x,
            y,
            result_values,
            first_stopping_time,
            theta_condition,
            interpolation,
        })
    }

    fn check_range(&self, x: Real, y: Real) -> Result<()> {
        ql_core::ensure_arg!(
            self.interpolation.is_in_range(x, y),
            "({x}, {y}) outside of the grid [{}, {}] x [{}, {}]",
            self.interpolation.x_min(),
            self.interpolation.x_max(),
            self.interpolation.y_min(),
            self.interpolation.y_max()
        );
        Ok(())
    }

    /// Grid locations along the first axis.
    pub fn x(&self) -> &[Real] {
        &self.x
    }

    /// Grid locations along the second axis.
    pub fn y(&self) -> &[Real] {
        &self.y
    }

    /// Values at `t = 0`; row `j` holds the slice at `y[j]`.
    pub fn result_values(&self) -> &Matrix {
        &self.result_values
    }

    /// Value at `(x, y)`.
    pub fn interpolate_at(&self, x: Real, y: Real) -> Result<Real> {
        self.check_range(x, y)?;
        Ok(self.interpolation.operator(x, y))
    }

    /// `∂u/∂x`.
    pub fn derivative_x(&self, x: Real, y: Real) -> Result<Real> {
        self.check_range(x, y)?;
        Ok(self.interpolation.derivative_x(x, y))
    }

    /// `∂u/∂y`.
    pub fn derivative_y(&self, x: Real, y: Real) -> Result<Real> {
        self.check_range(x, y)?;
        Ok(self.interpolation.derivative_y(x, y))
    }

    /// `∂²u/∂x²`.
    pub fn derivative_xx(&self, x: Real, y: Real) -> Result<Real> {
        self.check_range(x, y)?;
        Ok(self.interpolation.derivative_xx(x, y))
    }

    /// `∂²u/∂y²`.
    pub fn derivative_yy(&self, x: Real, y: Real) -> Result<Real> {
        self.check_range(x, y)?;
        Ok(self.interpolation.derivative_yy(x, y))
    }

    /// `∂²u/∂x∂y`.
    pub fn derivative_xy(&self, x: Real, y: Real) -> Result<Real> {
        self.check_range(x, y)?;
        Ok(self.interpolation.derivative_xy(x, y))
    }

    /// Time decay at `(x, y)`; fails when a stopping time sits at zero.
    pub fn theta_at(&self, x: Real, y: Real) -> Result<Real> {
        if self.first_stopping_time == Some(0.0) {
            return Err(Error::InvalidArgument(
                "stopping time at zero, can't calculate theta".into(),
            ));
        }
        let snapshot = self
            .theta_condition
            .values()
            .ok_or_else(|| Error::Runtime("theta snapshot was not taken".into()))?;
        let earlier = BicubicSpline::new(&self.x, &self.y, snapshot.as_slice())?;
        Ok((earlier.operator(x, y) - self.interpolate_at(x, y)?) / self.theta_condition.time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
    use crate::finite_differences::meshers::{FdmMesher, FdmMesherComposite, Uniform1dMesher};
    use crate::finite_differences::operators::FdmHestonOp;
    use crate::finite_differences::step_conditions::{FdmExercise, FdmStepConditionComposite};
    use crate::finite_differences::utilities::{
        FdmInnerValueCalculator, FdmLogInnerValue, OptionType, PlainVanillaPayoff,
    };

    fn solve(scheme: FdmSchemeDesc) -> Fdm2DimSolver {
        let mesher: Arc<dyn FdmMesher> = Arc::new(
            FdmMesherComposite::from_2d(
                Uniform1dMesher::new(3.6, 5.6, 41).unwrap(),
                Uniform1dMesher::new(0.0, 0.4, 21).unwrap(),
            )
            .unwrap(),
        );
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Call, 100.0));
        let calculator: Arc<dyn FdmInnerValueCalculator> =
            Arc::new(FdmLogInnerValue::new(payoff, mesher.clone(), 0).unwrap());
        let condition = Arc::new(
            FdmStepConditionComposite::vanilla_composite(
                &FdmExercise::European,
                mesher.clone(),
                calculator.clone(),
            )
            .unwrap(),
        );
        let mut op =
            FdmHestonOp::new(mesher.clone(), 0.03, 0.0, 2.0, 0.04, 0.3, -0.5).unwrap();
        let desc = FdmSolverDesc {
            mesher,
            bc_set: FdmBoundaryConditionSet::new(),
            condition,
            calculator,
            maturity: 0.5,
            time_steps: 40,
            damping_steps: 2,
        };
        Fdm2DimSolver::new(desc, scheme, &mut op).unwrap()
    }

    #[test]
    fn grid_and_result_shape() {
        let solver = solve(FdmSchemeDesc::craig_sneyd());
        assert_eq!(solver.x().len(), 41);
        assert_eq!(solver.y().len(), 21);
        let m = solver.result_values();
        assert_eq!((m.rows(), m.cols()), (21, 41));
    }

    #[test]
    fn call_sensitivities_have_the_right_signs() {
        let solver = solve(FdmSchemeDesc::hundsdorfer());
        let (x, v) = (100.0f64.ln(), 0.04);
        let value = solver.interpolate_at(x, v).unwrap();
        assert!(value > 2.0 && value < 12.0, "{value}");
        assert!(solver.derivative_x(x, v).unwrap() > 0.0);
        // vega in variance terms
        assert!(solver.derivative_y(x, v).unwrap() > 0.0);
        assert!(solver.derivative_xx(x, v).unwrap().is_finite());
        assert!(solver.derivative_yy(x, v).unwrap().is_finite());
        assert!(solver.derivative_xy(x, v).unwrap().is_finite());
        assert!(solver.theta_at(x, v).unwrap() < 0.0);
        assert!(solver.interpolate_at(x, 0.5).is_err());
    }
}
