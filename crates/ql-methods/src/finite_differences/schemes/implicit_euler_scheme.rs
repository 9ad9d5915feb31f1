//! Implicit Euler: `(I − dt·L) u(t − dt) = u(t)`.
//!
//! One-dimensional operators are inverted directly by the tridiagonal
//! splitting solve. With several axes the full system is solved with
//! BiCGStab, preconditioned by one splitting sweep per axis.

use ql_core::{errors::Result, Real, Size, Time};
use ql_math::{Array, BiCGStab};

use super::{begin_step, TimeSteppingScheme};
use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Default relative tolerance of the iterative solve.
pub const DEFAULT_RELATIVE_TOLERANCE: Real = 1e-8;

/// `a ← (I − θ·dt·L)⁻¹ a`; returns the iterations spent in BiCGStab.
pub(crate) fn implicit_step(
    map: &mut dyn FdmLinearOpComposite,
    bc_set: &mut FdmBoundaryConditionSet,
    a: &mut Array,
    t: Time,
    dt: Option<Time>,
    theta: Real,
    rel_tol: Real,
) -> Result<Size> {
    let dt = begin_step(map, bc_set, t, dt)?;
    bc_set.apply_before_solving(map, a)?;
    let s = theta * dt;

    let mut iterations = 0;
    if map.size() == 1 {
        *a = map.solve_splitting(0, a, s)?;
    } else {
        let op: &dyn FdmLinearOpComposite = map;
        let rhs: &Array = a;
        let solver = BiCGStab::new(
            |x: &Array| Ok(x - &(s * &op.apply(x)?)),
            rhs.size().max(10),
            rel_tol,
        )
        .with_preconditioner(|r: &Array| op.preconditioner(r, s));
        let result = solver.solve(rhs, Some(rhs))?;
        iterations = result.iterations;
        *a = result.x;
    }
    bc_set.apply_after_solving(a)?;
    Ok(iterations)
}

/// Fully implicit Euler scheme; unconditionally stable, first order.
pub struct ImplicitEulerScheme<'a> {
    dt: Option<Time>,
    rel_tol: Real,
    iterations: Size,
    map: &'a mut dyn FdmLinearOpComposite,
    bc_set: &'a mut FdmBoundaryConditionSet,
}

impl<'a> ImplicitEulerScheme<'a> {
    /// Scheme over `map` with boundary conditions `bc_set`.
    pub fn new(
        map: &'a mut dyn FdmLinearOpComposite,
        bc_set: &'a mut FdmBoundaryConditionSet,
    ) -> Self {
        Self {
            dt: None,
            rel_tol: DEFAULT_RELATIVE_TOLERANCE,
            iterations: 0,
            map,
            bc_set,
        }
    }

    /// Override the relative tolerance of the iterative solve.
    pub fn with_relative_tolerance(mut self, rel_tol: Real) -> Self {
        self.rel_tol = rel_tol;
        self
    }

    /// BiCGStab iterations accumulated over all steps so far.
    pub fn number_of_iterations(&self) -> Size {
        self.iterations
    }
}

impl TimeSteppingScheme for ImplicitEulerScheme<'_> {
    fn set_step(&mut self, dt: Time) {
        self.dt = Some(dt);
    }

    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        self.iterations += implicit_step(self.map, self.bc_set, a, t, self.dt, 1.0, self.rel_tol)?;
        Ok(())
    }
}
