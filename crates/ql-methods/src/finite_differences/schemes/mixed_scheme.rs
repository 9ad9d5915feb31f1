//! θ-scheme: an explicit Euler step with weight `1 − θ` followed by an
//! implicit Euler step with weight `θ`.
//!
//! θ = 0 is explicit Euler, θ = 1 implicit Euler and θ = ½ Crank-Nicolson.

use ql_core::{errors::Result, Real, Size, Time};
use ql_math::Array;

use super::explicit_euler_scheme::explicit_step;
use super::implicit_euler_scheme::{implicit_step, DEFAULT_RELATIVE_TOLERANCE};
use super::TimeSteppingScheme;
use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Weighted blend of explicit and implicit Euler.
pub struct MixedScheme<'a> {
    dt: Option<Time>,
    theta: Real,
    rel_tol: Real,
    iterations: Size,
    map: &'a mut dyn FdmLinearOpComposite,
    bc_set: &'a mut FdmBoundaryConditionSet,
}

/// Crank-Nicolson is the θ-scheme; θ = ½ gives second order in time.
pub type CrankNicolsonScheme<'a> = MixedScheme<'a>;

impl<'a> MixedScheme<'a> {
    /// θ-scheme over `map`.
    pub fn new(
        theta: Real,
        map: &'a mut dyn FdmLinearOpComposite,
        bc_set: &'a mut FdmBoundaryConditionSet,
    ) -> Self {
        Self {
            dt: None,
            theta,
            rel_tol: DEFAULT_RELATIVE_TOLERANCE,
            iterations: 0,
            map,
            bc_set,
        }
    }

    /// Crank-Nicolson, θ = ½.
    pub fn crank_nicolson(
        map: &'a mut dyn FdmLinearOpComposite,
        bc_set: &'a mut FdmBoundaryConditionSet,
    ) -> Self {
        Self::new(0.5, map, bc_set)
    }

    /// Implicitness parameter.
    pub fn theta(&self) -> Real {
        self.theta
    }

    /// BiCGStab iterations accumulated by the implicit half.
    pub fn number_of_iterations(&self) -> Size {
        self.iterations
    }
}

impl TimeSteppingScheme for MixedScheme<'_> {
    fn set_step(&mut self, dt: Time) {
        self.dt = Some(dt);
    }

    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        if self.theta != 1.0 {
            explicit_step(self.map, self.bc_set, a, t, self.dt, 1.0 - self.theta)?;
        }
        if self.theta != 0.0 {
            self.iterations +=
                implicit_step(self.map, self.bc_set, a, t, self.dt, self.theta, self.rel_tol)?;
        }
        Ok(())
    }
}
