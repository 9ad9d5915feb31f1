//! Douglas ADI scheme: an explicit predictor followed by one implicit
//! correction per axis. θ = ½ is second order when there is no mixed term.

use ql_core::{errors::Result, Real, Time};
use ql_math::Array;

use super::{begin_step, explicit_predictor, splitting_sweep, TimeSteppingScheme};
use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Douglas alternating-direction scheme.
pub struct DouglasScheme<'a> {
    dt: Option<Time>,
    theta: Real,
    map: &'a mut dyn FdmLinearOpComposite,
    bc_set: &'a mut FdmBoundaryConditionSet,
}

impl<'a> DouglasScheme<'a> {
    /// Douglas scheme with implicitness `theta`.
    pub fn new(
        theta: Real,
        map: &'a mut dyn FdmLinearOpComposite,
        bc_set: &'a mut FdmBoundaryConditionSet,
    ) -> Self {
        Self {
            dt: None,
            theta,
            map,
            bc_set,
        }
    }
}

impl TimeSteppingScheme for DouglasScheme<'_> {
    fn set_step(&mut self, dt: Time) {
        self.dt = Some(dt);
    }

    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        let dt = begin_step(self.map, self.bc_set, t, self.dt)?;
        let mut y = explicit_predictor(self.map, self.bc_set, a, dt)?;
        splitting_sweep(self.map, &mut y, a, self.theta * dt)?;
        self.bc_set.apply_before_solving(self.map, &mut y)?;
        self.bc_set.apply_after_solving(&mut y)?;
        *a = y;
        Ok(())
    }
}
