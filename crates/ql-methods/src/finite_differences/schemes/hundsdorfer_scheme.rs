//! Hundsdorfer-Verwer ADI scheme. The corrector re-applies the full
//! operator to the predictor increment and sweeps around the first
//! stage instead of the starting vector.

use ql_core::{errors::Result, Real, Time};
use ql_math::Array;

use super::{begin_step, explicit_predictor, splitting_sweep, TimeSteppingScheme};
use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Hundsdorfer-Verwer alternating-direction scheme.
pub struct HundsdorferScheme<'a> {
    dt: Option<Time>,
    theta: Real,
    mu: Real,
    map: &'a mut dyn FdmLinearOpComposite,
    bc_set: &'a mut FdmBoundaryConditionSet,
}

impl<'a> HundsdorferScheme<'a> {
    /// Hundsdorfer-Verwer with implicitness `theta` and weight `mu`.
    pub fn new(
        theta: Real,
        mu: Real,
        map: &'a mut dyn FdmLinearOpComposite,
        bc_set: &'a mut FdmBoundaryConditionSet,
    ) -> Self {
        Self {
            dt: None,
            theta,
            mu,
            map,
            bc_set,
        }
    }
}

impl TimeSteppingScheme for HundsdorferScheme<'_> {
    fn set_step(&mut self, dt: Time) {
        self.dt = Some(dt);
    }

    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        let dt = begin_step(self.map, self.bc_set, t, self.dt)?;
        let s = self.theta * dt;

        let y0 = explicit_predictor(self.map, self.bc_set, a, dt)?;
        let mut y = y0.clone();
        splitting_sweep(self.map, &mut y, a, s)?;
        self.bc_set.apply_after_solving(&mut y)?;

        self.bc_set.apply_before_applying(self.map)?;
        let diff = &y - &*a;
        let mut yt = &y0 + &(self.mu * dt * &self.map.apply(&diff)?);
        self.bc_set.apply_after_applying(&mut yt)?;

        splitting_sweep(self.map, &mut yt, &y, s)?;
        self.bc_set.apply_before_solving(self.map, &mut yt)?;
        self.bc_set.apply_after_solving(&mut yt)?;
        *a = yt;
        Ok(())
    }
}
