//! Explicit Euler: `u(t − dt) = u(t) + dt · L u(t)`.

use ql_core::{errors::Result, Real, Time};
use ql_math::Array;

use super::{begin_step, TimeSteppingScheme};
use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
use crate::finite_differences::operators::FdmLinearOpComposite;

/// `a ← a + θ·dt·L a`, boundary conditions applied afterwards.
pub(crate) fn explicit_step(
    map: &mut dyn FdmLinearOpComposite,
    bc_set: &mut FdmBoundaryConditionSet,
    a: &mut Array,
    t: Time,
    dt: Option<Time>,
    theta: Real,
) -> Result<()> {
    let dt = begin_step(map, bc_set, t, dt)?;
    bc_set.apply_before_applying(map)?;
    let la = map.apply(a)?;
    a.axpy(theta * dt, &la);
    bc_set.apply_after_applying(a)
}

/// Explicit Euler scheme. Only conditionally stable.
pub struct ExplicitEulerScheme<'a> {
    dt: Option<Time>,
    map: &'a mut dyn FdmLinearOpComposite,
    bc_set: &'a mut FdmBoundaryConditionSet,
}

impl<'a> ExplicitEulerScheme<'a> {
    /// Scheme over `map` with boundary conditions `bc_set`.
    pub fn new(
        map: &'a mut dyn FdmLinearOpComposite,
        bc_set: &'a mut FdmBoundaryConditionSet,
    ) -> Self {
        Self {
            dt: None,
            map,
            bc_set,
        }
    }
}

impl TimeSteppingScheme for ExplicitEulerScheme<'_> {
    fn set_step(&mut self, dt: Time) {
        self.dt = Some(dt);
    }

    fn step(&mut self, a: &mut Array, t: Time) -> Result<()> {
        explicit_step(self.map, self.bc_set, a, t, self.dt, 1.0)
    }
}
