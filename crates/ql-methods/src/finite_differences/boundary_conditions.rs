//! Boundary conditions for finite-difference schemes.
//!
//! A condition gets four hooks around every explicit operator application
//! and every implicit solve. Dirichlet conditions only use the `after`
//! hooks and overwrite the boundary nodes; the `before` hooks exist so that
//! conditions that reshape the operator itself can be added.

use std::sync::Arc;

use ql_core::{errors::Result, Real, Size, Time};
use ql_math::Array;

use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::operators::{FdmLinearOpComposite, FdmLinearOpLayout};

/// Side of an axis a boundary condition acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FdmBoundarySide {
    /// First grid point of the axis.
    Lower,
    /// Last grid point of the axis.
    Upper,
}

/// Flat indices of all grid points on one side of one axis, in layout order.
pub fn indices_on_boundary(
    layout: &FdmLinearOpLayout,
    direction: Size,
    side: FdmBoundarySide,
) -> Result<Vec<Size>> {
    let ndim = layout.dim().len();
    ql_core::ensure_arg!(
        direction < ndim,
        "direction {direction} out of range for a {ndim}-dimensional layout"
    );
    let edge = match side {
        FdmBoundarySide::Lower => 0,
        FdmBoundarySide::Upper => layout.dim()[direction] - 1,
    };
    Ok(layout
        .iter()
        .filter(|iter| iter.coordinates()[direction] == edge)
        .map(|iter| iter.index())
        .collect())
}

/// A boundary condition for time-stepping schemes.
pub trait FdmBoundaryCondition {
    /// Adjust the operator before it is applied explicitly.
    fn apply_before_applying(&self, _op: &mut dyn FdmLinearOpComposite) -> Result<()> {
        Ok(())
    }

    /// Fix up the vector after an explicit application.
    fn apply_after_applying(&self, a: &mut Array) -> Result<()>;

    /// Adjust operator and right-hand side before an implicit solve.
    fn apply_before_solving(
        &self,
        _op: &mut dyn FdmLinearOpComposite,
        _rhs: &mut Array,
    ) -> Result<()> {
        Ok(())
    }

    /// Fix up the vector after an implicit solve.
    fn apply_after_solving(&self, a: &mut Array) -> Result<()>;

    /// Move the condition to time `t`.
    fn set_time(&mut self, _t: Time) {}
}

fn overwrite(a: &mut Array, indices: &[Size], value: Real) -> Result<()> {
    for &i in indices {
        ql_core::ensure_arg!(
            i < a.size(),
            "boundary index {i} outside of a vector of size {}",
            a.size()
        );
        a[i] = value;
    }
    Ok(())
}

// ── Dirichlet ─────────────────────────────────────────────────────────────────

/// Fixed value on one side of one axis.
#[derive(Debug, Clone)]
pub struct FdmDirichletBoundary {
    side: FdmBoundarySide,
    value: Real,
    indices: Vec<Size>,
}

impl FdmDirichletBoundary {
    /// Boundary `value` on `side` of `direction`; the touched indices are
    /// computed once here.
    pub fn new(
        mesher: &Arc<dyn FdmMesher>,
        value: Real,
        direction: Size,
        side: FdmBoundarySide,
    ) -> Result<Self> {
        Ok(Self {
            side,
            value,
            indices: indices_on_boundary(mesher.layout(), direction, side)?,
        })
    }

    /// Side of the axis.
    pub fn side(&self) -> FdmBoundarySide {
        self.side
    }

    /// Flat indices set by the condition.
    pub fn indices(&self) -> &[Size] {
        &self.indices
    }
}

impl FdmBoundaryCondition for FdmDirichletBoundary {
    fn apply_after_applying(&self, a: &mut Array) -> Result<()> {
        overwrite(a, &self.indices, self.value)
    }

    fn apply_after_solving(&self, a: &mut Array) -> Result<()> {
        self.apply_after_applying(a)
    }
}

/// Dirichlet value that changes with time, e.g. a discounted rebate.
pub struct FdmTimeDepDirichletBoundary {
    value_at: Box<dyn Fn(Time) -> Real + Send + Sync>,
    indices: Vec<Size>,
    value: Real,
}

impl std::fmt::Debug for FdmTimeDepDirichletBoundary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdmTimeDepDirichletBoundary")
            .field("indices", &self.indices)
            .field("value", &self.value)
            .finish()
    }
}

impl FdmTimeDepDirichletBoundary {
    /// Boundary value `value_at(t)` on `side` of `direction`.
    ///
    /// Until the first `set_time` the value at `t = 0` is used.
    pub fn new<F>(
        mesher: &Arc<dyn FdmMesher>,
        value_at: F,
        direction: Size,
        side: FdmBoundarySide,
    ) -> Result<Self>
    where
        F: Fn(Time) -> Real + Send + Sync + 'static,
    {
        let value = value_at(0.0);
        Ok(Self {
            value_at: Box::new(value_at),
            indices: indices_on_boundary(mesher.layout(), direction, side)?,
            value,
        })
    }
}

impl FdmBoundaryCondition for FdmTimeDepDirichletBoundary {
    fn apply_after_applying(&self, a: &mut Array) -> Result<()> {
        overwrite(a, &self.indices, self.value)
    }

    fn apply_after_solving(&self, a: &mut Array) -> Result<()> {
        self.apply_after_applying(a)
    }

    fn set_time(&mut self, t: Time) {
        self.value = (self.value_at)(t);
    }
}

// ── Condition set ─────────────────────────────────────────────────────────────

/// Ordered collection of boundary conditions applied together.
#[derive(Default)]
pub struct FdmBoundaryConditionSet {
    conditions: Vec<Box<dyn FdmBoundaryCondition + Send + Sync>>,
}

impl std::fmt::Debug for FdmBoundaryConditionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdmBoundaryConditionSet")
            .field("len", &self.conditions.len())
            .finish()
    }
}

impl FdmBoundaryConditionSet {
    /// Empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a condition; later conditions win where index sets overlap.
    pub fn push<B>(&mut self, condition: B)
    where
        B: FdmBoundaryCondition + Send + Sync + 'static,
    {
        self.conditions.push(Box::new(condition));
    }

    /// Builder form of [`push`](Self::push).
    pub fn with<B>(mut self, condition: B) -> Self
    where
        B: FdmBoundaryCondition + Send + Sync + 'static,
    {
        self.push(condition);
        self
    }

    /// Number of conditions.
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// `true` if no condition is registered.
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    /// Run every `apply_before_applying` hook.
    pub fn apply_before_applying(&self, op: &mut dyn FdmLinearOpComposite) -> Result<()> {
        self.conditions
            .iter()
            .try_for_each(|c| c.apply_before_applying(op))
    }

    /// Run every `apply_after_applying` hook.
    pub fn apply_after_applying(&self, a: &mut Array) -> Result<()> {
        self.conditions
            .iter()
            .try_for_each(|c| c.apply_after_applying(a))
    }

    /// Run every `apply_before_solving` hook.
    pub fn apply_before_solving(
        &self,
        op: &mut dyn FdmLinearOpComposite,
        rhs: &mut Array,
    ) -> Result<()> {
        self.conditions
            .iter()
            .try_for_each(|c| c.apply_before_solving(op, rhs))
    }

    /// Run every `apply_after_solving` hook.
    pub fn apply_after_solving(&self, a: &mut Array) -> Result<()> {
        self.conditions
            .iter()
            .try_for_each(|c| c.apply_after_solving(a))
    }

    /// Move every condition to time `t`.
    pub fn set_time(&mut self, t: Time) {
        self.conditions.iter_mut().for_each(|c| c.set_time(t));
    }
}
