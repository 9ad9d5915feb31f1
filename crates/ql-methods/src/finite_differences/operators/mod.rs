//! Linear operators on finite-difference grids.
//!
//! [`FdmLinearOp`] is anything that maps a grid vector to a grid vector.
//! [`FdmLinearOpComposite`] is the full spatial operator of a PDE, split by
//! axis so that ADI schemes can treat each direction implicitly on its own.

pub mod fdm_black_scholes_op;
pub mod fdm_heston_op;
pub mod fdm_linear_op_layout;
pub mod first_derivative_op;
pub mod nine_point_linear_op;
pub mod second_derivative_op;
pub mod second_order_mixed_derivative_op;
pub mod triple_band_linear_op;

pub use fdm_black_scholes_op::{FdmBlackScholesOp, LocalVolFn};
pub use fdm_heston_op::FdmHestonOp;
pub use fdm_linear_op_layout::{FdmLinearOpIterator, FdmLinearOpLayout, LayoutIter};
pub use first_derivative_op::FirstDerivativeOp;
pub use nine_point_linear_op::NinePointLinearOp;
pub use second_derivative_op::SecondDerivativeOp;
pub use second_order_mixed_derivative_op::SecondOrderMixedDerivativeOp;
pub use triple_band_linear_op::TripleBandLinearOp;

use ql_core::{errors::Result, Real, Size, Time};
use ql_math::Array;

/// A linear map on grid vectors.
pub trait FdmLinearOp {
    /// `L · r`.
    ///
    /// # Errors
    /// `InvalidArgument` if `r` does not have one entry per grid point.
    fn apply(&self, r: &Array) -> Result<Array>;
}

/// Spatial operator of a PDE, decomposed along the grid axes.
///
/// `L = Σ_k L_k + L_mixed`, where `L_k` only couples neighbours along axis
/// `k` and `L_mixed` holds the cross-derivative terms.
pub trait FdmLinearOpComposite: FdmLinearOp {
    /// Number of axes the operator is split into.
    fn size(&self) -> Size;

    /// Refresh time-dependent coefficients for a step over `[t1, t2]`.
    fn set_time(&mut self, t1: Time, t2: Time) -> Result<()>;

    /// `L_mixed · r`.
    fn apply_mixed(&self, r: &Array) -> Result<Array>;

    /// `L_direction · r`.
    ///
    /// # Errors
    /// `InvalidArgument` if `direction >= size()` or on a size mismatch.
    fn apply_direction(&self, direction: Size, r: &Array) -> Result<Array>;

    /// Solve `(I − s · L_direction) x = r` with one tridiagonal sweep.
    ///
    /// # Errors
    /// `InvalidArgument` for a bad direction or size, `Numerical` on a
    /// singular pivot.
    fn solve_splitting(&self, direction: Size, r: &Array, s: Real) -> Result<Array>;

    /// Cheap approximation of `(I − s · L)⁻¹ r`, used to precondition
    /// iterative solvers.
    fn preconditioner(&self, r: &Array, s: Real) -> Result<Array>;
}

/// Reject vectors that do not match the grid.
pub(crate) fn check_size(r: &Array, size: Size) -> Result<()> {
    ql_core::ensure_arg!(
        r.size() == size,
        "vector of size {} does not match grid of size {size}",
        r.size()
    );
    Ok(())
}
