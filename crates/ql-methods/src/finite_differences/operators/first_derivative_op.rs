//! `∂/∂x` along one axis on a non-uniform grid.
//!
//! Interior rows use the second-order three-point stencil built from the
//! backward spacing `hm` and forward spacing `hp`; the first and last rows
//! fall back to one-sided first-order differences.

use std::ops::Deref;
use std::sync::Arc;

use ql_core::{
    errors::{Error, Result},
    Real, Size,
};

use super::TripleBandLinearOp;
use crate::finite_differences::meshers::FdmMesher;

/// Stencil weights `[w₋, w₀, w₊]` of the first derivative at a point with
/// coordinate `c` on an axis of `n` points.
pub(crate) fn first_derivative_weights(
    c: Size,
    n: Size,
    hm: Option<Real>,
    hp: Option<Real>,
) -> Result<[Real; 3]> {
    let missing = || Error::InvalidArgument(format!("missing grid spacing at coordinate {c}"));
    if c == 0 {
        let hp = hp.ok_or_else(missing)?;
        Ok([0.0, -1.0 / hp, 1.0 / hp])
    } else if c == n - 1 {
        let hm = hm.ok_or_else(missing)?;
        Ok([-1.0 / hm, 1.0 / hm, 0.0])
    } else {
        let (hm, hp) = (hm.ok_or_else(missing)?, hp.ok_or_else(missing)?);
        Ok([
            -hp / (hm * (hm + hp)),
            (hp - hm) / (hm * hp),
            hm / (hp * (hm + hp)),
        ])
    }
}

/// First-derivative operator.
#[derive(Debug, Clone)]
pub struct FirstDerivativeOp(TripleBandLinearOp);

impl FirstDerivativeOp {
    /// Build `∂/∂x_direction` on `mesher`.
    pub fn new(direction: Size, mesher: Arc<dyn FdmMesher>) -> Result<Self> {
        let mut op = TripleBandLinearOp::new(direction, mesher.clone())?;
        let layout = mesher.layout();
        let n = layout.dim()[direction];
        for iter in layout.iter() {
            let [lower, diag, upper] = first_derivative_weights(
                iter.coordinates()[direction],
                n,
                mesher.dminus(&iter, direction),
                mesher.dplus(&iter, direction),
            )?;
            op.set_row(iter.index(), lower, diag, upper);
        }
        Ok(Self(op))
    }

    /// Unwrap the underlying triple-band operator.
    pub fn into_inner(self) -> TripleBandLinearOp {
        self.0
    }
}

impl Deref for FirstDerivativeOp {
    type Target = TripleBandLinearOp;

    fn deref(&self) -> &TripleBandLinearOp {
        &self.0
    }
}

impl From<FirstDerivativeOp> for TripleBandLinearOp {
    fn from(op: FirstDerivativeOp) -> Self {
        op.0
    }
}
