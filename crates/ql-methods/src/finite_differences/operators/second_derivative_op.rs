//! `∂²/∂x²` along one axis on a non-uniform grid.
//!
//! Edge rows are left at zero: the curvature at the boundary is not
//! estimated and has to come from a boundary condition.

use std::ops::Deref;
use std::sync::Arc;

use ql_core::{errors::Result, Error, Size};

use super::TripleBandLinearOp;
use crate::finite_differences::meshers::FdmMesher;

/// Second-derivative operator.
#[derive(Debug, Clone)]
pub struct SecondDerivativeOp(TripleBandLinearOp);

impl SecondDerivativeOp {
    /// Build `∂²/∂x_direction²` on `mesher`.
    pub fn new(direction: Size, mesher: Arc<dyn FdmMesher>) -> Result<Self> {
        let mut op = TripleBandLinearOp::new(direction, mesher.clone())?;
        let layout = mesher.layout();
        let last = layout.dim()[direction] - 1;
        for iter in layout.iter() {
            let c = iter.coordinates()[direction];
            if c == 0 || c == last {
                continue;
            }
            let (Some(hm), Some(hp)) =
                (mesher.dminus(&iter, direction), mesher.dplus(&iter, direction))
            else {
                return Err(Error::InvalidArgument(format!(
                    "missing grid spacing at interior coordinate {c}"
                )));
            };
            op.set_row(
                iter.index(),
                2.0 / (hm * (hm + hp)),
                -2.0 / (hm * hp),
                2.0 / (hp * (hm + hp)),
            );
        }
        Ok(Self(op))
    }

    /// Unwrap the underlying triple-band operator.
    pub fn into_inner(self) -> TripleBandLinearOp {
        self.0
    }
}

impl Deref for SecondDerivativeOp {
    type Target = TripleBandLinearOp;

    fn deref(&self) -> &TripleBandLinearOp {
        &self.0
    }
}

impl From<SecondDerivativeOp> for TripleBandLinearOp {
    fn from(op: SecondDerivativeOp) -> Self {
        op.0
    }
}
