//! `∂²/∂x∂y` as the tensor product of the two first-derivative stencils.
//!
//! Interior points get a second-order accurate cross stencil; on the
//! edges and corners the one-sided first-derivative weights are used
//! along the affected axis.

use std::ops::Deref;
use std::sync::Arc;

use ql_core::{errors::Result, Size};

use super::first_derivative_op::first_derivative_weights;
use super::NinePointLinearOp;
use crate::finite_differences::meshers::FdmMesher;

/// Mixed second-derivative operator over axes `d0` and `d1`.
#[derive(Debug, Clone)]
pub struct SecondOrderMixedDerivativeOp(NinePointLinearOp);

impl SecondOrderMixedDerivativeOp {
    /// Build `∂²/∂x_d0 ∂x_d1` on `mesher`.
    pub fn new(d0: Size, d1: Size, mesher: Arc<dyn FdmMesher>) -> Result<Self> {
        let mut op = NinePointLinearOp::new(d0, d1, mesher.clone())?;
        let layout = mesher.layout();
        let (n0, n1) = (layout.dim()[d0], layout.dim()[d1]);

        for iter in layout.iter() {
            let c = iter.coordinates();
            let w0 = first_derivative_weights(
                c[d0],
                n0,
                mesher.dminus(&iter, d0),
                mesher.dplus(&iter, d0),
            )?;
            let w1 = first_derivative_weights(
                c[d1],
                n1,
                mesher.dminus(&iter, d1),
                mesher.dplus(&iter, d1),
            )?;
            let mut a = [0.0; 9];
            for j in 0..3 {
                for k in 0..3 {
                    a[3 * j + k] = w0[j] * w1[k];
                }
            }
            op.set_coefficients(iter.index(), a);
        }
        Ok(Self(op))
    }

    /// Unwrap the underlying nine-point operator.
    pub fn into_inner(self) -> NinePointLinearOp {
        self.0
    }
}

impl Deref for SecondOrderMixedDerivativeOp {
    type Target = NinePointLinearOp;

    fn deref(&self) -> &NinePointLinearOp {
        &self.0
    }
}

impl From<SecondOrderMixedDerivativeOp> for NinePointLinearOp {
    fn from(op: SecondOrderMixedDerivativeOp) -> Self {
        op.0
    }
}
