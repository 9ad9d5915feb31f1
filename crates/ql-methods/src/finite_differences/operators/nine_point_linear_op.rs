//! Operator coupling each grid point with its 3×3 neighbourhood in the
//! plane spanned by two axes.
//!
//! Index `aJK` is the coefficient of the neighbour at offset `J − 1` along
//! `d0` and `K − 1` along `d1`.

use std::sync::Arc;

use ql_core::{errors::Result, Real, Size};
use ql_math::Array;

use super::{check_size, FdmLinearOp};
use crate::finite_differences::meshers::FdmMesher;

/// Nine-point stencil over axes `d0` and `d1`.
#[derive(Debug, Clone)]
pub struct NinePointLinearOp {
    d0: Size,
    d1: Size,
    // neighbour indices, row-major over (d0 offset, d1 offset)
    index: Arc<[[Size; 9]]>,
    // coefficients, same ordering
    a: Vec<[Real; 9]>,
    mesher: Arc<dyn FdmMesher>,
}

impl NinePointLinearOp {
    /// Zero operator over axes `d0` and `d1`.
    ///
    /// # Errors
    /// `InvalidArgument` if the axes coincide or are out of range.
    pub fn new(d0: Size, d1: Size, mesher: Arc<dyn FdmMesher>) -> Result<Self> {
        let layout = mesher.layout();
        let ndim = layout.dim().len();
        ql_core::ensure_arg!(
            d0 != d1 && d0 < ndim && d1 < ndim,
            "invalid directions ({d0}, {d1}) for a {ndim}-dimensional mesher"
        );

        let index: Vec<[Size; 9]> = layout
            .iter()
            .map(|iter| {
                let mut idx = [0; 9];
                for (j, o0) in (-1..=1).enumerate() {
                    for (k, o1) in (-1..=1).enumerate() {
                        idx[3 * j + k] = layout.neighbourhood2(&iter, d0, o0, d1, o1);
                    }
                }
                idx
            })
            .collect();

        Ok(Self {
            d0,
            d1,
            a: vec![[0.0; 9]; index.len()],
            index: index.into(),
            mesher,
        })
    }

    /// The two axes the stencil spans.
    pub fn directions(&self) -> (Size, Size) {
        (self.d0, self.d1)
    }

    /// Mesher the operator was built on.
    pub fn mesher(&self) -> &Arc<dyn FdmMesher> {
        &self.mesher
    }

    /// Number of grid points.
    pub fn size(&self) -> Size {
        self.a.len()
    }

    /// Coefficient at `(d0 offset + 1, d1 offset + 1)` of row `i`.
    pub fn coefficient(&self, i: Size, j: Size, k: Size) -> Real {
        self.a[i][3 * j + k]
    }

    pub(crate) fn set_coefficients(&mut self, i: Size, coefficients: [Real; 9]) {
        self.a[i] = coefficients;
    }

    /// Row scaling `diag(u) · L`.
    pub fn mult(&self, u: &Array) -> Result<Self> {
        check_size(u, self.size())?;
        let mut ret = self.clone();
        for (row, &s) in ret.a.iter_mut().zip(u.iter()) {
            row.iter_mut().for_each(|c| *c *= s);
        }
        Ok(ret)
    }
}

impl FdmLinearOp for NinePointLinearOp {
    fn apply(&self, u: &Array) -> Result<Array> {
        check_size(u, self.size())?;
        Ok(Array::from_fn(self.size(), |i| {
            self.a[i]
                .iter()
                .zip(self.index[i].iter())
                .map(|(c, &j)| c * u[j])
                .sum()
        }))
    }
}
