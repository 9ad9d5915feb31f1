//! Operator acting along a single axis with a three-point stencil.
//!
//! Row `i` couples grid point `i` with its two neighbours `i0[i]` and
//! `i2[i]` along `direction`:
//!
//!   `(L·r)[i] = lower[i]·r[i0[i]] + diag[i]·r[i] + upper[i]·r[i2[i]]`
//!
//! At the two edges of the axis the neighbour index is reflected back into
//! the grid; edge rows must keep the coefficient of the reflected neighbour
//! at zero for the tridiagonal solve to be valid.

use std::sync::Arc;

use ql_core::{
    errors::{Error, Result},
    Real, Size,
};
use ql_math::{Array, Matrix};

use super::{check_size, FdmLinearOp, FdmLinearOpLayout};
use crate::finite_differences::meshers::FdmMesher;

/// Sparse tridiagonal operator along one axis of a (multi-dimensional) grid.
#[derive(Debug, Clone)]
pub struct TripleBandLinearOp {
    direction: Size,
    i0: Arc<[Size]>,
    i2: Arc<[Size]>,
    reverse_index: Arc<[Size]>,
    lower: Vec<Real>,
    diag: Vec<Real>,
    upper: Vec<Real>,
    mesher: Arc<dyn FdmMesher>,
}

impl TripleBandLinearOp {
    /// Zero operator along `direction`.
    ///
    /// # Errors
    /// `InvalidArgument` if `direction` is not an axis of the mesher.
    pub fn new(direction: Size, mesher: Arc<dyn FdmMesher>) -> Result<Self> {
        let layout = mesher.layout();
        let ndim = layout.dim().len();
        ql_core::ensure_arg!(
            direction < ndim,
            "direction {direction} out of range for a {ndim}-dimensional mesher"
        );
        let n = layout.size();

        // ordering in which `direction` varies fastest: each grid line along
        // the axis becomes a contiguous block of one long tridiagonal system
        let mut swapped = layout.dim().to_vec();
        swapped.swap(0, direction);
        let mut new_spacing = FdmLinearOpLayout::new(swapped)?.spacing().to_vec();
        new_spacing.swap(0, direction);

        let mut i0 = vec![0; n];
        let mut i2 = vec![0; n];
        let mut reverse_index = vec![0; n];
        for iter in layout.iter() {
            let i = iter.index();
            i0[i] = layout.neighbourhood(&iter, direction, -1);
            i2[i] = layout.neighbourhood(&iter, direction, 1);
            let new_index: Size = iter
                .coordinates()
                .iter()
                .zip(new_spacing.iter())
                .map(|(c, s)| c * s)
                .sum();
            reverse_index[new_index] = i;
        }

        Ok(Self {
            direction,
            i0: i0.into(),
            i2: i2.into(),
            reverse_index: reverse_index.into(),
            lower: vec![0.0; n],
            diag: vec![0.0; n],
            upper: vec![0.0; n],
            mesher,
        })
    }

    /// Axis the operator acts along.
    pub fn direction(&self) -> Size {
        self.direction
    }

    /// Mesher the operator was built on.
    pub fn mesher(&self) -> &Arc<dyn FdmMesher> {
        &self.mesher
    }

    /// Number of grid points.
    pub fn size(&self) -> Size {
        self.diag.len()
    }

    /// Coefficients of the backward neighbour.
    pub fn lower(&self) -> &[Real] {
        &self.lower
    }

    /// Diagonal coefficients.
    pub fn diag(&self) -> &[Real] {
        &self.diag
    }

    /// Coefficients of the forward neighbour.
    pub fn upper(&self) -> &[Real] {
        &self.upper
    }

    /// Overwrite the coefficients of row `i`.
    pub(crate) fn set_row(&mut self, i: Size, lower: Real, diag: Real, upper: Real) {
        self.lower[i] = lower;
        self.diag[i] = diag;
        self.upper[i] = upper;
    }

    fn check_compatible(&self, other: &TripleBandLinearOp) -> Result<()> {
        ql_core::ensure_arg!(
            self.direction == other.direction && self.size() == other.size(),
            "operators along direction {} ({} points) and {} ({} points) cannot be combined",
            self.direction,
            self.size(),
            other.direction,
            other.size()
        );
        Ok(())
    }

    /// `self = diag(a)·x + y + diag(b)`.
    ///
    /// `a` and `b` are either empty (term dropped), of length one
    /// (broadcast) or one entry per grid point.
    pub fn axpyb(
        &mut self,
        a: &[Real],
        x: &TripleBandLinearOp,
        y: &TripleBandLinearOp,
        b: &[Real],
    ) -> Result<()> {
        let n = self.size();
        self.check_compatible(x)?;
        self.check_compatible(y)?;
        for (name, v) in [("a", a), ("b", b)] {
            ql_core::ensure_arg!(
                v.len() <= 1 || v.len() == n,
                "coefficient {name} has length {} (expected 0, 1 or {n})",
                v.len()
            );
        }
        let coeff = |v: &[Real], i: Size| match v.len() {
            0 => 0.0,
            1 => v[0],
            _ => v[i],
        };

        for i in 0..n {
            let s = coeff(a, i);
            self.lower[i] = y.lower[i] + s * x.lower[i];
            self.diag[i] = y.diag[i] + s * x.diag[i] + coeff(b, i);
            self.upper[i] = y.upper[i] + s * x.upper[i];
        }
        Ok(())
    }

    /// Row scaling `diag(u) · L`.
    pub fn mult(&self, u: &Array) -> Result<Self> {
        check_size(u, self.size())?;
        let mut ret = self.clone();
        for i in 0..self.size() {
            ret.lower[i] *= u[i];
            ret.diag[i] *= u[i];
            ret.upper[i] *= u[i];
        }
        Ok(ret)
    }

    /// `L + M` for an operator along the same axis.
    pub fn add(&self, m: &TripleBandLinearOp) -> Result<Self> {
        self.check_compatible(m)?;
        let mut ret = self.clone();
        for i in 0..self.size() {
            ret.lower[i] += m.lower[i];
            ret.diag[i] += m.diag[i];
            ret.upper[i] += m.upper[i];
        }
        Ok(ret)
    }

    /// `L + diag(u)`.
    pub fn add_diagonal(&self, u: &Array) -> Result<Self> {
        check_size(u, self.size())?;
        let mut ret = self.clone();
        for i in 0..self.size() {
            ret.diag[i] += u[i];
        }
        Ok(ret)
    }

    /// Solve `(b·I + a·L) x = r`.
    ///
    /// The rows are visited in the axis-major order so that all grid lines
    /// along `direction` are handled by a single Thomas sweep.
    ///
    /// # Errors
    /// `InvalidArgument` on a size mismatch or when an edge row couples to
    /// a reflected neighbour; `Numerical` on a zero, vanishingly small or non-finite pivot.
    pub fn solve_splitting(&self, r: &Array, a: Real, b: Real) -> Result<Array> {
        let n = self.size();
        check_size(r, n)?;

        let layout = self.mesher.layout();
        let last = layout.dim()[self.direction] - 1;
        for iter in layout.iter() {
            let c = iter.coordinates()[self.direction];
            let i = iter.index();
            ql_core::ensure_arg!(
                (c != 0 || self.lower[i] == 0.0) && (c != last || self.upper[i] == 0.0),
                "removing non zero entry at grid point {i}"
            );
        }

        // A pivot is rejected when it vanishes relative to the magnitude of
        // its row of `b·I + a·L`; the row scale is floored at machine epsilon.
        let pivot = |p: Real, k: Size, j: Size| -> Result<Real> {
            let scale = b.abs()
                + a.abs() * (self.lower[k].abs() + self.diag[k].abs() + self.upper[k].abs());
            let inv = 1.0 / p;
            let tiny = Real::EPSILON * scale.max(Real::EPSILON);
            if !p.is_finite() || p.abs() <= tiny || !inv.is_finite() {
                return Err(Error::Numerical(format!(
                    "singular pivot {p} in tridiagonal solve at row {j}"
                )));
            }
            Ok(inv)
        };

        let ri = &self.reverse_index;
        let mut ret = Array::zeros(n);
        let mut tmp = vec![0.0; n];

        let mut rim1 = ri[0];
        let mut bet = pivot(a * self.diag[rim1] + b, rim1, 0)?;
        ret[rim1] = r[rim1] * bet;

        for j in 1..n {
            let k = ri[j];
            tmp[j] = a * self.upper[rim1] * bet;
            bet = pivot(b + a * (self.diag[k] - tmp[j] * self.lower[k]), k, j)?;
            ret[k] = (r[k] - a * self.lower[k] * ret[rim1]) * bet;
            rim1 = k;
        }
        for j in (0..n.saturating_sub(1)).rev() {
            let correction = tmp[j + 1] * ret[ri[j + 1]];
            ret[ri[j]] -= correction;
        }
        Ok(ret)
    }

    /// Dense representation, mainly for testing.
    pub fn to_matrix(&self) -> Matrix {
        let n = self.size();
        let mut m = Matrix::zeros(n, n);
        for i in 0..n {
            m[(i, self.i0[i])] += self.lower[i];
            m[(i, i)] += self.diag[i];
            m[(i, self.i2[i])] += self.upper[i];
        }
        m
    }
}

impl FdmLinearOp for TripleBandLinearOp {
    fn apply(&self, r: &Array) -> Result<Array> {
        check_size(r, self.size())?;
        Ok(Array::from_fn(self.size(), |i| {
            self.lower[i] * r[self.i0[i]] + self.diag[i] * r[i] + self.upper[i] * r[self.i2[i]]
        }))
    }
}
