//! Natural cubic spline.
//!
//! Second derivatives at the nodes come from the usual tridiagonal system
//! with `f''(x₀) = f''(xₙ₋₁) = 0`; each segment is then stored as
//!
//!   `f(x) = y_i + dx*(b_i + dx*(c_i + dx*d_i))`,  `dx = x - x_i`.

use ql_core::{errors::Result, Real};

use super::{check_nodes, locate, Interpolation1D};

/// Cubic spline with natural (zero-curvature) end conditions.
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    b: Vec<Real>,
    c: Vec<Real>,
    d: Vec<Real>,
}

impl CubicNaturalSpline {
    /// Build the spline through `(xs[i], ys[i])`.
    ///
    /// Two points give a straight line.
    ///
    /// # Errors
    /// Fails on fewer than two points, mismatched lengths or non-increasing
    /// abscissae.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        Ok(Self::from_checked_nodes(xs, ys))
    }

    /// Build from nodes that already passed validation.
    pub(crate) fn from_checked_nodes(xs: &[Real], ys: &[Real]) -> Self {
        let n = xs.len();
        let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
        let s: Vec<Real> = (0..n - 1).map(|i| (ys[i + 1] - ys[i]) / h[i]).collect();

        // node curvatures m[i] = f''(x_i); m[0] = m[n-1] = 0
        let mut m = vec![0.0; n];
        if n > 2 {
            let k = n - 2;
            let mut diag = vec![0.0; k];
            let mut rhs = vec![0.0; k];
            for j in 0..k {
                let i = j + 1;
                diag[j] = 2.0 * (h[i - 1] + h[i]);
                rhs[j] = 6.0 * (s[i] - s[i - 1]);
            }
            // forward elimination; off-diagonals are h[i-1] (lower), h[i] (upper)
            for j in 1..k {
                let w = h[j] / diag[j - 1];
                diag[j] -= w * h[j];
                rhs[j] -= w * rhs[j - 1];
            }
            m[k] = rhs[k - 1] / diag[k - 1];
            for j in (0..k - 1).rev() {
                m[j + 1] = (rhs[j] - h[j + 1] * m[j + 2]) / diag[j];
            }
        }

        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        let mut d = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            b.push(s[i] - h[i] * (2.0 * m[i] + m[i + 1]) / 6.0);
            c.push(0.5 * m[i]);
            d.push((m[i + 1] - m[i]) / (6.0 * h[i]));
        }

        Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            b,
            c,
            d,
        }
    }

    /// Interpolation nodes.
    pub fn xs(&self) -> &[Real] {
        &self.xs
    }
}

impl Interpolation1D for CubicNaturalSpline {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn operator(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.ys[i] + dx * (self.b[i] + dx * (self.c[i] + dx * self.d[i]))
    }

    fn derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.b[i] + dx * (2.0 * self.c[i] + 3.0 * dx * self.d[i])
    }

    fn second_derivative(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        2.0 * self.c[i] + 6.0 * dx * self.d[i]
    }
}
