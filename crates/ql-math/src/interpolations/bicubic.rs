//! Bicubic spline interpolation on a 2D grid.
//!
//! For each row of the grid, a 1D cubic natural spline is built along `x`.
//! For a query `(x, y)` the row splines (or their x-derivatives) are
//! evaluated at `x` to produce an intermediate column, which is itself
//! interpolated along `y` with another natural spline.

use ql_core::{errors::Result, Real};

use super::{check_nodes, CubicNaturalSpline, Interpolation1D};

/// 2D interpolation trait with partial derivatives.
pub trait Interpolation2D: std::fmt::Debug + Send + Sync {
    /// Evaluate the surface at `(x, y)`.
    fn operator(&self, x: Real, y: Real) -> Real;
    /// `∂f/∂x`
    fn derivative_x(&self, x: Real, y: Real) -> Real;
    /// `∂f/∂y`
    fn derivative_y(&self, x: Real, y: Real) -> Real;
    /// `∂²f/∂x²`
    fn derivative_xx(&self, x: Real, y: Real) -> Real;
    /// `∂²f/∂y²`
    fn derivative_yy(&self, x: Real, y: Real) -> Real;
    /// `∂²f/∂x∂y`
    fn derivative_xy(&self, x: Real, y: Real) -> Real;
    /// Lower bound of the x domain.
    fn x_min(&self) -> Real;
    /// Upper bound of the x domain.
    fn x_max(&self) -> Real;
    /// Lower bound of the y domain.
    fn y_min(&self) -> Real;
    /// Upper bound of the y domain.
    fn y_max(&self) -> Real;

    /// Return `true` if `(x, y)` lies inside the grid rectangle.
    fn is_in_range(&self, x: Real, y: Real) -> bool {
        x >= self.x_min() && x <= self.x_max() && y >= self.y_min() && y <= self.y_max()
    }
}

/// Bicubic spline interpolation on a rectangular grid.
///
/// `z` is stored in row-major order: `z[j * nx + i]` = f(xs\[i\], ys\[j\]).
#[derive(Debug, Clone)]
pub struct BicubicSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    /// One cubic spline per y-row, interpolating along x.
    row_splines: Vec<CubicNaturalSpline>,
}

impl BicubicSpline {
    /// Build a bicubic spline on the grid `(xs × ys → z)`.
    ///
    /// Both axes need at least two strictly increasing nodes.
    pub fn new(xs: &[Real], ys: &[Real], z: &[Real]) -> Result<Self> {
        let nx = xs.len();
        let ny = ys.len();
        ql_core::ensure!(nx >= 2, "bicubic spline needs at least 2 x grid points");
        ql_core::ensure!(
            z.len() == nx * ny,
            "z length ({}) must equal nx*ny ({}*{}={})",
            z.len(),
            nx,
            ny,
            nx * ny
        );
        check_nodes(ys, &vec![0.0; ny])?;

        let row_splines = z
            .chunks(nx)
            .map(|row| CubicNaturalSpline::new(xs, row))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            row_splines,
        })
    }

    fn column<F>(&self, along_x: F) -> CubicNaturalSpline
    where
        F: Fn(&CubicNaturalSpline) -> Real,
    {
        let column: Vec<Real> = self.row_splines.iter().map(along_x).collect();
        CubicNaturalSpline::from_checked_nodes(&self.ys, &column)
    }
}

impl Interpolation2D for BicubicSpline {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn y_min(&self) -> Real {
        self.ys[0]
    }

    fn y_max(&self) -> Real {
        self.ys[self.ys.len() - 1]
    }

    fn operator(&self, x: Real, y: Real) -> Real {
        self.column(|s| s.operator(x)).operator(y)
    }

    fn derivative_x(&self, x: Real, y: Real) -> Real {
        self.column(|s| s.derivative(x)).operator(y)
    }

    fn derivative_y(&self, x: Real, y: Real) -> Real {
        self.column(|s| s.operator(x)).derivative(y)
    }

    fn derivative_xx(&self, x: Real, y: Real) -> Real {
        self.column(|s| s.second_derivative(x)).operator(y)
    }

    fn derivative_yy(&self, x: Real, y: Real) -> Real {
        self.column(|s| s.operator(x)).second_derivative(y)
    }

    fn derivative_xy(&self, x: Real, y: Real) -> Real {
        self.column(|s| s.derivative(x)).derivative(y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid<F: Fn(Real, Real) -> Real>(xs: &[Real], ys: &[Real], f: F) -> Vec<Real> {
        let mut z = Vec::with_capacity(xs.len() * ys.len());
        for &y in ys {
            for &x in xs {
                z.push(f(x, y));
            }
        }
        z
    }

    #[test]
    fn bicubic_exact_on_grid() {
        let xs = vec![0.0, 1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 2.0, 3.0];
        let z = grid(&xs, &ys, |x, y| x * x - y);
        let interp = BicubicSpline::new(&xs, &ys, &z).unwrap();
        for &y in &ys {
            for &x in &xs {
                let v = interp.operator(x, y);
                let expected = x * x - y;
                assert!(
                    (v - expected).abs() < 1e-10,
                    "at ({x},{y}): expected {expected}, got {v}"
                );
            }
        }
    }

    #[test]
    fn bicubic_reproduces_bilinear_function() {
        // z = 2x + 3y + xy + 1 is reproduced exactly, derivatives included
        let xs = vec![0.0, 0.7, 1.0, 2.0, 3.0];
        let ys = vec![0.0, 1.0, 1.5, 2.0, 3.0];
        let z = grid(&xs, &ys, |x, y| 2.0 * x + 3.0 * y + x * y + 1.0);
        let interp = BicubicSpline::new(&xs, &ys, &z).unwrap();
        let (x, y) = (1.5, 2.5);
        assert!((interp.operator(x, y) - (2.0 * x + 3.0 * y + x * y + 1.0)).abs() < 1e-10);
        assert!((interp.derivative_x(x, y) - (2.0 + y)).abs() < 1e-10);
        assert!((interp.derivative_y(x, y) - (3.0 + x)).abs() < 1e-10);
        assert!((interp.derivative_xy(x, y) - 1.0).abs() < 1e-10);
        assert!(interp.derivative_xx(x, y).abs() < 1e-10);
        assert!(interp.derivative_yy(x, y).abs() < 1e-10);
    }

    #[test]
    fn smooth_surface_derivatives() {
        let xs: Vec<Real> = (0..=30).map(|i| i as Real * 0.1).collect();
        let ys: Vec<Real> = (0..=30).map(|i| i as Real * 0.1).collect();
        let z = grid(&xs, &ys, |x, y| x.sin() * y.cos());
        let interp = BicubicSpline::new(&xs, &ys, &z).unwrap();
        let (x, y) = (1.23, 1.71);
        assert!((interp.operator(x, y) - x.sin() * y.cos()).abs() < 1e-4);
        assert!((interp.derivative_x(x, y) - x.cos() * y.cos()).abs() < 1e-3);
        assert!((interp.derivative_y(x, y) + x.sin() * y.sin()).abs() < 1e-3);
        assert!((interp.derivative_xy(x, y) + x.cos() * y.sin()).abs() < 1e-3);
        assert!((interp.derivative_xx(x, y) + x.sin() * y.cos()).abs() < 1e-2);
        assert!((interp.derivative_yy(x, y) + x.sin() * y.cos()).abs() < 1e-2);
    }

    #[test]
    fn rejects_mismatched_grid() {
        assert!(BicubicSpline::new(&[0.0, 1.0], &[0.0, 1.0], &[1.0, 2.0, 3.0]).is_err());
        assert!(BicubicSpline::new(&[0.0, 1.0], &[1.0, 0.0], &[1.0; 4]).is_err());
    }
}
