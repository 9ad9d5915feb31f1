//! 1D and 2D interpolation used to read values and sensitivities back off a
//! finite-difference grid.
//!
//! Every scheme here exposes its first and second derivatives, since the
//! solvers report delta and gamma straight from the interpolant.

use ql_core::{errors::Result, Real};

pub mod bicubic;
pub mod cubic;

pub use bicubic::{BicubicSpline, Interpolation2D};
pub use cubic::CubicNaturalSpline;

/// A 1D interpolation function `f: R → R` defined by a set of known points.
///
/// Queries outside `[x_min, x_max]` extrapolate with the boundary segment.
pub trait Interpolation1D: std::fmt::Debug {
    /// Evaluate the interpolation at `x`.
    fn operator(&self, x: Real) -> Real;

    /// First derivative `f'(x)`.
    fn derivative(&self, x: Real) -> Real;

    /// Second derivative `f''(x)`.
    fn second_derivative(&self, x: Real) -> Real;

    /// Return the lower bound of the interpolation domain.
    fn x_min(&self) -> Real;

    /// Return the upper bound of the interpolation domain.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the interpolation range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// Binary search: find `i` such that `xs[i] <= x < xs[i+1]`, clamped to the
/// first and last segment.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    // first index with xs[i] > x, minus one
    xs.partition_point(|&xi| xi <= x) - 1
}

/// Validate abscissae and ordinates shared by all schemes.
pub(crate) fn check_nodes(xs: &[Real], ys: &[Real]) -> Result<()> {
    ql_core::ensure!(xs.len() >= 2, "need at least 2 points for interpolation");
    ql_core::ensure!(
        xs.len() == ys.len(),
        "xs and ys must have the same length ({} != {})",
        xs.len(),
        ys.len()
    );
    ql_core::ensure!(
        xs.windows(2).all(|w| w[1] > w[0]),
        "interpolation nodes must be strictly increasing"
    );
    Ok(())
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Linear interpolation.
///
/// `f(x) = y[i] + (y[i+1] - y[i]) * (x - x[i]) / (x[i+1] - x[i])`
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct a linear interpolation from sorted `xs` and corresponding `ys`.
    ///
    /// # Errors
    /// Returns an error if the slices have different lengths, fewer than 2
    /// points, or `xs` is not strictly increasing.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    fn slope(&self, i: usize) -> Real {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LinearInterpolation {
    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }

    fn operator(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.slope(i)
    }

    fn derivative(&self, x: Real) -> Real {
        self.slope(locate(&self.xs, x))
    }

    fn second_derivative(&self, _x: Real) -> Real {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_interpolation() {
        let xs = [0.0, 1.0, 2.0];
        let ys = [0.0, 1.0, 4.0];
        let interp = LinearInterpolation::new(&xs, &ys).unwrap();
        assert!((interp.operator(0.5) - 0.5).abs() < 1e-12);
        assert!((interp.operator(1.5) - 2.5).abs() < 1e-12);
        assert!((interp.derivative(1.5) - 3.0).abs() < 1e-12);
        assert_eq!(interp.second_derivative(0.3), 0.0);
    }

    #[test]
    fn linear_extrapolates_with_end_segments() {
        let interp = LinearInterpolation::new(&[0.0, 1.0, 2.0], &[0.0, 1.0, 4.0]).unwrap();
        assert!((interp.operator(-1.0) + 1.0).abs() < 1e-12);
        assert!((interp.operator(3.0) - 7.0).abs() < 1e-12);
        assert!(!interp.is_in_range(3.0));
    }

    #[test]
    fn locate_segments() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        assert_eq!(locate(&xs, -5.0), 0);
        assert_eq!(locate(&xs, 0.0), 0);
        assert_eq!(locate(&xs, 1.0), 1);
        assert_eq!(locate(&xs, 2.5), 2);
        assert_eq!(locate(&xs, 3.0), 2);
        assert_eq!(locate(&xs, 9.0), 2);
    }

    #[test]
    fn rejects_bad_nodes() {
        assert!(LinearInterpolation::new(&[0.0], &[1.0]).is_err());
        assert!(LinearInterpolation::new(&[0.0, 1.0], &[1.0]).is_err());
        assert!(LinearInterpolation::new(&[0.0, 0.0], &[1.0, 2.0]).is_err());
    }
}
