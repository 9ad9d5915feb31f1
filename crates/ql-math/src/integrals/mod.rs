//! Numerical integration.
//!
//! Only Simpson's rule is provided; it is what the finite-difference inner
//! value calculators use to average payoffs over a grid cell.

use ql_core::{
    errors::{Error, Result},
    Real,
};

/// A numerical integrator.
pub trait Integrator {
    /// Integrate `f` on `[a, b]`.
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real>;
}

// ── Simpson ───────────────────────────────────────────────────────────────────

/// Simpson's rule obtained by Richardson extrapolation of successively
/// halved trapezoids.
///
/// At least six refinements are made before the accuracy test is trusted;
/// `max_iterations` bounds the number of refinements.
#[derive(Debug, Clone)]
pub struct SimpsonIntegral {
    absolute_accuracy: Real,
    max_iterations: usize,
}

impl SimpsonIntegral {
    /// Create a new Simpson integrator.
    pub fn new(absolute_accuracy: Real, max_iterations: usize) -> Self {
        Self {
            absolute_accuracy,
            max_iterations,
        }
    }

    /// Requested absolute accuracy.
    pub fn absolute_accuracy(&self) -> Real {
        self.absolute_accuracy
    }
}

/// Refine the `n`-interval trapezoid `previous` by adding the midpoints.
fn refine_trapezoid<F: Fn(Real) -> Real>(
    f: &F,
    a: Real,
    b: Real,
    previous: Real,
    n: usize,
) -> Real {
    let dx = (b - a) / n as Real;
    let mut x = a + 0.5 * dx;
    let mut sum = 0.0;
    for _ in 0..n {
        sum += f(x);
        x += dx;
    }
    0.5 * (previous + dx * sum)
}

impl Integrator for SimpsonIntegral {
    fn integrate<F: Fn(Real) -> Real>(&self, f: F, a: Real, b: Real) -> Result<Real> {
        if a == b {
            return Ok(0.0);
        }
        let mut n = 1usize;
        let mut trapezoid = 0.5 * (b - a) * (f(a) + f(b));
        let mut simpson = trapezoid;

        for i in 1..=self.max_iterations {
            let refined = refine_trapezoid(&f, a, b, trapezoid, n);
            n *= 2;
            let new_simpson = (4.0 * refined - trapezoid) / 3.0;
            if (simpson - new_simpson).abs() <= self.absolute_accuracy && i > 5 {
                return Ok(new_simpson);
            }
            trapezoid = refined;
            simpson = new_simpson;
        }
        Err(Error::Runtime(format!(
            "SimpsonIntegral: max number of iterations ({}) reached",
            self.max_iterations
        )))
    }
}
