//! Preconditioned BiCGStab (bi-conjugate gradient stabilised) solver.
//!
//! The system matrix and the preconditioner are supplied as closures, so
//! operators that are never assembled (finite-difference composites) can be
//! inverted without forming a dense matrix.

use ql_core::{
    errors::{Error, Result},
    Real, Size,
};

use crate::Array;

/// A matrix-free linear map `x ↦ A·x`.
pub type LinearMap<'a> = Box<dyn Fn(&Array) -> Result<Array> + 'a>;

/// Outcome of a converged BiCGStab solve.
#[derive(Debug, Clone)]
pub struct BiCGStabResult {
    /// Number of iterations performed.
    pub iterations: Size,
    /// Final relative residual `‖b − A·x‖ / ‖b‖`.
    pub error: Real,
    /// The solution.
    pub x: Array,
}

/// Iterative solver for `A·x = b` with optional right preconditioner `M ≈ A⁻¹`.
pub struct BiCGStab<'a> {
    a: LinearMap<'a>,
    max_iterations: Size,
    rel_tol: Real,
    preconditioner: Option<LinearMap<'a>>,
}

impl std::fmt::Debug for BiCGStab<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiCGStab")
            .field("max_iterations", &self.max_iterations)
            .field("rel_tol", &self.rel_tol)
            .field("preconditioned", &self.preconditioner.is_some())
            .finish()
    }
}

impl<'a> BiCGStab<'a> {
    /// Create a solver for the map `a`.
    pub fn new<A>(a: A, max_iterations: Size, rel_tol: Real) -> Self
    where
        A: Fn(&Array) -> Result<Array> + 'a,
    {
        Self {
            a: Box::new(a),
            max_iterations,
            rel_tol,
            preconditioner: None,
        }
    }

    /// Attach a preconditioner approximating `A⁻¹`.
    pub fn with_preconditioner<M>(mut self, m: M) -> Self
    where
        M: Fn(&Array) -> Result<Array> + 'a,
    {
        self.preconditioner = Some(Box::new(m));
        self
    }

    fn precondition(&self, v: &Array) -> Result<Array> {
        match &self.preconditioner {
            Some(m) => m(v),
            None => Ok(v.clone()),
        }
    }

    /// Solve `A·x = b` starting from `x0` (zero when `None`).
    ///
    /// # Errors
    /// [`Error::Numerical`] when the iteration limit is hit or the residual
    /// stays above the tolerance; errors raised by the maps are propagated.
    pub fn solve(&self, b: &Array, x0: Option<&Array>) -> Result<BiCGStabResult> {
        let b_norm = b.norm();
        if b_norm == 0.0 {
            return Ok(BiCGStabResult {
                iterations: 0,
                error: 0.0,
                x: b.clone(),
            });
        }

        let mut x = match x0 {
            Some(x0) => {
                ql_core::ensure_arg!(
                    x0.size() == b.size(),
                    "initial guess size {} does not match rhs size {}",
                    x0.size(),
                    b.size()
                );
                x0.clone()
            }
            None => Array::zeros(b.size()),
        };
        let mut r = b - &(self.a)(&x)?;
        let r_tld = r.clone();
        let mut p = Array::zeros(b.size());
        let mut v = Array::zeros(b.size());
        let mut omega = 1.0;
        let mut rho_tld = 1.0;
        let mut alpha = 0.0;
        let mut error = r.norm() / b_norm;

        let mut i = 0;
        while i < self.max_iterations && error >= self.rel_tol {
            let rho = r_tld.dot(&r);
            if rho == 0.0 || omega == 0.0 {
                break;
            }
            if i != 0 {
                let beta = (rho / rho_tld) * (alpha / omega);
                p = &r + &(beta * &(&p - &(omega * &v)));
            } else {
                p = r.clone();
            }

            let p_tld = self.precondition(&p)?;
            v = (self.a)(&p_tld)?;
            alpha = rho / r_tld.dot(&v);
            let s = &r - &(alpha * &v);
            if s.norm() < self.rel_tol * b_norm {
                x.axpy(alpha, &p_tld);
                error = s.norm() / b_norm;
                break;
            }

            let s_tld = self.precondition(&s)?;
            let t = (self.a)(&s_tld)?;
            omega = t.dot(&s) / t.dot(&t);
            x.axpy(alpha, &p_tld);
            x.axpy(omega, &s_tld);
            r = &s - &(omega * &t);
            error = r.norm() / b_norm;
            rho_tld = rho;
            i += 1;
        }

        log::trace!("BiCGStab: {i} iterations, relative residual {error:e}");
        if i >= self.max_iterations {
            return Err(Error::Numerical(format!(
                "BiCGStab: max number of iterations ({}) exceeded",
                self.max_iterations
            )));
        }
        if !(error < self.rel_tol) {
            return Err(Error::Numerical(format!(
                "BiCGStab: could not converge (relative residual {error:e})"
            )));
        }
        Ok(BiCGStabResult {
            iterations: i,
            error,
            x,
        })
    }
}
