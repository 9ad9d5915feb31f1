//! `Matrix` — a dense two-dimensional matrix of reals.
//!
//! A thin newtype around `nalgebra::DMatrix<f64>`. In the finite-difference
//! framework it holds two-dimensional result grids and serves as the dense
//! reference when banded operators are checked against a full solve.

use crate::array::Array;
use nalgebra::DMatrix;
use ql_core::{
    errors::{Error, Result},
    Real,
};
use std::ops::{Add, Index, IndexMut, Mul};

/// A dynamically-sized 2D matrix of `Real` values (row-major access).
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix(DMatrix<Real>);

impl Matrix {
    /// Create a zero-filled `rows × cols` matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self(DMatrix::zeros(rows, cols))
    }

    /// Create an identity matrix of size `n × n`.
    pub fn identity(n: usize) -> Self {
        Self(DMatrix::identity(n, n))
    }

    /// Create from a row-major data slice.
    pub fn from_row_slice(rows: usize, cols: usize, data: &[Real]) -> Self {
        Self(DMatrix::from_row_slice(rows, cols, data))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.0.nrows()
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.0.ncols()
    }

    /// Borrow the inner `DMatrix`.
    pub fn inner(&self) -> &DMatrix<Real> {
        &self.0
    }

    /// Extract a row as an `Array`.
    pub fn row(&self, i: usize) -> Array {
        self.0.row(i).iter().copied().collect()
    }

    /// Extract a column as an `Array`.
    pub fn column(&self, j: usize) -> Array {
        self.0.column(j).iter().copied().collect()
    }

    /// Matrix-vector product `M * v`.
    pub fn mul_vec(&self, v: &Array) -> Array {
        Array::from(&self.0 * v.inner())
    }

    /// Solve `M x = rhs` by LU decomposition.
    ///
    /// # Errors
    /// Returns [`Error::Numerical`] if the matrix is singular and
    /// [`Error::InvalidArgument`] on a shape mismatch.
    pub fn solve(&self, rhs: &Array) -> Result<Array> {
        if self.rows() != self.cols() || self.rows() != rhs.size() {
            return Err(Error::InvalidArgument(format!(
                "cannot solve a {}x{} system with a rhs of size {}",
                self.rows(),
                self.cols(),
                rhs.size()
            )));
        }
        self.0
            .clone()
            .lu()
            .solve(rhs.inner())
            .map(Array::from)
            .ok_or_else(|| Error::Numerical("singular matrix in dense solve".into()))
    }
}

// ── From ──────────────────────────────────────────────────────────────────────

impl From<DMatrix<Real>> for Matrix {
    fn from(m: DMatrix<Real>) -> Self {
        Self(m)
    }
}

// ── Indexing ──────────────────────────────────────────────────────────────────

impl Index<(usize, usize)> for Matrix {
    type Output = Real;
    fn index(&self, (i, j): (usize, usize)) -> &Real {
        &self.0[(i, j)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut Real {
        &mut self.0[(i, j)]
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────────

impl Add for &Matrix {
    type Output = Matrix;
    fn add(self, rhs: &Matrix) -> Matrix {
        Matrix(&self.0 + &rhs.0)
    }
}

impl Add for Matrix {
    type Output = Matrix;
    fn add(self, rhs: Matrix) -> Matrix {
        Matrix(self.0 + rhs.0)
    }
}

impl Mul<Real> for &Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Real) -> Matrix {
        Matrix(&self.0 * rhs)
    }
}

impl Mul<Real> for Matrix {
    type Output = Matrix;
    fn mul(self, rhs: Real) -> Matrix {
        Matrix(self.0 * rhs)
    }
}

// ── Display ───────────────────────────────────────────────────────────────────

impl std::fmt::Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for i in 0..self.0.nrows() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "[")?;
            for j in 0..self.0.ncols() {
                if j > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", self.0[(i, j)])?;
            }
            write!(f, "]")?;
        }
        Ok(())
    }
}
