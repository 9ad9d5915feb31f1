//! Equally spaced one-dimensional grid.

use std::ops::Deref;

use ql_core::{errors::Result, Real, Size};

use super::Fdm1dMesher;

/// `size` equally spaced points from `start` to `end`, both included.
#[derive(Debug, Clone, PartialEq)]
pub struct Uniform1dMesher(Fdm1dMesher);

impl Uniform1dMesher {
    /// Build the grid with spacing `(end − start)/(size − 1)`.
    ///
    /// # Errors
    /// Fails with `InvalidArgument` if `end <= start` or `size < 2`.
    pub fn new(start: Real, end: Real, size: Size) -> Result<Self> {
        ql_core::ensure_arg!(end > start, "end ({end}) must be larger than start ({start})");
        ql_core::ensure_arg!(size >= 2, "a uniform mesher needs at least 2 points, got {size}");

        let dx = (end - start) / (size - 1) as Real;
        let mut locations: Vec<Real> = (0..size).map(|i| start + i as Real * dx).collect();
        locations[size - 1] = end;
        Fdm1dMesher::from_locations(locations).map(Self)
    }

    /// Unwrap the underlying grid.
    pub fn into_inner(self) -> Fdm1dMesher {
        self.0
    }
}

impl Deref for Uniform1dMesher {
    type Target = Fdm1dMesher;

    fn deref(&self) -> &Fdm1dMesher {
        &self.0
    }
}

impl From<Uniform1dMesher> for Fdm1dMesher {
    fn from(m: Uniform1dMesher) -> Self {
        m.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn five_points_on_unit_interval() {
        let m = Uniform1dMesher::new(0.0, 1.0, 5).unwrap();
        assert_eq!(m.locations(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
        for i in 1..4 {
            assert_abs_diff_eq!(m.dplus()[i].unwrap(), 0.25, epsilon = 1e-15);
            assert_abs_diff_eq!(m.dminus()[i].unwrap(), 0.25, epsilon = 1e-15);
        }
        assert_eq!(m.dminus()[0], None);
        assert_eq!(m.dplus()[4], None);
    }

    #[test]
    fn invalid_bounds() {
        assert!(Uniform1dMesher::new(1.0, 1.0, 5).is_err());
        assert!(Uniform1dMesher::new(2.0, 1.0, 5).is_err());
        assert!(Uniform1dMesher::new(0.0, 1.0, 1).is_err());
    }
}
