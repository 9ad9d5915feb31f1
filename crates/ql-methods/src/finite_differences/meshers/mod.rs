//! Spatial discretisation.
//!
//! A [`Fdm1dMesher`] holds the grid along one axis; an [`FdmMesher`] combines
//! one of them per axis with the [`FdmLinearOpLayout`] that flattens the
//! product grid.

pub mod concentrating_1d_mesher;
pub mod fdm_black_scholes_mesher;
pub mod fdm_mesher_composite;
pub mod predefined_1d_mesher;
pub mod uniform_1d_mesher;

pub use concentrating_1d_mesher::Concentrating1dMesher;
pub use fdm_black_scholes_mesher::{BlackScholesMesherOptions, FdmBlackScholesMesher};
pub use fdm_mesher_composite::FdmMesherComposite;
pub use predefined_1d_mesher::Predefined1dMesher;
pub use uniform_1d_mesher::Uniform1dMesher;

use std::sync::Arc;

use ql_core::{errors::Result, Real, Size};
use ql_math::Array;

use crate::finite_differences::operators::{FdmLinearOpIterator, FdmLinearOpLayout};

// ── One-dimensional grid ──────────────────────────────────────────────────────

/// Grid along a single axis.
///
/// `dplus[i] = x[i+1] − x[i]` and `dminus[i] = x[i] − x[i−1]`; the spacing
/// that would point outside the grid is `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct Fdm1dMesher {
    locations: Vec<Real>,
    dplus: Vec<Option<Real>>,
    dminus: Vec<Option<Real>>,
}

impl Fdm1dMesher {
    /// Build a mesher from strictly increasing locations.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`](ql_core::Error::InvalidArgument) for fewer
    /// than two points, non-finite locations or non-positive spacings.
    pub fn from_locations(locations: Vec<Real>) -> Result<Self> {
        let n = locations.len();
        ql_core::ensure_arg!(n >= 2, "a mesher needs at least 2 points, got {n}");
        ql_core::ensure_arg!(
            locations.iter().all(|x| x.is_finite()),
            "mesher locations must be finite"
        );

        let mut dplus = vec![None; n];
        let mut dminus = vec![None; n];
        for i in 0..n - 1 {
            let h = locations[i + 1] - locations[i];
            ql_core::ensure_arg!(
                h > 0.0,
                "mesher spacing must be positive, got {h} between points {i} and {}",
                i + 1
            );
            dplus[i] = Some(h);
            dminus[i + 1] = Some(h);
        }
        Ok(Self {
            locations,
            dplus,
            dminus,
        })
    }

    /// Number of points.
    pub fn size(&self) -> Size {
        self.locations.len()
    }

    /// Grid points.
    pub fn locations(&self) -> &[Real] {
        &self.locations
    }

    /// Forward spacings.
    pub fn dplus(&self) -> &[Option<Real>] {
        &self.dplus
    }

    /// Backward spacings.
    pub fn dminus(&self) -> &[Option<Real>] {
        &self.dminus
    }
}

// ── Multi-dimensional mesher ──────────────────────────────────────────────────

/// A grid over the full state space.
///
/// The iterator-based accessors expect `direction < layout().dim().len()`
/// and an iterator produced by this mesher's layout.
pub trait FdmMesher: std::fmt::Debug + Send + Sync {
    /// Layout of the product grid.
    fn layout(&self) -> &Arc<FdmLinearOpLayout>;

    /// Forward spacing at `iter` along `direction`.
    fn dplus(&self, iter: &FdmLinearOpIterator, direction: Size) -> Option<Real>;

    /// Backward spacing at `iter` along `direction`.
    fn dminus(&self, iter: &FdmLinearOpIterator, direction: Size) -> Option<Real>;

    /// Location of `iter` along `direction`.
    fn location(&self, iter: &FdmLinearOpIterator, direction: Size) -> Real;

    /// Location along `direction` of every grid point, in flat-index order.
    fn locations(&self, direction: Size) -> Array;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spacings_from_locations() {
        let m = Fdm1dMesher::from_locations(vec![0.0, 1.0, 3.0]).unwrap();
        assert_eq!(m.size(), 3);
        assert_eq!(m.dplus(), &[Some(1.0), Some(2.0), None]);
        assert_eq!(m.dminus(), &[None, Some(1.0), Some(2.0)]);
    }

    #[test]
    fn rejects_unordered_locations() {
        assert!(Fdm1dMesher::from_locations(vec![0.0]).is_err());
        assert!(Fdm1dMesher::from_locations(vec![0.0, 0.0]).is_err());
        assert!(Fdm1dMesher::from_locations(vec![1.0, 0.5, 2.0]).is_err());
        assert!(Fdm1dMesher::from_locations(vec![0.0, Real::NAN]).is_err());
    }
}
