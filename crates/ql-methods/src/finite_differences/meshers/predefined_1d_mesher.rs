//! Grid given point by point.

use std::ops::Deref;

use ql_core::{errors::Result, Real};

use super::Fdm1dMesher;

/// Mesher over caller-supplied, strictly increasing locations.
#[derive(Debug, Clone, PartialEq)]
pub struct Predefined1dMesher(Fdm1dMesher);

impl Predefined1dMesher {
    /// Wrap `locations` as a grid.
    pub fn new(locations: &[Real]) -> Result<Self> {
        Fdm1dMesher::from_locations(locations.to_vec()).map(Self)
    }

    /// Unwrap the underlying grid.
    pub fn into_inner(self) -> Fdm1dMesher {
        self.0
    }
}

impl Deref for Predefined1dMesher {
    type Target = Fdm1dMesher;

    fn deref(&self) -> &Fdm1dMesher {
        &self.0
    }
}

impl From<Predefined1dMesher> for Fdm1dMesher {
    fn from(m: Predefined1dMesher) -> Self {
        m.0
    }
}
