//! Cartesian product of one-dimensional meshers.

use std::sync::Arc;

use ql_core::{errors::Result, Real, Size};
use ql_math::Array;

use super::{Fdm1dMesher, FdmMesher};
use crate::finite_differences::operators::{FdmLinearOpIterator, FdmLinearOpLayout};

/// Product grid: axis `k` is discretised by `meshers[k]`.
#[derive(Debug, Clone)]
pub struct FdmMesherComposite {
    layout: Arc<FdmLinearOpLayout>,
    meshers: Vec<Fdm1dMesher>,
}

impl FdmMesherComposite {
    /// Combine one mesher per axis; the first varies fastest in the layout.
    pub fn new(meshers: Vec<Fdm1dMesher>) -> Result<Self> {
        let dim = meshers.iter().map(Fdm1dMesher::size).collect();
        let layout = Arc::new(FdmLinearOpLayout::new(dim)?);
        Ok(Self { layout, meshers })
    }

    /// Single-axis grid.
    pub fn from_1d(mesher: impl Into<Fdm1dMesher>) -> Result<Self> {
        Self::new(vec![mesher.into()])
    }

    /// Two-axis grid.
    pub fn from_2d(m0: impl Into<Fdm1dMesher>, m1: impl Into<Fdm1dMesher>) -> Result<Self> {
        Self::new(vec![m0.into(), m1.into()])
    }

    /// The per-axis meshers.
    pub fn fdm_1d_meshers(&self) -> &[Fdm1dMesher] {
        &self.meshers
    }
}

impl FdmMesher for FdmMesherComposite {
    fn layout(&self) -> &Arc<FdmLinearOpLayout> {
        &self.layout
    }

    fn dplus(&self, iter: &FdmLinearOpIterator, direction: Size) -> Option<Real> {
        self.meshers[direction].dplus()[iter.coordinates()[direction]]
    }

    fn dminus(&self, iter: &FdmLinearOpIterator, direction: Size) -> Option<Real> {
        self.meshers[direction].dminus()[iter.coordinates()[direction]]
    }

    fn location(&self, iter: &FdmLinearOpIterator, direction: Size) -> Real {
        self.meshers[direction].locations()[iter.coordinates()[direction]]
    }

    fn locations(&self, direction: Size) -> Array {
        let axis = self.meshers[direction].locations();
        self.layout
            .iter()
            .map(|iter| axis[iter.coordinates()[direction]])
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::Uniform1dMesher;

    #[test]
    fn product_ordering() {
        let mesher = FdmMesherComposite::from_2d(
            Uniform1dMesher::new(0.0, 1.0, 3).unwrap(),
            Uniform1dMesher::new(10.0, 20.0, 2).unwrap(),
        )
        .unwrap();
        assert_eq!(mesher.layout().dim(), &[3, 2]);
        assert_eq!(mesher.locations(0).as_slice(), &[0.0, 0.5, 1.0, 0.0, 0.5, 1.0]);
        assert_eq!(mesher.locations(1).as_slice(), &[10.0, 10.0, 10.0, 20.0, 20.0, 20.0]);

        let it = mesher.layout().iter().nth(4).unwrap();
        assert_eq!(mesher.location(&it, 0), 0.5);
        assert_eq!(mesher.location(&it, 1), 20.0);
        assert_eq!(mesher.dplus(&it, 0), Some(0.5));
        assert_eq!(mesher.dplus(&it, 1), None);
        assert_eq!(mesher.dminus(&it, 1), Some(10.0));
    }

    #[test]
    fn needs_at_least_one_axis() {
        assert!(FdmMesherComposite::new(vec![]).is_err());
    }
}
