//! Heston operator on `(x, v) = (ln S, variance)`:
//!
//!   `L = (r − q − v/2) ∂x + v/2 ∂xx
//!      + κ(θ − v) ∂v + σ²v/2 ∂vv
//!      + ρσv ∂x∂v − r`
//!
//! The discount term is split evenly between the two axis operators so that
//! each ADI sweep carries half of it; the correlation term is the mixed part.

use std::sync::Arc;

use ql_core::{errors::Result, Error, Rate, Real, Size, Time};
use ql_math::Array;

use super::{
    FdmLinearOp, FdmLinearOpComposite, FirstDerivativeOp, NinePointLinearOp,
    SecondDerivativeOp, SecondOrderMixedDerivativeOp, TripleBandLinearOp,
};
use crate::finite_differences::meshers::FdmMesher;

/// Heston stochastic-volatility operator.
#[derive(Debug, Clone)]
pub struct FdmHestonOp {
    r: Rate,
    // equity part
    dx: TripleBandLinearOp,
    dxx: TripleBandLinearOp,
    drift: Vec<Real>,
    dx_map: TripleBandLinearOp,
    // variance part
    dy: TripleBandLinearOp,
    dy_map: TripleBandLinearOp,
    correlation: NinePointLinearOp,
}

impl FdmHestonOp {
    /// Build the operator on a two-dimensional `(ln S, v)` mesher.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        mesher: Arc<dyn FdmMesher>,
        r: Rate,
        q: Rate,
        kappa: Real,
        theta: Real,
        sigma: Real,
        rho: Real,
    ) -> Result<Self> {
        let ndim = mesher.layout().dim().len();
        ql_core::ensure_arg!(
            ndim == 2,
            "Heston operator needs a 2-dimensional mesher, got {ndim}"
        );
        ql_core::ensure_arg!(
            (-1.0..=1.0).contains(&rho),
            "correlation must lie in [-1, 1], got {rho}"
        );
        ql_core::ensure_arg!(sigma >= 0.0, "vol of vol must be non-negative, got {sigma}");

        let v = mesher.locations(1);
        let half_v = 0.5 * &v;

        let dx: TripleBandLinearOp = FirstDerivativeOp::new(0, mesher.clone())?.into();
        let dxx = SecondDerivativeOp::new(0, mesher.clone())?.mult(&half_v)?;
        let drift = half_v.iter().map(|hv| r - q - hv).collect();

        let mean_reversion = v.map(|vi| kappa * (theta - vi));
        let dy = SecondDerivativeOp::new(1, mesher.clone())?
            .mult(&(0.5 * sigma * sigma * &v))?
            .add(&FirstDerivativeOp::new(1, mesher.clone())?.mult(&mean_reversion)?)?;

        let correlation =
            SecondOrderMixedDerivativeOp::new(0, 1, mesher.clone())?.mult(&(rho * sigma * &v))?;

        Ok(Self {
            r,
            dx_map: TripleBandLinearOp::new(0, mesher.clone())?,
            dy_map: TripleBandLinearOp::new(1, mesher)?,
            dx,
            dxx,
            drift,
            dy,
            correlation,
        })
    }

    fn axis(&self, direction: Size) -> Result<&TripleBandLinearOp> {
        match direction {
            0 => Ok(&self.dx_map),
            1 => Ok(&self.dy_map),
            _ => Err(Error::InvalidArgument(format!(
                "direction {direction} too large for the Heston operator"
            ))),
        }
    }
}

impl FdmLinearOp for FdmHestonOp {
    fn apply(&self, u: &Array) -> Result<Array> {
        let mut ret = self.dx_map.apply(u)?;
        ret += &self.dy_map.apply(u)?;
        ret += &self.correlation.apply(u)?;
        Ok(ret)
    }
}

impl FdmLinearOpComposite for FdmHestonOp {
    fn size(&self) -> Size {
        2
    }

    fn set_time(&mut self, _t1: Time, _t2: Time) -> Result<()> {
        let half_r = 0.5 * self.r;
        self.dx_map.axpyb(&self.drift, &self.dx, &self.dxx, &[-half_r])?;
        self.dy_map.axpyb(&[], &self.dy, &self.dy, &[-half_r])
    }

    fn apply_mixed(&self, r: &Array) -> Result<Array> {
        self.correlation.apply(r)
    }

    fn apply_direction(&self, direction: Size, r: &Array) -> Result<Array> {
        self.axis(direction)?.apply(r)
    }

    fn solve_splitting(&self, direction: Size, r: &Array, s: Real) -> Result<Array> {
        self.axis(direction)?.solve_splitting(r, -s, 1.0)
    }

    fn preconditioner(&self, r: &Array, s: Real) -> Result<Array> {
        self.solve_splitting(1, &self.solve_splitting(0, r, s)?, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_differences::meshers::{FdmMesherComposite, Uniform1dMesher};

    fn heston(rho: Real) -> (Arc<dyn FdmMesher>, FdmHestonOp) {
        let mesher: Arc<dyn FdmMesher> = Arc::new(
            FdmMesherComposite::from_2d(
                Uniform1dMesher::new(3.5, 5.5, 21).unwrap(),
                Uniform1dMesher::new(0.0, 0.5, 11).unwrap(),
            )
            .unwrap(),
        );
        let mut op = FdmHestonOp::new(mesher.clone(), 0.05, 0.01, 1.5, 0.04, 0.3, rho).unwrap();
        op.set_time(0.0, 0.1).unwrap();
        (mesher, op)
    }

    #[test]
    fn constants_are_discounted() {
        let (mesher, op) = heston(-0.7);
        let n = mesher.layout().size();
        let one = Array::from_element(n, 1.0);
        let l1 = op.apply(&one).unwrap();
        for i in 0..n {
            assert!((l1[i] + 0.05).abs() < 1e-12, "row {i}: {}", l1[i]);
        }
        assert!(op.apply_mixed(&one).unwrap().max_abs() < 1e-12);
    }

    #[test]
    fn directions_sum_to_full_operator() {
        let (mesher, op) = heston(0.5);
        let n = mesher.layout().size();
        let u = Array::from_fn(n, |i| ((i % 21) as Real * 0.2).sin() + (i / 21) as Real * 0.1);
        let full = op.apply(&u).unwrap();
        let parts = &(&op.apply_direction(0, &u).unwrap() + &op.apply_direction(1, &u).unwrap())
            + &op.apply_mixed(&u).unwrap();
        for i in 0..n {
            assert!((full[i] - parts[i]).abs() < 1e-12);
        }
        assert!(op.apply_direction(2, &u).is_err());
        assert!(op.solve_splitting(2, &u, 0.1).is_err());
    }

    #[test]
    fn splitting_inverts_each_axis() {
        let (mesher, op) = heston(0.0);
        let n = mesher.layout().size();
        let x = Array::from_fn(n, |i| 1.0 + (i as Real * 0.05).cos());
        for d in 0..2 {
            let rhs = &x - &(0.02 * &op.apply_direction(d, &x).unwrap());
            let solved = op.solve_splitting(d, &rhs, 0.02).unwrap();
            for i in 0..n {
                assert!((solved[i] - x[i]).abs() < 1e-10, "direction {d}, row {i}");
            }
        }
    }

    #[test]
    fn rejects_one_dimensional_mesher() {
        let mesher: Arc<dyn FdmMesher> = Arc::new(
            FdmMesherComposite::from_1d(Uniform1dMesher::new(0.0, 1.0, 5).unwrap()).unwrap(),
        );
        assert!(FdmHestonOp::new(mesher, 0.0, 0.0, 1.0, 0.04, 0.2, 0.0).is_err());
    }
}
