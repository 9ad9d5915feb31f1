//! Black-Scholes operator in log-spot `x = ln S`:
//!
//!   `L = (r − q − σ²/2) ∂/∂x + σ²/2 ∂²/∂x² − r`
//!
//! With a local volatility `σ(S, t)` the coefficients are refreshed on every
//! `set_time` from the volatility at the middle of the step.

use std::sync::Arc;

use ql_core::{errors::Result, Rate, Real, Size, Time, Volatility};
use ql_math::Array;

use super::{
    check_size, FdmLinearOp, FdmLinearOpComposite, FirstDerivativeOp, SecondDerivativeOp,
    TripleBandLinearOp,
};
use crate::finite_differences::meshers::FdmMesher;

/// Local volatility surface `σ(S, t)`.
pub type LocalVolFn = Arc<dyn Fn(Real, Time) -> Volatility + Send + Sync>;

/// Black-Scholes spatial operator along one axis.
#[derive(Clone)]
pub struct FdmBlackScholesOp {
    mesher: Arc<dyn FdmMesher>,
    direction: Size,
    r: Rate,
    q: Rate,
    vol: Volatility,
    local_vol: Option<(LocalVolFn, Array)>,
    dx: TripleBandLinearOp,
    dxx: TripleBandLinearOp,
    map_t: TripleBandLinearOp,
}

impl std::fmt::Debug for FdmBlackScholesOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FdmBlackScholesOp")
            .field("direction", &self.direction)
            .field("r", &self.r)
            .field("q", &self.q)
            .field("vol", &self.vol)
            .field("local_vol", &self.local_vol.is_some())
            .finish()
    }
}

impl FdmBlackScholesOp {
    /// Operator with flat rate `r`, dividend yield `q` and volatility `vol`
    /// acting along `direction` of `mesher`.
    pub fn new(
        mesher: Arc<dyn FdmMesher>,
        r: Rate,
        q: Rate,
        vol: Volatility,
        direction: Size,
    ) -> Result<Self> {
        ql_core::ensure_arg!(vol >= 0.0, "volatility must be non-negative, got {vol}");
        ql_core::ensure_arg!(
            r.is_finite() && q.is_finite(),
            "rates must be finite (r = {r}, q = {q})"
        );
        Ok(Self {
            dx: FirstDerivativeOp::new(direction, mesher.clone())?.into(),
            dxx: SecondDerivativeOp::new(direction, mesher.clone())?.into(),
            map_t: TripleBandLinearOp::new(direction, mesher.clone())?,
            mesher,
            direction,
            r,
            q,
            vol,
            local_vol: None,
        })
    }

    /// Replace the flat volatility by a local volatility surface.
    pub fn with_local_vol(mut self, local_vol: LocalVolFn) -> Self {
        let spots = self.mesher.locations(self.direction).map(Real::exp);
        self.local_vol = Some((local_vol, spots));
        self
    }

    /// Axis carrying the log-spot.
    pub fn direction(&self) -> Size {
        self.direction
    }

    fn n(&self) -> Size {
        self.mesher.layout().size()
    }
}

impl FdmLinearOp for FdmBlackScholesOp {
    fn apply(&self, r: &Array) -> Result<Array> {
        self.map_t.apply(r)
    }
}

impl FdmLinearOpComposite for FdmBlackScholesOp {
    fn size(&self) -> Size {
        1
    }

    fn set_time(&mut self, t1: Time, t2: Time) -> Result<()> {
        let (r, q) = (self.r, self.q);
        match &self.local_vol {
            Some((sigma, spots)) => {
                let t = 0.5 * (t1 + t2);
                let v = spots.map(|s| {
                    let sig = sigma(s, t);
                    sig * sig
                });
                let drift: Vec<Real> = v.iter().map(|vi| r - q - 0.5 * vi).collect();
                let diffusion = self.dxx.mult(&(0.5 * &v))?;
                self.map_t.axpyb(&drift, &self.dx, &diffusion, &[-r])
            }
            None => {
                let vv = self.vol * self.vol;
                let diffusion = self.dxx.mult(&Array::from_element(self.n(), 0.5 * vv))?;
                self.map_t
                    .axpyb(&[r - q - 0.5 * vv], &self.dx, &diffusion, &[-r])
            }
        }
    }

    fn apply_mixed(&self, r: &Array) -> Result<Array> {
        check_size(r, self.n())?;
        Ok(Array::zeros(r.size()))
    }

    fn apply_direction(&self, direction: Size, r: &Array) -> Result<Array> {
        ql_core::ensure_arg!(
            direction < self.mesher.layout().dim().len(),
            "direction {direction} out of range"
        );
        if direction == self.direction {
            self.map_t.apply(r)
        } else {
            check_size(r, self.n())?;
            Ok(Array::zeros(r.size()))
        }
    }

    fn solve_splitting(&self, direction: Size, r: &Array, s: Real) -> Result<Array> {
        ql_core::ensure_arg!(
            direction < self.mesher.layout().dim().len(),
            "direction {direction} out of range"
        );
        if direction == self.direction {
            self.map_t.solve_splitting(r, -s, 1.0)
        } else {
            check_size(r, self.n())?;
            Ok(r.clone())
        }
    }

    fn preconditioner(&self, r: &Array, s: Real) -> Result<Array> {
        self.solve_splitting(self.direction, r, s)
    }
}
