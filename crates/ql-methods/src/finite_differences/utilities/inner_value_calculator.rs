//! Inner values: the payoff or exercise value attached to each grid point.

use std::fmt;
use std::sync::{Arc, OnceLock};

use log::trace;
use ql_core::{
    errors::{Error, Result},
    Real, Size, Time,
};
use ql_math::integrals::{Integrator, SimpsonIntegral};

use super::payoff::Payoff;
use crate::finite_differences::meshers::FdmMesher;
use crate::finite_differences::operators::FdmLinearOpIterator;

/// Supplies exercise values to step conditions and initial values to
/// solvers.
pub trait FdmInnerValueCalculator: fmt::Debug + Send + Sync {
    /// Value at the grid point `iter` at time `t`.
    fn inner_value(&self, iter: &FdmLinearOpIterator, t: Time) -> Result<Real>;

    /// Value averaged over the cell around `iter`; used for the initial
    /// condition so that payoff kinks between nodes are smoothed.
    fn avg_inner_value(&self, iter: &FdmLinearOpIterator, t: Time) -> Result<Real>;
}

// ── Log-spot payoff ───────────────────────────────────────────────────────────

/// Payoff evaluated at `exp(x)` where `x` is the log-spot coordinate along
/// `direction`.
pub struct FdmLogInnerValue {
    payoff: Arc<dyn Payoff>,
    mesher: Arc<dyn FdmMesher>,
    direction: Size,
    averages: OnceLock<Vec<Real>>,
}

impl fmt::Debug for FdmLogInnerValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdmLogInnerValue")
            .field("payoff", &self.payoff)
            .field("direction", &self.direction)
            .finish_non_exhaustive()
    }
}

impl FdmLogInnerValue {
    /// Inner values of `payoff` on the log-spot axis `direction` of `mesher`.
    pub fn new(
        payoff: Arc<dyn Payoff>,
        mesher: Arc<dyn FdmMesher>,
        direction: Size,
    ) -> Result<Self> {
        let ndim = mesher.layout().dim().len();
        ql_core::ensure_arg!(
            direction < ndim,
            "direction {direction} out of range for a {ndim}-dimensional mesher"
        );
        Ok(Self {
            payoff,
            mesher,
            direction,
            averages: OnceLock::new(),
        })
    }

    fn payoff_at(&self, x: Real) -> Real {
        self.payoff.value(x.exp())
    }

    fn cell_average(&self, iter: &FdmLinearOpIterator, t: Time) -> Result<Real> {
        let d = self.direction;
        let x = self.mesher.location(iter, d);
        let a = self.mesher.dminus(iter, d).map_or(x, |h| x - 0.5 * h);
        let b = self.mesher.dplus(iter, d).map_or(x, |h| x + 0.5 * h);
        if b <= a {
            return self.inner_value(iter, t);
        }

        let f = |y: Real| self.payoff_at(y);
        let (fa, fb) = (f(a), f(b));
        let acc = if fa != 0.0 || fb != 0.0 {
            (fa + fb).abs() * 5e-5
        } else {
            1e-4
        };
        match SimpsonIntegral::new(acc, 8).integrate(f, a, b) {
            Ok(integral) => Ok(integral / (b - a)),
            Err(e) => {
                trace!("cell average at x = {x} falls back to the point value: {e}");
                self.inner_value(iter, t)
            }
        }
    }

    fn averages(&self, t: Time) -> Result<&[Real]> {
        if let Some(cached) = self.averages.get() {
            return Ok(cached.as_slice());
        }
        let d = self.direction;
        let values = self
            .mesher
            .layout()
            .iter()
            .filter(|it| {
                it.coordinates()
                    .iter()
                    .enumerate()
                    .all(|(k, &c)| k == d || c == 0)
            })
            .map(|it| self.cell_average(&it, t))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.averages.get_or_init(|| values).as_slice())
    }
}

impl FdmInnerValueCalculator for FdmLogInnerValue {
    fn inner_value(&self, iter: &FdmLinearOpIterator, _t: Time) -> Result<Real> {
        Ok(self.payoff_at(self.mesher.location(iter, self.direction)))
    }

    fn avg_inner_value(&self, iter: &FdmLinearOpIterator, t: Time) -> Result<Real> {
        let coordinate = iter
            .coordinates()
            .get(self.direction)
            .copied()
            .ok_or_else(|| Error::InvalidArgument("iterator of the wrong dimension".into()))?;
        let averages = self.averages(t)?;
        averages
            .get(coordinate)
            .copied()
            .ok_or(Error::IndexOutOfRange {
                index: coordinate,
                size: averages.len(),
            })
    }
}

// ── Zero ──────────────────────────────────────────────────────────────────────

/// Zero everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct FdmZeroInnerValue;

impl FdmInnerValueCalculator for FdmZeroInnerValue {
    fn inner_value(&self, _iter: &FdmLinearOpIterator, _t: Time) -> Result<Real> {
        Ok(0.0)
    }

    fn avg_inner_value(&self, _iter: &FdmLinearOpIterator, _t: Time) -> Result<Real> {
        Ok(0.0)
    }
}
