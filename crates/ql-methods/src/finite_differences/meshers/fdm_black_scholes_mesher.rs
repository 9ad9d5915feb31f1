//! Log-spot grid sized from the Black-Scholes distribution of the underlying.
//!
//! The grid covers `[ln F_min − σ√T·Φ⁻¹(1−ε)·s, ln F_max + σ√T·Φ⁻¹(1−ε)·s]`
//! where `F_min`/`F_max` are the extreme forwards over `[0, T]`, `ε` the
//! tail probability left outside and `s` a scale factor.

use std::ops::Deref;

use ql_core::{errors::Result, Rate, Real, Size, Time, Volatility};
use ql_math::normal_cdf_inverse;

use super::{Concentrating1dMesher, Fdm1dMesher, Uniform1dMesher};

/// Optional knobs of [`FdmBlackScholesMesher`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlackScholesMesherOptions {
    /// Override of the lower log-spot bound.
    pub x_min: Option<Real>,
    /// Override of the upper log-spot bound.
    pub x_max: Option<Real>,
    /// Probability mass left outside the grid on each side.
    pub eps: Real,
    /// Widening factor applied to the standard-deviation span.
    pub scale_factor: Real,
    /// Concentration point in spot terms and its density.
    pub c_point: Option<(Real, Real)>,
}

impl Default for BlackScholesMesherOptions {
    fn default() -> Self {
        Self {
            x_min: None,
            x_max: None,
            eps: 1e-4,
            scale_factor: 1.5,
            c_point: None,
        }
    }
}

/// One-dimensional mesher in `x = ln S`.
#[derive(Debug, Clone, PartialEq)]
pub struct FdmBlackScholesMesher(Fdm1dMesher);

impl FdmBlackScholesMesher {
    /// Grid with default options.
    pub fn new(
        size: Size,
        spot: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        maturity: Time,
    ) -> Result<Self> {
        Self::with_options(size, spot, r, q, vol, maturity, BlackScholesMesherOptions::default())
    }

    /// Grid with explicit options.
    ///
    /// A concentration point outside the computed range is ignored and the
    /// grid falls back to uniform spacing.
    pub fn with_options(
        size: Size,
        spot: Real,
        r: Rate,
        q: Rate,
        vol: Volatility,
        maturity: Time,
        options: BlackScholesMesherOptions,
    ) -> Result<Self> {
        ql_core::ensure_arg!(spot > 0.0, "negative or null underlying given: {spot}");
        ql_core::ensure_arg!(maturity > 0.0, "maturity must be positive, got {maturity}");
        ql_core::ensure_arg!(vol >= 0.0, "volatility must be non-negative, got {vol}");

        let forward = spot * ((r - q) * maturity).exp();
        let (lo, hi) = (spot.min(forward), spot.max(forward));

        let span =
            vol * maturity.sqrt() * normal_cdf_inverse(1.0 - options.eps)? * options.scale_factor;
        let x_min = options.x_min.unwrap_or(lo.ln() - span);
        let x_max = options.x_max.unwrap_or(hi.ln() + span);

        let mesher: Fdm1dMesher = match options.c_point {
            Some((c, density)) if c > 0.0 && c.ln() >= x_min && c.ln() <= x_max => {
                let c_point = Some((c.ln(), density));
                Concentrating1dMesher::new(x_min, x_max, size, c_point, false)?.into()
            }
            _ => Uniform1dMesher::new(x_min, x_max, size)?.into(),
        };
        Ok(Self(mesher))
    }

    /// Unwrap the underlying grid.
    pub fn into_inner(self) -> Fdm1dMesher {
        self.0
    }
}

impl Deref for FdmBlackScholesMesher {
    type Target = Fdm1dMesher;

    fn deref(&self) -> &Fdm1dMesher {
        &self.0
    }
}

impl From<FdmBlackScholesMesher> for Fdm1dMesher {
    fn from(m: FdmBlackScholesMesher) -> Self {
        m.0
    }
}
