//! Time-stepping schemes.
//!
//! Every scheme advances a solution vector by one step of size `dt`
//! backwards in time, from `t` to `t − dt`, for the semi-discrete system
//! `∂u/∂t + L u = 0` written in time-to-go. A scheme borrows the composite
//! operator and the boundary conditions for the duration of a rollback.

pub mod craig_sneyd_scheme;
pub mod douglas_scheme;
pub mod explicit_euler_scheme;
pub mod hundsdorfer_scheme;
pub mod implicit_euler_scheme;
pub mod mixed_scheme;
pub mod modified_craig_sneyd_scheme;

pub use craig_sneyd_scheme::CraigSneydScheme;
pub use douglas_scheme::DouglasScheme;
pub use explicit_euler_scheme::ExplicitEulerScheme;
pub use hundsdorfer_scheme::HundsdorferScheme;
pub use implicit_euler_scheme::ImplicitEulerScheme;
pub use mixed_scheme::{CrankNicolsonScheme, MixedScheme};
pub use modified_craig_sneyd_scheme::ModifiedCraigSneydScheme;

use std::fmt;
use std::str::FromStr;

use ql_core::{
    errors::{Error, Result},
    Real, Time,
};
use ql_math::Array;

use crate::finite_differences::boundary_conditions::FdmBoundaryConditionSet;
use crate::finite_differences::operators::FdmLinearOpComposite;

/// Tolerance below zero accepted for the time reached by a step.
pub const NEGATIVE_TIME_TOLERANCE: Time = 1e-8;

/// A scheme that moves the solution one step back in time.
pub trait TimeSteppingScheme {
    /// Set the step size used by subsequent calls to [`step`](Self::step).
    fn set_step(&mut self, dt: Time);

    /// Advance `a` from `t` to `t − dt`.
    ///
    /// # Errors
    /// [`Error::InvalidTimeStep`] if no step size was set or the step would
    /// end before `t = 0`; operator and solver errors are propagated.
    fn step(&mut self, a: &mut Array, t: Time) -> Result<()>;
}

/// Check the step and move operator and boundary conditions to
/// `[max(0, t − dt), t]`. Returns the step size.
pub(crate) fn begin_step(
    map: &mut dyn FdmLinearOpComposite,
    bc_set: &mut FdmBoundaryConditionSet,
    t: Time,
    dt: Option<Time>,
) -> Result<Time> {
    let dt = dt.ok_or_else(|| Error::InvalidTimeStep("time step not set".into()))?;
    if !(dt.is_finite() && dt >= 0.0) {
        return Err(Error::InvalidTimeStep(format!("invalid step size {dt}")));
    }
    if t - dt < -NEGATIVE_TIME_TOLERANCE {
        return Err(Error::InvalidTimeStep(format!(
            "a step towards negative time given: t = {t}, dt = {dt}"
        )));
    }
    let t0 = (t - dt).max(0.0);
    map.set_time(t0, t)?;
    bc_set.set_time(t0);
    Ok(dt)
}

/// Explicit predictor `a + dt·L a` shared by the ADI schemes.
pub(crate) fn explicit_predictor(
    map: &mut dyn FdmLinearOpComposite,
    bc_set: &FdmBoundaryConditionSet,
    a: &Array,
    dt: Time,
) -> Result<Array> {
    bc_set.apply_before_applying(map)?;
    let mut y = a + &(dt * &map.apply(a)?);
    bc_set.apply_after_applying(&mut y)?;
    Ok(y)
}

/// `x ← solve_splitting(i, x − s·L_i(base), s)` for every axis `i`.
pub(crate) fn splitting_sweep(
    map: &dyn FdmLinearOpComposite,
    x: &mut Array,
    base: &Array,
    s: Real,
) -> Result<()> {
    for i in 0..map.size() {
        let rhs = &*x - &(s * &map.apply_direction(i, base)?);
        *x = map.solve_splitting(i, &rhs, s)?;
    }
    Ok(())
}

// ── Scheme description ────────────────────────────────────────────────────────

/// Kind of time-stepping scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FdmSchemeType {
    /// Hundsdorfer-Verwer ADI.
    Hundsdorfer,
    /// Douglas ADI.
    Douglas,
    /// Craig-Sneyd ADI.
    CraigSneyd,
    /// Modified Craig-Sneyd ADI.
    ModifiedCraigSneyd,
    /// Fully implicit Euler.
    ImplicitEuler,
    /// Fully explicit Euler.
    ExplicitEuler,
    /// θ-blend of explicit and implicit Euler.
    CrankNicolson,
}

impl FdmSchemeType {
    /// Canonical name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Hundsdorfer => "Hundsdorfer",
            Self::Douglas => "Douglas",
            Self::CraigSneyd => "CraigSneyd",
            Self::ModifiedCraigSneyd => "ModifiedCraigSneyd",
            Self::ImplicitEuler => "ImplicitEuler",
            Self::ExplicitEuler => "ExplicitEuler",
            Self::CrankNicolson => "CrankNicolson",
        }
    }
}

impl fmt::Display for FdmSchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Scheme choice together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FdmSchemeDesc {
    /// Which scheme.
    pub scheme_type: FdmSchemeType,
    /// Implicitness parameter θ.
    pub theta: Real,
    /// Weight μ of the mixed-derivative correction.
    pub mu: Real,
}

impl FdmSchemeDesc {
    /// Arbitrary description.
    pub fn new(scheme_type: FdmSchemeType, theta: Real, mu: Real) -> Self {
        Self {
            scheme_type,
            theta,
            mu,
        }
    }

    /// Douglas, θ = ½.
    pub fn douglas() -> Self {
        Self::new(FdmSchemeType::Douglas, 0.5, 0.0)
    }

    /// Implicit Euler.
    pub fn implicit_euler() -> Self {
        Self::new(FdmSchemeType::ImplicitEuler, 0.0, 0.0)
    }

    /// Explicit Euler.
    pub fn explicit_euler() -> Self {
        Self::new(FdmSchemeType::ExplicitEuler, 0.0, 0.0)
    }

    /// Crank-Nicolson, θ = ½.
    pub fn crank_nicolson() -> Self {
        Self::new(FdmSchemeType::CrankNicolson, 0.5, 0.0)
    }

    /// Craig-Sneyd, θ = μ = ½.
    pub fn craig_sneyd() -> Self {
        Self::new(FdmSchemeType::CraigSneyd, 0.5, 0.5)
    }

    /// Modified Craig-Sneyd, θ = μ = ⅓.
    pub fn modified_craig_sneyd() -> Self {
        Self::new(FdmSchemeType::ModifiedCraigSneyd, 1.0 / 3.0, 1.0 / 3.0)
    }

    /// Hundsdorfer, θ = ½ + √3/6, μ = ½.
    pub fn hundsdorfer() -> Self {
        Self::new(FdmSchemeType::Hundsdorfer, 0.5 + 3.0f64.sqrt() / 6.0, 0.5)
    }

    /// Hundsdorfer with θ = 1 − √2/2, μ = ½.
    pub fn modified_hundsdorfer() -> Self {
        Self::new(FdmSchemeType::Hundsdorfer, 1.0 - 2.0f64.sqrt() / 2.0, 0.5)
    }
}

impl Default for FdmSchemeDesc {
    fn default() -> Self {
        Self::douglas()
    }
}

impl fmt::Display for FdmSchemeDesc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(theta={}, mu={})", self.scheme_type, self.theta, self.mu)
    }
}

impl FromStr for FdmSchemeDesc {
    type Err = Error;

    /// Parse a preset by name, e.g. `"Douglas"` or `"ModifiedHundsdorfer"`.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "Douglas" => Ok(Self::douglas()),
            "ImplicitEuler" => Ok(Self::implicit_euler()),
            "ExplicitEuler" => Ok(Self::explicit_euler()),
            "CrankNicolson" => Ok(Self::crank_nicolson()),
            "CraigSneyd" => Ok(Self::craig_sneyd()),
            "ModifiedCraigSneyd" => Ok(Self::modified_craig_sneyd()),
            "Hundsdorfer" => Ok(Self::hundsdorfer()),
            "ModifiedHundsdorfer" => Ok(Self::modified_hundsdorfer()),
            other => Err(Error::InvalidArgument(format!("unknown scheme '{other}'"))),
        }
    }
}
