//! Standard normal distribution.
//!
//! Density, cumulative distribution and its inverse, expressed through the
//! complementary error function of `statrs`.

use ql_core::{
    errors::{Error, Result},
    Real,
};
use statrs::function::erf::{erfc, erfc_inv};
use std::f64::consts::{PI, SQRT_2};

/// The standard normal probability density function.
///
/// `φ(x) = exp(-x²/2) / √(2π)`
#[inline]
pub fn normal_pdf(x: Real) -> Real {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// The standard normal cumulative distribution function Φ(x).
///
/// `Φ(x) = erfc(-x/√2) / 2`, accurate in both tails.
pub fn normal_cdf(x: Real) -> Real {
    0.5 * erfc(-x / SQRT_2)
}

/// The inverse standard normal CDF (probit function).
///
/// # Errors
/// Returns [`Error::InvalidArgument`] unless `0 < p < 1`.
pub fn normal_cdf_inverse(p: Real) -> Result<Real> {
    if !(p > 0.0 && p < 1.0) {
        return Err(Error::InvalidArgument(format!(
            "probability must be in (0, 1), got {p}"
        )));
    }
    Ok(-SQRT_2 * erfc_inv(2.0 * p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn density_and_cdf_at_zero() {
        assert_abs_diff_eq!(normal_pdf(0.0), 1.0 / (2.0 * PI).sqrt(), epsilon = 1e-15);
        assert_abs_diff_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-15);
    }

    #[test]
    fn tails() {
        assert_abs_diff_eq!(normal_cdf(10.0), 1.0, epsilon = 1e-15);
        assert!(normal_cdf(-10.0) < 1e-20);
        assert!(normal_cdf(-10.0) > 0.0);
    }

    #[test]
    fn known_quantiles() {
        assert_abs_diff_eq!(normal_cdf_inverse(0.5).unwrap(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(
            normal_cdf_inverse(0.975).unwrap(),
            1.959_963_984_540_054,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            normal_cdf_inverse(0.9999).unwrap(),
            3.719_016_485_455_68,
            epsilon = 1e-8
        );
    }

    #[test]
    fn inverse_roundtrip() {
        for p in [1e-6, 0.01, 0.25, 0.5, 0.75, 0.99, 1.0 - 1e-6] {
            let x = normal_cdf_inverse(p).unwrap();
            assert_abs_diff_eq!(normal_cdf(x), p, epsilon = 1e-12);
        }
    }

    #[test]
    fn inverse_rejects_degenerate_probabilities() {
        assert!(normal_cdf_inverse(0.0).is_err());
        assert!(normal_cdf_inverse(1.0).is_err());
        assert!(normal_cdf_inverse(Real::NAN).is_err());
    }
}
