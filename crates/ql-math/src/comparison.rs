//! Floating-point comparison helpers.

use ql_core::Real;

/// Return `true` if `|a - b| <= epsilon`.
#[inline]
pub fn close(a: Real, b: Real, epsilon: Real) -> bool {
    (a - b).abs() <= epsilon
}

/// Return `true` if `a` and `b` agree to within `n` machine epsilons,
/// relative to the larger magnitude.
///
/// Exact equality always compares close, including two zeros.
#[inline]
pub fn close_enough(a: Real, b: Real, n: u32) -> bool {
    if a == b {
        return true;
    }
    let eps = (a.abs().max(b.abs())) * Real::EPSILON * n as Real;
    (a - b).abs() <= eps
}
