//! Error types for the finite-difference workspace.
//!
//! A single `thiserror`-derived enum covers construction errors, invalid
//! time stepping and numerical breakdowns. The `ensure!`, `ensure_arg!`,
//! `ensure_post!` and `fail!` macros are the shorthand used at every
//! precondition check.

use thiserror::Error;

/// The top-level error type.
///
/// All failures are fatal for the computation that raised them: callers may
/// report them but never continue with a partial result.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// General runtime error (see [`fail!`](crate::fail)).
    #[error("{0}")]
    Runtime(String),

    /// Precondition violated.
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// Postcondition violated.
    #[error("postcondition not satisfied: {0}")]
    Postcondition(String),

    /// Index out of range.
    #[error("index ({index}) out of range [0, {size})")]
    IndexOutOfRange {
        /// The index that was out of range.
        index: usize,
        /// The size of the container.
        size: usize,
    },

    /// Invalid construction argument (bounds, sizes, directions, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A time step that moves forward in time or was never configured.
    #[error("invalid time step: {0}")]
    InvalidTimeStep(String),

    /// Numerical breakdown: singular pivot, non-convergence, iteration limit.
    #[error("numerical failure: {0}")]
    Numerical(String),
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(positive(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::InvalidArgument(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_arg, errors::Error};
/// fn grid_size(n: usize) -> ql_core::errors::Result<usize> {
///     ensure_arg!(n >= 2, "at least two points required, got {n}");
///     Ok(n)
/// }
/// assert!(grid_size(5).is_ok());
/// assert!(matches!(grid_size(1), Err(Error::InvalidArgument(_))));
/// ```
#[macro_export]
macro_rules! ensure_arg {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::InvalidArgument(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Postcondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure_post, errors::Error};
/// fn compute(x: f64) -> ql_core::errors::Result<f64> {
///     let result = x * 2.0;
///     ensure_post!(result > 0.0, "result must be positive, got {result}");
///     Ok(result)
/// }
/// assert!(compute(1.0).is_ok());
/// assert!(compute(-1.0).is_err());
/// ```
#[macro_export]
macro_rules! ensure_post {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Postcondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checked_step(t: f64, dt: f64) -> Result<f64> {
        if t - dt < -1e-8 {
            return Err(Error::InvalidTimeStep(format!(
                "a step towards negative time given: t={t}, dt={dt}"
            )));
        }
        Ok(t - dt)
    }

    #[test]
    fn display_messages() {
        let e = Error::InvalidArgument("end must be larger than start".into());
        assert_eq!(e.to_string(), "invalid argument: end must be larger than start");

        let e = Error::Numerical("division by zero".into());
        assert_eq!(e.to_string(), "numerical failure: division by zero");

        let e = Error::IndexOutOfRange { index: 7, size: 5 };
        assert_eq!(e.to_string(), "index (7) out of range [0, 5)");
    }

    #[test]
    fn time_step_error_variant() {
        approx::assert_abs_diff_eq!(checked_step(0.02, 0.01).unwrap(), 0.01);
        assert!(matches!(
            checked_step(0.005, 0.01),
            Err(Error::InvalidTimeStep(_))
        ));
    }

    #[test]
    fn ensure_arg_maps_to_invalid_argument() {
        fn f(n: usize) -> Result<()> {
            ensure_arg!(n > 1, "need more than one point, got {n}");
            Ok(())
        }
        assert_eq!(
            f(1),
            Err(Error::InvalidArgument("need more than one point, got 1".into()))
        );
    }
}
