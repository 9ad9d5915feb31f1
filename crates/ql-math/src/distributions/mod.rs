//! Probability distributions.
//!
//! Only the standard normal distribution is needed by the finite-difference
//! meshers; it delegates to the special functions of the `statrs` crate.

pub mod normal;

pub use normal::{normal_cdf, normal_cdf_inverse, normal_pdf};
