//! Grid that clusters points around a critical location.
//!
//! Uniform points `u ∈ [0, 1]` are mapped through
//!
//!   `x(u) = c + d · sinh(c₁·(1 − u) + c₂·u)`,
//!   `c₁ = asinh((start − c)/d)`, `c₂ = asinh((end − c)/d)`,
//!
//! where `c` is the concentration point and `d = density · (end − start)`.
//! Small densities pack the points more tightly around `c`.

use std::ops::Deref;

use ql_core::{errors::Result, Real, Size};
use ql_math::{close_enough, Interpolation1D, LinearInterpolation};

use super::Fdm1dMesher;

/// One-dimensional mesher concentrated around a point.
#[derive(Debug, Clone, PartialEq)]
pub struct Concentrating1dMesher(Fdm1dMesher);

impl Concentrating1dMesher {
    /// Build the grid on `[start, end]`.
    ///
    /// `c_point` is `(point, density)`; without it the grid is uniform.
    /// With `require_c_point` the concentration point becomes a grid node.
    ///
    /// # Errors
    /// `InvalidArgument` when `end <= start`, `size < 2`, the point lies
    /// outside `[start, end]`, the density is not positive, or
    /// `require_c_point` is set without a point.
    pub fn new(
        start: Real,
        end: Real,
        size: Size,
        c_point: Option<(Real, Real)>,
        require_c_point: bool,
    ) -> Result<Self> {
        ql_core::ensure_arg!(end > start, "end ({end}) must be larger than start ({start})");
        ql_core::ensure_arg!(size >= 2, "a mesher needs at least 2 points, got {size}");
        ql_core::ensure_arg!(
            !require_c_point || c_point.is_some(),
            "cPoint is required in grid but not given"
        );

        let dx = 1.0 / (size - 1) as Real;
        let mut locations = vec![0.0; size];

        match c_point {
            Some((c, density)) => {
                ql_core::ensure_arg!(
                    c >= start && c <= end,
                    "cPoint ({c}) must be between start ({start}) and end ({end})"
                );
                ql_core::ensure_arg!(density > 0.0, "density > 0 required, got {density}");

                let d = density * (end - start);
                let c1 = ((start - c) / d).asinh();
                let c2 = ((end - c) / d).asinh();

                let transform = if require_c_point && size > 2 {
                    let mut u = vec![0.0];
                    let mut z = vec![0.0];
                    if !close_enough(c, start, 42) && !close_enough(c, end, 42) {
                        let z0 = -c1 / (c2 - c1);
                        let node = (z0 * (size - 1) as Real).round().clamp(1.0, (size - 2) as Real);
                        u.push(node * dx);
                        z.push(z0);
                    }
                    u.push(1.0);
                    z.push(1.0);
                    Some(LinearInterpolation::new(&u, &z)?)
                } else {
                    None
                };

                for (i, x) in locations.iter_mut().enumerate().take(size - 1).skip(1) {
                    let ui = i as Real * dx;
                    let li = transform.as_ref().map_or(ui, |t| t.operator(ui));
                    *x = c + d * (c1 * (1.0 - li) + c2 * li).sinh();
                }
            }
            None => {
                for (i, x) in locations.iter_mut().enumerate().take(size - 1).skip(1) {
                    *x = start + i as Real * dx * (end - start);
                }
            }
        }
        locations[0] = start;
        locations[size - 1] = end;

        Fdm1dMesher::from_locations(locations).map(Self)
    }

    /// Unwrap the underlying grid.
    pub fn into_inner(self) -> Fdm1dMesher {
        self.0
    }
}

impl Deref for Concentrating1dMesher {
    type Target = Fdm1dMesher;

    fn deref(&self) -> &Fdm1dMesher {
        &self.0
    }
}

impl From<Concentrating1dMesher> for Fdm1dMesher {
    fn from(m: Concentrating1dMesher) -> Self {
        m.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn without_point_is_uniform() {
        let m = Concentrating1dMesher::new(0.0, 2.0, 5, None, false).unwrap();
        for (x, e) in m.locations().iter().zip([0.0, 0.5, 1.0, 1.5, 2.0]) {
            assert!((x - e).abs() < 1e-14);
        }
    }

    #[test]
    fn points_cluster_around_c_point() {
        let m = Concentrating1dMesher::new(0.0, 10.0, 51, Some((4.0, 0.05)), false).unwrap();
        let locs = m.locations();
        assert_eq!(locs[0], 0.0);
        assert_eq!(locs[50], 10.0);
        // the smallest spacing is next to the concentration point
        let (i_min, _) = m
            .dplus()
            .iter()
            .enumerate()
            .filter_map(|(i, h)| h.map(|h| (i, h)))
            .fold((0, Real::MAX), |acc, (i, h)| if h < acc.1 { (i, h) } else { acc });
        assert!((locs[i_min] - 4.0).abs() < 0.5, "densest at {}", locs[i_min]);
        assert!(m.dplus()[0].unwrap() > 2.0 * m.dplus()[i_min].unwrap());
    }

    #[test]
    fn required_point_is_a_node() {
        let m = Concentrating1dMesher::new(-1.0, 3.0, 40, Some((0.7, 0.1)), true).unwrap();
        assert!(m.locations().iter().any(|&x| (x - 0.7).abs() < 1e-10));
    }

    #[test]
    fn invalid_arguments() {
        assert!(Concentrating1dMesher::new(1.0, 0.0, 10, None, false).is_err());
        assert!(Concentrating1dMesher::new(0.0, 1.0, 1, None, false).is_err());
        assert!(Concentrating1dMesher::new(0.0, 1.0, 10, Some((2.0, 0.1)), false).is_err());
        assert!(Concentrating1dMesher::new(0.0, 1.0, 10, Some((0.5, 0.0)), false).is_err());
        assert!(Concentrating1dMesher::new(0.0, 1.0, 10, None, true).is_err());
    }
}
