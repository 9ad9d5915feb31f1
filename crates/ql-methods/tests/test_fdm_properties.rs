//! Grid and stencil properties that must hold for any admissible input.

use std::sync::Arc;

use proptest::prelude::*;
use ql_math::Array;
use ql_methods::finite_differences::{
    ExplicitEulerScheme, FdmBlackScholesOp, FdmBoundaryConditionSet, FdmBoundarySide,
    FdmDirichletBoundary, FdmLinearOp, FdmLinearOpLayout, FdmMesher, FdmMesherComposite,
    FirstDerivativeOp, SecondDerivativeOp, TimeSteppingScheme, Uniform1dMesher,
};

fn uniform(start: f64, end: f64, n: usize) -> Arc<dyn FdmMesher> {
    Arc::new(FdmMesherComposite::from_1d(Uniform1dMesher::new(start, end, n).unwrap()).unwrap())
}

proptest! {
    #[test]
    fn uniform_spacing_is_constant(start in -10.0f64..10.0, len in 0.1f64..10.0, n in 3usize..60) {
        let m = Uniform1dMesher::new(start, start + len, n).unwrap();
        let h = len / (n - 1) as f64;
        for i in 1..n - 1 {
            let dp = m.dplus()[i].unwrap();
            let dm = m.dminus()[i].unwrap();
            prop_assert!((dp - h).abs() < 1e-9 * (1.0 + start.abs() + len));
            prop_assert!((dm - h).abs() < 1e-9 * (1.0 + start.abs() + len));
        }
        prop_assert!(m.dminus()[0].is_none());
        prop_assert!(m.dplus()[n - 1].is_none());
    }

    #[test]
    fn first_derivative_of_constant_vanishes(c in -100.0f64..100.0, n in 3usize..40) {
        let mesher = uniform(0.0, 1.0, n);
        let op = FirstDerivativeOp::new(0, mesher).unwrap();
        let out = op.apply(&Array::from_element(n, c)).unwrap();
        let h = 1.0 / (n - 1) as f64;
        for i in 1..n - 1 {
            prop_assert!(out[i].abs() < 1e-9 * (1.0 + c.abs()) / h);
        }
    }

    #[test]
    fn second_derivative_of_line_vanishes(
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
        n in 3usize..40,
    ) {
        let mesher = uniform(-1.0, 2.0, n);
        let x = mesher.locations(0);
        let line = x.map(|xi| a + b * xi);
        let out = SecondDerivativeOp::new(0, mesher).unwrap().apply(&line).unwrap();
        let h = 3.0 / (n - 1) as f64;
        let scale = 1.0 + a.abs() + 2.0 * b.abs();
        for i in 1..n - 1 {
            prop_assert!(out[i].abs() < 1e-9 * scale / (h * h));
        }
    }

    #[test]
    fn layout_index_and_coordinates_are_inverse(dims in prop::collection::vec(1usize..6, 1..4)) {
        let layout = FdmLinearOpLayout::new(dims).unwrap();
        for (k, iter) in layout.iter().enumerate() {
            prop_assert_eq!(iter.index(), k);
            let coords = layout.coordinates(k).unwrap();
            prop_assert_eq!(coords.as_slice(), iter.coordinates());
            prop_assert_eq!(layout.index(&coords), k);
        }
        prop_assert!(layout.coordinates(layout.size()).is_err());
    }
}

#[test]
fn test_uniform_mesher_scenario() {
    let m = Uniform1dMesher::new(0.0, 1.0, 5).unwrap();
    assert_eq!(m.locations(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    for i in 1..4 {
        assert_eq!(m.dplus()[i], Some(0.25));
        assert_eq!(m.dminus()[i], Some(0.25));
    }
}

#[test]
fn test_dirichlet_forces_lower_value() {
    let mesher = uniform(0.0, 1.0, 5);
    let bc = FdmDirichletBoundary::new(&mesher, 5.0, 0, FdmBoundarySide::Lower).unwrap();
    let mut bcs = FdmBoundaryConditionSet::new().with(bc);

    // zero operator: r = q = vol = 0
    let mut op = FdmBlackScholesOp::new(mesher, 0.0, 0.0, 0.0, 0).unwrap();
    let mut scheme = ExplicitEulerScheme::new(&mut op, &mut bcs);
    scheme.set_step(0.01);
    let mut a = Array::from_slice(&[1.0, 2.0, 3.0, 4.0, 5.0]);
    scheme.step(&mut a, 0.02).unwrap();
    assert_eq!(a.as_slice(), &[5.0, 2.0, 3.0, 4.0, 5.0]);
}
