use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use ql_math::Array;
use ql_methods::finite_differences::{
    FdmBackwardSolver, FdmBlackScholesMesher, FdmBlackScholesOp, FdmBoundaryConditionSet,
    FdmHestonOp, FdmMesher, FdmMesherComposite, FdmSchemeDesc, Uniform1dMesher,
};

fn call_payoff(mesher: &dyn FdmMesher) -> Array {
    mesher.locations(0).map(|x| (x.exp() - 100.0).max(0.0))
}

fn bench_black_scholes_crank_nicolson(c: &mut Criterion) {
    let mut group = c.benchmark_group("black_scholes_crank_nicolson");
    for &size in &[100usize, 400] {
        let mesher: Arc<dyn FdmMesher> = Arc::new(
            FdmMesherComposite::from_1d(
                FdmBlackScholesMesher::new(size, 100.0, 0.05, 0.0, 0.2, 1.0)
                    .expect("benchmark mesher should be valid"),
            )
            .expect("benchmark mesher should be valid"),
        );
        let payoff = call_payoff(mesher.as_ref());
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| {
                let mut op = FdmBlackScholesOp::new(mesher.clone(), 0.05, 0.0, 0.2, 0)
                    .expect("operator should build");
                let mut bcs = FdmBoundaryConditionSet::new();
                let mut v = payoff.clone();
                FdmBackwardSolver::new(&mut op, &mut bcs, None, FdmSchemeDesc::crank_nicolson())
                    .rollback(&mut v, 1.0, 0.0, 100, 0)
                    .expect("rollback should succeed");
                black_box(v)
            })
        });
    }
    group.finish();
}

fn bench_heston_craig_sneyd(c: &mut Criterion) {
    let x0 = 100.0f64.ln();
    let mesher: Arc<dyn FdmMesher> = Arc::new(
        FdmMesherComposite::from_2d(
            Uniform1dMesher::new(x0 - 1.5, x0 + 1.5, 101).expect("x grid"),
            Uniform1dMesher::new(0.0, 0.5, 51).expect("v grid"),
        )
        .expect("benchmark mesher should be valid"),
    );
    let payoff = call_payoff(mesher.as_ref());

    c.bench_function("heston_craig_sneyd_101x51", |b| {
        b.iter(|| {
            let mut op = FdmHestonOp::new(mesher.clone(), 0.05, 0.0, 1.5, 0.04, 0.3, -0.7)
                .expect("operator should build");
            let mut bcs = FdmBoundaryConditionSet::new();
            let mut v = payoff.clone();
            FdmBackwardSolver::new(&mut op, &mut bcs, None, FdmSchemeDesc::craig_sneyd())
                .rollback(&mut v, 1.0, 0.0, 50, 2)
                .expect("rollback should succeed");
            black_box(v)
        })
    });
}

criterion_group!(benches, bench_black_scholes_crank_nicolson, bench_heston_craig_sneyd);
criterion_main!(benches);
