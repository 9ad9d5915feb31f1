//! Black-Scholes finite-difference pricing checked against closed forms.

use std::sync::Arc;

use approx::assert_abs_diff_eq;
use ql_math::normal_cdf;
use ql_methods::finite_differences::{
    Fdm1DimSolver, FdmBlackScholesMesher, FdmBlackScholesOp, FdmBoundaryConditionSet,
    FdmBoundarySide, FdmDirichletBoundary, FdmExercise, FdmInnerValueCalculator,
    FdmLogInnerValue, FdmMesher, FdmMesherComposite, FdmSchemeDesc, FdmSolverDesc,
    FdmStepConditionComposite, FdmTimeDepDirichletBoundary, OptionType, PlainVanillaPayoff,
};

struct Market {
    spot: f64,
    strike: f64,
    r: f64,
    q: f64,
    vol: f64,
    maturity: f64,
}

const MARKET: Market = Market {
    spot: 100.0,
    strike: 100.0,
    r: 0.05,
    q: 0.02,
    vol: 0.2,
    maturity: 1.0,
};

fn black_scholes(option_type: OptionType, m: &Market) -> f64 {
    let sd = m.vol * m.maturity.sqrt();
    let fwd = m.spot * ((m.r - m.q) * m.maturity).exp();
    let df = (-m.r * m.maturity).exp();
    let d1 = (fwd / m.strike).ln() / sd + 0.5 * sd;
    let d2 = d1 - sd;
    match option_type {
        OptionType::Call => df * (fwd * normal_cdf(d1) - m.strike * normal_cdf(d2)),
        OptionType::Put => df * (m.strike * normal_cdf(-d2) - fwd * normal_cdf(-d1)),
    }
}

fn solve_with(
    option_type: OptionType,
    exercise: FdmExercise,
    scheme: FdmSchemeDesc,
    x_grid: usize,
    time_steps: usize,
    bc_set: impl FnOnce(&Arc<dyn FdmMesher>) -> FdmBoundaryConditionSet,
) -> Fdm1DimSolver {
    let m = &MARKET;
    let mesher: Arc<dyn FdmMesher> = Arc::new(
        FdmMesherComposite::from_1d(
            FdmBlackScholesMesher::new(x_grid, m.spot, m.r, m.q, m.vol, m.maturity).unwrap(),
        )
        .unwrap(),
    );
    let payoff = Arc::new(PlainVanillaPayoff::new(option_type, m.strike));
    let calculator: Arc<dyn FdmInnerValueCalculator> =
        Arc::new(FdmLogInnerValue::new(payoff, mesher.clone(), 0).unwrap());
    let condition = Arc::new(
        FdmStepConditionComposite::vanilla_composite(&exercise, mesher.clone(), calculator.clone())
            .unwrap(),
    );
    let mut op = FdmBlackScholesOp::new(mesher.clone(), m.r, m.q, m.vol, 0).unwrap();
    let desc = FdmSolverDesc {
        bc_set: bc_set(&mesher),
        mesher,
        condition,
        calculator,
        maturity: m.maturity,
        time_steps,
        damping_steps: 0,
    };
    Fdm1DimSolver::new(desc, scheme, &mut op).unwrap()
}

fn solve(
    option_type: OptionType,
    exercise: FdmExercise,
    scheme: FdmSchemeDesc,
    time_steps: usize,
) -> Fdm1DimSolver {
    solve_with(option_type, exercise, scheme, 201, time_steps, |_| {
        FdmBoundaryConditionSet::new()
    })
}

#[test]
fn test_european_call_and_put_match_closed_form() {
    let x = MARKET.spot.ln();
    for option_type in [OptionType::Call, OptionType::Put] {
        let expected = black_scholes(option_type, &MARKET);
        for scheme in [FdmSchemeDesc::douglas(), FdmSchemeDesc::crank_nicolson()] {
            let solver = solve(option_type, FdmExercise::European, scheme, 100);
            let npv = solver.interpolate_at(x).unwrap();
            assert_abs_diff_eq!(npv, expected, epsilon = 1e-2);
        }
    }
}

#[test]
fn test_delta_and_gamma_match_closed_form() {
    let m = &MARKET;
    let solver = solve(OptionType::Call, FdmExercise::European, FdmSchemeDesc::douglas(), 100);
    let x = m.spot.ln();

    let sd = m.vol * m.maturity.sqrt();
    let d1 = ((m.spot / m.strike).ln() + (m.r - m.q) * m.maturity) / sd + 0.5 * sd;
    let phi = (-0.5 * d1 * d1).exp() / (2.0 * std::f64::consts::PI).sqrt();
    let delta = (-m.q * m.maturity).exp() * normal_cdf(d1);
    let gamma = (-m.q * m.maturity).exp() * phi / (m.spot * sd);

    // in log-spot: V_S = V_x / S, V_SS = (V_xx − V_x) / S²
    let vx = solver.derivative_x(x).unwrap();
    let vxx = solver.derivative_xx(x).unwrap();
    assert_abs_diff_eq!(vx / m.spot, delta, epsilon = 2e-3);
    assert_abs_diff_eq!((vxx - vx) / (m.spot * m.spot), gamma, epsilon = 1e-3);
}

#[test]
fn test_theta_matches_closed_form() {
    let m = &MARKET;
    let solver = solve(OptionType::Call, FdmExercise::European, FdmSchemeDesc::douglas(), 200);

    let sd = m.vol * m.maturity.sqrt();
    let d1 = ((m.spot / m.strike).ln() + (m.r - m.q) * m.maturity) / sd + 0.5 * sd;
    let d2 = d1 - sd;
    let phi = (-0.5 * d1 * d1).exp() / (2.0 * std::f64::consts::PI).sqrt();
    let theta = -m.spot * (-m.q * m.maturity).exp() * phi * m.vol / (2.0 * m.maturity.sqrt())
        + m.q * m.spot * (-m.q * m.maturity).exp() * normal_cdf(d1)
        - m.r * m.strike * (-m.r * m.maturity).exp() * normal_cdf(d2);

    let calculated = solver.theta_at(m.spot.ln()).unwrap();
    assert_abs_diff_eq!(calculated, theta, epsilon = 1e-1);
}

#[test]
fn test_american_put_dominates_european() {
    let x = MARKET.spot.ln();
    let european = solve(OptionType::Put, FdmExercise::European, FdmSchemeDesc::douglas(), 100);
    let american = solve(OptionType::Put, FdmExercise::American, FdmSchemeDesc::douglas(), 100);
    let e = european.interpolate_at(x).unwrap();
    let a = american.interpolate_at(x).unwrap();
    assert!(a > e + 0.05, "american {a} vs european {e}");

    // never below exercise value anywhere on the grid
    for (xi, v) in american.x().iter().zip(american.result_values().iter()) {
        assert!(*v >= (MARKET.strike - xi.exp()).max(0.0) - 1e-10);
    }
}

#[test]
fn test_bermudan_sits_between_european_and_american() {
    let x = MARKET.spot.ln();
    let price = |exercise| {
        solve(OptionType::Put, exercise, FdmSchemeDesc::douglas(), 100)
            .interpolate_at(x)
            .unwrap()
    };
    let e = price(FdmExercise::European);
    let b = price(FdmExercise::Bermudan(vec![0.25, 0.5, 0.75]));
    let a = price(FdmExercise::American);
    assert!(e < b && b < a, "{e} < {b} < {a}");
}

#[test]
fn test_dirichlet_boundaries_do_not_move_the_price() {
    let m = &MARKET;
    let x = m.spot.ln();
    let free = solve(OptionType::Put, FdmExercise::European, FdmSchemeDesc::douglas(), 100);

    let (strike, r, q, maturity) = (m.strike, m.r, m.q, m.maturity);
    let bounded = solve_with(
        OptionType::Put,
        FdmExercise::European,
        FdmSchemeDesc::douglas(),
        201,
        100,
        |mesher| {
            let s_min = mesher.locations(0).min().exp();
            let lower = FdmTimeDepDirichletBoundary::new(
                mesher,
                move |t| {
                    let tau = maturity - t;
                    strike * (-r * tau).exp() - s_min * (-q * tau).exp()
                },
                0,
                FdmBoundarySide::Lower,
            )
            .unwrap();
            let upper = FdmDirichletBoundary::new(mesher, 0.0, 0, FdmBoundarySide::Upper).unwrap();
            FdmBoundaryConditionSet::new().with(lower).with(upper)
        },
    );

    assert_abs_diff_eq!(
        free.interpolate_at(x).unwrap(),
        bounded.interpolate_at(x).unwrap(),
        epsilon = 1e-3
    );
    let values = bounded.result_values();
    assert_eq!(values[values.size() - 1], 0.0);
}

#[test]
fn test_schemes_converge_to_the_same_value() {
    // pure diffusion: no rates, no dividends
    let m = Market {
        r: 0.0,
        q: 0.0,
        maturity: 0.5,
        ..MARKET
    };
    let mesher: Arc<dyn FdmMesher> = Arc::new(
        FdmMesherComposite::from_1d(
            FdmBlackScholesMesher::new(101, m.spot, m.r, m.q, m.vol, m.maturity).unwrap(),
        )
        .unwrap(),
    );
    let price = |scheme: FdmSchemeDesc, steps: usize| {
        let payoff = Arc::new(PlainVanillaPayoff::new(OptionType::Call, m.strike));
        let calculator: Arc<dyn FdmInnerValueCalculator> =
            Arc::new(FdmLogInnerValue::new(payoff, mesher.clone(), 0).unwrap());
        let mut op = FdmBlackScholesOp::new(mesher.clone(), m.r, m.q, m.vol, 0).unwrap();
        let desc = FdmSolverDesc {
            mesher: mesher.clone(),
            bc_set: FdmBoundaryConditionSet::new(),
            condition: Arc::new(FdmStepConditionComposite::default()),
            calculator,
            maturity: m.maturity,
            time_steps: steps,
            damping_steps: 0,
        };
        Fdm1DimSolver::new(desc, scheme, &mut op)
            .unwrap()
            .interpolate_at(m.spot.ln())
            .unwrap()
    };

    let explicit = price(FdmSchemeDesc::explicit_euler(), 1000);
    let implicit = price(FdmSchemeDesc::implicit_euler(), 1000);
    let cn = price(FdmSchemeDesc::crank_nicolson(), 100);
    assert_abs_diff_eq!(explicit, cn, epsilon = 1e-2);
    assert_abs_diff_eq!(implicit, cn, epsilon = 1e-2);
    assert_abs_diff_eq!(cn, black_scholes(OptionType::Call, &m), epsilon = 2e-2);
}
