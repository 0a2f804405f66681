use project_finance_core::investment::appraisal::{appraise_investment, InvestmentInput, NpvVerdict};
use project_finance_core::investment::irr::{solve_irr, IrrOutcome, IrrSettings};
use project_finance_core::investment::payback::payback_period;
use project_finance_core::investment::sensitivity::{rate_grid, sweep, RateRange};
use project_finance_core::time_value::{growing_flows, npv, npv_value, uniform_flows};
use project_finance_core::{PeriodKind, ProjectFinanceError};

// ===========================================================================
// NPV properties
// ===========================================================================

#[test]
fn test_npv_at_zero_rate_is_undiscounted_sum() {
    let cases: &[(f64, &[f64])] = &[
        (100.0, &[50.0, 50.0, 50.0]),
        (0.0, &[-20.0, 35.5]),
        (25_000.0, &[1_000.0, -4_000.0, 12_500.0, 9_999.0]),
    ];
    for (investment, flows) in cases {
        let value = npv_value(*investment, flows, 0.0).unwrap();
        let expected: f64 = flows.iter().sum::<f64>() - investment;
        assert!((value - expected).abs() < 1e-9, "{value} != {expected}");
    }
}

#[test]
fn test_npv_strictly_decreasing_for_conventional_flows() {
    let flows = [12_000.0, 0.0, 8_000.0, 30_000.0];
    let rates = rate_grid(&RateRange {
        start: 0.0,
        stop: 1.0,
        step: 0.05,
    })
    .unwrap();
    let curve = sweep(40_000.0, &flows, &rates).unwrap();
    for pair in curve.windows(2) {
        assert!(pair[1].npv < pair[0].npv, "{pair:?}");
    }
}

#[test]
fn test_detail_rows_sum_to_npv() {
    let result = npv(5_000.0, &[1_500.0, 2_000.0, 2_500.0], 0.08).unwrap();
    let total: f64 = result.discounted_flows.iter().map(|d| d.discounted_flow).sum();
    assert!((result.npv - (total - 5_000.0)).abs() < 1e-9);
}

#[test]
fn test_rate_at_or_below_minus_one_is_domain_error() {
    for rate in [-1.0, -1.5] {
        let err = npv(100.0, &[60.0, 60.0], rate).unwrap_err();
        assert!(matches!(err, ProjectFinanceError::InvalidInput { .. }));
    }
}

// ===========================================================================
// IRR
// ===========================================================================

#[test]
fn test_converged_irr_zeroes_npv() {
    let settings = IrrSettings::default();
    let series: Vec<(f64, Vec<f64>)> = vec![
        (100_000.0, uniform_flows(30_000.0, 5)),
        (50_000.0, growing_flows(8_000.0, 0.05, 10)),
        (1_000.0, vec![-200.0, 700.0, 900.0]),
    ];
    for (investment, flows) in series {
        if let IrrOutcome::Converged { rate, .. } = solve_irr(investment, &flows, &settings).unwrap() {
            assert!(npv_value(investment, &flows, rate).unwrap().abs() < 1e-2);
        } else {
            panic!("IRR should converge for {flows:?}");
        }
    }
}

#[test]
fn test_undefined_irr_is_a_value_not_an_error() {
    let outcome = solve_irr(500.0, &[0.0, 0.0], &IrrSettings::default()).unwrap();
    assert!(outcome.rate().is_none());
    assert!(outcome.into_result().is_err());
}

// ===========================================================================
// Payback
// ===========================================================================

#[test]
fn test_payback_uses_strict_inequality() {
    assert_eq!(payback_period(100.0, &[50.0, 50.0, 50.0]), Some(3));
    assert_eq!(payback_period(100.0, &[50.0, 50.0, 0.0]), None);
}

// ===========================================================================
// End-to-end appraisal
// ===========================================================================

#[test]
fn test_reference_scenario() {
    let input = InvestmentInput {
        initial_investment: 100_000.0,
        cash_flows: uniform_flows(30_000.0, 5),
        discount_rate: 0.10,
        period_kind: PeriodKind::Annual,
        irr: IrrSettings::default(),
        sensitivity_range: RateRange::default(),
    };
    let out = appraise_investment(&input).unwrap();
    let r = out.result;
    assert!((r.npv - 13_723.60).abs() < 0.01, "npv={}", r.npv);
    let irr = r.irr.rate().unwrap();
    assert!((irr * 100.0 - 15.24).abs() < 0.005, "irr={irr}");
    assert_eq!(r.payback_period, Some(4));
    assert_eq!(r.verdict, NpvVerdict::Profitable);
    assert_eq!(r.discounted_flows.len(), 5);
    assert_eq!(out.metadata.precision, "ieee754_f64");
}

#[test]
fn test_appraisal_sensitivity_crosses_zero_near_irr() {
    let input: InvestmentInput = serde_json::from_value(serde_json::json!({
        "initial_investment": 100000.0,
        "cash_flows": [30000.0, 30000.0, 30000.0, 30000.0, 30000.0],
        "discount_rate": 0.10
    }))
    .unwrap();
    let r = appraise_investment(&input).unwrap().result;
    let positive_at_15 = r.sensitivity.iter().find(|p| (p.rate - 0.15).abs() < 1e-9).unwrap();
    let negative_at_16 = r.sensitivity.iter().find(|p| (p.rate - 0.16).abs() < 1e-9).unwrap();
    assert!(positive_at_15.npv > 0.0);
    assert!(negative_at_16.npv < 0.0);
}
