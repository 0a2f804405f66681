use project_finance_core::simulation::baseline::{baseline, estimate_durations};
use project_finance_core::simulation::duration::{allocate, DurationConfig};
use project_finance_core::simulation::portfolio::{
    compare, generate, run_simulation, summarize, SimulationConfig, SimulationInput,
    SimulatorState,
};
use project_finance_core::simulation::pricing::{price, PricingConfig};
use project_finance_core::simulation::random::RngSource;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const SEED: u64 = 20250301;

// ===========================================================================
// Duration allocation
// ===========================================================================

#[test]
fn test_allocation_invariants_across_dashboard_range() {
    let cfg = DurationConfig::default();
    let mut rng = RngSource::seeded(Some(SEED));
    for _ in 0..25 {
        for n in 1..=8 {
            for avg in 1..=20 {
                let a = allocate(&mut rng, n, avg, &cfg).unwrap();
                assert_eq!(a.durations.len(), n as usize);
                assert!(a.durations.iter().all(|&d| d >= 1));
                assert_eq!(a.durations.iter().sum::<u32>(), a.target_days);
            }
        }
    }
}

#[test]
fn test_custom_window() {
    let cfg = DurationConfig {
        ideal_days: 60,
        tolerance_days: 0,
        ..DurationConfig::default()
    };
    let mut rng = RngSource::seeded(Some(SEED));
    let a = allocate(&mut rng, 5, 12, &cfg).unwrap();
    assert_eq!(a.target_days, 60);
    assert_eq!(a.durations.iter().sum::<u32>(), 60);
}

// ===========================================================================
// Pricing
// ===========================================================================

#[test]
fn test_prices_are_hundreds_above_floor() {
    let cfg = PricingConfig::default();
    let mut rng = RngSource::seeded(Some(SEED));
    let reference = baseline().average_project_amount;
    for _ in 0..5_000 {
        let amount = price(&mut rng, 10, reference, &cfg).unwrap();
        assert!(amount >= dec!(1500));
        assert!((amount % dec!(100)).is_zero());
    }
}

#[test]
fn test_price_distribution_is_right_skewed_around_baseline() {
    let cfg = PricingConfig::default();
    let mut rng = RngSource::seeded(Some(SEED));
    let reference = baseline().average_project_amount;
    let mut amounts: Vec<Decimal> = (0..10_000)
        .map(|_| price(&mut rng, 8, reference, &cfg).unwrap())
        .collect();
    amounts.sort();
    let median = amounts[amounts.len() / 2];
    let mean = amounts.iter().sum::<Decimal>() / Decimal::from(amounts.len());
    assert!(mean > dec!(6000) && mean < dec!(10000), "mean={mean}");
    assert!(amounts[amounts.len() - 1] - median > median - amounts[0]);
}

// ===========================================================================
// Portfolio generation
// ===========================================================================

#[test]
fn test_generate_three_stays_within_month_window() {
    let cfg = SimulationConfig::default();
    let mut rng = RngSource::seeded(Some(SEED));
    for _ in 0..500 {
        let portfolio = generate(&mut rng, 3, None, &cfg).unwrap();
        assert_eq!(portfolio.projects.len(), 3);
        let total = summarize(&portfolio).total_days;
        assert!((23..=37).contains(&total), "total_days={total}");
    }
}

#[test]
fn test_margins_within_drawn_range() {
    let cfg = SimulationConfig::default();
    let mut rng = RngSource::seeded(Some(SEED));
    let portfolio = generate(&mut rng, 8, Some(3), &cfg).unwrap();
    for p in &portfolio.projects {
        assert!(p.margin_pct >= dec!(19.9) && p.margin_pct <= dec!(35.1), "{p:?}");
        assert!(p.profit < p.amount);
    }
}

#[test]
fn test_comparison_consistency() {
    let cfg = SimulationConfig::default();
    let mut rng = RngSource::seeded(Some(SEED));
    let portfolio = generate(&mut rng, 5, None, &cfg).unwrap();
    let report = compare(&portfolio, baseline());
    assert_eq!(
        report.differences.revenue,
        report.simulated.total_revenue - dec!(21750)
    );
    assert_eq!(report.differences.projects, dec!(2));
    assert_eq!(report.variations.projects, dec!(66.7));
    assert_eq!(report.real.total_projects, 9);
}

#[test]
fn test_state_regeneration_discards_previous_portfolio() {
    let cfg = SimulationConfig::default();
    let mut rng = RngSource::seeded(Some(SEED));
    let state = SimulatorState::new(&mut rng, &cfg)
        .unwrap()
        .with_item_count(4, &mut rng, &cfg)
        .unwrap()
        .regenerate(&mut rng, &cfg)
        .unwrap();
    let previous = state.portfolio.clone();
    let next = state.with_item_count(2, &mut rng, &cfg).unwrap().regenerate(&mut rng, &cfg).unwrap();
    assert_eq!(previous.projects.len(), 4);
    assert_eq!(next.portfolio.projects.len(), 2);
}

#[test]
fn test_run_simulation_envelope() {
    let input: SimulationInput = serde_json::from_value(serde_json::json!({
        "project_count": 3,
        "seed": 7
    }))
    .unwrap();
    let out = run_simulation(&input).unwrap();
    assert_eq!(out.result.summary.project_count, 3);
    assert_eq!(out.result.summary.total_days, out.result.portfolio.target_days);
    assert_eq!(out.metadata.precision, "ieee754_f64");
    assert_eq!(out.methodology, "Stochastic Project Portfolio Simulation");
}

#[test]
fn test_baseline_duration_estimates() {
    let mut rng = RngSource::seeded(Some(SEED));
    let estimates = estimate_durations(baseline(), &mut rng);
    assert_eq!(estimates.len(), baseline().projects.len());
    assert!(estimates.iter().all(|e| e.estimated_days >= 2));
}
