use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::investment::irr::{solve_irr, IrrOutcome, IrrSettings};
use crate::investment::payback::payback_period;
use crate::investment::sensitivity::{rate_grid, sweep_annual, RateRange, SensitivityPoint};
use crate::time_value::{cumulative_flows, npv, DiscountedFlow};
use crate::types::{with_metadata, ComputationOutput, PeriodKind, Rate};
use crate::ProjectFinanceResult;

/// Input for a full discounted-cash-flow appraisal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    /// Period-0 outlay, as a positive amount.
    pub initial_investment: f64,
    /// End-of-period flows; `cash_flows[0]` is period 1.
    pub cash_flows: Vec<f64>,
    /// Annual discount rate as a decimal.
    pub discount_rate: Rate,
    #[serde(default)]
    pub period_kind: PeriodKind,
    #[serde(default)]
    pub irr: IrrSettings,
    /// Annual rates to sweep for the sensitivity curve.
    #[serde(default)]
    pub sensitivity_range: RateRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpvVerdict {
    Profitable,
    Unprofitable,
    BreakEven,
}

impl NpvVerdict {
    pub fn from_npv(npv: f64) -> Self {
        if npv > 0.0 {
            NpvVerdict::Profitable
        } else if npv < 0.0 {
            NpvVerdict::Unprofitable
        } else {
            NpvVerdict::BreakEven
        }
    }
}

/// Everything the presentation layer needs to render an investment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentAppraisal {
    pub period_kind: PeriodKind,
    /// Rate actually used to discount one period.
    pub period_rate: Rate,
    pub npv: f64,
    pub verdict: NpvVerdict,
    pub discounted_flows: Vec<DiscountedFlow>,
    pub irr: IrrOutcome,
    /// `Some(irr > period_rate)` when the IRR is defined.
    pub irr_exceeds_rate: Option<bool>,
    /// Index into `cumulative_flows` at which the outlay is recovered.
    pub payback_period: Option<usize>,
    pub cumulative_flows: Vec<f64>,
    pub sensitivity: Vec<SensitivityPoint>,
}

/// Appraise an investment: NPV with detail, IRR, payback and the
/// rate-sensitivity curve.
pub fn appraise_investment(
    input: &InvestmentInput,
) -> ProjectFinanceResult<ComputationOutput<InvestmentAppraisal>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let period_rate = input.period_kind.per_period_rate(input.discount_rate)?;
    let valuation = npv(input.initial_investment, &input.cash_flows, period_rate)?;

    let irr = solve_irr(input.initial_investment, &input.cash_flows, &input.irr)?;
    let irr_exceeds_rate = irr.rate().map(|r| r > period_rate);
    if let IrrOutcome::Undefined { reason, .. } = &irr {
        warnings.push(format!("IRR could not be determined ({reason:?})"));
    }

    let payback = payback_period(input.initial_investment, &input.cash_flows);
    if payback.is_none() {
        warnings.push(format!(
            "Initial investment is not recovered within {} {}s",
            input.cash_flows.len(),
            input.period_kind.label()
        ));
    }

    let rates = rate_grid(&input.sensitivity_range)?;
    let sensitivity = sweep_annual(
        input.initial_investment,
        &input.cash_flows,
        &rates,
        input.period_kind,
    )?;

    log::debug!(
        "appraised {} periods: npv={:.2}, irr={:?}, payback={:?}",
        input.cash_flows.len(),
        valuation.npv,
        irr.rate(),
        payback
    );

    let output = InvestmentAppraisal {
        period_kind: input.period_kind,
        period_rate,
        npv: valuation.npv,
        verdict: NpvVerdict::from_npv(valuation.npv),
        discounted_flows: valuation.discounted_flows,
        irr,
        irr_exceeds_rate,
        payback_period: payback,
        cumulative_flows: cumulative_flows(input.initial_investment, &input.cash_flows),
        sensitivity,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Discounted Cash Flow Appraisal (NPV, Newton-Raphson IRR, simple payback)",
        &serde_json::json!({
            "initial_investment": input.initial_investment,
            "periods": input.cash_flows.len(),
            "discount_rate": input.discount_rate,
            "period_kind": input.period_kind,
            "irr_settings": input.irr,
        }),
        warnings,
        elapsed,
        output,
    ))
}
