use serde::{Deserialize, Serialize};

use crate::error::ProjectFinanceError;
use crate::types::Rate;
use crate::ProjectFinanceResult;

/// One row of the per-period discounting detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscountedFlow {
    /// 1-based period index; period 0 is the initial outlay and never appears here.
    pub period: u32,
    pub flow: f64,
    pub discount_factor: f64,
    pub discounted_flow: f64,
}

/// Net Present Value together with the discounting detail behind it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NpvResult {
    pub npv: f64,
    pub discounted_flows: Vec<DiscountedFlow>,
}

fn check_rate(rate: Rate) -> ProjectFinanceResult<()> {
    if !rate.is_finite() || rate <= -1.0 {
        return Err(ProjectFinanceError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

pub(crate) fn validate_cash_flows(investment: f64, flows: &[f64]) -> ProjectFinanceResult<()> {
    if !investment.is_finite() || investment < 0.0 {
        return Err(ProjectFinanceError::InvalidInput {
            field: "investment".into(),
            reason: "Initial investment must be a finite, non-negative amount".into(),
        });
    }
    if flows.is_empty() {
        return Err(ProjectFinanceError::InvalidInput {
            field: "flows".into(),
            reason: "At least one cash-flow period is required".into(),
        });
    }
    if let Some(t) = flows.iter().position(|f| !f.is_finite()) {
        return Err(ProjectFinanceError::InvalidInput {
            field: "flows".into(),
            reason: format!("Cash flow for period {} is not a finite number", t + 1),
        });
    }
    Ok(())
}

/// Compounding factor `(1 + rate)^period` used to discount a flow.
pub fn discount_factor(rate: Rate, period: u32) -> ProjectFinanceResult<f64> {
    check_rate(rate)?;
    let exponent = i32::try_from(period).map_err(|_| ProjectFinanceError::InvalidInput {
        field: "period".into(),
        reason: format!("Period {period} is out of range"),
    })?;
    Ok((1.0 + rate).powi(exponent))
}

/// Net Present Value of a series of end-of-period flows against an initial outlay.
///
/// `flows[0]` belongs to period 1. The result carries one [`DiscountedFlow`] per
/// period, in order.
pub fn npv(investment: f64, flows: &[f64], rate: Rate) -> ProjectFinanceResult<NpvResult> {
    validate_cash_flows(investment, flows)?;
    check_rate(rate)?;

    let one_plus_r = 1.0 + rate;
    let mut factor = 1.0_f64;
    let mut total = -investment;
    let mut discounted_flows = Vec::with_capacity(flows.len());

    for (t, &flow) in flows.iter().enumerate() {
        factor *= one_plus_r;
        let discounted = flow / factor;
        total += discounted;
        discounted_flows.push(DiscountedFlow {
            period: t as u32 + 1,
            flow,
            discount_factor: factor,
            discounted_flow: discounted,
        });
    }

    Ok(NpvResult {
        npv: total,
        discounted_flows,
    })
}

/// NPV without the per-period detail.
pub fn npv_value(investment: f64, flows: &[f64], rate: Rate) -> ProjectFinanceResult<f64> {
    validate_cash_flows(investment, flows)?;
    check_rate(rate)?;
    Ok(npv_unchecked(investment, flows, rate))
}

/// Raw NPV for callers that have already validated their inputs.
pub(crate) fn npv_unchecked(investment: f64, flows: &[f64], rate: Rate) -> f64 {
    let one_plus_r = 1.0 + rate;
    let mut factor = 1.0_f64;
    let mut total = -investment;
    for flow in flows {
        factor *= one_plus_r;
        total += flow / factor;
    }
    total
}

/// Running totals of `[-investment, flows...]`; index 0 is the outlay.
pub fn cumulative_flows(investment: f64, flows: &[f64]) -> Vec<f64> {
    std::iter::once(-investment)
        .chain(flows.iter().copied())
        .scan(0.0_f64, |acc, f| {
            *acc += f;
            Some(*acc)
        })
        .collect()
}

/// The same flow repeated for every period.
pub fn uniform_flows(amount: f64, periods: usize) -> Vec<f64> {
    vec![amount; periods]
}

/// Flows growing geometrically from `base`: `base * (1 + growth)^i`.
pub fn growing_flows(base: f64, growth: Rate, periods: usize) -> Vec<f64> {
    let mut flows = Vec::with_capacity(periods);
    let mut current = base;
    for _ in 0..periods {
        flows.push(current);
        current *= 1.0 + growth;
    }
    flows
}
