use serde::{Deserialize, Serialize};

use crate::error::ProjectFinanceError;
use crate::time_value::{npv_unchecked, validate_cash_flows};
use crate::types::{PeriodKind, Rate};
use crate::ProjectFinanceResult;

/// One point on the NPV-versus-rate curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub rate: Rate,
    pub npv: f64,
}

/// Half-open range of candidate rates, `[start, stop)` in steps of `step`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRange {
    pub start: Rate,
    pub stop: Rate,
    pub step: Rate,
}

impl Default for RateRange {
    fn default() -> Self {
        Self {
            start: 0.01,
            stop: 0.30,
            step: 0.01,
        }
    }
}

/// Upper bound on the number of rates a single grid may hold.
pub const MAX_GRID_POINTS: usize = 10_000;

/// Generate the candidate rates of a [`RateRange`].
///
/// Each value is computed as `start + i * step` rather than by repeated
/// addition, so the grid does not drift. Grids longer than
/// [`MAX_GRID_POINTS`] are rejected.
pub fn rate_grid(range: &RateRange) -> ProjectFinanceResult<Vec<Rate>> {
    if !range.step.is_finite() || range.step <= 0.0 {
        return Err(ProjectFinanceError::InvalidInput {
            field: "step".into(),
            reason: "Step must be positive".into(),
        });
    }
    if !range.start.is_finite() || !range.stop.is_finite() {
        return Err(ProjectFinanceError::InvalidInput {
            field: "rate_range".into(),
            reason: "Range bounds must be finite".into(),
        });
    }

    let points = ((range.stop - range.start) / range.step - 1e-9).ceil().max(0.0);
    if !points.is_finite() || points > MAX_GRID_POINTS as f64 {
        return Err(ProjectFinanceError::InvalidInput {
            field: "step".into(),
            reason: format!("Rate grid would exceed {MAX_GRID_POINTS} points"),
        });
    }
    let count = points as usize;
    Ok((0..count)
        .map(|i| range.start + i as f64 * range.step)
        .collect())
}

/// NPV at every per-period rate in `rates`, in input order.
pub fn sweep(
    investment: f64,
    flows: &[f64],
    rates: &[Rate],
) -> ProjectFinanceResult<Vec<SensitivityPoint>> {
    validate_cash_flows(investment, flows)?;
    rates
        .iter()
        .map(|&rate| {
            if !rate.is_finite() || rate <= -1.0 {
                return Err(ProjectFinanceError::InvalidInput {
                    field: "rates".into(),
                    reason: format!("Rate {rate} is not greater than -100%"),
                });
            }
            Ok(SensitivityPoint {
                rate,
                npv: npv_unchecked(investment, flows, rate),
            })
        })
        .collect()
}

/// Like [`sweep`], but `annual_rates` are converted to the period rate of
/// `kind` before discounting. Points report the annual rate.
pub fn sweep_annual(
    investment: f64,
    flows: &[f64],
    annual_rates: &[Rate],
    kind: PeriodKind,
) -> ProjectFinanceResult<Vec<SensitivityPoint>> {
    validate_cash_flows(investment, flows)?;
    annual_rates
        .iter()
        .map(|&annual| {
            let period_rate = kind.per_period_rate(annual)?;
            Ok(SensitivityPoint {
                rate: annual,
                npv: npv_unchecked(investment, flows, period_rate),
            })
        })
        .collect()
}
