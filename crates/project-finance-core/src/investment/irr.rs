use serde::{Deserialize, Serialize};

use crate::error::ProjectFinanceError;
use crate::time_value::{npv_unchecked, validate_cash_flows};
use crate::types::Rate;
use crate::ProjectFinanceResult;

/// Newton-Raphson parameters for the IRR search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrSettings {
    pub initial_guess: Rate,
    pub max_iterations: u32,
    pub tolerance: f64,
}

impl Default for IrrSettings {
    fn default() -> Self {
        Self {
            initial_guess: 0.10,
            max_iterations: 1000,
            tolerance: 1e-6,
        }
    }
}

/// Why the solver gave up without a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedReason {
    /// `|f'(r)|` fell below the tolerance; a Newton step cannot be taken.
    FlatDerivative,
    /// The iterate, or the NPV evaluated at it, stopped being finite.
    Diverged,
    /// `max_iterations` ran out before either stopping rule held.
    IterationLimit,
}

/// Result of an IRR search. `Undefined` is an ordinary answer, not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IrrOutcome {
    Converged { rate: Rate, iterations: u32 },
    Undefined {
        reason: UndefinedReason,
        iterations: u32,
        last_rate: Rate,
        /// Last Newton step taken, `0.0` when none was.
        last_step: f64,
    },
}

impl IrrOutcome {
    pub fn rate(&self) -> Option<Rate> {
        match self {
            IrrOutcome::Converged { rate, .. } => Some(*rate),
            IrrOutcome::Undefined { .. } => None,
        }
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, IrrOutcome::Converged { .. })
    }

    /// Turn an undefined IRR into a `ConvergenceFailure` for callers that
    /// cannot proceed without a rate.
    pub fn into_result(self) -> ProjectFinanceResult<Rate> {
        match self {
            IrrOutcome::Converged { rate, .. } => Ok(rate),
            IrrOutcome::Undefined {
                iterations,
                last_step,
                ..
            } => Err(ProjectFinanceError::ConvergenceFailure {
                function: "IRR".into(),
                iterations,
                last_delta: last_step,
            }),
        }
    }
}

/// d(NPV)/d(rate): `Σ -flow[i]·(i+1) / (1+r)^(i+2)`.
fn npv_derivative(flows: &[f64], rate: Rate) -> f64 {
    let one_plus_r = 1.0 + rate;
    let mut factor = one_plus_r;
    let mut derivative = 0.0_f64;
    for (t, flow) in flows.iter().enumerate() {
        factor *= one_plus_r;
        derivative -= flow * (t as f64 + 1.0) / factor;
    }
    derivative
}

/// Internal Rate of Return using Newton-Raphson.
///
/// The iterate is never clamped or bounded. A step may land below -100% and
/// the search carries on from there, since `(1 + r)^k` stays defined for
/// integer periods. Only a non-finite rate or NPV (the iterate hit exactly
/// -100%, or overflowed) is reported as [`UndefinedReason::Diverged`].
pub fn solve_irr(
    investment: f64,
    flows: &[f64],
    settings: &IrrSettings,
) -> ProjectFinanceResult<IrrOutcome> {
    validate_cash_flows(investment, flows)?;
    if settings.tolerance.is_nan() || settings.tolerance <= 0.0 {
        return Err(ProjectFinanceError::InvalidInput {
            field: "tolerance".into(),
            reason: "Tolerance must be positive".into(),
        });
    }

    let tol = settings.tolerance;
    let mut rate = settings.initial_guess;
    let mut last_step = 0.0_f64;

    for i in 0..settings.max_iterations {
        let undefined = |reason| IrrOutcome::Undefined {
            reason,
            iterations: i,
            last_rate: rate,
            last_step,
        };

        if !rate.is_finite() {
            log::warn!("IRR diverged to rate {rate} after {i} iterations");
            return Ok(undefined(UndefinedReason::Diverged));
        }

        let value = npv_unchecked(investment, flows, rate);
        if !value.is_finite() {
            log::warn!("IRR diverged: NPV not finite at rate {rate}");
            return Ok(undefined(UndefinedReason::Diverged));
        }
        if value.abs() < tol {
            log::debug!("IRR converged on NPV at {rate} after {i} iterations");
            return Ok(IrrOutcome::Converged {
                rate,
                iterations: i,
            });
        }

        let derivative = npv_derivative(flows, rate);
        if !derivative.is_finite() || derivative.abs() < tol {
            log::warn!("IRR undefined: flat derivative {derivative} at rate {rate}");
            return Ok(undefined(UndefinedReason::FlatDerivative));
        }

        let next = rate - value / derivative;
        if (next - rate).abs() < tol {
            log::debug!("IRR converged on step size at {next} after {} iterations", i + 1);
            return Ok(IrrOutcome::Converged {
                rate: next,
                iterations: i + 1,
            });
        }
        last_step = next - rate;
        rate = next;
    }

    log::warn!(
        "IRR did not converge within {} iterations",
        settings.max_iterations
    );
    Ok(IrrOutcome::Undefined {
        reason: UndefinedReason::IterationLimit,
        iterations: settings.max_iterations,
        last_rate: rate,
        last_step,
    })
}
