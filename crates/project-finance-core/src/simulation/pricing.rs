use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProjectFinanceError;
use crate::simulation::random::RandomSource;
use crate::types::Money;
use crate::ProjectFinanceResult;

/// Tiered random pricing calibrated around a historical average.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Relative variation drawn around the baseline average, `[low, high)`.
    pub variation_low: f64,
    pub variation_high: f64,
    /// Duration at which the time adjustment is neutral.
    pub reference_days: u32,
    /// Relative adjustment per day above or below `reference_days`.
    pub per_day_adjustment: f64,
    /// Probability of the large-project multiplier.
    pub large_probability: f64,
    pub large_multiplier: (f64, f64),
    /// Probability of the small-project multiplier.
    pub small_probability: f64,
    pub small_multiplier: (f64, f64),
    pub rounding_step: i64,
    pub minimum_amount: i64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            variation_low: -0.5,
            variation_high: 0.8,
            reference_days: 8,
            per_day_adjustment: 0.015,
            large_probability: 0.15,
            large_multiplier: (1.5, 2.2),
            small_probability: 0.15,
            small_multiplier: (0.3, 0.6),
            rounding_step: 100,
            minimum_amount: 1500,
        }
    }
}

impl PricingConfig {
    fn validate(&self) -> ProjectFinanceResult<()> {
        if self.rounding_step <= 0 {
            return Err(ProjectFinanceError::InvalidInput {
                field: "rounding_step".into(),
                reason: "Rounding step must be positive".into(),
            });
        }
        if self.large_probability + self.small_probability > 1.0 {
            return Err(ProjectFinanceError::InvalidInput {
                field: "large_probability".into(),
                reason: "Large and small tier probabilities cannot exceed 1 together".into(),
            });
        }
        Ok(())
    }
}

/// Which multiplicative tier, if any, a project fell into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTier {
    Standard,
    Large,
    Small,
}

/// Price a project of `duration_days` around `baseline_average`.
///
/// Draw order is fixed: the main variation, then one tier draw shared by the
/// large and small branches (they are mutually exclusive), then the tier
/// magnitude when a tier applies. The result is rounded to the nearest
/// `rounding_step` and floored at `minimum_amount`.
pub fn price(
    rng: &mut impl RandomSource,
    duration_days: u32,
    baseline_average: Money,
    cfg: &PricingConfig,
) -> ProjectFinanceResult<Money> {
    price_with_tier(rng, duration_days, baseline_average, cfg).map(|(amount, _)| amount)
}

pub fn price_with_tier(
    rng: &mut impl RandomSource,
    duration_days: u32,
    baseline_average: Money,
    cfg: &PricingConfig,
) -> ProjectFinanceResult<(Money, PriceTier)> {
    cfg.validate()?;
    let base = baseline_average
        .to_f64()
        .ok_or_else(|| ProjectFinanceError::InvalidInput {
            field: "baseline_average".into(),
            reason: "Baseline average is not representable as f64".into(),
        })?;

    let variation = rng.uniform(cfg.variation_low, cfg.variation_high);
    let mut amount = base * (1.0 + variation);

    let day_offset = duration_days as f64 - cfg.reference_days as f64;
    amount *= 1.0 + day_offset * cfg.per_day_adjustment;

    let tier_draw = rng.unit();
    let tier = if tier_draw < cfg.large_probability {
        amount *= rng.uniform(cfg.large_multiplier.0, cfg.large_multiplier.1);
        PriceTier::Large
    } else if tier_draw > 1.0 - cfg.small_probability {
        amount *= rng.uniform(cfg.small_multiplier.0, cfg.small_multiplier.1);
        PriceTier::Small
    } else {
        PriceTier::Standard
    };

    let step = cfg.rounding_step as f64;
    // Half-way amounts go to the even step, e.g. 250 -> 200 and 350 -> 400.
    let rounded = (amount / step).round_ties_even() as i64 * cfg.rounding_step;
    Ok((Decimal::from(rounded.max(cfg.minimum_amount)), tier))
}
