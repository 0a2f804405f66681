use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::ProjectFinanceError;
use crate::ProjectFinanceResult;

/// All monetary values attached to projects and portfolios.
pub type Money = Decimal;

/// Per-period discount rates expressed as decimals (0.10 = 10%). Never as percentages.
pub type Rate = f64;

/// How the periods of a cash-flow series are spaced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    #[default]
    Annual,
    Monthly,
}

impl PeriodKind {
    /// Convert an annual rate into the equivalent rate for one period of this kind.
    pub fn per_period_rate(self, annual_rate: Rate) -> ProjectFinanceResult<Rate> {
        if !annual_rate.is_finite() || annual_rate <= -1.0 {
            return Err(ProjectFinanceError::InvalidInput {
                field: "discount_rate".into(),
                reason: "Discount rate must be a finite value greater than -100%".into(),
            });
        }
        Ok(match self {
            PeriodKind::Annual => annual_rate,
            PeriodKind::Monthly => (1.0 + annual_rate).powf(1.0 / 12.0) - 1.0,
        })
    }

    pub fn label(self) -> &'static str {
        match self {
            PeriodKind::Annual => "year",
            PeriodKind::Monthly => "month",
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "ieee754_f64".to_string(),
        },
    }
}

/// Percentage of `numerator` over `denominator`, defined as zero when the
/// denominator is zero.
pub fn safe_pct(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_monthly_rate_compounds_back_to_annual() {
        let monthly = PeriodKind::Monthly.per_period_rate(0.12).unwrap();
        assert!(((1.0 + monthly).powi(12) - 1.12).abs() < 1e-12);
        assert!((monthly - 0.009488792934583).abs() < 1e-9);
    }

    #[test]
    fn test_annual_rate_passes_through() {
        assert_eq!(PeriodKind::Annual.per_period_rate(0.1).unwrap(), 0.1);
    }

    #[test]
    fn test_rate_at_minus_one_rejected() {
        assert!(PeriodKind::Monthly.per_period_rate(-1.0).is_err());
        assert!(PeriodKind::Annual.per_period_rate(f64::NAN).is_err());
    }

    #[test]
    fn test_safe_pct_zero_denominator() {
        assert_eq!(safe_pct(dec!(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(safe_pct(dec!(50), dec!(200)), dec!(25));
    }
}
