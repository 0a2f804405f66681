use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::simulation::portfolio::Portfolio;

/// Duration statistics for one set of durations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationStats {
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    /// Upper median, `sorted[n / 2]`.
    pub median: u32,
    /// `max - min`.
    pub spread: u32,
    /// Pearson correlation between duration and amount.
    pub price_correlation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationDelta {
    pub mean: f64,
    pub spread: i64,
    pub price_correlation: f64,
}

/// Generated durations set against durations implied by the older
/// price-driven rule, which tied time almost linearly to amount.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationAnalysis {
    pub current: DurationStats,
    pub legacy: DurationStats,
    pub legacy_durations: Vec<u32>,
    pub delta: DurationDelta,
}

const LEGACY_DAY_RATE: f64 = 600.0;
const LEGACY_FIXED_COST: f64 = 1250.0;

fn round_to(value: f64, dp: i32) -> f64 {
    let factor = 10f64.powi(dp);
    (value * factor).round() / factor
}

/// Duration the legacy rule would have derived from an amount.
pub fn legacy_duration(amount: f64) -> u32 {
    ((amount - LEGACY_FIXED_COST) / LEGACY_DAY_RATE).round().max(1.0) as u32
}

/// Pearson correlation, zero when either series is constant or too short.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    let sd_x = x.iter().population_std_dev();
    let sd_y = y.iter().population_std_dev();
    if sd_x <= f64::EPSILON || sd_y <= f64::EPSILON {
        return 0.0;
    }
    x.iter().population_covariance(y.iter()) / (sd_x * sd_y)
}

fn stats(durations: &[u32], amounts: &[f64]) -> DurationStats {
    let mut sorted = durations.to_vec();
    sorted.sort_unstable();
    let as_f64: Vec<f64> = durations.iter().map(|&d| d as f64).collect();
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];

    DurationStats {
        mean: round_to(as_f64.iter().mean(), 1),
        min,
        max,
        median: sorted[sorted.len() / 2],
        spread: max - min,
        price_correlation: round_to(correlation(&as_f64, amounts), 3),
    }
}

/// Compare generated durations with the legacy price-derived ones.
/// Returns `None` for an empty portfolio.
pub fn analyze_durations(portfolio: &Portfolio) -> Option<DurationAnalysis> {
    if portfolio.projects.is_empty() {
        return None;
    }

    let durations: Vec<u32> = portfolio.projects.iter().map(|p| p.duration_days).collect();
    let amounts: Vec<f64> = portfolio
        .projects
        .iter()
        .map(|p| p.amount.to_f64().unwrap_or_default())
        .collect();
    let legacy_durations: Vec<u32> = amounts.iter().map(|&a| legacy_duration(a)).collect();

    let current = stats(&durations, &amounts);
    let legacy = stats(&legacy_durations, &amounts);
    let delta = DurationDelta {
        mean: round_to(current.mean - legacy.mean, 1),
        spread: current.spread as i64 - legacy.spread as i64,
        price_correlation: round_to(current.price_correlation - legacy.price_correlation, 3),
    };

    Some(DurationAnalysis {
        current,
        legacy,
        legacy_durations,
        delta,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::project::Project;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn portfolio(items: &[(u32, Decimal)]) -> Portfolio {
        Portfolio {
            projects: items
                .iter()
                .map(|&(d, a)| Project::new("Jack repair", "Haug S.A.", d, a, 0.25).unwrap())
                .collect(),
            target_days: items.iter().map(|i| i.0).sum(),
            average_duration: 0,
        }
    }

    #[test]
    fn test_legacy_duration() {
        assert_eq!(legacy_duration(7250.0), 10);
        assert_eq!(legacy_duration(1500.0), 1);
    }

    #[test]
    fn test_correlation_limits() {
        assert!((correlation(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]) - 1.0).abs() < 1e-12);
        assert!((correlation(&[1.0, 2.0, 3.0], &[6.0, 4.0, 2.0]) + 1.0).abs() < 1e-12);
        assert_eq!(correlation(&[1.0, 1.0], &[3.0, 4.0]), 0.0);
        assert_eq!(correlation(&[1.0], &[3.0]), 0.0);
    }

    #[test]
    fn test_analysis() {
        let p = portfolio(&[(12, dec!(4000)), (6, dec!(9000)), (9, dec!(7300))]);
        let a = analyze_durations(&p).unwrap();
        assert_eq!(a.current.min, 6);
        assert_eq!(a.current.max, 12);
        assert_eq!(a.current.median, 9);
        assert_eq!(a.current.spread, 6);
        assert_eq!(a.current.mean, 9.0);
        // 4000 -> 5, 9000 -> 13, 7300 -> 10
        assert_eq!(a.legacy_durations, vec![5, 13, 10]);
        assert!((a.legacy.price_correlation - 1.0).abs() < 0.01);
        assert!(a.current.price_correlation < 0.0);
        assert_eq!(a.delta.spread, -2);
    }

    #[test]
    fn test_empty_portfolio() {
        assert!(analyze_durations(&Portfolio::default()).is_none());
    }
}
