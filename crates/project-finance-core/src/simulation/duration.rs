use serde::{Deserialize, Serialize};

use crate::error::ProjectFinanceError;
use crate::simulation::random::RandomSource;
use crate::ProjectFinanceResult;

/// Monthly working-day budget and how far individual durations may stray.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DurationConfig {
    /// Nominal days in a month of work.
    pub ideal_days: u32,
    /// The drawn budget lies in `[ideal - tolerance, ideal + tolerance]`.
    pub tolerance_days: u32,
    /// Fraction of the average used as the per-item spread.
    pub spread_fraction: f64,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            ideal_days: 30,
            tolerance_days: 7,
            spread_fraction: 0.4,
        }
    }
}

impl DurationConfig {
    pub fn min_budget(&self) -> u32 {
        self.ideal_days.saturating_sub(self.tolerance_days)
    }

    pub fn max_budget(&self) -> u32 {
        self.ideal_days + self.tolerance_days
    }
}

/// Durations for one portfolio and the budget they add up to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub target_days: u32,
    pub durations: Vec<u32>,
}

/// Draw a total-days budget uniformly from the configured window.
pub fn target_days(rng: &mut impl RandomSource, cfg: &DurationConfig) -> u32 {
    rng.int_inclusive(cfg.min_budget() as i64, cfg.max_budget() as i64) as u32
}

/// Average duration that would spread a freshly drawn budget evenly over
/// `item_count` items.
pub fn auto_average(
    rng: &mut impl RandomSource,
    item_count: u32,
    cfg: &DurationConfig,
) -> ProjectFinanceResult<u32> {
    check_item_count(item_count, cfg)?;
    let budget = target_days(rng, cfg);
    let average = (budget as f64 / item_count as f64).round() as u32;
    Ok(average.max(1))
}

fn check_item_count(item_count: u32, cfg: &DurationConfig) -> ProjectFinanceResult<()> {
    if item_count == 0 {
        return Err(ProjectFinanceError::InvalidInput {
            field: "item_count".into(),
            reason: "At least one item is required".into(),
        });
    }
    if item_count > cfg.min_budget() {
        return Err(ProjectFinanceError::InvalidInput {
            field: "item_count".into(),
            reason: format!(
                "{item_count} items cannot each receive a day from a budget as small as {}",
                cfg.min_budget()
            ),
        });
    }
    Ok(())
}

/// Split a freshly drawn budget across `item_count` items.
///
/// Every item but the last draws from `average ± spread`, capped at its fair
/// share of what remains so later items are never starved. The last item
/// absorbs the remainder, so the durations always sum to `target_days`.
pub fn allocate(
    rng: &mut impl RandomSource,
    item_count: u32,
    average_duration: u32,
    cfg: &DurationConfig,
) -> ProjectFinanceResult<Allocation> {
    check_item_count(item_count, cfg)?;
    if average_duration == 0 {
        return Err(ProjectFinanceError::InvalidInput {
            field: "average_duration".into(),
            reason: "Average duration must be at least one day".into(),
        });
    }

    let budget = target_days(rng, cfg);
    let mut remaining = budget as i64;
    let mut durations = Vec::with_capacity(item_count as usize);

    let average = average_duration as i64;
    let spread = ((average as f64 * cfg.spread_fraction).floor() as i64).max(1);
    let low = (average - spread).max(1);
    let high = average + spread;

    for i in 0..item_count {
        let duration = if i == item_count - 1 {
            remaining.max(1)
        } else {
            let fair_share = (remaining / (item_count - i) as i64).max(1);
            let upper = high.min(fair_share);
            let drawn = if upper < low {
                upper
            } else {
                rng.int_inclusive(low, upper)
            };
            drawn.max(1)
        };
        remaining -= duration;
        durations.push(duration as u32);
    }

    log::debug!("allocated {budget} days across {item_count} items: {durations:?}");

    Ok(Allocation {
        target_days: budget,
        durations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::random::{RngSource, ScriptedSource};

    #[test]
    fn test_target_days_window() {
        let cfg = DurationConfig::default();
        let mut rng = RngSource::seeded(Some(3));
        for _ in 0..500 {
            let t = target_days(&mut rng, &cfg);
            assert!((23..=37).contains(&t));
        }
    }

    #[test]
    fn test_auto_average() {
        let cfg = DurationConfig::default();
        // Budget 23 over 3 items rounds to 8; 37 over 3 rounds to 12.
        assert_eq!(auto_average(&mut ScriptedSource::new(vec![0.0]), 3, &cfg).unwrap(), 8);
        assert_eq!(auto_average(&mut ScriptedSource::new(vec![0.999]), 3, &cfg).unwrap(), 12);
        assert!(auto_average(&mut ScriptedSource::new(vec![0.0]), 0, &cfg).is_err());
    }

    #[test]
    fn test_allocation_sums_to_budget() {
        let cfg = DurationConfig::default();
        let mut rng = RngSource::seeded(Some(99));
        for n in 1..=8 {
            for avg in 1..=20 {
                let a = allocate(&mut rng, n, avg, &cfg).unwrap();
                assert_eq!(a.durations.len(), n as usize);
                assert!(a.durations.iter().all(|&d| d >= 1));
                assert_eq!(a.durations.iter().sum::<u32>(), a.target_days);
                assert!((23..=37).contains(&a.target_days));
            }
        }
    }

    #[test]
    fn test_single_item_takes_whole_budget() {
        let cfg = DurationConfig::default();
        let a = allocate(&mut ScriptedSource::new(vec![0.5]), 1, 5, &cfg).unwrap();
        assert_eq!(a.target_days, 30);
        assert_eq!(a.durations, vec![30]);
    }

    #[test]
    fn test_last_item_absorbs_remainder() {
        let cfg = DurationConfig::default();
        // Budget 23; average 2 gives range [1, 3]; each draw picks the low end.
        let a = allocate(&mut ScriptedSource::new(vec![0.0]), 3, 2, &cfg).unwrap();
        assert_eq!(a.durations, vec![1, 1, 21]);
    }

    #[test]
    fn test_fair_share_caps_large_averages() {
        let cfg = DurationConfig::default();
        // Budget 23 over 4 items: the first fair share is 5, below the range [12, 28].
        let a = allocate(&mut ScriptedSource::new(vec![0.0]), 4, 20, &cfg).unwrap();
        assert_eq!(a.durations[0], 5);
        assert_eq!(a.durations.iter().sum::<u32>(), 23);
    }

    #[test]
    fn test_rejects_impossible_counts() {
        let cfg = DurationConfig::default();
        let mut rng = RngSource::seeded(Some(1));
        assert!(allocate(&mut rng, 0, 5, &cfg).is_err());
        assert!(allocate(&mut rng, 24, 1, &cfg).is_err());
        assert!(allocate(&mut rng, 3, 0, &cfg).is_err());
        assert!(allocate(&mut rng, 23, 1, &cfg).is_ok());
    }
}
