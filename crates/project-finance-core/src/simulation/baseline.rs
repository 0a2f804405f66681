use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::simulation::random::RandomSource;
use crate::types::Money;

/// A project from the historical record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalProject {
    pub name: String,
    pub client: String,
    pub amount: Money,
    pub status: ProjectStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Completed,
    Delivered,
    InProgress,
}

/// Fixed historical reference used for comparison, never generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub projects: Vec<HistoricalProject>,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub period_months: u32,
    pub total_projects: u32,
    pub total_revenue: Money,
    pub monthly_average_revenue: Money,
    pub projects_per_month: Decimal,
    pub average_project_amount: Money,
}

const HISTORICAL_PROJECTS: &[(&str, &str, Decimal, ProjectStatus)] = &[
    (
        "SAG mill brake hydraulic unit repair",
        "Minera Colquiria S.A.",
        dec!(12800),
        ProjectStatus::Completed,
    ),
    (
        "Hydraulic manifold fabrication for hoisting system",
        "Constructora San José S.A.",
        dec!(9450),
        ProjectStatus::Completed,
    ),
    (
        "Lubrication truck repair",
        "Transporte Pesado Cruz del Sur",
        dec!(5000),
        ProjectStatus::Completed,
    ),
    (
        "Industrial pneumatic maintenance",
        "Cementos Pacasmayo S.A.A.",
        dec!(4500),
        ProjectStatus::Completed,
    ),
    (
        "Mobile hydraulic power unit maintenance (chassis and valves)",
        "Cosapi Minería S.A.C",
        dec!(7300),
        ProjectStatus::Completed,
    ),
    (
        "30T hydraulic jack repair, Zárate branch",
        "Maestro Perú S.A. (SJL)",
        dec!(2700),
        ProjectStatus::Delivered,
    ),
    (
        "Hydraulic unit supply for press cooling system",
        "Minera Aurífera Retamas S.A.",
        dec!(14200),
        ProjectStatus::InProgress,
    ),
    (
        "Directional valve bank diagnosis and bench test",
        "Haug S.A.",
        dec!(3500),
        ProjectStatus::Delivered,
    ),
    (
        "100T industrial hydraulic press maintenance",
        "Metalurgia & Servicios EIRL",
        dec!(6800),
        ProjectStatus::Completed,
    ),
];

/// Whole calendar months covered by `[start, end]`.
fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32 + 1;
    months.max(0) as u32
}

impl Baseline {
    fn build() -> Self {
        let projects: Vec<HistoricalProject> = HISTORICAL_PROJECTS
            .iter()
            .map(|&(name, client, amount, status)| HistoricalProject {
                name: name.to_string(),
                client: client.to_string(),
                amount,
                status,
            })
            .collect();

        let period_start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or(NaiveDate::MIN);
        let period_end = NaiveDate::from_ymd_opt(2025, 3, 31).unwrap_or(NaiveDate::MIN);
        let period_months = months_between(period_start, period_end);

        let total_projects = projects.len() as u32;
        let total_revenue: Money = projects.iter().map(|p| p.amount).sum();
        let months = Decimal::from(period_months);
        let count = Decimal::from(total_projects);

        let per_month = |x: Decimal| if months.is_zero() { Decimal::ZERO } else { x / months };

        Self {
            period_start,
            period_end,
            period_months,
            total_projects,
            total_revenue,
            monthly_average_revenue: per_month(total_revenue),
            projects_per_month: per_month(count),
            average_project_amount: if count.is_zero() {
                Decimal::ZERO
            } else {
                total_revenue / count
            },
            projects,
        }
    }
}

/// The process-wide historical baseline.
pub fn baseline() -> &'static Baseline {
    static BASELINE: OnceLock<Baseline> = OnceLock::new();
    BASELINE.get_or_init(Baseline::build)
}

/// Estimated working days of one historical project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimatedDuration {
    pub name: String,
    pub client: String,
    pub amount: Money,
    pub estimated_days: u32,
}

/// Estimate a duration for each historical project.
///
/// A base of 4–12 days is drawn; projects above 10 000 take 1–4 days more,
/// projects below 4 000 take 1–3 days less (never under 2).
pub fn estimate_durations(
    baseline: &Baseline,
    rng: &mut impl RandomSource,
) -> Vec<EstimatedDuration> {
    baseline
        .projects
        .iter()
        .map(|p| {
            let base = rng.int_inclusive(4, 12);
            let days = if p.amount > dec!(10000) {
                base + rng.int_inclusive(1, 4)
            } else if p.amount < dec!(4000) {
                (base - rng.int_inclusive(1, 3)).max(2)
            } else {
                base
            };
            EstimatedDuration {
                name: p.name.clone(),
                client: p.client.clone(),
                amount: p.amount,
                estimated_days: days as u32,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::random::RngSource;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_derived_figures() {
        let b = baseline();
        assert_eq!(b.total_projects, 9);
        assert_eq!(b.total_revenue, dec!(65250));
        assert_eq!(b.period_months, 3);
        assert_eq!(b.monthly_average_revenue, dec!(21750));
        assert_eq!(b.projects_per_month, dec!(3));
        assert_eq!(b.average_project_amount, dec!(7250));
    }

    #[test]
    fn test_baseline_is_shared() {
        assert!(std::ptr::eq(baseline(), baseline()));
    }

    #[test]
    fn test_months_between() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(months_between(d(2024, 11, 1), d(2025, 2, 28)), 4);
        assert_eq!(months_between(d(2025, 3, 1), d(2025, 3, 31)), 1);
    }

    #[test]
    fn test_estimated_durations_follow_amount_bands() {
        let mut rng = RngSource::seeded(Some(11));
        for _ in 0..50 {
            let estimates = estimate_durations(baseline(), &mut rng);
            assert_eq!(estimates.len(), 9);
            for e in &estimates {
                if e.amount > dec!(10000) {
                    assert!((5..=16).contains(&e.estimated_days), "{e:?}");
                } else if e.amount < dec!(4000) {
                    assert!((2..=11).contains(&e.estimated_days), "{e:?}");
                } else {
                    assert!((4..=12).contains(&e.estimated_days), "{e:?}");
                }
            }
        }
    }
}
