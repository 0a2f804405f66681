use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::simulation::analysis::{analyze_durations, DurationAnalysis};
use crate::simulation::baseline::{baseline, Baseline};
use crate::simulation::duration::{allocate, auto_average, DurationConfig};
use crate::simulation::pricing::{price, PricingConfig};
use crate::simulation::project::{draw_identity, draw_margin, MarginConfig, Project};
use crate::simulation::random::{RandomSource, RngSource};
use crate::types::{safe_pct, with_metadata, ComputationOutput, Money};
use crate::ProjectFinanceResult;

/// Every tunable of a simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub durations: DurationConfig,
    pub pricing: PricingConfig,
    pub margin: MarginConfig,
}

/// A generated set of projects for one simulation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub projects: Vec<Project>,
    /// Day budget drawn for this run; the durations sum to it.
    pub target_days: u32,
    /// Average duration the allocation was centred on.
    pub average_duration: u32,
}

/// Generate a fresh portfolio of `item_count` projects.
///
/// When `average_duration` is `None` it is derived from a separately drawn
/// budget. Amounts are priced around the historical average project amount.
pub fn generate(
    rng: &mut impl RandomSource,
    item_count: u32,
    average_duration: Option<u32>,
    cfg: &SimulationConfig,
) -> ProjectFinanceResult<Portfolio> {
    let average = match average_duration {
        Some(avg) => avg,
        None => auto_average(rng, item_count, &cfg.durations)?,
    };
    let allocation = allocate(rng, item_count, average, &cfg.durations)?;
    let reference = baseline().average_project_amount;

    let projects = allocation
        .durations
        .iter()
        .map(|&days| {
            let (name, client) = draw_identity(rng);
            let amount = price(rng, days, reference, &cfg.pricing)?;
            let margin = draw_margin(rng, &cfg.margin);
            Project::new(name, client, days, amount, margin)
        })
        .collect::<ProjectFinanceResult<Vec<_>>>()?;

    log::debug!(
        "generated {} projects over {} days (average {average})",
        projects.len(),
        allocation.target_days
    );

    Ok(Portfolio {
        projects,
        target_days: allocation.target_days,
        average_duration: average,
    })
}

/// Aggregate figures of a portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    pub project_count: u32,
    pub total_days: u32,
    pub total_revenue: Money,
    pub total_profit: Money,
    /// Percentage, one decimal.
    pub avg_margin: Decimal,
    /// Days, one decimal.
    pub avg_duration: Decimal,
    pub avg_revenue: Money,
    pub avg_profit: Money,
}

fn average(total: Decimal, count: u32) -> Decimal {
    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

pub fn summarize(portfolio: &Portfolio) -> PortfolioSummary {
    let project_count = portfolio.projects.len() as u32;
    let total_days: u32 = portfolio.projects.iter().map(|p| p.duration_days).sum();
    let total_revenue: Money = portfolio.projects.iter().map(|p| p.amount).sum();
    let total_profit: Money = portfolio.projects.iter().map(|p| p.profit).sum();

    PortfolioSummary {
        project_count,
        total_days,
        total_revenue,
        total_profit,
        avg_margin: safe_pct(total_profit, total_revenue).round_dp(1),
        avg_duration: average(Decimal::from(total_days), project_count).round_dp(1),
        avg_revenue: average(total_revenue, project_count).round(),
        avg_profit: average(total_profit, project_count).round(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonFigures {
    pub revenue: Decimal,
    pub projects: Decimal,
    pub average_amount: Decimal,
}

/// Simulated month set against the historical monthly averages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub simulated: PortfolioSummary,
    pub real: Baseline,
    /// Simulated minus historical.
    pub differences: ComparisonFigures,
    /// Differences as a percentage of the historical figure, one decimal.
    pub variations: ComparisonFigures,
}

pub fn compare(portfolio: &Portfolio, baseline: &Baseline) -> ComparisonReport {
    let simulated = summarize(portfolio);

    let differences = ComparisonFigures {
        revenue: simulated.total_revenue - baseline.monthly_average_revenue,
        projects: Decimal::from(simulated.project_count) - baseline.projects_per_month,
        average_amount: simulated.avg_revenue - baseline.average_project_amount,
    };
    let variations = ComparisonFigures {
        revenue: safe_pct(differences.revenue, baseline.monthly_average_revenue).round_dp(1),
        projects: safe_pct(differences.projects, baseline.projects_per_month).round_dp(1),
        average_amount: safe_pct(differences.average_amount, baseline.average_project_amount)
            .round_dp(1),
    };

    ComparisonReport {
        simulated,
        real: baseline.clone(),
        differences,
        variations,
    }
}

/// Caller-owned simulator state: the current selection and the portfolio
/// last generated for it. Each transition returns a new state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatorState {
    pub item_count: u32,
    pub average_duration: u32,
    pub portfolio: Portfolio,
}

impl SimulatorState {
    pub const DEFAULT_ITEM_COUNT: u32 = 3;

    /// Default selection with an auto-computed average and no portfolio yet.
    pub fn new(rng: &mut impl RandomSource, cfg: &SimulationConfig) -> ProjectFinanceResult<Self> {
        let average_duration = auto_average(rng, Self::DEFAULT_ITEM_COUNT, &cfg.durations)?;
        Ok(Self {
            item_count: Self::DEFAULT_ITEM_COUNT,
            average_duration,
            portfolio: Portfolio::default(),
        })
    }

    /// Select a new item count. The average is recomputed only when the
    /// count actually changes, so a manually chosen average survives.
    pub fn with_item_count(
        self,
        item_count: u32,
        rng: &mut impl RandomSource,
        cfg: &SimulationConfig,
    ) -> ProjectFinanceResult<Self> {
        if item_count == self.item_count {
            return Ok(self);
        }
        let average_duration = auto_average(rng, item_count, &cfg.durations)?;
        Ok(Self {
            item_count,
            average_duration,
            ..self
        })
    }

    pub fn with_average_duration(self, average_duration: u32) -> Self {
        Self {
            average_duration,
            ..self
        }
    }

    /// Replace the portfolio wholesale with a newly generated one.
    pub fn regenerate(
        self,
        rng: &mut impl RandomSource,
        cfg: &SimulationConfig,
    ) -> ProjectFinanceResult<Self> {
        let portfolio = generate(rng, self.item_count, Some(self.average_duration), cfg)?;
        Ok(Self { portfolio, ..self })
    }
}

/// Input for one simulated month.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationInput {
    pub project_count: u32,
    #[serde(default)]
    pub average_duration: Option<u32>,
    /// Optional seed for reproducibility.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub config: SimulationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationOutput {
    pub portfolio: Portfolio,
    pub summary: PortfolioSummary,
    pub comparison: ComparisonReport,
    pub duration_analysis: Option<DurationAnalysis>,
}

/// Generate, summarise and compare one simulated month of projects.
pub fn run_simulation(
    input: &SimulationInput,
) -> ProjectFinanceResult<ComputationOutput<SimulationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let mut rng = RngSource::seeded(input.seed);
    let portfolio = generate(
        &mut rng,
        input.project_count,
        input.average_duration,
        &input.config,
    )?;

    let summary = summarize(&portfolio);
    let comparison = compare(&portfolio, baseline());
    if let Some(last) = portfolio.projects.last() {
        if portfolio.projects.len() > 1 && last.duration_days > 2 * portfolio.average_duration {
            warnings.push(format!(
                "Last project absorbed {} days, more than twice the {}-day average",
                last.duration_days, portfolio.average_duration
            ));
        }
    }
    let duration_analysis = analyze_durations(&portfolio);

    let output = SimulationOutput {
        portfolio,
        summary,
        comparison,
        duration_analysis,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Stochastic Project Portfolio Simulation",
        &serde_json::json!({
            "project_count": input.project_count,
            "average_duration": input.average_duration,
            "seed": input.seed,
            "ideal_days": input.config.durations.ideal_days,
            "tolerance_days": input.config.durations.tolerance_days,
        }),
        warnings,
        elapsed,
        output,
    ))
}
