use clap::Args;
use serde_json::Value;

use project_finance_core::simulation::baseline::{baseline, estimate_durations};
use project_finance_core::simulation::portfolio::{self, SimulationConfig, SimulationInput};
use project_finance_core::simulation::random::RngSource;

use crate::input;

/// Arguments for a simulated month of projects
#[derive(Args)]
pub struct SimulateArgs {
    /// Number of projects to generate
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=8))]
    pub projects: u32,

    /// Average project duration in days (auto-computed when omitted)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=20))]
    pub average_duration: Option<u32>,

    /// Seed for a reproducible run
    #[arg(long)]
    pub seed: Option<u64>,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the historical baseline
#[derive(Args)]
pub struct BaselineArgs {
    /// Also estimate a duration for each historical project
    #[arg(long)]
    pub estimate_durations: bool,

    /// Seed for the duration estimates
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn run_simulate(args: SimulateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let sim_input: SimulationInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        SimulationInput {
            project_count: args.projects,
            average_duration: args.average_duration,
            seed: args.seed,
            config: SimulationConfig::default(),
        }
    };
    let result = portfolio::run_simulation(&sim_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_baseline(args: BaselineArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let reference = baseline();
    let projects = if args.estimate_durations {
        let mut rng = RngSource::seeded(args.seed);
        serde_json::to_value(estimate_durations(reference, &mut rng))?
    } else {
        serde_json::to_value(&reference.projects)?
    };
    Ok(serde_json::json!({
        "result": {
            "period_start": reference.period_start,
            "period_end": reference.period_end,
            "period_months": reference.period_months,
            "total_projects": reference.total_projects,
            "total_revenue": reference.total_revenue,
            "monthly_average_revenue": reference.monthly_average_revenue,
            "projects_per_month": reference.projects_per_month,
            "average_project_amount": reference.average_project_amount,
        },
        "projects": projects,
    }))
}
