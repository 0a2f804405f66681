use clap::{Args, ValueEnum};
use serde::Deserialize;
use serde_json::Value;

use project_finance_core::investment::appraisal::{self, InvestmentInput};
use project_finance_core::investment::irr::{self, IrrSettings};
use project_finance_core::investment::payback;
use project_finance_core::investment::sensitivity::{self, RateRange};
use project_finance_core::time_value::{cumulative_flows, growing_flows, uniform_flows};
use project_finance_core::PeriodKind;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PeriodArg {
    Annual,
    Monthly,
}

impl From<PeriodArg> for PeriodKind {
    fn from(p: PeriodArg) -> Self {
        match p {
            PeriodArg::Annual => PeriodKind::Annual,
            PeriodArg::Monthly => PeriodKind::Monthly,
        }
    }
}

/// Cash-flow series, given explicitly or through a preset
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FlowArgs {
    /// Initial investment (period-0 outlay, positive)
    #[arg(long)]
    pub investment: Option<f64>,

    /// Comma-separated cash flows for periods 1..n (e.g. 30000,30000,30000)
    #[arg(long, value_delimiter = ',')]
    pub flows: Vec<f64>,

    /// Fill every period with this flow (requires --periods)
    #[arg(long, conflicts_with = "flows")]
    pub uniform: Option<f64>,

    /// First-period flow grown by --growth each period (requires --periods)
    #[arg(long, conflicts_with_all = ["flows", "uniform"])]
    pub growing: Option<f64>,

    /// Per-period growth for --growing (e.g. 0.05 for 5%)
    #[arg(long, default_value = "0.05")]
    pub growth: f64,

    /// Number of periods for --uniform / --growing
    #[arg(long, default_value = "5")]
    pub periods: usize,
}

impl FlowArgs {
    fn resolve(&self) -> Result<(f64, Vec<f64>), Box<dyn std::error::Error>> {
        let investment = self
            .investment
            .ok_or("--investment is required (or provide --input)")?;
        let flows = if let Some(amount) = self.uniform {
            uniform_flows(amount, self.periods)
        } else if let Some(base) = self.growing {
            growing_flows(base, self.growth, self.periods)
        } else if !self.flows.is_empty() {
            self.flows.clone()
        } else {
            return Err("--flows, --uniform or --growing is required".into());
        };
        Ok((investment, flows))
    }
}

/// Cash-flow document accepted by `irr`, `payback` and `sensitivity`.
///
/// Field names match the `npv` input, so one file serves every command;
/// fields a command does not use are ignored.
#[derive(Debug, Deserialize)]
struct CashFlowInput {
    initial_investment: f64,
    cash_flows: Vec<f64>,
    #[serde(default)]
    period_kind: Option<PeriodKind>,
    #[serde(default)]
    irr: Option<IrrSettings>,
    #[serde(default)]
    sensitivity_range: Option<RateRange>,
}

/// Load a cash-flow document from `--input`, falling back to piped stdin.
fn load_cash_flow_input(
    path: Option<&str>,
) -> Result<Option<CashFlowInput>, Box<dyn std::error::Error>> {
    match path {
        Some(p) => Ok(Some(input::file::read_input(p)?)),
        None => input::stdin::read_stdin(),
    }
}

/// Arguments for a full NPV appraisal
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct NpvArgs {
    #[command(flatten)]
    pub cash_flows: FlowArgs,

    /// Annual discount rate (e.g. 0.10 for 10%)
    #[arg(long)]
    pub rate: Option<f64>,

    /// Period spacing of the flows
    #[arg(long, value_enum, default_value = "annual")]
    pub period: PeriodArg,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an IRR solve
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct IrrArgs {
    #[command(flatten)]
    pub cash_flows: FlowArgs,

    /// Newton-Raphson starting rate
    #[arg(long, default_value = "0.10")]
    pub guess: f64,

    /// Iteration cap
    #[arg(long, default_value = "1000")]
    pub max_iterations: u32,

    /// Convergence tolerance on NPV and step size
    #[arg(long, default_value = "0.000001")]
    pub tolerance: f64,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the payback period
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct PaybackArgs {
    #[command(flatten)]
    pub cash_flows: FlowArgs,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the NPV-versus-rate sweep
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub cash_flows: FlowArgs,

    /// First annual rate of the sweep
    #[arg(long, default_value = "0.01")]
    pub start: f64,

    /// Sweep stops before this annual rate
    #[arg(long, default_value = "0.30")]
    pub stop: f64,

    /// Step between rates
    #[arg(long, default_value = "0.01")]
    pub step: f64,

    /// Period spacing of the flows
    #[arg(long, value_enum, default_value = "annual")]
    pub period: PeriodArg,

    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_npv(args: NpvArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let npv_input: InvestmentInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        let (initial_investment, cash_flows) = args.cash_flows.resolve()?;
        InvestmentInput {
            initial_investment,
            cash_flows,
            discount_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            period_kind: args.period.into(),
            irr: IrrSettings::default(),
            sensitivity_range: RateRange::default(),
        }
    };
    let result = appraisal::appraise_investment(&npv_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flag_settings = IrrSettings {
        initial_guess: args.guess,
        max_iterations: args.max_iterations,
        tolerance: args.tolerance,
    };
    let (investment, flows, settings) = match load_cash_flow_input(args.input.as_deref())? {
        Some(doc) => (
            doc.initial_investment,
            doc.cash_flows,
            doc.irr.unwrap_or(flag_settings),
        ),
        None => {
            let (investment, flows) = args.cash_flows.resolve()?;
            (investment, flows, flag_settings)
        }
    };
    let outcome = irr::solve_irr(investment, &flows, &settings)?;
    Ok(serde_json::json!({
        "result": {
            "irr": outcome.rate(),
            "outcome": outcome,
        }
    }))
}

pub fn run_payback(args: PaybackArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (investment, flows) = match load_cash_flow_input(args.input.as_deref())? {
        Some(doc) => (doc.initial_investment, doc.cash_flows),
        None => args.cash_flows.resolve()?,
    };
    Ok(serde_json::json!({
        "result": {
            "payback_period": payback::payback_period(investment, &flows),
            "cumulative_flows": cumulative_flows(investment, &flows),
        }
    }))
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flag_range = RateRange {
        start: args.start,
        stop: args.stop,
        step: args.step,
    };
    let flag_period: PeriodKind = args.period.into();
    let (investment, flows, range, period) = match load_cash_flow_input(args.input.as_deref())? {
        Some(doc) => (
            doc.initial_investment,
            doc.cash_flows,
            doc.sensitivity_range.unwrap_or(flag_range),
            doc.period_kind.unwrap_or(flag_period),
        ),
        None => {
            let (investment, flows) = args.cash_flows.resolve()?;
            (investment, flows, flag_range, flag_period)
        }
    };
    let rates = sensitivity::rate_grid(&range)?;
    let points = sensitivity::sweep_annual(investment, &flows, &rates, period)?;
    Ok(serde_json::json!({ "results": points }))
}
