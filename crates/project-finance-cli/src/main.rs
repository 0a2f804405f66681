mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::investment::{IrrArgs, NpvArgs, PaybackArgs, SensitivityArgs};
use commands::simulation::{BaselineArgs, SimulateArgs};

/// Investment appraisal and project portfolio simulation
#[derive(Parser)]
#[command(
    name = "pfa",
    version,
    about = "Investment appraisal and project portfolio simulation",
    long_about = "A CLI for discounted cash flow appraisal (NPV, IRR, payback, rate \
                  sensitivity) and for simulating a month of projects against the \
                  historical baseline."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Appraise an investment: NPV with detail, IRR, payback and sensitivity
    Npv(NpvArgs),
    /// Solve for the Internal Rate of Return
    Irr(IrrArgs),
    /// Simple payback period
    Payback(PaybackArgs),
    /// NPV across a range of discount rates
    Sensitivity(SensitivityArgs),
    /// Generate a month of projects and compare it with the baseline
    Simulate(SimulateArgs),
    /// Show the historical baseline
    Baseline(BaselineArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Npv(args) => commands::investment::run_npv(args),
        Commands::Irr(args) => commands::investment::run_irr(args),
        Commands::Payback(args) => commands::investment::run_payback(args),
        Commands::Sensitivity(args) => commands::investment::run_sensitivity(args),
        Commands::Simulate(args) => commands::simulation::run_simulate(args),
        Commands::Baseline(args) => commands::simulation::run_baseline(args),
        Commands::Version => {
            println!("pfa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
