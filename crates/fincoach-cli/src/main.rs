mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::affordability::AffordabilityArgs;
use commands::coaches::CoachesArgs;
use commands::dti::DtiArgs;
use commands::plan::PlanArgs;
use commands::readiness::ReadinessArgs;
use commands::spending::SpendingArgs;

/// Deterministic financial-coaching calculations
#[derive(Parser)]
#[command(
    name = "fincoach",
    version,
    about = "Deterministic financial-coaching calculations",
    long_about = "A CLI for the deterministic truth layer of a financial coaching \
                  backend: debt-to-income analysis, home affordability checks, \
                  readiness scoring, transaction/peer-spending analysis, and \
                  action-plan generation. Profiles are JSON files or piped stdin."
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
    /// Calculate the debt-to-income ratio and its status band
    Dti(DtiArgs),
    /// Check whether a target home price is affordable
    Affordability(AffordabilityArgs),
    /// Compute the 0-100 homeownership readiness score
    Readiness(ReadinessArgs),
    /// Build a prioritized 18-month action plan
    Plan(PlanArgs),
    /// Analyze spending against peer benchmarks
    Spending(SpendingArgs),
    /// List coach personas and the data fields they require
    Coaches(CoachesArgs),
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Dti(args) => commands::dti::run(args),
        Commands::Affordability(args) => commands::affordability::run(args),
        Commands::Readiness(args) => commands::readiness::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Spending(args) => commands::spending::run(args),
        Commands::Coaches(args) => commands::coaches::run(args),
    };

    match result {
        Ok(value) => output::format_output(&cli.output, &value),
        Err(e) => {
            eprintln!("{} {}", "error:".red().bold(), e);
            process::exit(1);
        }
    }
}
