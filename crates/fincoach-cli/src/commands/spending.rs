use clap::Args;
use serde_json::Value;

use fincoach_core::transactions;

use crate::input;

/// Arguments for spending analysis
#[derive(Args)]
pub struct SpendingArgs {
    /// Path to a FinancialProfile JSON file (or pipe via stdin)
    #[arg(long)]
    pub profile: Option<String>,

    /// Number of trailing months to analyze
    #[arg(long, default_value_t = 3)]
    pub months: u32,
}

pub fn run(args: SpendingArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let profile = input::load_profile(args.profile.as_deref())?;
    let result = transactions::analyze_transactions(&profile, args.months);
    Ok(serde_json::to_value(result)?)
}
